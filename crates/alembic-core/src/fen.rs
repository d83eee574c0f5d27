//! Variant FEN parsing for [`Position`].
//!
//! Supported subset: piece placement with multi-digit empty runs, an optional
//! `[...]` pocket appended to the placement, and the active color. Remaining
//! fields (castling, counters, variant extras) are ignored.

use crate::color::Color;
use crate::error::FenError;
use crate::extent::BoardExtent;
use crate::piece_chars::PieceChars;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard chess starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Split the first FEN field into board placement and optional pocket contents.
pub fn split_placement(placement: &str) -> Result<(&str, Option<&str>), FenError> {
    match placement.find('[') {
        Some(open) => {
            let close = placement[open..]
                .find(']')
                .ok_or(FenError::UnterminatedPocket)?;
            Ok((&placement[..open], Some(&placement[open + 1..open + close])))
        }
        None => Ok((placement, None)),
    }
}

impl Position {
    /// Parse a variant FEN using the given character table and board extent.
    pub fn from_fen(fen: &str, chars: &PieceChars, extent: BoardExtent) -> Result<Position, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::Empty)?;
        let (board_part, pocket) = split_placement(placement)?;

        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != extent.ranks() {
            return Err(FenError::WrongRankCount {
                expected: extent.ranks(),
                found: ranks.len(),
            });
        }

        let mut pos = Position::empty(extent);

        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN ranks go from the top of the board down
            let rank = extent.max_rank - rank_index as u8;
            let mut file = 0usize;
            let mut empty_run = 0usize;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    empty_run = empty_run.saturating_mul(10).saturating_add(digit as usize);
                    if file.saturating_add(empty_run) > extent.files() {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: file.saturating_add(empty_run),
                            expected: extent.files(),
                        });
                    }
                    continue;
                }
                file += std::mem::take(&mut empty_run);
                if c == '~' {
                    // promoted-piece marker, irrelevant for features
                    continue;
                }
                let piece = chars
                    .piece_of(c)
                    .ok_or(FenError::InvalidPieceChar { character: c })?;
                if file >= extent.files() {
                    return Err(FenError::BadRankLength {
                        rank_index,
                        length: file + 1,
                        expected: extent.files(),
                    });
                }
                let sq = Square::new(file as u8, rank).ok_or(FenError::BadRankLength {
                    rank_index,
                    length: file + 1,
                    expected: extent.files(),
                })?;
                pos.put_piece(sq, piece);
                file += 1;
            }
            file += empty_run;

            if file != extent.files() {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file,
                    expected: extent.files(),
                });
            }
        }

        for c in pocket.unwrap_or("").chars().filter(|&c| c != '-') {
            let piece = chars
                .piece_of(c)
                .ok_or(FenError::InvalidPieceChar { character: c })?;
            let held = pos.count_in_hand(piece.color(), piece.kind());
            pos.set_hand(piece, held.saturating_add(1));
        }

        let side_to_move = match fields.next() {
            None => Color::White,
            Some(token) => Color::from_fen_token(token).ok_or_else(|| FenError::InvalidColor {
                found: token.to_string(),
            })?,
        };
        pos.set_side_to_move(side_to_move);

        Ok(pos)
    }
}
