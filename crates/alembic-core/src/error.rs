//! Error types for FEN parsing and position edits.

use crate::piece::Piece;
use crate::square::Square;

/// Errors that occur when parsing a variant FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN string has no piece placement field.
    #[error("empty FEN string")]
    Empty,
    /// The piece placement section has the wrong number of ranks.
    #[error("expected {expected} ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Ranks on the variant board.
        expected: usize,
        /// Ranks found in the FEN.
        found: usize,
    },
    /// A rank describes more or fewer squares than the board is wide.
    #[error("rank {rank_index} describes {length} squares, expected {expected}")]
    BadRankLength {
        /// Zero-based rank index counted from the top of the FEN.
        rank_index: usize,
        /// Number of squares described.
        length: usize,
        /// Files on the variant board.
        expected: usize,
    },
    /// A character is neither a digit nor a known piece character.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },
    /// The pocket section opened with `[` is never closed.
    #[error("unterminated pocket section")]
    UnterminatedPocket,
    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },
}

/// Errors from editing a [`Position`](crate::Position) through its transition helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The source square holds no piece.
    #[error("no piece on {0}")]
    EmptySquare(Square),
    /// The target square is already occupied.
    #[error("{0} is occupied")]
    Occupied(Square),
    /// The square lies outside the variant board.
    #[error("{0} is off the board")]
    OffBoard(Square),
    /// The hand holds no piece of the requested kind.
    #[error("no {0:?} in hand")]
    EmptyHand(Piece),
}
