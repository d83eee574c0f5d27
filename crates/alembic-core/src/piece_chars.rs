//! Display characters of colored pieces.

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_type::PieceType;

/// Mapping between colored pieces and their FEN characters.
///
/// The textual table form has `2 * PieceType::COUNT` characters: white
/// pieces in type order, then black pieces, with `.` for "no character".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceChars {
    table: [Option<char>; Piece::COUNT],
    synonyms: Vec<(char, Piece)>,
}

impl PieceChars {
    /// A table with no characters assigned.
    pub fn empty() -> PieceChars {
        PieceChars {
            table: [None; Piece::COUNT],
            synonyms: Vec::new(),
        }
    }

    /// Standard chess characters (`PNBRQK` / `pnbrqk`).
    pub fn chess() -> PieceChars {
        let mut chars = PieceChars::empty();
        for (pt, c) in [
            (PieceType::Pawn, 'p'),
            (PieceType::Knight, 'n'),
            (PieceType::Bishop, 'b'),
            (PieceType::Rook, 'r'),
            (PieceType::Queen, 'q'),
            (PieceType::King, 'k'),
        ] {
            chars.assign(pt, c);
        }
        chars
    }

    /// Parse the textual table form. Returns `None` on a length mismatch.
    pub fn from_table(table: &str) -> Option<PieceChars> {
        let chars: Vec<char> = table.chars().collect();
        if chars.len() != Piece::COUNT {
            return None;
        }
        let mut out = PieceChars::empty();
        for (index, &c) in chars.iter().enumerate() {
            if c != '.' {
                out.table[index] = Some(c);
            }
        }
        Some(out)
    }

    /// Render the textual table form.
    pub fn to_table(&self) -> String {
        self.table.iter().map(|c| c.unwrap_or('.')).collect()
    }

    /// Assign `c` to both colors of `pt`: upper case for White, lower case for Black.
    pub fn assign(&mut self, pt: PieceType, c: char) {
        self.set(Piece::new(pt, Color::White), c.to_ascii_uppercase());
        self.set(Piece::new(pt, Color::Black), c.to_ascii_lowercase());
    }

    /// Assign a character to a single colored piece.
    pub fn set(&mut self, piece: Piece, c: char) {
        self.table[piece.index()] = Some(c);
    }

    /// Remove the characters of both colors of `pt`.
    pub fn clear(&mut self, pt: PieceType) {
        for color in Color::ALL {
            self.table[Piece::new(pt, color).index()] = None;
        }
    }

    /// Register an additional character that also denotes `piece`.
    pub fn add_synonym(&mut self, c: char, piece: Piece) {
        self.synonyms.push((c, piece));
    }

    /// Registered synonyms in insertion order.
    pub fn synonyms(&self) -> impl Iterator<Item = (char, Piece)> + '_ {
        self.synonyms.iter().copied()
    }

    /// Return the character of `piece`, if one is assigned.
    #[inline]
    pub fn char_of(&self, piece: Piece) -> Option<char> {
        self.table[piece.index()]
    }

    /// Return the piece denoted by `c`, looking at synonyms after the table.
    pub fn piece_of(&self, c: char) -> Option<Piece> {
        self.table
            .iter()
            .position(|&entry| entry == Some(c))
            .and_then(Piece::from_index)
            .or_else(|| {
                self.synonyms
                    .iter()
                    .find(|&&(s, _)| s == c)
                    .map(|&(_, piece)| piece)
            })
    }

    /// Return `true` if `c` denotes a piece, either in the table or as a synonym.
    pub fn is_piece_char(&self, c: char) -> bool {
        self.table.contains(&Some(c)) || self.synonyms.iter().any(|&(s, _)| s == c)
    }
}

impl Default for PieceChars {
    fn default() -> Self {
        Self::chess()
    }
}

#[cfg(test)]
mod tests {
    use super::PieceChars;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_type::PieceType;

    #[test]
    fn chess_chars() {
        let chars = PieceChars::chess();
        assert_eq!(chars.char_of(Piece::new(PieceType::King, Color::White)), Some('K'));
        assert_eq!(chars.piece_of('q'), Some(Piece::new(PieceType::Queen, Color::Black)));
        assert_eq!(chars.piece_of('x'), None);
        assert!(!chars.is_piece_char('.'));
    }

    #[test]
    fn table_roundtrip() {
        let chars = PieceChars::chess();
        let table = chars.to_table();
        assert_eq!(table.len(), Piece::COUNT);
        assert!(table.starts_with("PNBRQ."));
        assert_eq!(PieceChars::from_table(&table), Some(chars));
        assert_eq!(PieceChars::from_table("PNBRQ"), None);
    }

    #[test]
    fn synonyms_resolve() {
        let mut chars = PieceChars::chess();
        chars.add_synonym('z', Piece::new(PieceType::Pawn, Color::Black));
        assert!(chars.is_piece_char('z'));
        assert_eq!(chars.piece_of('z'), Some(Piece::new(PieceType::Pawn, Color::Black)));
    }

    #[test]
    fn clear_removes_both_colors() {
        let mut chars = PieceChars::chess();
        chars.clear(PieceType::King);
        assert_eq!(chars.piece_of('K'), None);
        assert_eq!(chars.piece_of('k'), None);
        chars.assign(PieceType::Commoner, 'k');
        assert_eq!(chars.piece_of('K'), Some(Piece::new(PieceType::Commoner, Color::White)));
    }
}
