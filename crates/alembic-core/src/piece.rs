//! Colored piece, bit-packed into a single byte.

use std::fmt;

use crate::color::Color;
use crate::piece_type::PieceType;

/// A colored piece, bit-packed into a single byte.
///
/// Bit layout:
/// - bits 0-4: [`PieceType`] (values 0-27)
/// - bit 5: [`Color`] (0 = White, 1 = Black)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct colored pieces.
    pub const COUNT: usize = PieceType::COUNT * Color::COUNT;

    /// Create a piece from a type and a color.
    #[inline]
    pub const fn new(kind: PieceType, color: Color) -> Piece {
        Piece((color as u8) << 5 | kind as u8)
    }

    /// Return the piece type (the lower 5 bits).
    #[inline]
    pub const fn kind(self) -> PieceType {
        PieceType::ALL[(self.0 & 0x1f) as usize]
    }

    /// Return the color (bit 5).
    #[inline]
    pub const fn color(self) -> Color {
        match self.0 >> 5 {
            0 => Color::White,
            _ => Color::Black,
        }
    }

    /// Return the same piece type with the opposite color.
    #[inline]
    pub const fn flip(self) -> Piece {
        Piece(self.0 ^ 0x20)
    }

    /// Return a contiguous index for fixed-size arrays.
    ///
    /// White pieces occupy `0..PieceType::COUNT`, Black pieces follow.
    #[inline]
    pub const fn index(self) -> usize {
        self.color().index() * PieceType::COUNT + self.kind().index()
    }

    /// Inverse of [`Piece::index`].
    #[inline]
    pub const fn from_index(index: usize) -> Option<Piece> {
        if index >= Self::COUNT {
            return None;
        }
        let color = if index < PieceType::COUNT { Color::White } else { Color::Black };
        Some(Piece::new(PieceType::ALL[index % PieceType::COUNT], color))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color_prefix = match self.color() {
            Color::White => 'W',
            Color::Black => 'B',
        };
        write!(f, "{}:{}", color_prefix, self.kind())
    }
}
