//! Piece types known to the variant configuration.

use std::fmt;

/// The type of a piece, without color information.
///
/// Discriminants fix the iteration order of [`PieceSet`](crate::PieceSet),
/// which in turn fixes the order of feature blocks. `King` is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    Fers = 5,
    Alfil = 6,
    Silver = 7,
    Archbishop = 8,
    Chancellor = 9,
    Amazon = 10,
    ShogiPawn = 11,
    Lance = 12,
    ShogiKnight = 13,
    Gold = 14,
    DragonHorse = 15,
    Cannon = 16,
    Soldier = 17,
    Horse = 18,
    Elephant = 19,
    Wazir = 20,
    Commoner = 21,
    Centaur = 22,
    CustomPiece1 = 23,
    CustomPiece2 = 24,
    CustomPiece3 = 25,
    CustomPiece4 = 26,
    King = 27,
}

impl PieceType {
    /// Total number of piece types.
    pub const COUNT: usize = 28;

    /// All piece types in index order.
    pub const ALL: [PieceType; 28] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::Fers,
        PieceType::Alfil,
        PieceType::Silver,
        PieceType::Archbishop,
        PieceType::Chancellor,
        PieceType::Amazon,
        PieceType::ShogiPawn,
        PieceType::Lance,
        PieceType::ShogiKnight,
        PieceType::Gold,
        PieceType::DragonHorse,
        PieceType::Cannon,
        PieceType::Soldier,
        PieceType::Horse,
        PieceType::Elephant,
        PieceType::Wazir,
        PieceType::Commoner,
        PieceType::Centaur,
        PieceType::CustomPiece1,
        PieceType::CustomPiece2,
        PieceType::CustomPiece3,
        PieceType::CustomPiece4,
        PieceType::King,
    ];

    /// Return the index (0..28).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a piece type from its index.
    #[inline]
    pub const fn from_index(index: usize) -> Option<PieceType> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Configuration-file name of this piece type (e.g. `shogiPawn`).
    pub const fn name(self) -> &'static str {
        match self {
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::Fers => "fers",
            PieceType::Alfil => "alfil",
            PieceType::Silver => "silver",
            PieceType::Archbishop => "archbishop",
            PieceType::Chancellor => "chancellor",
            PieceType::Amazon => "amazon",
            PieceType::ShogiPawn => "shogiPawn",
            PieceType::Lance => "lance",
            PieceType::ShogiKnight => "shogiKnight",
            PieceType::Gold => "gold",
            PieceType::DragonHorse => "dragonHorse",
            PieceType::Cannon => "cannon",
            PieceType::Soldier => "soldier",
            PieceType::Horse => "horse",
            PieceType::Elephant => "elephant",
            PieceType::Wazir => "wazir",
            PieceType::Commoner => "commoner",
            PieceType::Centaur => "centaur",
            PieceType::CustomPiece1 => "customPiece1",
            PieceType::CustomPiece2 => "customPiece2",
            PieceType::CustomPiece3 => "customPiece3",
            PieceType::CustomPiece4 => "customPiece4",
            PieceType::King => "king",
        }
    }

    /// Look up a piece type by its configuration-file name.
    pub fn from_name(name: &str) -> Option<PieceType> {
        Self::ALL.into_iter().find(|pt| pt.name() == name)
    }

    /// Same name with an upper-case first letter, as used in per-piece keys
    /// such as `mobilityRegionWhiteKing`.
    pub fn capitalized_name(self) -> String {
        let name = self.name();
        let mut out = String::with_capacity(name.len());
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
        }
        out.extend(chars);
        out
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
