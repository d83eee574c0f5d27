//! Raw variant rules, before conclusion.

use alembic_core::{
    Bitboard, BoardExtent, Color, PieceChars, PieceSet, PieceType, PotionType, STARTING_FEN,
};

/// Outcome assigned to a game-ending rule, from the point of view of the
/// side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameValue {
    Win,
    Loss,
    Draw,
}

/// Specialised endgame evaluation family used as a terminal shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndgameEval {
    /// No shortcut.
    None,
    /// Orthodox chess endgames.
    Chess,
    /// Antichess endgames.
    Anti,
    /// Atomic endgames.
    Atomic,
}

/// Rules of one variant.
///
/// Fields are public while the variant is being built (from a template and
/// configuration overrides). [`Variant::conclude`](crate::Variant::conclude)
/// consumes the value and freezes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Name of the built-in template this variant derives from.
    pub variant_template: String,
    /// Prefix of default evaluation file names.
    pub nnue_alias: String,
    pub extent: BoardExtent,
    /// Piece types that can appear on the board.
    pub piece_types: PieceSet,
    pub piece_chars: PieceChars,
    pub start_fen: String,
    /// Movement type of the royal piece.
    pub king_type: PieceType,

    pub promotion_pawn_types: [PieceSet; Color::COUNT],
    pub promotion_piece_types: [PieceSet; Color::COUNT],
    /// Shogi-style promotion: the type each type turns into, if any.
    pub promoted_piece_type: [Option<PieceType>; PieceType::COUNT],

    /// Squares each (color, type) may occupy; `None` means unrestricted.
    pub mobility_region: [[Option<Bitboard>; PieceType::COUNT]; Color::COUNT],
    pub double_step: bool,
    pub double_step_region: [Bitboard; Color::COUNT],
    pub flag_region: [Bitboard; Color::COUNT],

    pub piece_drops: bool,
    pub captures_to_hand: bool,
    pub must_drop: bool,
    pub seirawan_gating: bool,

    pub potions: bool,
    /// Hand piece that represents each potion type.
    pub potion_piece: [Option<PieceType>; PotionType::COUNT],
    pub potion_cooldown: [u8; PotionType::COUNT],
    pub potion_drop_on_occupied: bool,

    pub extinction_value: Option<GameValue>,
    pub extinction_piece_types: PieceSet,
    pub extinction_piece_count: u8,
    pub checkmate_value: GameValue,
    pub stalemate_value: GameValue,
    pub material_counting: bool,
    pub must_capture: bool,
    pub check_counting: bool,
    pub makpong_rule: bool,
    pub connect_n: u8,
    pub connect_region: [Bitboard; Color::COUNT],
    pub connect_horizontal: bool,
    pub connect_vertical: bool,
    pub connect_diagonal: bool,
    pub connect_piece_types: PieceSet,
    pub blast_on_capture: bool,
    pub petrify_on_capture_types: PieceSet,
    pub two_boards: bool,
    /// Othello-style flipping of enclosed pieces.
    pub flip_enclosed_pieces: bool,
    pub endgame_eval: EndgameEval,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            variant_template: String::new(),
            nnue_alias: String::new(),
            extent: BoardExtent::CHESS,
            piece_types: PieceSet::CHESS,
            piece_chars: PieceChars::chess(),
            start_fen: STARTING_FEN.to_string(),
            king_type: PieceType::King,
            promotion_pawn_types: [PieceSet::single(PieceType::Pawn); Color::COUNT],
            promotion_piece_types: [PieceSet::CHESS
                .without(PieceType::Pawn)
                .without(PieceType::King); Color::COUNT],
            promoted_piece_type: [None; PieceType::COUNT],
            mobility_region: [[None; PieceType::COUNT]; Color::COUNT],
            double_step: true,
            double_step_region: [Bitboard::rank_mask(1), Bitboard::rank_mask(6)],
            flag_region: [Bitboard::EMPTY; Color::COUNT],
            piece_drops: false,
            captures_to_hand: false,
            must_drop: false,
            seirawan_gating: false,
            potions: false,
            potion_piece: [None; PotionType::COUNT],
            potion_cooldown: [0; PotionType::COUNT],
            potion_drop_on_occupied: false,
            extinction_value: None,
            extinction_piece_types: PieceSet::EMPTY,
            extinction_piece_count: 0,
            checkmate_value: GameValue::Loss,
            stalemate_value: GameValue::Draw,
            material_counting: false,
            must_capture: false,
            check_counting: false,
            makpong_rule: false,
            connect_n: 0,
            connect_region: [Bitboard::EMPTY; Color::COUNT],
            connect_horizontal: true,
            connect_vertical: true,
            connect_diagonal: true,
            connect_piece_types: !PieceSet::EMPTY,
            blast_on_capture: false,
            petrify_on_capture_types: PieceSet::EMPTY,
            two_boards: false,
            flip_enclosed_pieces: false,
            endgame_eval: EndgameEval::None,
        }
    }
}

impl Variant {
    /// Orthodox chess.
    pub fn chess() -> Variant {
        Variant {
            variant_template: "chess".to_string(),
            nnue_alias: "nn-".to_string(),
            endgame_eval: EndgameEval::Chess,
            ..Variant::default()
        }
    }

    /// Spell chess: a commoner instead of a king, plus freeze and jump potions
    /// held in the pocket.
    pub fn spell_chess() -> Variant {
        let mut v = Variant {
            variant_template: "spell-chess".to_string(),
            nnue_alias: "nn-".to_string(),
            endgame_eval: EndgameEval::Chess,
            ..Variant::default()
        };
        v.potions = true;
        v.potion_piece[PotionType::Freeze.index()] = Some(PieceType::CustomPiece1);
        v.potion_piece[PotionType::Jump.index()] = Some(PieceType::CustomPiece2);
        v.potion_cooldown = [3; PotionType::COUNT];
        v.potion_drop_on_occupied = true;
        v.remove_piece(PieceType::King);
        v.add_piece(PieceType::Commoner, 'k');
        v.king_type = PieceType::Commoner;
        v.piece_chars.assign(PieceType::CustomPiece1, 'f');
        v.piece_chars.assign(PieceType::CustomPiece2, 'j');
        v.extinction_value = Some(GameValue::Loss);
        v.extinction_piece_types = PieceSet::single(PieceType::Commoner);
        v.extinction_piece_count = 0;
        v.start_fen =
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[JJFFFFFjjfffff] w KQkq - 0 1".to_string();
        v
    }

    /// Put `pt` into play, denoted by `c` (upper case for White).
    pub fn add_piece(&mut self, pt: PieceType, c: char) {
        self.piece_types = self.piece_types.with(pt);
        self.piece_chars.assign(pt, c);
    }

    /// Take `pt` out of play.
    pub fn remove_piece(&mut self, pt: PieceType) {
        self.piece_types = self.piece_types.without(pt);
        self.piece_chars.clear(pt);
    }

    /// Potion piece types enabled by this variant.
    pub fn potion_piece_types(&self) -> PieceSet {
        if !self.potions {
            return PieceSet::EMPTY;
        }
        self.potion_piece.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EndgameEval, GameValue, Variant};
    use alembic_core::{Color, Piece, PieceSet, PieceType, PotionType};

    #[test]
    fn chess_template() {
        let v = Variant::chess();
        assert_eq!(v.piece_types, PieceSet::CHESS);
        assert_eq!(v.extent.square_count(), 64);
        assert_eq!(v.endgame_eval, EndgameEval::Chess);
        assert!(!v.potions);
        assert_eq!(v.potion_piece_types(), PieceSet::EMPTY);
    }

    #[test]
    fn spell_chess_template() {
        let v = Variant::spell_chess();
        assert!(!v.piece_types.contains(PieceType::King));
        assert!(v.piece_types.contains(PieceType::Commoner));
        assert_eq!(
            v.piece_chars.piece_of('k'),
            Some(Piece::new(PieceType::Commoner, Color::Black))
        );
        assert_eq!(
            v.piece_chars.piece_of('F'),
            Some(Piece::new(PieceType::CustomPiece1, Color::White))
        );
        assert_eq!(v.potion_cooldown[PotionType::Jump.index()], 3);
        assert_eq!(v.extinction_value, Some(GameValue::Loss));
        assert_eq!(v.potion_piece_types().count(), 2);
    }

    #[test]
    fn add_and_remove_piece() {
        let mut v = Variant::chess();
        v.add_piece(PieceType::Archbishop, 'a');
        assert!(v.piece_types.contains(PieceType::Archbishop));
        assert_eq!(
            v.piece_chars.piece_of('A'),
            Some(Piece::new(PieceType::Archbishop, Color::White))
        );
        v.remove_piece(PieceType::Archbishop);
        assert!(!v.piece_types.contains(PieceType::Archbishop));
        assert_eq!(v.piece_chars.piece_of('a'), None);
    }
}
