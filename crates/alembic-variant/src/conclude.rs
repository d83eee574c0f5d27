//! Conclusion: freeze a [`Variant`] and derive everything computed from it.

use alembic_core::{Bitboard, Color, PieceSet, PieceType};
use tracing::debug;

use crate::error::VariantError;
use crate::layout::FeatureLayout;
use crate::variant::{EndgameEval, GameValue, Variant};

/// Board direction scanned for connect-N goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    North,
    NorthEast,
    SouthEast,
}

/// A concluded variant: immutable rules plus their derived facts.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalVariant {
    rules: Variant,
    layout: FeatureLayout,
    potion_pieces: PieceSet,
    restricted_mobility: bool,
    shogi_style_promotions: bool,
    connect_directions: Vec<Direction>,
    connect_piece_types_trimmed: PieceSet,
}

impl Variant {
    /// Normalize the rules and derive the feature layout.
    ///
    /// Fails only when the board exceeds the 12×10 grid.
    pub fn conclude(mut self) -> Result<FinalVariant, VariantError> {
        if !self.extent.fits_grid() {
            return Err(VariantError::BoardTooLarge {
                files: self.extent.files(),
                ranks: self.extent.ranks(),
            });
        }

        if !self.double_step {
            self.double_step_region = [Bitboard::EMPTY; Color::COUNT];
        }
        if self.double_step_region.iter().all(|region| region.is_empty()) {
            self.double_step = false;
        }

        let original_types = self.piece_types;
        let potion_types = self.potion_piece_types();
        self.piece_types |= potion_types;
        let potion_pieces = potion_types - original_types;

        let restricted_mobility = self.piece_types.iter().any(|pt| {
            Color::ALL
                .iter()
                .any(|&c| self.mobility_region[c.index()][pt.index()].is_some())
        });

        let layout = FeatureLayout::derive(&self);

        if self.endgame_eval == EndgameEval::Chess && disables_chess_endgames(&self, restricted_mobility) {
            self.endgame_eval = EndgameEval::None;
        }

        let shogi_style_promotions = self.promoted_piece_type.iter().any(Option::is_some);

        let mut connect_directions = Vec::with_capacity(4);
        if self.connect_horizontal {
            connect_directions.push(Direction::East);
        }
        if self.connect_vertical {
            connect_directions.push(Direction::North);
        }
        if self.connect_diagonal {
            connect_directions.push(Direction::NorthEast);
            connect_directions.push(Direction::SouthEast);
        }

        let connect_goal =
            self.connect_n > 0 || self.connect_region.iter().any(|region| region.is_nonempty());
        let connect_piece_types_trimmed = if connect_goal {
            self.connect_piece_types & self.piece_types
        } else {
            PieceSet::EMPTY
        };

        debug!(
            template = %self.variant_template,
            anchor = ?layout.nnue_king(),
            king_squares = layout.king_squares(),
            piece_indices = layout.piece_indices(),
            dimensions = layout.dimensions(),
            pockets = layout.uses_pockets(),
            potions = layout.has_potions(),
            "variant concluded"
        );

        Ok(FinalVariant {
            rules: self,
            layout,
            potion_pieces,
            restricted_mobility,
            shogi_style_promotions,
            connect_directions,
            connect_piece_types_trimmed,
        })
    }
}

/// Any rule that invalidates the chess endgame shortcut.
fn disables_chess_endgames(v: &Variant, restricted_mobility: bool) -> bool {
    v.extinction_value.is_some()
        || v.checkmate_value != GameValue::Loss
        || v.stalemate_value != GameValue::Draw
        || v.material_counting
        || v.flag_region.iter().any(|region| region.is_nonempty())
        || v.must_capture
        || v.check_counting
        || v.makpong_rule
        || v.connect_n > 0
        || v.blast_on_capture
        || !v.petrify_on_capture_types.is_empty()
        || v.captures_to_hand
        || v.two_boards
        || restricted_mobility
        || v.king_type != PieceType::King
}

impl FinalVariant {
    /// The normalized rules.
    #[inline]
    pub fn variant(&self) -> &Variant {
        &self.rules
    }

    #[inline]
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Potion piece types that are not ordinary pieces of the variant.
    #[inline]
    pub fn potion_pieces(&self) -> PieceSet {
        self.potion_pieces
    }

    /// Whether any piece type is confined to a mobility region.
    #[inline]
    pub fn restricted_mobility(&self) -> bool {
        self.restricted_mobility
    }

    #[inline]
    pub fn shogi_style_promotions(&self) -> bool {
        self.shogi_style_promotions
    }

    #[inline]
    pub fn connect_directions(&self) -> &[Direction] {
        &self.connect_directions
    }

    #[inline]
    pub fn connect_piece_types_trimmed(&self) -> PieceSet {
        self.connect_piece_types_trimmed
    }

    #[inline]
    pub fn endgame_eval(&self) -> EndgameEval {
        self.rules.endgame_eval
    }
}

#[cfg(test)]
mod tests {
    use super::Direction;
    use crate::error::VariantError;
    use crate::variant::{EndgameEval, GameValue, Variant};
    use alembic_core::{Bitboard, BoardExtent, Color, PieceSet, PieceType};

    #[test]
    fn oversized_board_is_rejected() {
        let mut variant = Variant::chess();
        variant.extent = BoardExtent { max_file: 12, max_rank: 7 };
        assert!(matches!(
            variant.conclude(),
            Err(VariantError::BoardTooLarge { files: 13, ranks: 8 })
        ));

        let mut variant = Variant::chess();
        variant.extent = BoardExtent { max_file: 7, max_rank: 10 };
        assert!(variant.conclude().is_err());
    }

    #[test]
    fn largest_board_is_accepted() {
        let mut variant = Variant::chess();
        variant.extent = BoardExtent::MAX;
        variant.start_fen = "5k6/12/12/12/12/12/12/12/12/5K6 w - - 0 1".to_string();
        let v = variant.conclude().unwrap();
        assert_eq!(v.layout().king_squares(), 120);
        assert_eq!(v.layout().piece_indices(), 11 * 120);
    }

    #[test]
    fn double_step_normalization() {
        let mut variant = Variant::chess();
        variant.double_step = false;
        let v = variant.conclude().unwrap();
        assert!(!v.variant().double_step);
        assert!(v.variant().double_step_region.iter().all(|r| r.is_empty()));

        let mut variant = Variant::chess();
        variant.double_step_region = [Bitboard::EMPTY; Color::COUNT];
        assert!(!variant.conclude().unwrap().variant().double_step);

        assert!(Variant::chess().conclude().unwrap().variant().double_step);
    }

    #[test]
    fn potion_pieces_are_merged() {
        let v = Variant::spell_chess().conclude().unwrap();
        let potions = PieceSet::single(PieceType::CustomPiece1).with(PieceType::CustomPiece2);
        assert_eq!(v.potion_pieces(), potions);
        assert_eq!(v.variant().piece_types.count(), 8);
        assert!(v.variant().piece_types.contains(PieceType::CustomPiece2));
    }

    #[test]
    fn potion_piece_already_in_play_is_not_a_potion_piece() {
        let mut variant = Variant::spell_chess();
        variant.add_piece(PieceType::CustomPiece1, 'f');
        let v = variant.conclude().unwrap();
        assert_eq!(v.potion_pieces(), PieceSet::single(PieceType::CustomPiece2));
    }

    #[test]
    fn endgame_shortcut() {
        assert_eq!(Variant::chess().conclude().unwrap().endgame_eval(), EndgameEval::Chess);
        // spell chess wins by extinction
        assert_eq!(
            Variant::spell_chess().conclude().unwrap().endgame_eval(),
            EndgameEval::None
        );

        let mut variant = Variant::chess();
        variant.stalemate_value = GameValue::Win;
        assert_eq!(variant.conclude().unwrap().endgame_eval(), EndgameEval::None);

        let mut variant = Variant::chess();
        variant.mobility_region[Color::Black.index()][PieceType::Rook.index()] =
            Some(Bitboard::rank_mask(7));
        let v = variant.conclude().unwrap();
        assert!(v.restricted_mobility());
        assert_eq!(v.endgame_eval(), EndgameEval::None);

        let mut variant = Variant::chess();
        variant.endgame_eval = EndgameEval::Atomic;
        variant.blast_on_capture = true;
        assert_eq!(variant.conclude().unwrap().endgame_eval(), EndgameEval::Atomic);
    }

    #[test]
    fn connect_rules() {
        let v = Variant::chess().conclude().unwrap();
        assert_eq!(
            v.connect_directions(),
            &[Direction::East, Direction::North, Direction::NorthEast, Direction::SouthEast]
        );
        assert_eq!(v.connect_piece_types_trimmed(), PieceSet::EMPTY);

        let mut variant = Variant::chess();
        variant.connect_n = 4;
        variant.connect_diagonal = false;
        let v = variant.conclude().unwrap();
        assert_eq!(v.connect_directions(), &[Direction::East, Direction::North]);
        assert_eq!(v.connect_piece_types_trimmed(), PieceSet::CHESS);
    }

    #[test]
    fn shogi_style_promotions() {
        assert!(!Variant::chess().conclude().unwrap().shogi_style_promotions());
        let mut variant = Variant::chess();
        variant.promoted_piece_type[PieceType::Knight.index()] = Some(PieceType::Gold);
        assert!(variant.conclude().unwrap().shogi_style_promotions());
    }
}
