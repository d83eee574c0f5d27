//! HalfKAv2 feature set for configurable variants.
//!
//! Each active feature combines the perspective's anchor square with one
//! piece on a square, one held piece, one potion zone square or one
//! potion cooldown bit. The block offsets come from the variant's
//! [`FeatureLayout`]; this module only adds them up.

use alembic_core::{
    Color, POTION_COOLDOWN_BITS, Piece, PieceType, Place, Placement, Position, PotionType, Square,
    Transition, encoded_cooldown,
};
use alembic_variant::{FeatureLayout, Relation};
use arrayvec::ArrayVec;

/// Upper bound on simultaneously active features.
pub const MAX_ACTIVE_DIMENSIONS: usize = 4 * Square::COUNT;

/// Feature indices of one perspective.
pub type IndexList = ArrayVec<u32, MAX_ACTIVE_DIMENSIONS>;

/// Append `index`, counting it in `dropped` when the list is full.
#[inline]
fn push(list: &mut IndexList, index: u32, dropped: &mut usize) {
    if list.try_push(index).is_err() {
        *dropped += 1;
    }
}

/// Feature set: anchor square × (piece, square | hand slot | potion state).
pub struct HalfKav2Variants;

impl HalfKav2Variants {
    /// Name recorded in evaluation files.
    pub const NAME: &'static str = "HalfKAv2(Friend)";

    /// Hash of layouts without potion blocks.
    pub const HASH_VALUE_NO_POTIONS: u32 = 0x5f23_4cb8;

    /// Hash of layouts with potion blocks.
    pub const HASH_VALUE_WITH_POTIONS: u32 = 0x6a8f_3c12;

    /// Fingerprint of the layout family, embedded in evaluation files.
    pub fn hash_value(layout: &FeatureLayout) -> u32 {
        if layout.has_potions() {
            Self::HASH_VALUE_WITH_POTIONS
        } else {
            Self::HASH_VALUE_NO_POTIONS
        }
    }

    /// Length of the feature vector.
    #[inline]
    pub fn dimensions(layout: &FeatureLayout) -> u32 {
        layout.dimensions()
    }

    /// Append every active feature of `pos` seen from `perspective`.
    ///
    /// Order: board pieces by square, hands by color and type, then potion
    /// zones and cooldown bits. Returns the number of features that did not
    /// fit into `active`.
    pub fn append_active_indices(
        layout: &FeatureLayout,
        pos: &Position,
        perspective: Color,
        active: &mut IndexList,
    ) -> usize {
        let king = king_offset(layout, pos, perspective);
        let mut dropped = 0;

        for sq in pos.pieces() {
            if let Some(index) = pos
                .piece_on(sq)
                .and_then(|piece| board_index(layout, perspective, king, piece, sq))
            {
                push(active, index, &mut dropped);
            }
        }

        for owner in Color::ALL {
            let relation = Relation::of(perspective, owner);
            for pt in PieceType::ALL {
                let Some(base) = layout.hand_base(relation, pt) else {
                    continue;
                };
                let held = u32::from(pos.count_in_hand(owner, pt)).min(layout.pocket_capacity());
                for slot in 0..held {
                    push(active, king + base + slot, &mut dropped);
                }
            }
        }

        if !layout.has_potions() {
            return dropped;
        }
        for owner in Color::ALL {
            for potion in PotionType::ALL {
                for sq in pos.potion_zone(owner, potion) {
                    if let Some(index) = zone_index(layout, perspective, king, owner, potion, sq) {
                        push(active, index, &mut dropped);
                    }
                }
                let bits = encoded_cooldown(pos.potion_cooldown(owner, potion));
                for bit in set_bits(bits) {
                    if let Some(index) = cooldown_index(layout, perspective, king, owner, potion, bit) {
                        push(active, index, &mut dropped);
                    }
                }
            }
        }
        dropped
    }

    /// Append the features a transition removes and adds for `perspective`.
    ///
    /// `ksq` is the perspective's anchor square, which must not have moved;
    /// check [`HalfKav2Variants::requires_refresh`] first. Returns the number
    /// of features that did not fit into `removed` or `added`.
    pub fn append_changed_indices(
        layout: &FeatureLayout,
        ksq: Option<Square>,
        transition: &Transition,
        perspective: Color,
        removed: &mut IndexList,
        added: &mut IndexList,
    ) -> usize {
        let king = layout.king_offset(perspective, ksq);
        let mut dropped = 0;

        for dirty in transition.dirty() {
            if let Some(index) = dirty
                .from
                .and_then(|from| placement_index(layout, perspective, king, from))
            {
                push(removed, index, &mut dropped);
            }
            if let Some(index) = dirty
                .to
                .and_then(|to| placement_index(layout, perspective, king, to))
            {
                push(added, index, &mut dropped);
            }
        }

        for change in transition.potions() {
            let (color, potion) = (change.color, change.potion);
            for sq in change.old_zone & !change.new_zone {
                if let Some(index) = zone_index(layout, perspective, king, color, potion, sq) {
                    push(removed, index, &mut dropped);
                }
            }
            for sq in change.new_zone & !change.old_zone {
                if let Some(index) = zone_index(layout, perspective, king, color, potion, sq) {
                    push(added, index, &mut dropped);
                }
            }

            let old_bits = encoded_cooldown(change.old_cooldown);
            let new_bits = encoded_cooldown(change.new_cooldown);
            for bit in set_bits(old_bits & !new_bits) {
                if let Some(index) = cooldown_index(layout, perspective, king, color, potion, bit) {
                    push(removed, index, &mut dropped);
                }
            }
            for bit in set_bits(new_bits & !old_bits) {
                if let Some(index) = cooldown_index(layout, perspective, king, color, potion, bit) {
                    push(added, index, &mut dropped);
                }
            }
        }
        dropped
    }

    /// Cost of applying `transition` incrementally.
    #[inline]
    pub fn update_cost(transition: &Transition) -> usize {
        transition.dirty().len() + transition.potions().len()
    }

    /// Cost of recomputing a perspective from scratch.
    #[inline]
    pub fn refresh_cost(pos: &Position) -> usize {
        pos.piece_count()
    }

    /// Whether `transition` invalidates `perspective`'s king block.
    ///
    /// True when the perspective's own anchor piece changed placement, or
    /// when the variant flips enclosed pieces.
    pub fn requires_refresh(layout: &FeatureLayout, transition: &Transition, perspective: Color) -> bool {
        if layout.refresh_every_move() {
            return true;
        }
        layout.nnue_king().is_some_and(|anchor| {
            let own = Piece::new(anchor, perspective);
            transition.dirty().iter().any(|dirty| dirty.involves(own))
        })
    }
}

/// Offset of `perspective`'s king block in `pos`.
#[inline]
pub(crate) fn king_offset(layout: &FeatureLayout, pos: &Position, perspective: Color) -> u32 {
    let ksq = layout
        .nnue_king()
        .and_then(|anchor| pos.anchor_square(perspective, anchor));
    layout.king_offset(perspective, ksq)
}

#[inline]
fn board_index(layout: &FeatureLayout, perspective: Color, king: u32, piece: Piece, sq: Square) -> Option<u32> {
    let base = layout.square_base(Relation::of(perspective, piece.color()), piece.kind())?;
    Some(king + base + layout.orient(perspective, sq))
}

#[inline]
fn hand_index(layout: &FeatureLayout, perspective: Color, king: u32, piece: Piece, slot: u8) -> Option<u32> {
    let slot = u32::from(slot);
    if slot >= layout.pocket_capacity() {
        return None;
    }
    let base = layout.hand_base(Relation::of(perspective, piece.color()), piece.kind())?;
    Some(king + base + slot)
}

#[inline]
fn placement_index(layout: &FeatureLayout, perspective: Color, king: u32, placement: Placement) -> Option<u32> {
    match placement.place {
        Place::Board(sq) => board_index(layout, perspective, king, placement.piece, sq),
        Place::Hand(slot) => hand_index(layout, perspective, king, placement.piece, slot),
    }
}

#[inline]
fn zone_index(
    layout: &FeatureLayout,
    perspective: Color,
    king: u32,
    owner: Color,
    potion: PotionType,
    sq: Square,
) -> Option<u32> {
    let base = layout.potion_zone_base()?;
    let plane = (Relation::of(perspective, owner).index() * PotionType::COUNT + potion.index()) as u32;
    Some(king + base + plane * layout.squares() + layout.orient(perspective, sq))
}

#[inline]
fn cooldown_index(
    layout: &FeatureLayout,
    perspective: Color,
    king: u32,
    owner: Color,
    potion: PotionType,
    bit: u32,
) -> Option<u32> {
    let base = layout.potion_cooldown_base()?;
    let plane = (Relation::of(perspective, owner).index() * PotionType::COUNT + potion.index()) as u32;
    Some(king + base + plane * POTION_COOLDOWN_BITS as u32 + bit)
}

/// Positions of the set bits of an encoded cooldown, lowest first.
fn set_bits(bits: u8) -> impl Iterator<Item = u32> {
    (0..POTION_COOLDOWN_BITS as u32).filter(move |&bit| bits & (1 << bit) != 0)
}

#[cfg(test)]
mod tests {
    use super::{HalfKav2Variants, IndexList};
    use alembic_core::{
        Bitboard, BoardExtent, Color, Piece, PieceType, Position, PotionType, STARTING_FEN, Square,
        Transition,
    };
    use alembic_variant::{FinalVariant, Relation, Variant};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn chess() -> FinalVariant {
        Variant::chess().conclude().unwrap()
    }

    fn active(v: &FinalVariant, pos: &Position, perspective: Color) -> IndexList {
        let mut list = IndexList::new();
        assert_eq!(HalfKav2Variants::append_active_indices(v.layout(), pos, perspective, &mut list), 0);
        list
    }

    #[test]
    fn lone_kings() {
        let v = chess();
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &v.variant().piece_chars, BoardExtent::CHESS)
            .unwrap();
        let block = v.layout().piece_indices();
        let king_base = v.layout().square_base(Relation::Own, PieceType::King).unwrap();

        let white = active(&v, &pos, Color::White);
        // white king on e1 (4), black king on e8 (60)
        assert_eq!(white.as_slice(), &[4 * block + king_base + 4, 4 * block + king_base + 60]);

        let black = active(&v, &pos, Color::Black);
        // rotated: e8 -> d1 (3), e1 -> d8 (59)
        assert_eq!(black.as_slice(), &[3 * block + king_base + 59, 3 * block + king_base + 3]);
    }

    #[test]
    fn start_position_bounds() {
        let v = chess();
        let pos = Position::from_fen(STARTING_FEN, &v.variant().piece_chars, BoardExtent::CHESS).unwrap();
        for perspective in Color::ALL {
            let list = active(&v, &pos, perspective);
            assert_eq!(list.len(), 32);
            assert!(list.iter().all(|&i| i < v.layout().dimensions()));
            let mut sorted = list.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 32, "duplicate feature for {perspective:?}");
        }
    }

    #[test]
    fn hands_are_unary_and_capped() {
        let mut variant = Variant::chess();
        variant.piece_drops = true;
        let v = variant.conclude().unwrap();
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &v.variant().piece_chars, BoardExtent::CHESS)
            .unwrap();
        pos.set_hand(Piece::new(PieceType::Pawn, Color::White), 20);
        let list = active(&v, &pos, Color::White);
        // two kings plus the pocket capacity of 16
        assert_eq!(list.len(), 2 + 16);
        let base = v.layout().hand_base(Relation::Own, PieceType::Pawn).unwrap();
        let king = 4 * v.layout().piece_indices();
        assert!(list.contains(&(king + base)));
        assert!(list.contains(&(king + base + 15)));
    }

    #[test]
    fn potion_features() {
        let v = Variant::spell_chess().conclude().unwrap();
        let layout = v.layout();
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &v.variant().piece_chars, BoardExtent::CHESS)
            .unwrap();
        pos.set_potion_state(Color::Black, PotionType::Jump, sq("a1").bitboard(), 5);

        let list = active(&v, &pos, Color::White);
        let king = 4 * layout.piece_indices();
        let zone = layout.potion_zone_base().unwrap();
        let cooldown = layout.potion_cooldown_base().unwrap();
        // theirs (1) * 2 + jump (1) = plane 3
        assert!(list.contains(&(king + zone + 3 * 64)));
        // cooldown 5 = bits 0 and 2
        assert!(list.contains(&(king + cooldown + 3 * 4)));
        assert!(list.contains(&(king + cooldown + 3 * 4 + 2)));
        assert_eq!(list.len(), 2 + 1 + 2);
    }

    #[test]
    fn hash_values() {
        assert_eq!(HalfKav2Variants::hash_value(chess().layout()), 0x5f23_4cb8);
        let spell = Variant::spell_chess().conclude().unwrap();
        assert_eq!(HalfKav2Variants::hash_value(spell.layout()), 0x6a8f_3c12);
        assert_eq!(HalfKav2Variants::dimensions(spell.layout()), 93_184);
    }

    #[test]
    fn quiet_move_delta() {
        let v = chess();
        let layout = v.layout();
        let mut pos = Position::from_fen(STARTING_FEN, &v.variant().piece_chars, BoardExtent::CHESS).unwrap();
        let transition = pos.relocate(sq("e2"), sq("e4"), false).unwrap();

        for perspective in Color::ALL {
            assert!(!HalfKav2Variants::requires_refresh(layout, &transition, perspective));
            let ksq = pos.anchor_square(perspective, PieceType::King);
            let (mut removed, mut added) = (IndexList::new(), IndexList::new());
            HalfKav2Variants::append_changed_indices(layout, ksq, &transition, perspective, &mut removed, &mut added);
            assert_eq!(removed.len(), 1);
            assert_eq!(added.len(), 1);
        }

        let white_king = 4 * layout.piece_indices();
        let (mut removed, mut added) = (IndexList::new(), IndexList::new());
        HalfKav2Variants::append_changed_indices(
            layout,
            Some(sq("e1")),
            &transition,
            Color::White,
            &mut removed,
            &mut added,
        );
        assert_eq!(removed[0], white_king + 12);
        assert_eq!(added[0], white_king + 28);
        assert_eq!(HalfKav2Variants::update_cost(&transition), 1);
        assert_eq!(HalfKav2Variants::refresh_cost(&pos), 32);
    }

    #[test]
    fn anchor_move_requires_refresh() {
        let v = chess();
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &v.variant().piece_chars, BoardExtent::CHESS)
            .unwrap();
        let transition = pos.relocate(sq("e1"), sq("d1"), false).unwrap();
        assert!(HalfKav2Variants::requires_refresh(v.layout(), &transition, Color::White));
        assert!(!HalfKav2Variants::requires_refresh(v.layout(), &transition, Color::Black));
    }

    #[test]
    fn flipping_variants_always_refresh() {
        let mut variant = Variant::chess();
        variant.flip_enclosed_pieces = true;
        let v = variant.conclude().unwrap();
        let mut pos = Position::from_fen(STARTING_FEN, &v.variant().piece_chars, BoardExtent::CHESS).unwrap();
        let transition = pos.relocate(sq("e2"), sq("e4"), false).unwrap();
        assert!(HalfKav2Variants::requires_refresh(v.layout(), &transition, Color::Black));
    }

    #[test]
    fn overfull_lists_report_dropped_features() {
        let mut variant = Variant::spell_chess();
        variant.extent = BoardExtent::MAX;
        variant.start_fen = "k11/12/12/12/12/12/12/12/12/11K w - - 0 1".to_string();
        let v = variant.conclude().unwrap();
        let layout = v.layout();
        let mut pos = Position::from_fen(&v.variant().start_fen, &v.variant().piece_chars, BoardExtent::MAX).unwrap();
        for color in Color::ALL {
            for potion in PotionType::ALL {
                pos.set_potion_state(color, potion, BoardExtent::MAX.mask(), 15);
            }
        }

        // two anchors, four full zones of 120 squares and 16 cooldown bits
        let mut list = IndexList::new();
        assert_eq!(HalfKav2Variants::append_active_indices(layout, &pos, Color::White, &mut list), 18);
        assert!(list.is_full());

        let mut transition = Transition::new();
        for color in Color::ALL {
            for potion in PotionType::ALL {
                transition.extend(&pos.set_potion(color, potion, Bitboard::EMPTY, 0));
            }
        }
        let ksq = pos.anchor_square(Color::White, PieceType::Commoner);
        let (mut removed, mut added) = (IndexList::new(), IndexList::new());
        let dropped =
            HalfKav2Variants::append_changed_indices(layout, ksq, &transition, Color::White, &mut removed, &mut added);
        assert_eq!(dropped, 16);
        assert!(added.is_empty());
    }
}
