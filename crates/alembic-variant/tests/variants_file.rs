//! Integration tests for reading a variants file and concluding layouts.
//!
//! Every registered layout is re-derived from first principles and checked
//! for the block structure the evaluator relies on.

use alembic_core::{Color, PieceType, Square};
use alembic_variant::{FeatureLayout, Relation, VariantError, VariantMap};

const VARIANTS_INI: &str = "\
# Test variants
[minixiangqi:chess]
maxFile = 7
maxRank = 7
pawn = -
knight = -
bishop = -
queen = -
soldier = p
horse = n
elephant = e
mobilityRegionWhiteKing = c1 d1 e1 c2 d2 e2 c3 d3 e3
mobilityRegionBlackKing = c7 d7 e7 c6 d6 e6 c5 d5 e5
startFen = rnekr2/7/p1p1p1p/7/P1P1P1P/7/RNEKR2 w - - 0 1
promotionPieceTypes = -

[minishogi:chess]
maxFile = 5
maxRank = 5
pawn = -
knight = -
queen = -
shogiPawn = p
silver = s
gold = g
bishop = b
pieceDrops = true
capturesToHand = true
promotedPieceType = p:g s:g
promotionPieceTypes = -
startFen = rbsgk/4p/5/P4/KGSBR[-] w - - 0 1

[frozen:spell-chess]
freezePotionCooldown = 5
jumpPotion = -

[antiking:chess]
promotionPieceTypes = nbrqk
";

/// Piece indices computed directly from the counts, independent of the
/// block bases stored in the layout.
fn expected_piece_indices(layout: &FeatureLayout, types: u32) -> u32 {
    let anchored = u32::from(layout.nnue_king().is_some());
    let squares = layout.squares();
    let pockets = if layout.uses_pockets() {
        2 * layout.extent().files() as u32
    } else {
        0
    };
    let potions = if layout.has_potions() {
        squares * 2 * 2 + 2 * 2 * 4
    } else {
        0
    };
    (2 * types - anchored) * squares + 2 * (types - anchored) * pockets + potions
}

fn loaded() -> VariantMap {
    let mut map = VariantMap::with_builtins();
    let errors = map.parse_str(VARIANTS_INI, false);
    assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
    map
}

// ── Layout invariants ─────────────────────────────────────────────────────────

#[test]
fn dimensions_agree_both_ways() {
    let map = loaded();
    for (name, v) in map.iter() {
        let layout = v.layout();
        let types = v.variant().piece_types.count();
        assert_eq!(
            layout.piece_indices(),
            expected_piece_indices(layout, types),
            "{name}: piece indices"
        );
        assert_eq!(layout.blocks().total(), layout.piece_indices(), "{name}: block sum");
        assert_eq!(
            layout.dimensions(),
            layout.king_squares() * layout.piece_indices(),
            "{name}: dimensions"
        );
    }
}

#[test]
fn king_square_index_is_a_bijection() {
    let map = loaded();
    for (name, v) in map.iter() {
        let layout = v.layout();
        let mut buckets: Vec<u32> = (0..layout.squares() as usize)
            .filter_map(|s| layout.king_square_index(s))
            .collect();
        buckets.sort_unstable();
        let expected: Vec<u32> = (0..layout.king_squares()).collect();
        assert_eq!(buckets, expected, "{name}");
    }
}

#[test]
fn blocks_stay_inside_king_block() {
    let map = loaded();
    for (name, v) in map.iter() {
        let layout = v.layout();
        for pt in v.variant().piece_types {
            for rel in [Relation::Own, Relation::Theirs] {
                let base = layout.square_base(rel, pt).unwrap();
                assert!(base + layout.squares() <= layout.blocks().piece_squares, "{name}");
                if let Some(hand) = layout.hand_base(rel, pt) {
                    assert!(hand >= layout.blocks().piece_squares, "{name}");
                    let end = layout.potion_zone_base().unwrap_or(layout.piece_indices());
                    assert!(hand + layout.pocket_capacity() <= end, "{name}");
                }
            }
        }
    }
}

// ── Concrete variants ─────────────────────────────────────────────────────────

#[test]
fn palace_compacts_king_squares() {
    let map = loaded();
    let v = map.get("minixiangqi").unwrap();
    let layout = v.layout();
    assert_eq!(layout.nnue_king(), Some(PieceType::King));
    assert_eq!(layout.king_squares(), 9);
    assert!(v.restricted_mobility());

    let d2 = Square::from_algebraic("d2").unwrap();
    let d6 = Square::from_algebraic("d6").unwrap();
    // black's d6 is white's d2 after rotation on a 7x7 board
    assert_eq!(
        layout.king_offset(Color::White, Some(d2)),
        layout.king_offset(Color::Black, Some(d6))
    );
}

#[test]
fn drop_variant_has_pockets() {
    let map = loaded();
    let v = map.get("minishogi").unwrap();
    let layout = v.layout();
    assert!(layout.uses_pockets());
    assert_eq!(layout.pocket_capacity(), 10);
    assert!(v.shogi_style_promotions());
    assert_eq!(layout.hand_base(Relation::Own, PieceType::King), None);
    assert!(layout.hand_base(Relation::Theirs, PieceType::Gold).is_some());
}

#[test]
fn child_of_spell_chess_keeps_potions() {
    let map = loaded();
    let v = map.get("frozen").unwrap();
    assert!(v.layout().has_potions());
    assert_eq!(v.variant().potion_cooldown[0], 5);
    assert_eq!(v.variant().potion_piece[1], None);
    // the jump piece is still an ordinary piece inherited from the parent
    assert!(v.variant().piece_types.contains(PieceType::CustomPiece2));
}

#[test]
fn promoting_king_drops_the_anchor() {
    let map = loaded();
    let v = map.get("antiking").unwrap();
    assert_eq!(v.layout().nnue_king(), None);
    assert_eq!(v.layout().king_squares(), 1);
}

#[test]
fn check_mode_reports_without_registering() {
    let mut map = VariantMap::with_builtins();
    let text = "[broken:chess]\nmaxFile = 20\n[fine:chess]\ncheckCounting = maybe\n";
    let errors = map.parse_str(text, true);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(e, VariantError::BoardTooLarge { .. })));
    assert!(errors.iter().any(
        |e| matches!(e, VariantError::InvalidValue { key, .. } if key == "checkCounting")
    ));
    assert_eq!(map.len(), 2);
}
