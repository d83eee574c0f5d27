//! Integration tests: incremental updates against full recomputation.
//!
//! Every scenario plays a short sequence of transitions and checks after
//! each one that the accumulator, the changed-index lists and a fresh
//! enumeration all agree.

use alembic_core::{Color, Piece, PieceType, Position, PotionType, STARTING_FEN, Square, Transition};
use alembic_nnue::{Accumulator, ActiveSet, HalfKav2Variants, IndexList, UpdatePath};
use alembic_variant::{FinalVariant, Variant};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn position(v: &FinalVariant, fen: &str) -> Position {
    Position::from_fen(fen, &v.variant().piece_chars, v.variant().extent).unwrap()
}

fn full(v: &FinalVariant, pos: &Position, perspective: Color) -> Vec<u32> {
    let mut list = IndexList::new();
    assert_eq!(HalfKav2Variants::append_active_indices(v.layout(), pos, perspective, &mut list), 0);
    let mut sorted = list.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Apply one transition's changed indices to the previous full list and
/// compare with the full list of the new position.
fn check_delta(v: &FinalVariant, before: &Position, after: &Position, transition: &Transition) {
    let layout = v.layout();
    for perspective in Color::ALL {
        if HalfKav2Variants::requires_refresh(layout, transition, perspective) {
            continue;
        }
        let ksq = layout
            .nnue_king()
            .and_then(|anchor| before.anchor_square(perspective, anchor));
        let (mut removed, mut added) = (IndexList::new(), IndexList::new());
        let dropped =
            HalfKav2Variants::append_changed_indices(layout, ksq, transition, perspective, &mut removed, &mut added);
        assert_eq!(dropped, 0);

        let mut expected = full(v, before, perspective);
        for index in &removed {
            let at = expected
                .iter()
                .position(|i| i == index)
                .unwrap_or_else(|| panic!("removed index {index} was not active for {perspective:?}"));
            expected.swap_remove(at);
        }
        expected.extend(added.iter().copied());
        expected.sort_unstable();
        assert_eq!(expected, full(v, after, perspective), "delta mismatch for {perspective:?}");
    }
}

/// Drive a position and an accumulator side by side.
struct Harness {
    variant: FinalVariant,
    pos: Position,
    acc: Accumulator<ActiveSet>,
}

impl Harness {
    fn new(variant: FinalVariant, fen: &str) -> Self {
        let pos = position(&variant, fen);
        let mut acc = Accumulator::new([ActiveSet::new(), ActiveSet::new()]);
        acc.update(variant.layout(), &pos);
        Self { variant, pos, acc }
    }

    fn play(&mut self, step: impl FnOnce(&mut Position) -> Transition) -> [UpdatePath; 2] {
        let before = self.pos.clone();
        let transition = step(&mut self.pos);
        check_delta(&self.variant, &before, &self.pos, &transition);

        self.acc.push(&transition);
        let paths = self.acc.update(self.variant.layout(), &self.pos);
        for perspective in Color::ALL {
            let sink = self.acc.sink(perspective);
            assert!(sink.is_consistent(), "negative or doubled feature for {perspective:?}");
            assert_eq!(sink.indices(), full(&self.variant, &self.pos, perspective));
        }
        paths
    }
}

fn with_hands() -> FinalVariant {
    let mut variant = Variant::chess();
    variant.piece_drops = true;
    variant.captures_to_hand = true;
    variant.conclude().unwrap()
}

// ── Move sequences ────────────────────────────────────────────────────────────

#[test]
fn opening_with_captures() {
    let mut h = Harness::new(Variant::chess().conclude().unwrap(), STARTING_FEN);
    for (from, to) in [
        ("e2", "e4"),
        ("d7", "d5"),
        ("e4", "d5"),
        ("d8", "d5"),
        ("b1", "c3"),
        ("d5", "a2"),
        ("a1", "a2"),
    ] {
        let paths = h.play(|pos| pos.relocate(sq(from), sq(to), false).unwrap());
        assert_eq!(paths, [UpdatePath::Incremental; 2], "{from}{to}");
    }
}

#[test]
fn promotion_with_capture() {
    let mut h = Harness::new(Variant::chess().conclude().unwrap(), "1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    h.play(|pos| pos.promote(sq("a7"), sq("b8"), PieceType::Queen, false).unwrap());
    assert_eq!(
        h.pos.piece_on(sq("b8")),
        Some(Piece::new(PieceType::Queen, Color::White))
    );
    h.play(|pos| pos.relocate(sq("e8"), sq("d7"), false).unwrap());
}

#[test]
fn captures_to_hand_and_drops() {
    let mut h = Harness::new(with_hands(), "4k3/3p4/8/4N3/8/8/8/4K3 w - - 0 1");
    assert!(h.variant.layout().uses_pockets());

    h.play(|pos| pos.relocate(sq("e5"), sq("d7"), true).unwrap());
    assert_eq!(h.pos.count_in_hand(Color::White, PieceType::Pawn), 1);
    h.play(|pos| pos.relocate(sq("e8"), sq("d7"), true).unwrap());
    assert_eq!(h.pos.count_in_hand(Color::Black, PieceType::Knight), 1);

    h.play(|pos| pos.drop_piece(Piece::new(PieceType::Pawn, Color::White), sq("e4")).unwrap());
    h.play(|pos| pos.drop_piece(Piece::new(PieceType::Knight, Color::Black), sq("c3")).unwrap());
    assert_eq!(h.pos.count_in_hand(Color::Black, PieceType::Knight), 0);
}

#[test]
fn hands_beyond_pocket_capacity() {
    let v = with_hands();
    let capacity = v.layout().pocket_capacity();
    let fen = format!("4k3/8/8/8/8/8/8/4K3[{}] w - - 0 1", "P".repeat(capacity as usize + 2));
    let mut h = Harness::new(v, &fen);

    // the held pieces above the capacity carry no feature
    for target in ["a3", "b3", "c3"] {
        h.play(|pos| pos.drop_piece(Piece::new(PieceType::Pawn, Color::White), sq(target)).unwrap());
    }
    assert_eq!(u32::from(h.pos.count_in_hand(Color::White, PieceType::Pawn)), capacity - 1);
}

#[test]
fn potions_cast_and_cool_down() {
    let spell = Variant::spell_chess().conclude().unwrap();
    let freeze_piece = spell.variant().potion_piece[PotionType::Freeze.index()];
    let start = spell.variant().start_fen.clone();
    let mut h = Harness::new(spell, &start);

    let zone = sq("d5").bitboard() | sq("e5").bitboard() | sq("d6").bitboard() | sq("e6").bitboard();
    h.play(|pos| {
        pos.cast_potion(Color::White, PotionType::Freeze, freeze_piece, zone, 3)
            .unwrap()
    });
    assert_eq!(h.pos.count_in_hand(Color::White, PieceType::CustomPiece1), 4);

    h.play(|pos| pos.relocate(sq("e7"), sq("e6"), false).unwrap());
    for cooldown in (0..3).rev() {
        h.play(|pos| pos.set_potion(Color::White, PotionType::Freeze, Default::default(), cooldown));
    }
    assert_eq!(h.pos.potion_cooldown(Color::White, PotionType::Freeze), 0);

    h.play(|pos| {
        pos.set_potion(Color::Black, PotionType::Jump, sq("h3").bitboard(), 20)
    });
}

// ── Refresh decisions ─────────────────────────────────────────────────────────

#[test]
fn anchor_move_refreshes_only_that_side() {
    let mut h = Harness::new(Variant::chess().conclude().unwrap(), "4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1");
    let paths = h.play(|pos| pos.relocate(sq("e1"), sq("f1"), false).unwrap());
    assert_eq!(paths, [UpdatePath::Refresh, UpdatePath::Incremental]);

    let paths = h.play(|pos| pos.relocate(sq("e8"), sq("e7"), false).unwrap());
    assert_eq!(paths, [UpdatePath::Incremental, UpdatePath::Refresh]);
}

#[test]
fn commoner_anchor_refreshes_too() {
    let spell = Variant::spell_chess().conclude().unwrap();
    assert_eq!(spell.layout().nnue_king(), Some(PieceType::Commoner));
    let mut h = Harness::new(spell, "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    let paths = h.play(|pos| pos.relocate(sq("e1"), sq("d2"), false).unwrap());
    assert_eq!(paths[Color::White.index()], UpdatePath::Refresh);
}

#[test]
fn unanchored_layout_never_needs_refresh() {
    let mut variant = Variant::chess();
    variant.promotion_piece_types = [variant.promotion_piece_types[0].with(PieceType::King); 2];
    let v = variant.conclude().unwrap();
    assert_eq!(v.layout().nnue_king(), None);

    let mut h = Harness::new(v, STARTING_FEN);
    let paths = h.play(|pos| pos.relocate(sq("e2"), sq("e4"), false).unwrap());
    assert_eq!(paths, [UpdatePath::Incremental; 2]);
    let paths = h.play(|pos| pos.relocate(sq("e8"), sq("e7"), false).unwrap());
    assert_eq!(paths, [UpdatePath::Incremental; 2]);
}

// ── Symmetry and fingerprints ─────────────────────────────────────────────────

#[test]
fn mirrored_position_swaps_perspectives() {
    let hands = with_hands();
    let spell = Variant::spell_chess().conclude().unwrap();

    let mut potion_pos = position(&spell, &spell.variant().start_fen);
    potion_pos.set_potion_state(Color::White, PotionType::Jump, sq("c4").bitboard(), 6);
    potion_pos.set_potion_state(Color::Black, PotionType::Freeze, sq("f6").bitboard(), 1);

    let cases = [
        (Variant::chess().conclude().unwrap(), None),
        (hands, Some("r3k2r/pp3ppp/8/3N4/8/8/PP3PPP/R3K2R[QPnp] w - - 0 1")),
        (spell, None),
    ];
    for (v, fen) in cases {
        let pos = match fen {
            Some(fen) => position(&v, fen),
            None if v.layout().has_potions() => potion_pos.clone(),
            None => position(&v, STARTING_FEN),
        };
        let mirror = pos.mirrored();
        assert_eq!(full(&v, &pos, Color::White), full(&v, &mirror, Color::Black));
        assert_eq!(full(&v, &pos, Color::Black), full(&v, &mirror, Color::White));
    }
}

#[test]
fn fingerprint_depends_only_on_potions() {
    let chess = Variant::chess().conclude().unwrap();
    let hands = with_hands();
    let spell = Variant::spell_chess().conclude().unwrap();

    assert_eq!(HalfKav2Variants::hash_value(chess.layout()), HalfKav2Variants::hash_value(hands.layout()));
    assert_ne!(HalfKav2Variants::hash_value(chess.layout()), HalfKav2Variants::hash_value(spell.layout()));
    // concluding again yields the same fingerprint and dimensions
    let again = Variant::spell_chess().conclude().unwrap();
    assert_eq!(HalfKav2Variants::hash_value(again.layout()), HalfKav2Variants::hash_value(spell.layout()));
    assert_eq!(again.layout().dimensions(), spell.layout().dimensions());
}

#[test]
fn potions_add_zone_and_cooldown_blocks() {
    let base = || {
        let mut variant = Variant::spell_chess();
        variant.seirawan_gating = true;
        variant.add_piece(PieceType::CustomPiece1, 'f');
        variant.add_piece(PieceType::CustomPiece2, 'j');
        variant
    };
    let mut without = base();
    without.potions = false;
    let without = without.conclude().unwrap();
    let with = base().conclude().unwrap();

    assert!(without.layout().uses_pockets());
    assert!(!without.layout().has_potions());
    assert_eq!(
        with.layout().piece_indices() - without.layout().piece_indices(),
        64 * 2 * 2 + 2 * 2 * 4
    );
    assert_eq!(
        with.layout().dimensions() - without.layout().dimensions(),
        64 * (64 * 2 * 2 + 2 * 2 * 4)
    );
}
