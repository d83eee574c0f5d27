//! Feature-space layout derived from a variant.
//!
//! Every index handed to the evaluator has the shape
//! `king_block + block_base + offset`. A king block holds `piece_indices`
//! features laid out as:
//!
//! ```text
//! [ piece-square blocks | pocket blocks | potion zones | potion cooldowns ]
//! ```
//!
//! Piece types take their square blocks in ascending order with the anchor
//! last. The anchor's own and opponent pieces share one block.

use alembic_core::{
    BoardExtent, Color, POTION_COOLDOWN_BITS, Piece, PieceType, PotionType, Square,
};
use tracing::debug;

use crate::variant::Variant;

/// Owner of a piece relative to the perspective being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Own = 0,
    Theirs = 1,
}

impl Relation {
    pub const COUNT: usize = 2;

    /// Relation of a piece owned by `owner`, seen from `perspective`.
    #[inline]
    pub fn of(perspective: Color, owner: Color) -> Relation {
        if perspective == owner {
            Relation::Own
        } else {
            Relation::Theirs
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Size of each region of one king block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSizes {
    pub piece_squares: u32,
    pub pockets: u32,
    pub potion_zones: u32,
    pub potion_cooldowns: u32,
}

impl BlockSizes {
    /// Sum of all regions, equal to the layout's `piece_indices`.
    pub fn total(&self) -> u32 {
        self.piece_squares + self.pockets + self.potion_zones + self.potion_cooldowns
    }
}

/// Immutable index layout of a concluded variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    extent: BoardExtent,
    nnue_king: Option<PieceType>,
    uses_pockets: bool,
    pocket_capacity: u32,
    piece_square_base: [[Option<u32>; PieceType::COUNT]; Relation::COUNT],
    piece_hand_base: [[Option<u32>; PieceType::COUNT]; Relation::COUNT],
    /// Dense king bucket for each variant square.
    king_square_index: [Option<u32>; Square::COUNT],
    king_squares: u32,
    potion_zone_base: Option<u32>,
    potion_cooldown_base: Option<u32>,
    blocks: BlockSizes,
    piece_indices: u32,
    dimensions: u32,
    max_pieces: u32,
    refresh_every_move: bool,
}

impl FeatureLayout {
    /// Derive the layout. The board must already fit the grid and potion
    /// piece types must already be merged into `variant.piece_types`.
    pub(crate) fn derive(variant: &Variant) -> FeatureLayout {
        let extent = variant.extent;
        let nnue_king = select_anchor(variant);
        let squares = extent.square_count() as u32;
        let type_count = variant.piece_types.count();
        let anchored = u32::from(nnue_king.is_some());

        let uses_pockets = (variant.piece_drops
            && (variant.captures_to_hand || (!variant.must_drop && type_count != 1)))
            || variant.seirawan_gating
            || variant.potions;
        let pocket_capacity = if uses_pockets {
            2 * extent.files() as u32
        } else {
            0
        };

        let piece_squares = (2 * type_count - anchored) * squares;
        let pockets = 2 * (type_count - anchored) * pocket_capacity;
        let mut piece_indices = piece_squares + pockets;

        let (potion_zones, potion_cooldowns) = if variant.potions {
            (
                squares * Color::COUNT as u32 * PotionType::COUNT as u32,
                Color::COUNT as u32 * PotionType::COUNT as u32 * POTION_COOLDOWN_BITS as u32,
            )
        } else {
            (0, 0)
        };
        let potion_zone_base = variant.potions.then_some(piece_indices);
        piece_indices += potion_zones;
        let potion_cooldown_base = variant.potions.then_some(piece_indices);
        piece_indices += potion_cooldowns;

        let mut piece_square_base = [[None; PieceType::COUNT]; Relation::COUNT];
        let mut piece_hand_base = [[None; PieceType::COUNT]; Relation::COUNT];
        for (i, pt) in variant.piece_types.iter_anchor_last(nnue_king).enumerate() {
            let i = i as u32;
            let is_anchor = nnue_king == Some(pt);
            piece_square_base[Relation::Own.index()][pt.index()] = Some(2 * i * squares);
            piece_square_base[Relation::Theirs.index()][pt.index()] =
                Some((2 * i + u32::from(!is_anchor)) * squares);
            if uses_pockets && !is_anchor {
                piece_hand_base[Relation::Own.index()][pt.index()] =
                    Some(2 * i * pocket_capacity + piece_squares);
                piece_hand_base[Relation::Theirs.index()][pt.index()] =
                    Some((2 * i + 1) * pocket_capacity + piece_squares);
            }
        }

        let mut king_square_index = [None; Square::COUNT];
        let mut king_squares = 0;
        match nnue_king {
            Some(anchor) => {
                let white = variant.mobility_region[Color::White.index()][anchor.index()];
                let black = variant.mobility_region[Color::Black.index()][anchor.index()];
                for sq in extent.squares() {
                    let reachable = match (white, black) {
                        (Some(white), Some(black)) => {
                            white.contains(sq) || black.contains(extent.flip_rank(sq))
                        }
                        _ => true,
                    };
                    if reachable {
                        king_square_index[extent.variant_index(sq)] = Some(king_squares);
                        king_squares += 1;
                    }
                }
            }
            None => {
                king_square_index[0] = Some(0);
                king_squares = 1;
            }
        }

        let placement = variant.start_fen.split_whitespace().next().unwrap_or("");
        let mut max_pieces = placement
            .chars()
            .filter(|&c| variant.piece_chars.is_piece_char(c))
            .count() as u32;
        if variant.two_boards {
            max_pieces *= 2;
        }

        let blocks = BlockSizes {
            piece_squares,
            pockets,
            potion_zones,
            potion_cooldowns,
        };
        debug_assert_eq!(blocks.total(), piece_indices);

        FeatureLayout {
            extent,
            nnue_king,
            uses_pockets,
            pocket_capacity,
            piece_square_base,
            piece_hand_base,
            king_square_index,
            king_squares,
            potion_zone_base,
            potion_cooldown_base,
            blocks,
            piece_indices,
            dimensions: king_squares * piece_indices,
            max_pieces,
            refresh_every_move: variant.flip_enclosed_pieces,
        }
    }

    #[inline]
    pub fn extent(&self) -> BoardExtent {
        self.extent
    }

    /// Anchor piece type whose square selects the king block.
    #[inline]
    pub fn nnue_king(&self) -> Option<PieceType> {
        self.nnue_king
    }

    /// Number of squares on the variant board.
    #[inline]
    pub fn squares(&self) -> u32 {
        self.extent.square_count() as u32
    }

    #[inline]
    pub fn uses_pockets(&self) -> bool {
        self.uses_pockets
    }

    /// Hand slots per (relation, type); zero without pockets.
    #[inline]
    pub fn pocket_capacity(&self) -> u32 {
        self.pocket_capacity
    }

    /// First index of the square block of `pt` pieces with the given relation.
    #[inline]
    pub fn square_base(&self, relation: Relation, pt: PieceType) -> Option<u32> {
        self.piece_square_base[relation.index()][pt.index()]
    }

    /// First index of the pocket block of `pt` pieces with the given relation.
    #[inline]
    pub fn hand_base(&self, relation: Relation, pt: PieceType) -> Option<u32> {
        self.piece_hand_base[relation.index()][pt.index()]
    }

    /// Dense king bucket of a variant square, if the anchor can stand there.
    #[inline]
    pub fn king_square_index(&self, variant_square: usize) -> Option<u32> {
        self.king_square_index.get(variant_square).copied().flatten()
    }

    /// Number of king buckets (K).
    #[inline]
    pub fn king_squares(&self) -> u32 {
        self.king_squares
    }

    #[inline]
    pub fn potion_zone_base(&self) -> Option<u32> {
        self.potion_zone_base
    }

    #[inline]
    pub fn potion_cooldown_base(&self) -> Option<u32> {
        self.potion_cooldown_base
    }

    #[inline]
    pub fn has_potions(&self) -> bool {
        self.potion_zone_base.is_some()
    }

    #[inline]
    pub fn blocks(&self) -> BlockSizes {
        self.blocks
    }

    /// Size of one king block.
    #[inline]
    pub fn piece_indices(&self) -> u32 {
        self.piece_indices
    }

    /// Total length of the feature vector.
    #[inline]
    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// Upper bound on pieces on the board at once.
    #[inline]
    pub fn max_pieces(&self) -> u32 {
        self.max_pieces
    }

    /// Whether every transition has to be followed by a full refresh.
    #[inline]
    pub fn refresh_every_move(&self) -> bool {
        self.refresh_every_move
    }

    /// Dense variant square of `sq` as seen from `perspective`.
    ///
    /// White sees the board as is, Black sees it rotated by 180°.
    #[inline]
    pub fn orient(&self, perspective: Color, sq: Square) -> u32 {
        let sq = match perspective {
            Color::White => sq,
            Color::Black => self.extent.rotate(sq),
        };
        self.extent.variant_index(sq) as u32
    }

    /// Offset of the king block selected by `perspective`'s anchor on `ksq`.
    ///
    /// Variants without an anchor, and positions where the anchor is off
    /// the board, use the first block.
    #[inline]
    pub fn king_offset(&self, perspective: Color, ksq: Option<Square>) -> u32 {
        let bucket = match (self.nnue_king, ksq) {
            (Some(_), Some(ksq)) => self
                .king_square_index(self.orient(perspective, ksq) as usize)
                .unwrap_or(0),
            _ => 0,
        };
        bucket * self.piece_indices
    }
}

/// Pick the anchor piece type, or `None` for a single king bucket.
///
/// The anchor must be unique per side in the start position and must never
/// change its count through promotion.
fn select_anchor(variant: &Variant) -> Option<PieceType> {
    let candidate = if variant.piece_types.contains(PieceType::King) {
        PieceType::King
    } else if variant.extinction_piece_count == 0
        && variant.extinction_piece_types.contains(PieceType::Commoner)
        && variant.piece_types.contains(PieceType::Commoner)
    {
        PieceType::Commoner
    } else {
        return None;
    };

    let promotes = Color::ALL.iter().any(|&c| {
        variant.promotion_pawn_types[c.index()].contains(candidate)
            || variant.promotion_piece_types[c.index()].contains(candidate)
    }) || variant.promoted_piece_type.contains(&Some(candidate));
    if promotes {
        debug!(anchor = %candidate, "anchor takes part in promotion, using a single king bucket");
        return None;
    }

    let placement = variant.start_fen.split_whitespace().next().unwrap_or("");
    let unique = Color::ALL.iter().all(|&color| {
        variant
            .piece_chars
            .char_of(Piece::new(candidate, color))
            .is_some_and(|c| placement.chars().filter(|&x| x == c).count() == 1)
    });
    if !unique {
        debug!(anchor = %candidate, "anchor not unique in start position, using a single king bucket");
        return None;
    }

    Some(candidate)
}
