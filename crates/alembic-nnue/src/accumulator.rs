//! Per-perspective accumulator synchronisation.
//!
//! An accumulator mirrors the active feature set of both perspectives in
//! some [`FeatureSink`]. Transitions mark it stale; [`Accumulator::update`]
//! brings it back in sync either incrementally or by a full refresh.

use std::collections::BTreeMap;

use alembic_core::{Color, MAX_DIRTY_PIECES, MAX_POTION_CHANGES, Position, Square, Transition};
use alembic_variant::FeatureLayout;
use tracing::{trace, warn};

use crate::features::{HalfKav2Variants, IndexList};

/// Receiver of feature activations.
pub trait FeatureSink {
    /// Reset to the state with no active features.
    fn clear(&mut self);
    /// Activate feature `index`.
    fn add(&mut self, index: u32);
    /// Deactivate feature `index`.
    fn remove(&mut self, index: u32);
}

/// Synchronisation state of one perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Never computed.
    Empty,
    /// Matches the current position.
    Clean,
    /// Transitions are pending.
    Stale,
}

/// How [`Accumulator::update`] synchronised a perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePath {
    Unchanged,
    Incremental,
    Refresh,
}

/// Feature state of both perspectives plus the transitions not yet applied.
pub struct Accumulator<S> {
    sinks: [S; Color::COUNT],
    states: [SyncState; Color::COUNT],
    /// Anchor square each perspective was computed with.
    king_squares: [Option<Square>; Color::COUNT],
    pending: Transition,
    /// Set when pending transitions did not fit into one record.
    overflowed: bool,
}

impl<S: FeatureSink> Accumulator<S> {
    /// Wrap one sink per perspective, indexed by [`Color::index`].
    pub fn new(sinks: [S; Color::COUNT]) -> Self {
        Self {
            sinks,
            states: [SyncState::Empty; Color::COUNT],
            king_squares: [None; Color::COUNT],
            pending: Transition::new(),
            overflowed: false,
        }
    }

    #[inline]
    pub fn state(&self, perspective: Color) -> SyncState {
        self.states[perspective.index()]
    }

    #[inline]
    pub fn sink(&self, perspective: Color) -> &S {
        &self.sinks[perspective.index()]
    }

    /// Record a transition. Clean perspectives become stale.
    pub fn push(&mut self, transition: &Transition) {
        let fits = self.pending.dirty().len() + transition.dirty().len() <= MAX_DIRTY_PIECES
            && self.pending.potions().len() + transition.potions().len() <= MAX_POTION_CHANGES;
        if fits && !self.overflowed {
            self.pending.extend(transition);
        } else {
            self.overflowed = true;
        }
        for state in &mut self.states {
            if *state == SyncState::Clean {
                *state = SyncState::Stale;
            }
        }
    }

    /// Recompute `perspective` from scratch.
    pub fn refresh(&mut self, layout: &FeatureLayout, pos: &Position, perspective: Color) {
        let mut active = IndexList::new();
        let dropped = HalfKav2Variants::append_active_indices(layout, pos, perspective, &mut active);
        if dropped > 0 {
            warn!(?perspective, dropped, "active features exceed the index list");
        }

        let sink = &mut self.sinks[perspective.index()];
        sink.clear();
        for &index in &active {
            sink.add(index);
        }
        self.king_squares[perspective.index()] = anchor_square(layout, pos, perspective);
        self.states[perspective.index()] = SyncState::Clean;
    }

    /// Bring both perspectives in sync with `pos`, the position reached by
    /// the pending transitions.
    ///
    /// A stale perspective is refreshed when the transitions require it,
    /// when refreshing is cheaper than applying them, or when the changed
    /// features do not fit into an index list; otherwise the removed and
    /// added features are applied.
    pub fn update(&mut self, layout: &FeatureLayout, pos: &Position) -> [UpdatePath; Color::COUNT] {
        let mut paths = [UpdatePath::Unchanged; Color::COUNT];

        for perspective in Color::ALL {
            let p = perspective.index();
            let mut incremental = match self.states[p] {
                SyncState::Clean => continue,
                SyncState::Empty => false,
                SyncState::Stale => {
                    !self.overflowed
                        && !HalfKav2Variants::requires_refresh(layout, &self.pending, perspective)
                        && HalfKav2Variants::update_cost(&self.pending)
                            <= HalfKav2Variants::refresh_cost(pos)
                }
            };

            let (mut removed, mut added) = (IndexList::new(), IndexList::new());
            if incremental {
                let ksq = self.king_squares[p];
                debug_assert_eq!(ksq, anchor_square(layout, pos, perspective));

                let dropped = HalfKav2Variants::append_changed_indices(
                    layout,
                    ksq,
                    &self.pending,
                    perspective,
                    &mut removed,
                    &mut added,
                );
                // a partial delta would leave the sink out of sync
                incremental = dropped == 0;
            }

            if incremental {
                let sink = &mut self.sinks[p];
                for &index in &removed {
                    sink.remove(index);
                }
                for &index in &added {
                    sink.add(index);
                }
                self.states[p] = SyncState::Clean;
                paths[p] = UpdatePath::Incremental;
            } else {
                self.refresh(layout, pos, perspective);
                paths[p] = UpdatePath::Refresh;
            }
            trace!(?perspective, path = ?paths[p], "accumulator updated");
        }

        self.pending = Transition::new();
        self.overflowed = false;
        paths
    }
}

fn anchor_square(layout: &FeatureLayout, pos: &Position, perspective: Color) -> Option<Square> {
    layout
        .nnue_king()
        .and_then(|anchor| pos.anchor_square(perspective, anchor))
}

/// Sink that tracks the active indices themselves.
///
/// Counts are kept per index so that removals and additions commute, as
/// they do for a weight-summing accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    counts: BTreeMap<u32, i32>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices with a positive count, ascending.
    pub fn indices(&self) -> Vec<u32> {
        self.counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&index, _)| index)
            .collect()
    }

    /// Whether every index is active at most once and none is negative.
    pub fn is_consistent(&self) -> bool {
        self.counts.values().all(|&count| count == 0 || count == 1)
    }
}

impl FeatureSink for ActiveSet {
    fn clear(&mut self) {
        self.counts.clear();
    }

    fn add(&mut self, index: u32) {
        *self.counts.entry(index).or_insert(0) += 1;
    }

    fn remove(&mut self, index: u32) {
        *self.counts.entry(index).or_insert(0) -= 1;
    }
}
