//! HalfKAv2 feature indexing for configurable variants, with incremental
//! accumulator updates and evaluation file verification.

mod accumulator;
mod error;
mod features;
mod network;

pub use accumulator::{Accumulator, ActiveSet, FeatureSink, SyncState, UpdatePath};
pub use error::NetworkError;
pub use features::{HalfKav2Variants, IndexList, MAX_ACTIVE_DIMENSIONS};
pub use network::{FILE_VERSION, FeatureTransformer, HiddenState, NetworkHeader, transformer_hash};
