//! Variant rules, their conclusion into a feature-space layout, and the
//! registry that reads them from INI-style files.

mod conclude;
mod error;
mod layout;
mod parser;
mod registry;
mod variant;

pub use conclude::{Direction, FinalVariant};
pub use error::VariantError;
pub use layout::{BlockSizes, FeatureLayout, Relation};
pub use parser::{Config, VariantParser};
pub use registry::VariantMap;
pub use variant::{EndgameEval, GameValue, Variant};
