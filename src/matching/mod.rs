//! Keyword matching engine.
//!
//! Keywords are compiled once into [`ProbeSet`]s and cached in a
//! [`ProbeCache`]. [`evaluate`] applies one keyword to one text, and the
//! [`Classifier`] runs the tiered per-item decision.

mod cache;
mod classifier;
mod evaluator;
mod probes;

pub use cache::ProbeCache;
pub use classifier::Classifier;
pub use evaluator::{MatchTier, evaluate};
pub use probes::{DEFAULT_PROBE_SIZE_LIMIT, ProbeSet, is_probe_safe};
