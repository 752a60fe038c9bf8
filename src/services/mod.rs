//! Filtering services.
//!
//! The batch pipeline, its seen-set, the off-thread worker, and the persisted
//! lifetime counter.

mod pipeline;
mod seen;
mod stats;
mod worker;

pub use pipeline::FeedFilter;
pub use seen::SeenSet;
pub use stats::FilterStats;
pub use worker::FilterWorker;
