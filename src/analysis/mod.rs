//! Summary construction.
//!
//! The aggregator runs the summary query, the enricher cleans its output
//! and the rollup module computes report statistics.

pub mod aggregator;
pub mod enricher;
pub mod rollup;

pub use aggregator::create_vendor_summary;
pub use enricher::clean_data;
pub use rollup::{summary_totals, top_vendors};
