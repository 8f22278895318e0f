//! Report rendering.

pub mod generator;
pub mod preview;

pub use generator::{build_report, generate_json_report, generate_markdown_report};
pub use preview::{preview_aggregates, preview_summaries};
