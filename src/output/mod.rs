//! Output formatting for the assessment result.
//!
//! Renderers consume the [`AssessmentResult`](crate::engine::AssessmentResult)
//! read-only:
//! - [`terminal`] - colored terminal summary
//! - [`csv`] - CSV export
//! - [`json`] - JSON export

mod csv;
mod json;
mod terminal;

pub use csv::{export_csv, write_assessment_csv};
pub use json::{export_json, to_json};
pub use terminal::{format_field, print_assessment, print_summary};
