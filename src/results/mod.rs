//! Result recorder.
//!
//! - **Parser**: lenient extraction of solution blocks from raw model text
//! - **References**: pluggable detection of which tools a solution uses
//! - **Store**: append-only JSON files under `results/`, listing and loading
//! - **Compare / Export**: read-side views over stored records

pub mod compare;
pub mod export;
mod parser;
mod record;
mod references;
mod store;

pub use compare::{ParameterChange, RecordComparison, compare, tag_frequencies};
pub use export::{export_json, export_text};
pub use parser::{ParseSummary, ParsedOutput, RawSolution, parse_solutions};
pub use record::{CallStats, ResultRecord, RunMetrics, Solution};
pub use references::{DeclaredOnly, DeclaredOrMentioned, ToolReferenceDetector, mentions};
pub use store::{RecordFilter, ResultStore};
