//! Pipeline stages.
//!
//! - `classify`: pick candidate lines
//! - `extract`: pull posting fields out of a line
//! - `identity`: stable posting ids
//! - `scan`: run the above over documents against the seen set
//! - `watch`: a full run with fetching, delivery and persistence

pub mod classify;
pub mod extract;
pub mod identity;
pub mod scan;
pub mod watch;

pub use classify::LineClassifier;
pub use extract::{ExtractedFields, FieldExtractor};
pub use identity::posting_id;
pub use scan::{PostingPipeline, ScanStats};
pub use watch::{WatchOptions, WatchOutcome, process_documents, run_watch};
