pub mod body;
pub mod common;
pub mod query;

// Re-export commonly used items
pub use body::flatten_body;
pub use common::{BodyPart, ExtractedRecord, RawMessage, RunReport, UNKNOWN_COMPANY};
pub use query::build_search_query;
