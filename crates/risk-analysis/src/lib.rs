//! Turns free-text model replies into scam-risk analysis objects and holds
//! the instruction prompts sent alongside each request.

mod extractor;
mod fallback;
pub mod prompts;

pub use extractor::{check_shape, extract_analysis, json_candidate, Extraction};
pub use fallback::fallback_analysis;
