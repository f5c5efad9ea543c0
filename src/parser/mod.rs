// Parser module: raw upstream records into the output contract.

pub mod lenient;
pub mod review_extractor;
pub mod sanitizer;

pub use review_extractor::{UpstreamPayload, extract_from_mock, extract_from_upstream};
