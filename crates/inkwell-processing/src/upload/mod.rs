//! Upload pipeline: decode → validate → resolve path → persist.

pub mod pipeline;
pub mod types;

pub use pipeline::UploadPipeline;
pub use types::{FilePart, UploadForm};
