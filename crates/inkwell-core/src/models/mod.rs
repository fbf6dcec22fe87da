pub mod crawl;
pub mod listing;
pub mod upload;

pub use crawl::CrawlOutcome;
pub use listing::{list_state_message, ListResult, ListState};
pub use upload::{upload_state_message, UploadOptions, UploadResult, UploadState};
