//! Inkwell Processing Library
//!
//! The upload and path-resolution subsystem: storage path templates, upload
//! validation, the decode → validate → resolve → persist pipeline and paginated
//! asset listing.

pub mod listing;
pub mod path_format;
pub mod upload;
pub mod validator;

pub use listing::AssetLister;
pub use path_format::{format_path, PathFormatError};
pub use upload::{FilePart, UploadForm, UploadPipeline};
pub use validator::{check_file_size, check_file_type, UploadValidator, ValidationError};
