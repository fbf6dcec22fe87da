//! Protocol constants shared between the dispatcher and the configuration.

/// Returns the client-side settings object.
pub const ACTION_CONFIG: &str = "config";
pub const ACTION_UPLOAD_IMAGE: &str = "uploadimage";
/// Base64 canvas export ("scrawl") upload.
pub const ACTION_UPLOAD_SCRAWL: &str = "uploadscrawl";
pub const ACTION_UPLOAD_VIDEO: &str = "uploadvideo";
pub const ACTION_UPLOAD_FILE: &str = "uploadfile";
pub const ACTION_LIST_IMAGE: &str = "listimage";
pub const ACTION_LIST_FILE: &str = "listfile";
/// Batch fetch of remote images.
pub const ACTION_CATCH_IMAGE: &str = "catchimage";

/// Filename given to every base64 scrawl upload.
pub const SCRAWL_FILE_NAME: &str = "scrawl.png";

/// Template used when a configured path format is blank.
pub const DEFAULT_PATH_TEMPLATE: &str = "{filename}{rand:6}";

/// State string reported for successful operations.
pub const STATE_SUCCESS: &str = "SUCCESS";

/// Every action the dispatcher must serve.
pub const EDITOR_ACTIONS: [&str; 8] = [
    ACTION_CONFIG,
    ACTION_UPLOAD_IMAGE,
    ACTION_UPLOAD_SCRAWL,
    ACTION_UPLOAD_VIDEO,
    ACTION_UPLOAD_FILE,
    ACTION_LIST_IMAGE,
    ACTION_LIST_FILE,
    ACTION_CATCH_IMAGE,
];
