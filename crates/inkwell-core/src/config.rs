//! Configuration module
//!
//! Configuration is read from environment variables (optionally via a `.env`
//! file) into an immutable [`EditorConfig`], validated once at startup and then
//! shared read-only by every request. [`Config::from_lookup`] accepts any key
//! lookup so tests can build a configuration without touching the process
//! environment.

use std::env;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{
    ACTION_CATCH_IMAGE, ACTION_LIST_FILE, ACTION_LIST_IMAGE, ACTION_UPLOAD_FILE,
    ACTION_UPLOAD_IMAGE, ACTION_UPLOAD_SCRAWL, ACTION_UPLOAD_VIDEO,
};
use crate::naming::normalize_extension;

// Common constants
const SERVER_PORT: u16 = 4000;
const HANDLER_PATH: &str = "/editor/controller";
const STORAGE_ROOT: &str = "./wwwroot";
const FIELD_NAME: &str = "upfile";
const IMAGE_MAX_SIZE: u64 = 2_048_000;
const VIDEO_MAX_SIZE: u64 = 102_400_000;
const FILE_MAX_SIZE: u64 = 51_200_000;
const LIST_SIZE: usize = 20;
const CATCHER_TIMEOUT_SECS: u64 = 30;

const IMAGE_PATH_FORMAT: &str = "upload/image/{yyyy}{mm}{dd}/{time}{rand:6}";
const VIDEO_PATH_FORMAT: &str = "upload/video/{yyyy}{mm}{dd}/{time}{rand:6}";
const FILE_PATH_FORMAT: &str = "upload/file/{yyyy}{mm}{dd}/{time}{rand:6}";

const IMAGE_EXTENSIONS: &str = ".png,.jpg,.jpeg,.gif,.bmp";
const VIDEO_EXTENSIONS: &str = ".flv,.swf,.mkv,.avi,.rm,.rmvb,.mpeg,.mpg,.ogg,.ogv,.mov,.wmv,.mp4,.webm,.mp3,.wav,.mid";
const FILE_EXTENSIONS: &str = ".png,.jpg,.jpeg,.gif,.bmp,.flv,.swf,.mkv,.avi,.rm,.rmvb,.mpeg,.mpg,.ogg,.ogv,.mov,.wmv,.mp4,.webm,.mp3,.wav,.mid,.rar,.zip,.tar,.gz,.7z,.bz2,.cab,.iso,.doc,.docx,.xls,.xlsx,.ppt,.pptx,.pdf,.txt,.md,.xml";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Route serving every editor action.
    pub handler_path: String,
    /// Directory all stored asset paths are relative to.
    pub storage_root: String,
    /// `text` or `json`.
    pub log_format: String,
}

impl BaseConfig {
    /// `production` or `prod`, any case.
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }
}

/// Settings of a multipart upload action.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub field_name: String,
    pub path_format: String,
    pub max_size: u64,
    pub allow_files: Vec<String>,
    pub url_prefix: String,
}

/// Settings of the base64 scrawl action.
#[derive(Clone, Debug)]
pub struct ScrawlSettings {
    pub field_name: String,
    pub path_format: String,
    pub max_size: u64,
    pub url_prefix: String,
    /// Run type/size checks on scrawl payloads (off by default).
    pub validate: bool,
}

/// Settings of the remote image catcher.
#[derive(Clone, Debug)]
pub struct CatcherSettings {
    pub field_name: String,
    pub path_format: String,
    /// 0 disables the cap.
    pub max_size: u64,
    pub allow_files: Vec<String>,
    pub url_prefix: String,
    /// Hosts the editor treats as local and never sends for catching.
    pub local_domains: Vec<String>,
    pub timeout_secs: u64,
    pub block_private_networks: bool,
}

/// Settings of an asset manager (listing) action.
#[derive(Clone, Debug)]
pub struct ManagerSettings {
    pub list_path: String,
    pub list_size: usize,
    pub allow_files: Vec<String>,
    pub url_prefix: String,
}

/// Complete editor handler configuration
#[derive(Clone, Debug)]
pub struct EditorConfig {
    pub base: BaseConfig,
    pub image: UploadSettings,
    pub scrawl: ScrawlSettings,
    pub video: UploadSettings,
    pub file: UploadSettings,
    pub catcher: CatcherSettings,
    pub image_manager: ManagerSettings,
    pub file_manager: ManagerSettings,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<EditorConfig>);

impl Config {
    fn as_editor(&self) -> &EditorConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build and validate a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = EditorConfig::from_lookup(&lookup)?;
        config.validate()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_editor().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_editor().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_editor().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_editor().base.cors_origins
    }

    pub fn handler_path(&self) -> &str {
        &self.as_editor().base.handler_path
    }

    pub fn storage_root(&self) -> &str {
        &self.as_editor().base.storage_root
    }

    pub fn log_format(&self) -> &str {
        &self.as_editor().base.log_format
    }

    pub fn image(&self) -> &UploadSettings {
        &self.as_editor().image
    }

    pub fn scrawl(&self) -> &ScrawlSettings {
        &self.as_editor().scrawl
    }

    pub fn video(&self) -> &UploadSettings {
        &self.as_editor().video
    }

    pub fn file(&self) -> &UploadSettings {
        &self.as_editor().file
    }

    pub fn catcher(&self) -> &CatcherSettings {
        &self.as_editor().catcher
    }

    pub fn image_manager(&self) -> &ManagerSettings {
        &self.as_editor().image_manager
    }

    pub fn file_manager(&self) -> &ManagerSettings {
        &self.as_editor().file_manager
    }

    /// Largest request body any upload action may legitimately send.
    pub fn max_upload_size(&self) -> u64 {
        let editor = self.as_editor();
        editor
            .image
            .max_size
            .max(editor.video.max_size)
            .max(editor.file.max_size)
            // base64 inflates the payload by a third
            .max(editor.scrawl.max_size.saturating_mul(4) / 3 + 4)
    }

    /// Settings object returned to the editor by the `config` action.
    pub fn client_settings(&self) -> ClientSettings {
        let editor = self.as_editor();
        ClientSettings {
            image_action_name: ACTION_UPLOAD_IMAGE,
            image_field_name: editor.image.field_name.clone(),
            image_max_size: editor.image.max_size,
            image_allow_files: editor.image.allow_files.clone(),
            image_url_prefix: editor.image.url_prefix.clone(),
            image_path_format: editor.image.path_format.clone(),
            scrawl_action_name: ACTION_UPLOAD_SCRAWL,
            scrawl_field_name: editor.scrawl.field_name.clone(),
            scrawl_path_format: editor.scrawl.path_format.clone(),
            scrawl_max_size: editor.scrawl.max_size,
            scrawl_url_prefix: editor.scrawl.url_prefix.clone(),
            catcher_action_name: ACTION_CATCH_IMAGE,
            catcher_field_name: editor.catcher.field_name.clone(),
            catcher_path_format: editor.catcher.path_format.clone(),
            catcher_url_prefix: editor.catcher.url_prefix.clone(),
            catcher_max_size: editor.catcher.max_size,
            catcher_allow_files: editor.catcher.allow_files.clone(),
            catcher_local_domain: editor.catcher.local_domains.clone(),
            video_action_name: ACTION_UPLOAD_VIDEO,
            video_field_name: editor.video.field_name.clone(),
            video_path_format: editor.video.path_format.clone(),
            video_url_prefix: editor.video.url_prefix.clone(),
            video_max_size: editor.video.max_size,
            video_allow_files: editor.video.allow_files.clone(),
            file_action_name: ACTION_UPLOAD_FILE,
            file_field_name: editor.file.field_name.clone(),
            file_path_format: editor.file.path_format.clone(),
            file_url_prefix: editor.file.url_prefix.clone(),
            file_max_size: editor.file.max_size,
            file_allow_files: editor.file.allow_files.clone(),
            image_manager_action_name: ACTION_LIST_IMAGE,
            image_manager_list_path: editor.image_manager.list_path.clone(),
            image_manager_list_size: editor.image_manager.list_size,
            image_manager_url_prefix: editor.image_manager.url_prefix.clone(),
            image_manager_allow_files: editor.image_manager.allow_files.clone(),
            file_manager_action_name: ACTION_LIST_FILE,
            file_manager_list_path: editor.file_manager.list_path.clone(),
            file_manager_list_size: editor.file_manager.list_size,
            file_manager_url_prefix: editor.file_manager.url_prefix.clone(),
            file_manager_allow_files: editor.file_manager.allow_files.clone(),
        }
    }
}

/// Client-facing settings, in the editor's camelCase vocabulary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    pub image_action_name: &'static str,
    pub image_field_name: String,
    pub image_max_size: u64,
    pub image_allow_files: Vec<String>,
    pub image_url_prefix: String,
    pub image_path_format: String,
    pub scrawl_action_name: &'static str,
    pub scrawl_field_name: String,
    pub scrawl_path_format: String,
    pub scrawl_max_size: u64,
    pub scrawl_url_prefix: String,
    pub catcher_action_name: &'static str,
    pub catcher_field_name: String,
    pub catcher_path_format: String,
    pub catcher_url_prefix: String,
    pub catcher_max_size: u64,
    pub catcher_allow_files: Vec<String>,
    pub catcher_local_domain: Vec<String>,
    pub video_action_name: &'static str,
    pub video_field_name: String,
    pub video_path_format: String,
    pub video_url_prefix: String,
    pub video_max_size: u64,
    pub video_allow_files: Vec<String>,
    pub file_action_name: &'static str,
    pub file_field_name: String,
    pub file_path_format: String,
    pub file_url_prefix: String,
    pub file_max_size: u64,
    pub file_allow_files: Vec<String>,
    pub image_manager_action_name: &'static str,
    pub image_manager_list_path: String,
    pub image_manager_list_size: usize,
    pub image_manager_url_prefix: String,
    pub image_manager_allow_files: Vec<String>,
    pub file_manager_action_name: &'static str,
    pub file_manager_list_path: String,
    pub file_manager_list_size: usize,
    pub file_manager_url_prefix: String,
    pub file_manager_allow_files: Vec<String>,
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|s| s.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}

fn list_or<F>(lookup: &F, key: &str, default: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn extensions_or<F>(lookup: &F, key: &str, default: &str) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    list_or(lookup, key, default)
        .iter()
        .map(|ext| normalize_extension(ext))
        .collect()
}

fn upload_settings<F>(
    lookup: &F,
    prefix: &str,
    path_format: &str,
    max_size: u64,
    extensions: &str,
) -> UploadSettings
where
    F: Fn(&str) -> Option<String>,
{
    UploadSettings {
        field_name: string_or(lookup, &format!("{}_FIELD_NAME", prefix), FIELD_NAME),
        path_format: string_or(lookup, &format!("{}_PATH_FORMAT", prefix), path_format),
        max_size: parse_or(lookup, &format!("{}_MAX_SIZE", prefix), max_size),
        allow_files: extensions_or(lookup, &format!("{}_ALLOW_FILES", prefix), extensions),
        url_prefix: lookup(&format!("{}_URL_PREFIX", prefix)).unwrap_or_default(),
    }
}

fn manager_settings<F>(lookup: &F, prefix: &str, list_path: &str, extensions: &str) -> ManagerSettings
where
    F: Fn(&str) -> Option<String>,
{
    ManagerSettings {
        list_path: string_or(lookup, &format!("{}_LIST_PATH", prefix), list_path),
        list_size: parse_or(lookup, &format!("{}_LIST_SIZE", prefix), LIST_SIZE),
        allow_files: extensions_or(lookup, &format!("{}_ALLOW_FILES", prefix), extensions),
        url_prefix: lookup(&format!("{}_URL_PREFIX", prefix)).unwrap_or_default(),
    }
}

impl EditorConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = list_or(lookup, "CORS_ORIGINS", "*");

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins,
            handler_path: string_or(lookup, "HANDLER_PATH", HANDLER_PATH),
            storage_root: string_or(lookup, "STORAGE_ROOT", STORAGE_ROOT),
            log_format: string_or(lookup, "LOG_FORMAT", "text").to_lowercase(),
        };

        let image = upload_settings(lookup, "IMAGE", IMAGE_PATH_FORMAT, IMAGE_MAX_SIZE, IMAGE_EXTENSIONS);
        let video = upload_settings(lookup, "VIDEO", VIDEO_PATH_FORMAT, VIDEO_MAX_SIZE, VIDEO_EXTENSIONS);
        let file = upload_settings(lookup, "FILE", FILE_PATH_FORMAT, FILE_MAX_SIZE, FILE_EXTENSIONS);

        let scrawl = ScrawlSettings {
            field_name: string_or(lookup, "SCRAWL_FIELD_NAME", FIELD_NAME),
            path_format: string_or(lookup, "SCRAWL_PATH_FORMAT", IMAGE_PATH_FORMAT),
            max_size: parse_or(lookup, "SCRAWL_MAX_SIZE", IMAGE_MAX_SIZE),
            url_prefix: lookup("SCRAWL_URL_PREFIX").unwrap_or_default(),
            validate: bool_or(lookup, "SCRAWL_VALIDATE", false),
        };

        let catcher = CatcherSettings {
            field_name: string_or(lookup, "CATCHER_FIELD_NAME", "source"),
            path_format: string_or(lookup, "CATCHER_PATH_FORMAT", IMAGE_PATH_FORMAT),
            max_size: parse_or(lookup, "CATCHER_MAX_SIZE", IMAGE_MAX_SIZE),
            allow_files: extensions_or(lookup, "CATCHER_ALLOW_FILES", IMAGE_EXTENSIONS),
            url_prefix: lookup("CATCHER_URL_PREFIX").unwrap_or_default(),
            local_domains: list_or(lookup, "CATCHER_LOCAL_DOMAIN", "127.0.0.1,localhost"),
            timeout_secs: parse_or(lookup, "CATCHER_TIMEOUT_SECS", CATCHER_TIMEOUT_SECS),
            block_private_networks: bool_or(lookup, "CATCHER_BLOCK_PRIVATE_NETWORKS", true),
        };

        Ok(EditorConfig {
            base,
            image,
            scrawl,
            video,
            file,
            catcher,
            image_manager: manager_settings(lookup, "IMAGE_MANAGER", "upload/image", IMAGE_EXTENSIONS),
            file_manager: manager_settings(lookup, "FILE_MANAGER", "upload/file", FILE_EXTENSIONS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.base.handler_path.starts_with('/') {
            return Err(anyhow::anyhow!("HANDLER_PATH must start with '/'"));
        }

        for (name, settings) in [
            ("IMAGE", &self.image),
            ("VIDEO", &self.video),
            ("FILE", &self.file),
        ] {
            if settings.max_size == 0 {
                return Err(anyhow::anyhow!("{}_MAX_SIZE must be greater than 0", name));
            }
        }

        for (name, manager) in [
            ("IMAGE_MANAGER", &self.image_manager),
            ("FILE_MANAGER", &self.file_manager),
        ] {
            if manager.list_size == 0 {
                return Err(anyhow::anyhow!("{}_LIST_SIZE must be greater than 0", name));
            }
            if manager.list_path.split(['/', '\\']).any(|segment| segment == "..") {
                return Err(anyhow::anyhow!(
                    "{}_LIST_PATH must stay inside the storage root",
                    name
                ));
            }
        }

        if self.catcher.timeout_secs == 0 {
            return Err(anyhow::anyhow!("CATCHER_TIMEOUT_SECS must be greater than 0"));
        }

        if self.base.log_format != "text" && self.base.log_format != "json" {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'text' or 'json'"));
        }

        Ok(())
    }
}
