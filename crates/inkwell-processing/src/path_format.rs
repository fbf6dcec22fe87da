//! Storage path templates.
//!
//! A template is literal text mixed with `{token}` placeholders, e.g.
//! `upload/image/{yyyy}{mm}{dd}/{time}{rand:6}`. Expansion is a single left to
//! right pass; unrecognized or malformed tokens are copied through unchanged.
//!
//! | token        | expansion                                  |
//! |--------------|--------------------------------------------|
//! | `{yyyy}`     | 4-digit year                               |
//! | `{yy}`       | 2-digit year                               |
//! | `{mm}`       | zero-padded month                          |
//! | `{dd}`       | zero-padded day                            |
//! | `{hh}`       | zero-padded hour (24h)                     |
//! | `{ii}`       | zero-padded minute                         |
//! | `{ss}`       | zero-padded second                         |
//! | `{time}`     | milliseconds since the Unix epoch          |
//! | `{rand:N}`   | N characters from `[a-z0-9]`, 1 ≤ N ≤ 64   |
//! | `{rand}`     | same as `{rand:6}`                         |
//! | `{filename}` | sanitized base name of the uploaded file   |
//! | `{ext}`      | lowercased extension including the dot     |
//!
//! When the template has no `{ext}` token the extension is appended.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use inkwell_core::constants::DEFAULT_PATH_TEMPLATE;
use inkwell_core::naming::{file_extension, final_component};
use rand::Rng;

const RAND_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const RAND_DEFAULT_LEN: usize = 6;
const RAND_MAX_LEN: usize = 64;
const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathFormatError {
    #[error("Path template '{template}' does not resolve to a path inside the storage root")]
    InvalidTemplate { template: String },
}

/// Original filename split into a sanitized base name and its extension.
struct FileNameParts {
    base: String,
    extension: String,
}

fn strip_unsafe(text: &str) -> String {
    text.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect()
}

/// The extension is the raw name's (the one the validator checked); only the
/// base name goes through `..` removal.
fn split_file_name(original: &str) -> FileNameParts {
    let name = final_component(original);
    let extension = strip_unsafe(&file_extension(name));
    let stem = match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    };
    let base = strip_unsafe(stem)
        .replace("..", "")
        .trim_end_matches('.')
        .to_string();

    FileNameParts { base, extension }
}

fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| RAND_ALPHABET[rng.random_range(0..RAND_ALPHABET.len())] as char)
        .collect()
}

/// Resolve a path template into a storage-root-relative path.
///
/// Identical inputs with an identically seeded `rng` always produce the same path.
pub fn format_path<Tz, R>(
    original_file_name: &str,
    template: &str,
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Result<String, PathFormatError>
where
    Tz: TimeZone,
    R: Rng + ?Sized,
{
    let template = if template.trim().is_empty() {
        DEFAULT_PATH_TEMPLATE
    } else {
        template
    };
    let parts = split_file_name(original_file_name);

    let mut out = String::with_capacity(template.len() + 32);
    let mut saw_ext = false;
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            // Unterminated token, the remainder is literal.
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let token = &after[..close];
        let expansion = match token {
            "yyyy" => Some(format!("{:04}", now.year())),
            "yy" => Some(format!("{:02}", now.year().rem_euclid(100))),
            "mm" => Some(format!("{:02}", now.month())),
            "dd" => Some(format!("{:02}", now.day())),
            "hh" => Some(format!("{:02}", now.hour())),
            "ii" => Some(format!("{:02}", now.minute())),
            "ss" => Some(format!("{:02}", now.second())),
            "time" => Some(now.timestamp_millis().to_string()),
            "rand" => Some(random_token(rng, RAND_DEFAULT_LEN)),
            "filename" => Some(parts.base.clone()),
            "ext" => {
                saw_ext = true;
                Some(parts.extension.clone())
            }
            _ => token
                .strip_prefix("rand:")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| (1..=RAND_MAX_LEN).contains(n))
                .map(|n| random_token(rng, n)),
        };

        match expansion {
            Some(value) => {
                out.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                // Keep the brace and rescan from the next character so that
                // `{{yyyy}` still expands the inner token.
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    if !saw_ext {
        out.push_str(&parts.extension);
    }

    normalize(&out).ok_or_else(|| PathFormatError::InvalidTemplate {
        template: template.to_string(),
    })
}

/// `/`-joined path with empty and `.` segments removed; `None` if it escapes
/// upwards or ends up empty.
fn normalize(path: &str) -> Option<String> {
    let unified = path.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
