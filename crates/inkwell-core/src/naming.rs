//! Filename helpers shared by the validator, the path formatter and storage listing.

/// Final component of a client supplied name, splitting on both `/` and `\`.
pub fn final_component(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Lowercased extension including the leading dot, or an empty string.
///
/// The extension is the substring from the last `.` of the final path component,
/// so `archive.tar.GZ` yields `.gz` and `.htaccess` yields `.htaccess`.
pub fn file_extension(name: &str) -> String {
    let file_name = final_component(name);
    match file_name.rfind('.') {
        Some(idx) => file_name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Normalize a configured extension to the lowercase, dot-prefixed form.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().to_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{}", trimmed)
    }
}
