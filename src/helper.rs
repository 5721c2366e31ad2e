use std::{fs, path::Path};

use base64::Engine;
use chrono::Utc;
use log::debug;

use crate::{KnError, Result};

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Trims every tag, drops empty ones and removes duplicates, keeping the
/// first occurrence so insertion order survives.
pub fn normalize_tags<I, T>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| normalize_tags(t.split(',')))
        .unwrap_or_default()
}

/// First non-empty line of `content`, cut to `max_chars` characters.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Image media type for the file extension of `path`, if it names one.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Reads an image file into a base64 `data:` URI suitable for `image_url`.
pub fn image_data_uri(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(KnError::FileNotFound {
            file_path: path.display().to_string(),
        });
    }
    let mime = image_mime_type(path).ok_or_else(|| KnError::Validation {
        message: format!("{} is not an image file", path.display()),
    })?;

    let bytes = fs::read(path)?;
    debug!("Encoding {} bytes of {} from {}", bytes.len(), mime, path.display());
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
}
