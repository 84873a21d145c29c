//! Asset ingest: validation and naming of uploaded images.
//!
//! Checks run in a fixed order: presence, MIME type, then size. Only files that
//! pass all three reach [`crate::storage::StorageService`].

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

/// MIME types accepted by `POST /upload`.
pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("No file uploaded")]
    Missing,
    #[error("Invalid file type. Allowed: JPG, PNG, WebP, GIF")]
    InvalidType(String),
    #[error("File too large. Max size: 5MB")]
    TooLarge(usize),
}

/// IncomingFile
///
/// One file pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// validate
///
/// Applies the type and size checks. Presence is checked by the caller, which
/// is the only place that can tell "no `file` field" apart.
pub fn validate(file: &IncomingFile) -> Result<(), UploadError> {
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return Err(UploadError::InvalidType(file.content_type.clone()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(file.bytes.len()));
    }
    Ok(())
}

/// generate_filename
///
/// `<unix-millis>-<6 base36 chars>.<ext>`. The extension comes from the
/// original name when it has a sane one, otherwise from the MIME type.
pub fn generate_filename(original_name: Option<&str>, content_type: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    let ext = original_name
        .and_then(extension_of)
        .unwrap_or_else(|| extension_for(content_type).to_string());

    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

fn extension_of(name: &str) -> Option<String> {
    let ext = std::path::Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}
