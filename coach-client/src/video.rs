use crate::error::ClientResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

const FALLBACK_MIME: &str = "video/mp4";

/// Raw video bytes plus the MIME type describing their encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl std::fmt::Debug for VideoClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoClip")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl VideoClip {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read a clip from disk, guessing the MIME type from the extension unless
    /// one is given.
    pub fn from_path(path: &Path, mime_type: Option<&str>) -> ClientResult<Self> {
        let bytes = std::fs::read(path)?;
        let mime_type = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_mime(path).to_string());
        Ok(Self { bytes, mime_type })
    }

    /// Standard-alphabet, padded base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("m4v") => "video/x-m4v",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("3gp") => "video/3gpp",
        _ => FALLBACK_MIME,
    }
}
