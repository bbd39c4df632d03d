//! Embedded image references: `data:<mime>;base64,<payload>`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::error::DataUrlError;

const FALLBACK_MIME: &str = "application/octet-stream";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([^;,]*)((?:;[^;,]*)*),").expect("data URL pattern compiles")
});

/// An uploaded file, either on disk or already in memory (dropped files on
/// some platforms only come with bytes).
#[derive(Debug, Clone)]
pub enum FileBlob {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl FileBlob {
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// MIME type from the content, then from the file name.
pub fn mime_for(bytes: &[u8], name: &str) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(Path::new(name)))
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

pub fn encode(bytes: &[u8], name: &str) -> String {
    format!("data:{};base64,{}", mime_for(bytes, name), STANDARD.encode(bytes))
}

pub fn decode(url: &str) -> Result<Decoded, DataUrlError> {
    let caps = HEADER.captures(url).ok_or(DataUrlError::NotDataUrl)?;
    let header_len = caps.get(0).map(|m| m.end()).unwrap_or(0);
    let params = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    if !params.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(DataUrlError::NotBase64);
    }

    let mime = match caps.get(1).map(|m| m.as_str()) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => "text/plain".to_string(),
    };
    let bytes = STANDARD
        .decode(url[header_len..].trim())
        .map_err(|e| DataUrlError::Payload(e.to_string()))?;
    Ok(Decoded { mime, bytes })
}

/// Convert one file into a data URL.
pub async fn read_blob(blob: &FileBlob) -> std::io::Result<String> {
    match blob {
        FileBlob::Path(path) => {
            let bytes = tokio::fs::read(path).await?;
            Ok(encode(&bytes, &blob.name()))
        }
        FileBlob::Bytes { name, bytes } => Ok(encode(bytes, name)),
    }
}

/// Convert all files concurrently. The result keeps the input order; files
/// that cannot be read are left out with a warning.
pub async fn read_all(files: &[FileBlob]) -> Vec<String> {
    let results = futures::future::join_all(files.iter().map(read_blob)).await;
    files
        .iter()
        .zip(results)
        .filter_map(|(blob, result)| match result {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", blob.name());
                None
            }
        })
        .collect()
}
