use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::AppError;

/// A file received from the upload form.
pub struct UploadItem {
    pub filename: String,
    pub body: Bytes,
}

/// Reduces a client-supplied name to a plain base name safe to join onto the upload dir.
pub fn safe_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Write the upload under `dir`, overwriting any file of the same name.
pub async fn save_upload(dir: &Path, item: &UploadItem) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create upload dir {}", dir.display()))?;
    let path = dir.join(&item.filename);
    tokio::fs::write(&path, &item.body)
        .await
        .with_context(|| format!("write upload {}", path.display()))?;
    debug!(path = %path.display(), bytes = item.body.len(), "upload saved");
    Ok(())
}

/// Plain text of a `.txt` or `.pdf` upload.
pub async fn extract_text(item: &UploadItem) -> Result<String, AppError> {
    let text = match extension(&item.filename).as_deref() {
        Some("txt") => String::from_utf8_lossy(&item.body).into_owned(),
        Some("pdf") => {
            let body = item.body.clone();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&body))
                .await
                .map_err(|e| {
                    warn!(error = %e, "pdf extraction task aborted");
                    AppError::UnreadableFile
                })?
                .map_err(|e| {
                    warn!(error = %e, "pdf extraction failed");
                    AppError::UnreadableFile
                })?
        }
        _ => return Err(AppError::UnreadableFile),
    };

    if text.trim().is_empty() {
        return Err(AppError::UnreadableFile);
    }
    Ok(text)
}
