use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Electricity bills and installer quotes may be sent as PDF or photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "image/jpeg" | "image/jpg" => Some(DocumentKind::Jpeg),
            "image/png" => Some(DocumentKind::Png),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;

        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            "png" => Some(DocumentKind::Png),
            _ => None,
        }
    }

    /// Declared content type wins; browsers often send `application/octet-stream`,
    /// in which case the extension decides.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> AppResult<Self> {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| Self::from_file_name(file_name))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported file type for {file_name}: upload PDF, JPEG or PNG documents"
                ))
            })
    }
}

/// Metadata of an uploaded document. The content itself is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub size_bytes: usize,
}
