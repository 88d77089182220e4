use std::collections::HashMap;

use axum::extract::{Multipart, multipart::MultipartError};

use crate::{
    error::{AppError, AppResult},
    models::{DocumentKind, UploadedDocument},
};

/// Prefix of the form fields carrying documents (`file-0`, `file-1`, ...).
pub const DOCUMENT_FIELD_PREFIX: &str = "file-";

/// Text fields and document metadata of a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub documents: Vec<UploadedDocument>,
}

impl MultipartForm {
    /// Drains the body. `file-*` parts are sized chunk by chunk and their bytes
    /// dropped; an empty file input (no file name) and files sent under any
    /// other field name are skipped.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = multipart.next_field().await.map_err(invalid_upload)? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name)
                    if !file_name.is_empty() && name.starts_with(DOCUMENT_FIELD_PREFIX) =>
                {
                    let kind = DocumentKind::detect(&file_name, field.content_type())?;

                    let mut size_bytes = 0;
                    while let Some(chunk) = field.chunk().await.map_err(invalid_upload)? {
                        size_bytes += chunk.len();
                    }

                    form.documents.push(UploadedDocument {
                        file_name,
                        kind,
                        size_bytes,
                    });
                }
                Some(_) => {}
                None => {
                    let value = field.text().await.map_err(invalid_upload)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

/// Keeps the status multer picked, so an oversized body stays a 413.
fn invalid_upload(e: MultipartError) -> AppError {
    AppError::Rejected {
        status: e.status(),
        message: format!("Invalid upload: {}", e.body_text()),
    }
}
