//! Multipart form reading shared by the attachment endpoints.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A parsed upload form: the file part plus any text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// The `file` part, or a 400 if the form had none.
    pub fn require_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Read every part of `multipart`, streaming the `file` part so payloads
/// over `max_bytes` are rejected without being buffered whole.
pub async fn read_form(mut multipart: Multipart, max_bytes: usize) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            let text = field.text().await.map_err(bad_multipart)?;
            form.fields.insert(name, text);
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "File exceeds the upload limit of {max_bytes} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        form.file = Some(UploadedFile {
            bytes,
            content_type,
        });
    }

    Ok(form)
}
