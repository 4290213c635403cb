//! Multipart form intake for routes that accept a picture.
//!
//! Each such route takes text fields plus at most one image field with a
//! fixed name (`groupImage`, `pfp` or `imagem`). The file is written to the
//! upload directory under a generated name and referenced by its public
//! `/uploads/...` path.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use chrono::Utc;

use crate::app::errors::ApiError;

/// Parsed multipart form: repeated text fields plus the stored picture path,
/// if one was uploaded.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, Vec<String>>,
    picture: Option<String>,
}

impl UploadForm {
    /// First value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.first().map(String::as_str)
    }

    /// All values of a repeated text field (e.g. weekday checkboxes).
    pub fn all(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Public `/uploads/...` path of the stored picture, if any.
    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }
}

/// Drain a multipart request, storing the file carried by `picture_field`.
///
/// Non-image uploads are rejected; file parts under any other field name are
/// ignored the way unknown form fields are.
pub async fn read_form(
    mut multipart: Multipart,
    picture_field: &str,
    upload_dir: &Path,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == picture_field && field.file_name().is_some() {
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !content_type.starts_with("image/") {
                return Err(ApiError::Validation("only images are allowed".to_string()));
            }

            let ext = field
                .file_name()
                .and_then(|f| Path::new(f).extension())
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();

            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;

            let filename = format!(
                "{}-{}-{}{}",
                picture_field,
                Utc::now().timestamp_millis(),
                rand::random::<u32>(),
                ext
            );

            tokio::fs::write(upload_dir.join(&filename), &bytes)
                .await
                .map_err(|e| {
                    tracing::error!("failed to store upload {filename}: {e}");
                    ApiError::Internal
                })?;

            form.picture = Some(format!("/uploads/{filename}"));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("malformed field '{name}': {e}")))?;
            form.fields.entry(name).or_default().push(value);
        }
    }

    Ok(form)
}
