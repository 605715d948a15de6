//! Multipart form reading.
//!
//! Each part is read once into an owned buffer. Named image parts become
//! [`UploadedImage`]s; everything else is kept as text.

use std::collections::HashMap;

use axum::extract::Multipart;
use psychoscore_media::UploadedImage;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct MultipartForm {
    files: HashMap<String, UploadedImage>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart, file_fields: &[&str]) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::validation(format!("Multipart error: {}", e.body_text())))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if file_fields.contains(&name.as_str()) {
                let content_type = field.content_type().unwrap_or("").to_string();
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Read error: {}", e.body_text())))?;
                let upload = UploadedImage::new(data, content_type);
                let upload = match file_name {
                    Some(file_name) => upload.with_file_name(file_name),
                    None => upload,
                };
                form.files.insert(name, upload);
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Read error: {}", e.body_text())))?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Result<UploadedImage, ApiError> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError::validation(format!("Missing '{name}' file in multipart form")))
    }

    /// Trimmed, non-blank text value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn flag(&self, name: &str, default: bool) -> Result<bool, ApiError> {
        match self.text(name) {
            None => Ok(default),
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| ApiError::validation(format!("Invalid boolean for '{name}': {raw}"))),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
