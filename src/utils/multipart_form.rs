//! Buffered multipart form
//!
//! Image endpoints receive text fields and one file in a single multipart
//! body. The whole body is read into memory before the LLM call is built.

use axum::extract::Multipart;
use std::collections::HashMap;

use super::ApiError;

#[derive(Debug, Default)]
pub struct MultipartForm {
    parts: HashMap<String, Vec<u8>>,
}

impl MultipartForm {
    /// Drain `multipart`, keeping the last part for repeated names
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let data = field.bytes().await?.to_vec();

            tracing::debug!("Received form part '{}' ({} bytes)", name, data.len());
            form.parts.insert(name, data);
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Result<&str, ApiError> {
        let part = self
            .parts
            .get(name)
            .ok_or_else(|| ApiError::unprocessable(format!("Missing form field: {}", name)))?;
        std::str::from_utf8(part)
            .map_err(|_| ApiError::unprocessable(format!("Form field '{}' is not valid UTF-8", name)))
    }

    pub fn integer(&self, name: &str) -> Result<i32, ApiError> {
        let raw = self.text(name)?;
        raw.trim().parse().map_err(|_| {
            ApiError::unprocessable(format!("Form field '{}' must be an integer, got {:?}", name, raw))
        })
    }

    /// Remove and return the raw bytes of a file part
    pub fn take_file(&mut self, name: &str) -> Result<Vec<u8>, ApiError> {
        self.parts
            .remove(name)
            .ok_or_else(|| ApiError::unprocessable(format!("Missing file upload: {}", name)))
    }
}
