use std::collections::HashMap;

use axum::{
    body::Body,
    extract::Request,
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use multer::Multipart;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};

/// A file part of a form submission.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Text fields and file parts of a form submission.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// File part named `name`; parts submitted without a file name count as absent.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).filter(|f| !f.file_name.is_empty())
    }
}

/// Split a form submission into text fields and in-memory files.
///
/// `multipart/form-data` bodies yield fields and files, urlencoded bodies
/// yield fields only, and any other body is treated as an empty form.
pub async fn parse_form(request: Request<Body>, max_file_size: u64) -> AppResult<FormData> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    // Boundaries are case-sensitive, so only the media type is lowercased.
    let mime = content_type.to_ascii_lowercase();

    if mime.starts_with("application/x-www-form-urlencoded") {
        return parse_urlencoded(request, max_file_size).await;
    }
    if !mime.starts_with("multipart/") {
        debug!("[form] no form body (Content-Type {:?})", content_type);
        return Ok(FormData::default());
    }
    parse_multipart(request, &content_type, max_file_size).await
}

async fn parse_urlencoded(request: Request<Body>, max_size: u64) -> AppResult<FormData> {
    let limit = usize::try_from(max_size).unwrap_or(usize::MAX);
    let body = axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request: {}", e)))?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid form body: {}", e)))?;

    Ok(FormData {
        fields: pairs.into_iter().collect(),
        files: HashMap::new(),
    })
}

async fn parse_multipart(
    request: Request<Body>,
    content_type: &str,
    max_file_size: u64,
) -> AppResult<FormData> {
    let boundary = multer::parse_boundary(content_type).map_err(|e| {
        error!("Failed to parse boundary: {}", e);
        AppError::from(e)
    })?;

    let stream = request.into_body().into_data_stream();
    let mut multipart = Multipart::with_constraints(
        stream,
        boundary,
        multer::Constraints::new().size_limit(
            multer::SizeLimit::new()
                .per_field(max_file_size)
                .whole_stream(max_file_size.saturating_mul(2)),
        ),
    );

    let mut form = FormData::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let data = field.bytes().await?;
                debug!("[form] file field {:?}: {:?} ({} bytes)", name, file_name, data.len());
                form.files.insert(name, UploadedFile { file_name, data });
            }
            None => {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
pub(crate) mod test_support {
    pub const BOUNDARY: &str = "----video-hosting-test-boundary";

    pub enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    pub fn body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut out = Vec::new();
        for part in parts {
            out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(data);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        out
    }
}
