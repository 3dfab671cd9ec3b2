// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Minimal `multipart/form-data` encoding for a single file part.

use std::time::{SystemTime, UNIX_EPOCH};

/// An encoded request body together with its content type header.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode one file as the only part of a form.
pub fn encode_file_part(field: &str, file_name: &str, mime: &str, data: &[u8]) -> MultipartBody {
    encode_with_boundary(&new_boundary(), field, file_name, mime, data)
}

fn new_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----signlens{:x}{:x}", nanos, std::process::id())
}

fn encode_with_boundary(
    boundary: &str,
    field: &str,
    file_name: &str,
    mime: &str,
    data: &[u8],
) -> MultipartBody {
    let header = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        quote(field),
        quote(file_name),
        mime,
    );
    let footer = format!("\r\n--{boundary}--\r\n");

    let mut bytes = Vec::with_capacity(header.len() + data.len() + footer.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(footer.as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

/// Escape a value for use inside a quoted header parameter.
fn quote(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}
