// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inference service replies.
//!
//! This module turns the raw JSON body returned by the upload endpoint into
//! either a typed [`ServerResponse`] or a classified [`UploadError`].

use super::annotation::Annotation;
use super::media::MediaKind;
use crate::error::UploadError;
use serde::Deserialize;

/// A successful reply from the inference service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerResponse {
    /// Human readable status, display only
    pub message: Option<String>,
    /// Converted text, display only
    pub text: Option<String>,
    /// Kind of media the service processed; selects the overlay path
    pub media_type: MediaKind,
    /// Detections in source-image pixel space, in the order received
    pub annotations: Vec<Annotation>,
}

/// Wire shape of every reply, success or error.
#[derive(Debug, Deserialize)]
struct RawResponse {
    message: Option<String>,
    text: Option<String>,
    media_type: Option<MediaKind>,
    annotations: Option<Vec<Annotation>>,
    error: Option<serde_json::Value>,
}

impl ServerResponse {
    /// Parse a reply body.
    ///
    /// Missing `annotations` means no boxes. A body with an `error` field is
    /// a server error regardless of any other fields.
    pub fn parse(raw: &str) -> Result<Self, UploadError> {
        let raw: RawResponse =
            serde_json::from_str(raw).map_err(|e| UploadError::MalformedResponse {
                detail: format!("invalid JSON: {}", e),
            })?;

        if let Some(error) = raw.error {
            return Err(UploadError::Server(error_text(error)));
        }

        let media_type = raw.media_type.ok_or_else(|| UploadError::MalformedResponse {
            detail: "reply has neither media_type nor error".to_string(),
        })?;

        Ok(Self {
            message: raw.message,
            text: raw.text,
            media_type,
            annotations: raw.annotations.unwrap_or_default(),
        })
    }

    /// Classify a complete HTTP reply.
    ///
    /// Non-2xx replies are always failures; their `error` field is used when
    /// present.
    pub fn from_reply(status: u16, body: &str) -> Result<Self, UploadError> {
        if (200..300).contains(&status) {
            return Self::parse(body);
        }
        match Self::parse(body) {
            Err(UploadError::Server(message)) => Err(UploadError::Server(message)),
            _ => Err(UploadError::Server(format!(
                "The server responded with status {}",
                status
            ))),
        }
    }

    /// Annotations that may be drawn over the preview.
    ///
    /// Video results never produce an overlay.
    pub fn drawable_annotations(&self) -> &[Annotation] {
        match self.media_type {
            MediaKind::Image => &self.annotations,
            MediaKind::Video => &[],
        }
    }
}

fn error_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(message) => message,
        other => other.to_string(),
    }
}
