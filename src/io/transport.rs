// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP transport to the inference service.
//!
//! The upload controller only sees the [`Transport`] trait; [`HttpTransport`]
//! is the production implementation built on a blocking `ureq` agent and is
//! always called from a worker thread.

use super::multipart::encode_file_part;
use crate::models::media::SelectedMedia;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Form field the service reads the file from.
pub const MEDIA_FIELD: &str = "media";

/// Upper bound on a reply body.
const MAX_REPLY_BYTES: u64 = 16 * 1024 * 1024;

/// A reply that made it back from the service, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Failures where no usable reply was received.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read reply: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload cancelled")]
    Cancelled,
}

/// Shared flag telling a running upload that its result is no longer wanted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sends one media file to the inference service.
pub trait Transport: Send + Sync {
    fn post_media(
        &self,
        media: &SelectedMedia,
        cancel: &CancelToken,
    ) -> Result<TransportReply, TransportError>;
}

pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }
}

impl Transport for HttpTransport {
    fn post_media(
        &self,
        media: &SelectedMedia,
        cancel: &CancelToken,
    ) -> Result<TransportReply, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let body = encode_file_part(MEDIA_FIELD, &media.name, &media.mime, &media.bytes);
        log::info!(
            "POST {} ({} bytes, {})",
            self.endpoint,
            body.bytes.len(),
            media.mime
        );

        let response = match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", &body.content_type)
            .send_bytes(&body.bytes)
        {
            Ok(response) => response,
            // Error statuses still carry a body worth showing.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(TransportError::Request(e.to_string())),
        };

        let status = response.status();
        let text = read_reply_body(response.into_reader())?;

        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        log::info!("Reply {} ({} bytes)", status, text.len());
        Ok(TransportReply { status, body: text })
    }
}

/// Read at most `MAX_REPLY_BYTES` of a reply.
///
/// Invalid UTF-8 is replaced rather than rejected: a reply did arrive, and
/// classifying it is up to the response parser.
fn read_reply_body(reader: impl Read) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader.take(MAX_REPLY_BYTES).read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
