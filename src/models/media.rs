// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media selection state.
//!
//! Holds the single file the user has picked, together with its declared
//! content type and whether it is treated as an image or a video.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Broad kind of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a declared content type.
    ///
    /// Anything that does not start with `image` is treated as video.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

/// A file picked by the user, before it becomes the current selection.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// The currently selected media.
///
/// The bytes are shared so upload and decode workers can hold them without
/// copying.
#[derive(Debug, Clone)]
pub struct SelectedMedia {
    pub name: String,
    pub mime: String,
    pub kind: MediaKind,
    pub bytes: Arc<[u8]>,
}

impl From<MediaFile> for SelectedMedia {
    fn from(file: MediaFile) -> Self {
        Self {
            kind: MediaKind::from_mime(&file.mime),
            name: file.name,
            mime: file.mime,
            bytes: file.bytes.into(),
        }
    }
}

/// Holder for at most one selected media file.
#[derive(Debug, Default)]
pub struct MediaSelection {
    current: Option<SelectedMedia>,
}

impl MediaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `file`.
    ///
    /// Fails without touching the current selection when no file is given.
    pub fn select(&mut self, file: Option<MediaFile>) -> Result<&SelectedMedia, InputError> {
        let file = file.ok_or(InputError::NoFileGiven)?;
        let media = SelectedMedia::from(file);
        log::info!(
            "Selected {} ({}, {:?}, {} bytes)",
            media.name,
            media.mime,
            media.kind,
            media.bytes.len()
        );
        Ok(self.current.insert(media))
    }

    /// Drop the current selection, if any.
    pub fn clear(&mut self) {
        if let Some(media) = self.current.take() {
            log::info!("Cleared selection {}", media.name);
        }
    }

    pub fn current(&self) -> Option<&SelectedMedia> {
        self.current.as_ref()
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.current.as_ref().map(|media| media.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> MediaFile {
        MediaFile {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_classify_by_mime_prefix() {
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("application/octet-stream"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime(""), MediaKind::Video);
    }

    #[test]
    fn test_select_without_file_keeps_previous() {
        let mut selection = MediaSelection::new();
        selection.select(Some(file("hand.png", "image/png"))).unwrap();

        let err = selection.select(None).unwrap_err();
        assert_eq!(err, InputError::NoFileGiven);
        assert_eq!(selection.current().unwrap().name, "hand.png");
    }

    #[test]
    fn test_select_replaces_and_clear_releases() {
        let mut selection = MediaSelection::new();
        selection.select(Some(file("hand.png", "image/png"))).unwrap();
        let media = selection.select(Some(file("clip.mp4", "video/mp4"))).unwrap();
        assert_eq!(media.kind, MediaKind::Video);
        assert_eq!(selection.kind(), Some(MediaKind::Video));

        selection.clear();
        assert!(selection.current().is_none());
        assert_eq!(selection.kind(), None);
    }

    #[test]
    fn test_media_kind_wire_names() {
        let kind: MediaKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, MediaKind::Image);
        assert_eq!(serde_json::to_string(&MediaKind::Video).unwrap(), "\"video\"");
    }
}
