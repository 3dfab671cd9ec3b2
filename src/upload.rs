// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload lifecycle.
//!
//! The controller owns the media selection and the last server response and
//! moves between them as a small state machine:
//!
//! ```text
//! Idle --select--> Selected --upload--> Uploading --> Succeeded | Failed
//! any  --select--> Selected      any --clear--> Idle
//! ```
//!
//! Requests run on a worker thread and report back over a channel that the
//! UI loop drains with [`UploadController::poll`]. Observers learn about
//! changes through [`UploadController::subscribe`].

use crate::error::{InputError, UploadError};
use crate::io::transport::{CancelToken, Transport, TransportError, TransportReply};
use crate::models::annotation::Annotation;
use crate::models::media::{MediaFile, MediaKind, MediaSelection, SelectedMedia};
use crate::models::response::ServerResponse;
use crate::render::scheduler::RenderInput;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

/// Where the current upload stands.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    Selected,
    Uploading,
    Succeeded(ServerResponse),
    Failed(UploadError),
}

/// Change notifications for observers of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Media was picked, replaced or removed
    SelectionChanged,
    /// A request was sent; any previous response is gone
    UploadStarted,
    /// The running request finished with a response or an error
    ResponseChanged,
}

type AttemptResult = Result<TransportReply, TransportError>;

/// The request currently in flight.
struct Attempt {
    id: u64,
    cancel: CancelToken,
    receiver: Receiver<AttemptResult>,
}

pub struct UploadController {
    transport: Arc<dyn Transport>,
    selection: MediaSelection,
    state: UploadState,
    attempt: Option<Attempt>,
    attempts_started: u64,
    subscribers: Vec<Sender<ControllerEvent>>,
}

impl UploadController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            selection: MediaSelection::new(),
            state: UploadState::Idle,
            attempt: None,
            attempts_started: 0,
            subscribers: Vec::new(),
        }
    }

    /// Register for change notifications.
    pub fn subscribe(&mut self) -> Receiver<ControllerEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Make `file` the current media.
    ///
    /// Drops any previous response and abandons a running upload. Nothing
    /// changes when no file is given.
    pub fn select(&mut self, file: Option<MediaFile>) -> Result<(), InputError> {
        self.selection.select(file)?;
        self.abandon_attempt();
        self.state = UploadState::Selected;
        self.notify(ControllerEvent::SelectionChanged);
        Ok(())
    }

    /// Remove the current media and everything derived from it.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.abandon_attempt();
        self.state = UploadState::Idle;
        self.notify(ControllerEvent::SelectionChanged);
    }

    /// Send the selected media to the service.
    ///
    /// Rejected without side effects when nothing is selected or a request
    /// is already running.
    pub fn upload(&mut self) -> Result<(), InputError> {
        if self.attempt.is_some() {
            log::warn!("Ignoring upload request: an upload is already in progress");
            return Err(InputError::UploadInProgress);
        }
        let media = self
            .selection
            .current()
            .cloned()
            .ok_or(InputError::NoMediaSelected)?;

        self.attempts_started += 1;
        let id = self.attempts_started;
        let cancel = CancelToken::new();
        let (sender, receiver) = channel();

        let transport = Arc::clone(&self.transport);
        let token = cancel.clone();
        std::thread::spawn(move || {
            let result = transport.post_media(&media, &token);
            // A dropped receiver means the attempt was abandoned.
            let _ = sender.send(result);
        });

        log::info!("Started upload #{}", id);
        self.attempt = Some(Attempt {
            id,
            cancel,
            receiver,
        });
        self.state = UploadState::Uploading;
        self.notify(ControllerEvent::UploadStarted);
        Ok(())
    }

    /// Apply the result of the running upload if it has finished.
    ///
    /// Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(attempt) = &self.attempt else {
            return false;
        };
        let result = match attempt.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(TransportError::Request(
                "upload worker exited without a reply".to_string(),
            )),
        };
        let id = attempt.id;
        self.attempt = None;
        self.finish(id, result);
        true
    }

    fn finish(&mut self, id: u64, result: AttemptResult) {
        let outcome = match result {
            Ok(reply) => ServerResponse::from_reply(reply.status, &reply.body),
            Err(e) => Err(UploadError::Network {
                detail: e.to_string(),
            }),
        };

        self.state = match outcome {
            Ok(response) => {
                log::info!(
                    "Upload #{} succeeded: {:?} with {} annotations",
                    id,
                    response.media_type,
                    response.annotations.len()
                );
                UploadState::Succeeded(response)
            }
            Err(e) => {
                match &e {
                    UploadError::Network { detail } | UploadError::MalformedResponse { detail } => {
                        log::error!("Upload #{} failed: {} ({})", id, e, detail)
                    }
                    UploadError::Server(_) => log::error!("Upload #{} rejected: {}", id, e),
                }
                UploadState::Failed(e)
            }
        };
        self.notify(ControllerEvent::ResponseChanged);
    }

    fn abandon_attempt(&mut self) {
        if let Some(attempt) = self.attempt.take() {
            attempt.cancel.cancel();
            log::info!("Abandoned upload #{}", attempt.id);
        }
    }

    fn notify(&mut self, event: ControllerEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event).is_ok());
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn selected(&self) -> Option<&SelectedMedia> {
        self.selection.current()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading)
    }

    pub fn response(&self) -> Option<&ServerResponse> {
        match &self.state {
            UploadState::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&UploadError> {
        match &self.state {
            UploadState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Annotations that belong on the current preview.
    pub fn annotations(&self) -> &[Annotation] {
        self.response()
            .map(ServerResponse::drawable_annotations)
            .unwrap_or(&[])
    }

    /// What the render scheduler should draw, or `None` for no overlay.
    pub fn render_input(&self) -> Option<RenderInput> {
        if self.selection.kind() != Some(MediaKind::Image) {
            return None;
        }
        let media = self.selection.current()?;
        Some(RenderInput {
            bytes: Arc::clone(&media.bytes),
            annotations: self.annotations().to_vec(),
        })
    }
}
