// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keeps the overlay canvas in step with the selection and the response.
//!
//! Every change to the selected media or the server response schedules one
//! decode of the current image. Decodes run off the UI thread and report
//! back over a channel; each request carries a ticket, and only the
//! completion for the most recent ticket is allowed to reach the canvas.

use super::renderer::AnnotationRenderer;
use super::surface::{DisplayList, Surface};
use crate::io::media::{decode_image, DecodedImage};
use crate::models::annotation::Annotation;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// What to draw for the current state.
#[derive(Debug, Clone)]
pub struct RenderInput {
    pub bytes: Arc<[u8]>,
    pub annotations: Vec<Annotation>,
}

/// A decode job handed to an [`ImageDecoder`].
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub ticket: u64,
    pub bytes: Arc<[u8]>,
}

/// Result of a decode job.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub ticket: u64,
    pub result: Result<DecodedImage, String>,
}

/// Runs decode jobs and delivers their outcome on `reply`.
pub trait ImageDecoder {
    fn submit(&self, request: DecodeRequest, reply: Sender<DecodeOutcome>);
}

/// Decodes each request on its own background thread.
#[derive(Debug, Default)]
pub struct ThreadDecoder;

impl ImageDecoder for ThreadDecoder {
    fn submit(&self, request: DecodeRequest, reply: Sender<DecodeOutcome>) {
        std::thread::spawn(move || {
            let result = decode_image(&request.bytes).map_err(|e| format!("{:#}", e));
            // The scheduler may already be gone when the window closes.
            let _ = reply.send(DecodeOutcome {
                ticket: request.ticket,
                result,
            });
        });
    }
}

/// The image currently shown on the canvas.
#[derive(Debug)]
pub struct RenderedFrame {
    pub ticket: u64,
    pub image: DecodedImage,
}

pub struct RenderScheduler {
    decoder: Box<dyn ImageDecoder>,
    renderer: AnnotationRenderer,
    canvas: DisplayList,
    frame: Option<RenderedFrame>,
    latest_ticket: u64,
    pending: Option<(u64, Vec<Annotation>)>,
    media: Option<Arc<[u8]>>,
    sender: Sender<DecodeOutcome>,
    receiver: Receiver<DecodeOutcome>,
    last_error: Option<String>,
}

impl RenderScheduler {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        renderer: AnnotationRenderer,
        canvas: DisplayList,
    ) -> Self {
        let (sender, receiver) = channel();
        Self {
            decoder,
            renderer,
            canvas,
            frame: None,
            latest_ticket: 0,
            pending: None,
            media: None,
            sender,
            receiver,
            last_error: None,
        }
    }

    /// React to a change of selection, response or media kind.
    ///
    /// `None` means there is nothing to overlay (no media, or video): the
    /// canvas is cleared and any decode still running is superseded. New
    /// media also clears the canvas at once, so the previous file's overlay
    /// is never shown while the new one decodes.
    pub fn schedule(&mut self, input: Option<RenderInput>) {
        self.latest_ticket += 1;
        let ticket = self.latest_ticket;
        self.last_error = None;

        match input {
            Some(input) => {
                let same_media = self
                    .media
                    .as_ref()
                    .is_some_and(|media| Arc::ptr_eq(media, &input.bytes));
                if !same_media {
                    self.frame = None;
                    self.canvas.clear();
                    self.media = Some(Arc::clone(&input.bytes));
                }

                log::debug!(
                    "Scheduling decode #{} with {} annotations",
                    ticket,
                    input.annotations.len()
                );
                self.pending = Some((ticket, input.annotations));
                self.decoder.submit(
                    DecodeRequest {
                        ticket,
                        bytes: input.bytes,
                    },
                    self.sender.clone(),
                );
            }
            None => {
                self.pending = None;
                self.media = None;
                self.frame = None;
                self.canvas.clear();
            }
        }
    }

    /// Apply finished decodes. Returns true when the canvas changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.receiver.try_recv() {
            changed |= self.complete(outcome);
        }
        changed
    }

    fn complete(&mut self, outcome: DecodeOutcome) -> bool {
        if outcome.ticket != self.latest_ticket {
            log::debug!(
                "Discarding stale decode #{} (latest is #{})",
                outcome.ticket,
                self.latest_ticket
            );
            return false;
        }
        let annotations = match self.pending.take() {
            Some((ticket, annotations)) if ticket == outcome.ticket => annotations,
            _ => return false,
        };

        match outcome.result {
            Ok(image) => {
                self.renderer
                    .render(&mut self.canvas, image.size(), &annotations);
                log::info!(
                    "Rendered {}x{} image with {} annotations",
                    image.width,
                    image.height,
                    annotations.len()
                );
                self.frame = Some(RenderedFrame {
                    ticket: outcome.ticket,
                    image,
                });
            }
            Err(e) => {
                log::error!("Failed to decode image for preview: {}", e);
                self.canvas.clear();
                self.frame = None;
                self.last_error = Some(e);
            }
        }
        true
    }

    pub fn canvas(&self) -> &DisplayList {
        &self.canvas
    }

    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.frame.as_ref()
    }

    /// True while the latest decode has not completed.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::encode_png;
    use crate::render::surface::DrawCommand;
    use egui::{pos2, vec2, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    /// Holds requests until the test decides when (and in what order) they finish.
    #[derive(Clone, Default)]
    struct ManualDecoder {
        queued: Rc<RefCell<Vec<(DecodeRequest, Sender<DecodeOutcome>)>>>,
    }

    impl ManualDecoder {
        fn submitted(&self) -> usize {
            self.queued.borrow().len()
        }

        fn finish(&self, ticket: u64, size: (u32, u32)) {
            let queued = self.queued.borrow();
            let (request, reply) = queued
                .iter()
                .find(|(request, _)| request.ticket == ticket)
                .expect("no such request");
            reply
                .send(DecodeOutcome {
                    ticket: request.ticket,
                    result: Ok(DecodedImage {
                        width: size.0,
                        height: size.1,
                        pixels: vec![0; (size.0 * size.1 * 4) as usize],
                    }),
                })
                .unwrap();
        }

        fn fail(&self, ticket: u64) {
            let queued = self.queued.borrow();
            let (_, reply) = queued
                .iter()
                .find(|(request, _)| request.ticket == ticket)
                .expect("no such request");
            reply
                .send(DecodeOutcome {
                    ticket,
                    result: Err("corrupt".to_string()),
                })
                .unwrap();
        }
    }

    impl ImageDecoder for ManualDecoder {
        fn submit(&self, request: DecodeRequest, reply: Sender<DecodeOutcome>) {
            self.queued.borrow_mut().push((request, reply));
        }
    }

    fn scheduler(decoder: impl ImageDecoder + 'static) -> RenderScheduler {
        RenderScheduler::new(
            Box::new(decoder),
            AnnotationRenderer::default(),
            DisplayList::new(vec2(750.0, 375.0)),
        )
    }

    fn input(annotations: Vec<Annotation>) -> Option<RenderInput> {
        Some(RenderInput {
            bytes: Arc::from(&b"image"[..]),
            annotations,
        })
    }

    #[test]
    fn test_one_decode_and_one_render_per_change() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());

        scheduler.schedule(input(vec![Annotation::new(10.0, 10.0, 50.0, 40.0, "hand")]));
        assert_eq!(decoder.submitted(), 1);
        assert!(scheduler.is_busy());
        assert!(!scheduler.poll());

        decoder.finish(1, (100, 100));
        assert!(scheduler.poll());
        assert!(!scheduler.is_busy());
        assert_eq!(scheduler.frame().unwrap().ticket, 1);
        assert_eq!(
            scheduler.canvas().rects().collect::<Vec<_>>(),
            vec![Rect::from_min_max(pos2(225.0, 37.5), pos2(375.0, 150.0))]
        );
    }

    #[test]
    fn test_stale_decode_is_discarded() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());

        scheduler.schedule(input(vec![Annotation::new(0.0, 0.0, 10.0, 10.0, "old")]));
        scheduler.schedule(input(vec![Annotation::new(10.0, 10.0, 50.0, 40.0, "new")]));

        decoder.finish(2, (100, 100));
        assert!(scheduler.poll());
        let after_latest = scheduler.canvas().commands().to_vec();

        decoder.finish(1, (200, 100));
        assert!(!scheduler.poll());

        assert_eq!(scheduler.canvas().commands(), after_latest.as_slice());
        assert_eq!(scheduler.frame().unwrap().ticket, 2);
        assert!(scheduler.canvas().commands().iter().any(
            |command| matches!(command, DrawCommand::Label { text, .. } if text == "new")
        ));
    }

    #[test]
    fn test_earlier_decode_completing_first_is_discarded() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());

        scheduler.schedule(input(vec![]));
        scheduler.schedule(input(vec![Annotation::new(1.0, 1.0, 2.0, 2.0, "latest")]));

        decoder.finish(1, (100, 100));
        assert!(!scheduler.poll());
        assert!(scheduler.canvas().is_empty());
        assert!(scheduler.is_busy());

        decoder.finish(2, (100, 100));
        assert!(scheduler.poll());
        assert_eq!(scheduler.canvas().rects().count(), 1);
    }

    #[test]
    fn test_nothing_to_draw_clears_and_supersedes() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());

        scheduler.schedule(input(vec![Annotation::new(1.0, 1.0, 2.0, 2.0, "a")]));
        decoder.finish(1, (100, 100));
        scheduler.poll();
        assert!(!scheduler.canvas().is_empty());

        scheduler.schedule(input(vec![]));
        scheduler.schedule(None);
        assert!(scheduler.canvas().is_empty());
        assert!(scheduler.frame().is_none());
        assert!(!scheduler.is_busy());

        decoder.finish(2, (100, 100));
        assert!(!scheduler.poll());
        assert!(scheduler.canvas().is_empty());
        assert_eq!(decoder.submitted(), 2);
    }

    #[test]
    fn test_new_media_clears_previous_overlay_immediately() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());
        let first = input(vec![Annotation::new(1.0, 1.0, 2.0, 2.0, "first")]).unwrap();

        scheduler.schedule(Some(first.clone()));
        decoder.finish(1, (100, 100));
        scheduler.poll();

        // Same bytes with a new response keeps the preview until the redraw.
        scheduler.schedule(Some(RenderInput {
            bytes: Arc::clone(&first.bytes),
            annotations: vec![],
        }));
        assert!(!scheduler.canvas().is_empty());
        assert!(scheduler.frame().is_some());

        scheduler.schedule(input(vec![]));
        assert!(scheduler.canvas().is_empty());
        assert!(scheduler.frame().is_none());
    }

    #[test]
    fn test_failed_decode_clears_canvas() {
        let decoder = ManualDecoder::default();
        let mut scheduler = scheduler(decoder.clone());

        scheduler.schedule(input(vec![]));
        decoder.finish(1, (100, 100));
        scheduler.poll();

        scheduler.schedule(input(vec![]));
        decoder.fail(2);
        assert!(scheduler.poll());
        assert!(scheduler.canvas().is_empty());
        assert!(scheduler.frame().is_none());
        assert_eq!(scheduler.last_error(), Some("corrupt"));
    }

    #[test]
    fn test_thread_decoder_renders_real_image() {
        let mut scheduler = scheduler(ThreadDecoder);
        scheduler.schedule(Some(RenderInput {
            bytes: encode_png(200, 100).into(),
            annotations: vec![Annotation::new(10.0, 10.0, 50.0, 40.0, "hand")],
        }));

        let deadline = Instant::now() + Duration::from_secs(10);
        while !scheduler.poll() {
            assert!(Instant::now() < deadline, "decode did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(scheduler.frame().unwrap().image.size(), (200, 100));
        assert_eq!(
            scheduler.canvas().rects().collect::<Vec<_>>(),
            vec![Rect::from_min_max(pos2(37.5, 37.5), pos2(187.5, 150.0))]
        );
    }
}
