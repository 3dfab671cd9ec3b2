// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the upload controller to the render scheduler and
//! lays out the window: toolbar, preview canvas and result panel.

use crate::config::AppConfig;
use crate::error::InputError;
use crate::io::media::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::models::media::MediaFile;
use crate::io::transport::HttpTransport;
use crate::render::renderer::AnnotationRenderer;
use crate::render::scheduler::{RenderScheduler, ThreadDecoder};
use crate::render::surface::DisplayList;
use crate::ui::toolbar::ToolbarAction;
use crate::ui::{canvas, status, toolbar};
use crate::upload::{ControllerEvent, UploadController};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Main application state.
pub struct SignLensApp {
    /// Selection and upload lifecycle
    controller: UploadController,

    /// Change notifications from the controller
    events: Receiver<ControllerEvent>,

    /// Keeps the overlay in step with the controller
    scheduler: RenderScheduler,

    /// Texture for the decoded preview, tagged with the decode ticket it came from
    texture: Option<(u64, egui::TextureHandle)>,

    /// Message shown in a modal prompt until dismissed
    prompt: Option<String>,
}

impl SignLensApp {
    /// Create the application from loaded configuration.
    pub fn new(config: &AppConfig) -> Self {
        let transport = HttpTransport::new(config.endpoint.clone(), config.timeout);
        let mut controller = UploadController::new(Arc::new(transport));
        let events = controller.subscribe();
        let scheduler = RenderScheduler::new(
            Box::new(ThreadDecoder),
            AnnotationRenderer::new(config.overlay),
            DisplayList::new(config.canvas_size),
        );
        log::info!("Uploading to {}", config.endpoint);

        Self {
            controller,
            events,
            scheduler,
            texture: None,
            prompt: None,
        }
    }

    /// Let the user pick a file and make it the current selection.
    fn choose_media(&mut self) {
        let mut all = IMAGE_EXTENSIONS.to_vec();
        all.extend_from_slice(VIDEO_EXTENSIONS);

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Media", &all)
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("Videos", VIDEO_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match crate::io::media::read_media_file(&path) {
            Ok(file) => self.select_file(file),
            Err(e) => {
                log::error!("{:#}", e);
                self.prompt = Some(format!("{:#}", e));
            }
        }
    }

    fn select_file(&mut self, file: MediaFile) {
        if let Err(e) = self.controller.select(Some(file)) {
            self.prompt = Some(e.to_string());
        }
    }

    fn upload(&mut self) {
        match self.controller.upload() {
            Ok(()) => {}
            Err(e @ InputError::NoMediaSelected) => self.prompt = Some(e.to_string()),
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Run a toolbar action and bring the preview in line with it before
    /// anything is painted.
    fn handle_action(&mut self, action: ToolbarAction, ctx: &egui::Context) {
        match action {
            ToolbarAction::ChooseMedia => self.choose_media(),
            ToolbarAction::Upload => self.upload(),
            ToolbarAction::RemoveFile => self.controller.clear(),
            ToolbarAction::None => return,
        }
        self.sync(ctx);
    }

    /// Drain controller and decoder completions.
    fn sync(&mut self, ctx: &egui::Context) {
        self.controller.poll();

        if self.events.try_iter().count() > 0 {
            self.scheduler.schedule(self.controller.render_input());
        }

        self.scheduler.poll();

        let shown = self.texture.as_ref().map(|(ticket, _)| *ticket);
        match self.scheduler.frame() {
            Some(frame) if shown == Some(frame.ticket) => {}
            Some(frame) => {
                let size = [frame.image.width as usize, frame.image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.image.pixels);
                let texture = ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR);
                self.texture = Some((frame.ticket, texture));
            }
            None => self.texture = None,
        }
    }
}

impl eframe::App for SignLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync(ctx);

        // Keep polling while background work is outstanding
        if self.controller.is_uploading() || self.scheduler.is_busy() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.heading("Sign Language Converter");
            let action = toolbar::show(
                ui,
                self.controller.selected().is_some(),
                self.controller.is_uploading(),
            );
            self.handle_action(action, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(media) = self.controller.selected() {
                ui.label(format!("Selected file: {}", media.name));
            }
            canvas::show(
                ui,
                self.controller.selected(),
                self.scheduler.canvas(),
                self.texture.as_ref().map(|(_, texture)| texture),
                self.scheduler.is_busy(),
            );
            if let Some(error) = self.scheduler.last_error() {
                ui.colored_label(egui::Color32::YELLOW, format!("Preview unavailable: {}", error));
            }
            ui.separator();
            status::show(ui, self.controller.state());
        });

        if let Some(message) = self.prompt.clone() {
            egui::Window::new("Sign Language Converter")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        self.prompt = None;
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::encode_png;
    use std::time::{Duration, Instant};

    fn png(name: &str) -> MediaFile {
        MediaFile {
            name: name.to_string(),
            mime: "image/png".to_string(),
            bytes: encode_png(8, 4),
        }
    }

    /// Sync until the decoded preview is on screen.
    fn wait_for_preview(app: &mut SignLensApp, ctx: &egui::Context) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.texture.is_none() {
            assert!(Instant::now() < deadline, "preview never decoded");
            std::thread::sleep(Duration::from_millis(5));
            app.sync(ctx);
        }
    }

    fn showing(name: &str, ctx: &egui::Context) -> SignLensApp {
        let mut app = SignLensApp::new(&AppConfig::default());
        app.select_file(png(name));
        app.sync(ctx);
        wait_for_preview(&mut app, ctx);
        assert!(!app.scheduler.canvas().is_empty());
        app
    }

    #[test]
    fn test_remove_clears_preview_before_paint() {
        let ctx = egui::Context::default();
        let mut app = showing("first.png", &ctx);

        app.handle_action(ToolbarAction::RemoveFile, &ctx);

        assert!(app.controller.selected().is_none());
        assert!(app.scheduler.canvas().is_empty());
        assert!(app.texture.is_none());
    }

    #[test]
    fn test_new_selection_drops_old_preview_before_paint() {
        let ctx = egui::Context::default();
        let mut app = showing("first.png", &ctx);
        let old = app.texture.as_ref().map(|(ticket, _)| *ticket);

        app.select_file(png("second.png"));
        app.sync(&ctx);

        // Either nothing yet, or the new image already decoded; never the old one.
        assert_eq!(app.controller.selected().unwrap().name, "second.png");
        assert_ne!(app.texture.as_ref().map(|(ticket, _)| *ticket), old);
        match app.scheduler.frame() {
            Some(frame) => assert_ne!(Some(frame.ticket), old),
            None => assert!(app.scheduler.canvas().is_empty()),
        }

        wait_for_preview(&mut app, &ctx);
        assert!(!app.scheduler.canvas().is_empty());
    }

    #[test]
    fn test_no_action_leaves_preview_alone() {
        let ctx = egui::Context::default();
        let mut app = showing("first.png", &ctx);

        app.handle_action(ToolbarAction::None, &ctx);

        assert!(!app.scheduler.canvas().is_empty());
        assert!(app.texture.is_some());
    }
}
