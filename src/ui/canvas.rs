// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas.
//!
//! Replays the recorded overlay onto an egui painter. The canvas has a fixed
//! size; draw commands are in canvas-local coordinates and are shifted to
//! wherever egui places the canvas this frame.

use crate::models::media::{MediaKind, SelectedMedia};
use crate::render::surface::{DisplayList, DrawCommand, Surface};

/// Display the preview for the current selection.
pub fn show(
    ui: &mut egui::Ui,
    selected: Option<&SelectedMedia>,
    canvas: &DisplayList,
    texture: Option<&egui::TextureHandle>,
    decoding: bool,
) {
    let (response, painter) = ui.allocate_painter(canvas.size(), egui::Sense::hover());
    let area = response.rect;
    painter.rect_filled(area, 0.0, egui::Color32::from_gray(40));

    let Some(media) = selected else {
        placeholder(&painter, area, "Choose an image or video to begin");
        return;
    };

    if media.kind == MediaKind::Video {
        placeholder(
            &painter,
            area,
            &format!("{} (video preview is not available)", media.name),
        );
        return;
    }

    if decoding && canvas.is_empty() {
        placeholder(&painter, area, "Loading preview...");
        return;
    }

    replay(&painter, area.min.to_vec2(), canvas, texture);
}

fn replay(
    painter: &egui::Painter,
    origin: egui::Vec2,
    canvas: &DisplayList,
    texture: Option<&egui::TextureHandle>,
) {
    for command in canvas.commands() {
        match command {
            DrawCommand::Image { rect } => {
                if let Some(texture) = texture {
                    painter.image(
                        texture.id(),
                        rect.translate(origin),
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            }
            DrawCommand::Rect { rect, stroke } => {
                painter.rect_stroke(rect.translate(origin), 0.0, *stroke);
            }
            DrawCommand::Label {
                anchor,
                text,
                color,
                size,
            } => {
                painter.text(
                    *anchor + origin,
                    egui::Align2::LEFT_BOTTOM,
                    text,
                    egui::FontId::proportional(*size),
                    *color,
                );
            }
        }
    }
}

fn placeholder(painter: &egui::Painter, area: egui::Rect, message: &str) {
    painter.text(
        area.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(180),
    );
}
