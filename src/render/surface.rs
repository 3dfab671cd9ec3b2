// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing surfaces.
//!
//! The renderer never talks to egui directly. It draws onto a [`Surface`],
//! and the production surface is a [`DisplayList`] that records every call
//! so the canvas widget can replay it each frame.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Something the annotation renderer can draw onto.
pub trait Surface {
    /// Drawable size in points.
    fn size(&self) -> Vec2;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Draw the decoded base image stretched into `rect`.
    fn draw_image(&mut self, rect: Rect);

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke);

    /// Draw text whose bottom-left corner sits at `anchor`.
    fn draw_label(&mut self, anchor: Pos2, text: &str, color: Color32, size: f32);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image { rect: Rect },
    Rect { rect: Rect, stroke: Stroke },
    Label {
        anchor: Pos2,
        text: String,
        color: Color32,
        size: f32,
    },
}

/// A fixed-size surface that records draw calls in order.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Outlines drawn so far, in drawing order.
    #[cfg(test)]
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Rect { rect, .. } => Some(*rect),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw_image(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Image { rect });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.commands.push(DrawCommand::Rect { rect, stroke });
    }

    fn draw_label(&mut self, anchor: Pos2, text: &str, color: Color32, size: f32) {
        self.commands.push(DrawCommand::Label {
            anchor,
            text: text.to_string(),
            color,
            size,
        });
    }
}
