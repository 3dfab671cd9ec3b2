// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps source-image pixel coordinates onto a letterboxed
//! canvas: the image is scaled uniformly to fit and centered, leaving
//! margins on one axis.

use crate::models::annotation::Annotation;
use egui::{pos2, vec2, Rect, Vec2};

/// Uniform scale and centering offsets for one image on one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl ViewportGeometry {
    /// Fit an image of `image_size` pixels into `canvas`, preserving aspect ratio.
    ///
    /// Returns `None` when either image dimension is zero.
    pub fn letterbox(image_size: (u32, u32), canvas: Vec2) -> Option<Self> {
        let (width, height) = image_size;
        if width == 0 || height == 0 {
            return None;
        }
        let (width, height) = (width as f32, height as f32);
        let scale = (canvas.x / width).min(canvas.y / height);

        Some(Self {
            scale,
            x_offset: (canvas.x - width * scale) / 2.0,
            y_offset: (canvas.y - height * scale) / 2.0,
        })
    }

    /// Map a point in image pixels to canvas coordinates.
    pub fn to_canvas(&self, x: f32, y: f32) -> egui::Pos2 {
        pos2(self.x_offset + x * self.scale, self.y_offset + y * self.scale)
    }

    /// Canvas rectangle covered by the whole scaled image.
    pub fn image_rect(&self, image_size: (u32, u32)) -> Rect {
        Rect::from_min_size(
            pos2(self.x_offset, self.y_offset),
            vec2(image_size.0 as f32, image_size.1 as f32) * self.scale,
        )
    }

    /// Canvas rectangle for a bounding box. Not clamped to the image.
    pub fn box_rect(&self, annotation: &Annotation) -> Rect {
        Rect::from_min_max(
            self.to_canvas(annotation.xmin, annotation.ymin),
            self.to_canvas(annotation.xmax, annotation.ymax),
        )
    }
}
