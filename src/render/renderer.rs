// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation overlay renderer.
//!
//! Draws a decoded image letterboxed onto a surface and outlines every
//! detection on top of it. The output depends only on the inputs, so the
//! same image size, canvas and annotations always produce the same calls.

use super::surface::Surface;
use crate::models::annotation::Annotation;
use crate::util::geometry::ViewportGeometry;
use egui::{vec2, Color32, Stroke};

/// Distance between a box's top edge and the baseline of its label.
const LABEL_GAP: f32 = 5.0;

/// Fixed appearance of boxes and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub stroke: Stroke,
    pub label_color: Color32,
    pub label_size: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::new(2.0, Color32::RED),
            label_color: Color32::RED,
            label_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationRenderer {
    style: OverlayStyle,
}

impl AnnotationRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Clear `surface`, then draw the base image and its annotations.
    ///
    /// An image with a zero dimension leaves the surface blank and returns
    /// `None`.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        image_size: (u32, u32),
        annotations: &[Annotation],
    ) -> Option<ViewportGeometry> {
        surface.clear();

        let Some(geometry) = ViewportGeometry::letterbox(image_size, surface.size()) else {
            log::warn!(
                "Skipping render of zero-sized image ({}x{})",
                image_size.0,
                image_size.1
            );
            return None;
        };

        surface.draw_image(geometry.image_rect(image_size));

        for annotation in annotations {
            let rect = geometry.box_rect(annotation);
            surface.stroke_rect(rect, self.style.stroke);
            surface.draw_label(
                rect.min - vec2(0.0, LABEL_GAP),
                &annotation.label,
                self.style.label_color,
                self.style.label_size,
            );
        }

        Some(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{DisplayList, DrawCommand};
    use egui::{pos2, Rect};

    fn canvas() -> DisplayList {
        DisplayList::new(vec2(750.0, 375.0))
    }

    #[test]
    fn test_draw_order_and_coordinates() {
        let mut surface = canvas();
        let renderer = AnnotationRenderer::default();
        let annotations = vec![
            Annotation::new(10.0, 10.0, 50.0, 40.0, "hand"),
            Annotation::new(0.0, 0.0, 100.0, 100.0, "frame"),
        ];

        let geometry = renderer.render(&mut surface, (100, 100), &annotations).unwrap();
        assert_eq!(geometry.x_offset, 187.5);

        let stroke = Stroke::new(2.0, Color32::RED);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Image {
                    rect: Rect::from_min_max(pos2(187.5, 0.0), pos2(562.5, 375.0)),
                },
                DrawCommand::Rect {
                    rect: Rect::from_min_max(pos2(225.0, 37.5), pos2(375.0, 150.0)),
                    stroke,
                },
                DrawCommand::Label {
                    anchor: pos2(225.0, 32.5),
                    text: "hand".to_string(),
                    color: Color32::RED,
                    size: 16.0,
                },
                DrawCommand::Rect {
                    rect: Rect::from_min_max(pos2(187.5, 0.0), pos2(562.5, 375.0)),
                    stroke,
                },
                DrawCommand::Label {
                    anchor: pos2(187.5, -5.0),
                    text: "frame".to_string(),
                    color: Color32::RED,
                    size: 16.0,
                },
            ]
        );
    }

    #[test]
    fn test_render_is_deterministic_and_replaces_previous_output() {
        let renderer = AnnotationRenderer::default();
        let annotations = vec![Annotation::new(5.0, 5.0, 20.0, 30.0, "B")];

        let mut surface = canvas();
        renderer.render(&mut surface, (200, 100), &annotations);
        let first = surface.commands().to_vec();
        renderer.render(&mut surface, (200, 100), &annotations);

        assert_eq!(surface.commands(), first.as_slice());
        assert_eq!(surface.commands().len(), 3);
    }

    #[test]
    fn test_zero_sized_image_clears_and_skips() {
        let renderer = AnnotationRenderer::default();
        let mut surface = canvas();
        renderer.render(&mut surface, (100, 100), &[]);
        assert!(!surface.is_empty());

        let annotations = vec![Annotation::new(1.0, 1.0, 2.0, 2.0, "x")];
        assert!(renderer.render(&mut surface, (0, 50), &annotations).is_none());
        assert!(surface.is_empty());
    }

    #[test]
    fn test_custom_style_is_applied() {
        let style = OverlayStyle {
            stroke: Stroke::new(4.0, Color32::GREEN),
            label_color: Color32::WHITE,
            label_size: 12.0,
        };
        let mut surface = canvas();
        AnnotationRenderer::new(style).render(
            &mut surface,
            (200, 100),
            &[Annotation::new(0.0, 0.0, 10.0, 10.0, "C")],
        );

        assert!(matches!(
            &surface.commands()[1],
            DrawCommand::Rect { stroke, .. } if *stroke == Stroke::new(4.0, Color32::GREEN)
        ));
        assert!(matches!(
            &surface.commands()[2],
            DrawCommand::Label { color, size, .. } if *color == Color32::WHITE && *size == 12.0
        ));
    }
}
