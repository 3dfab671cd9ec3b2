// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional YAML file named by `SIGNLENS_CONFIG`,
//! then environment overrides, then validation. Every file field is
//! optional.

use crate::render::renderer::OverlayStyle;
use anyhow::{anyhow, Context, Result};
use egui::{vec2, Color32, Stroke, Vec2};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000/backend/upload/";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CANVAS_WIDTH: f32 = 750.0;
const DEFAULT_CANVAS_HEIGHT: f32 = 375.0;
const DEFAULT_STROKE_WIDTH: f32 = 2.0;
const DEFAULT_LABEL_SIZE: f32 = 16.0;
const DEFAULT_BOX_COLOR: [u8; 3] = [255, 0, 0];

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    canvas: Option<CanvasFile>,
    overlay: Option<OverlayFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CanvasFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OverlayFile {
    stroke_width: Option<f32>,
    box_color: Option<[u8; 3]>,
    label_color: Option<[u8; 3]>,
    label_size: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upload endpoint of the inference service
    pub endpoint: String,
    /// Limit for a whole upload request
    pub timeout: Duration,
    /// Size of the preview canvas in points
    pub canvas_size: Vec2,
    pub overlay: OverlayStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let file = match std::env::var("SIGNLENS_CONFIG").ok() {
            Some(path) => read_config_file(Path::new(&path))?,
            None => ConfigFile::default(),
        };
        let mut cfg = Self::from_file(file);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ConfigFile) -> Self {
        let canvas = file.canvas.unwrap_or_default();
        let overlay = file.overlay.unwrap_or_default();
        let box_color = overlay.box_color.unwrap_or(DEFAULT_BOX_COLOR);
        let label_color = overlay.label_color.unwrap_or(box_color);

        Self {
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            canvas_size: vec2(
                canvas.width.unwrap_or(DEFAULT_CANVAS_WIDTH),
                canvas.height.unwrap_or(DEFAULT_CANVAS_HEIGHT),
            ),
            overlay: OverlayStyle {
                stroke: Stroke::new(
                    overlay.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
                    rgb(box_color),
                ),
                label_color: rgb(label_color),
                label_size: overlay.label_size.unwrap_or(DEFAULT_LABEL_SIZE),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var("SIGNLENS_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
        if let Ok(timeout) = std::env::var("SIGNLENS_TIMEOUT_SECS") {
            let seconds: u64 = timeout.trim().parse().map_err(|_| {
                anyhow!("SIGNLENS_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.timeout = Duration::from_secs(seconds);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(anyhow!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("timeout must be greater than zero"));
        }
        if !(self.canvas_size.x > 0.0 && self.canvas_size.y > 0.0) {
            return Err(anyhow!(
                "canvas size must be positive, got {}x{}",
                self.canvas_size.x,
                self.canvas_size.y
            ));
        }
        if !(self.overlay.stroke.width > 0.0) {
            return Err(anyhow!("overlay stroke width must be positive"));
        }
        if !(self.overlay.label_size > 0.0) {
            return Err(anyhow!("overlay label size must be positive"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn parse_config(raw: &str) -> Result<ConfigFile> {
    Ok(serde_yaml::from_str(raw)?)
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}
