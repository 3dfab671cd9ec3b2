// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SignLens - Sign Language Converter client
//!
//! A desktop application that uploads an image or video to a sign language
//! inference service and shows the detected signs over the original media.

mod app;
mod config;
mod error;
mod io;
mod models;
mod render;
mod ui;
mod upload;
mod util;

use anyhow::{Context, Result};
use app::SignLensApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Leave room around the preview canvas for the toolbar and result panel
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_size.x + 40.0, config.canvas_size.y + 260.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("SignLens - Sign Language Converter"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "SignLens",
        options,
        Box::new(move |_cc| Ok(Box::new(SignLensApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
