// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload status and result panel.

use crate::upload::UploadState;

/// Display progress, the converted text, or the error for `state`.
pub fn show(ui: &mut egui::Ui, state: &UploadState) {
    match state {
        UploadState::Idle | UploadState::Selected => {}
        UploadState::Uploading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing media...");
            });
        }
        UploadState::Succeeded(response) => {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("✔")
                        .size(28.0)
                        .color(egui::Color32::GREEN),
                );
                if let Some(message) = &response.message {
                    ui.label(message);
                }
            });
            if let Some(text) = &response.text {
                ui.heading(format!("Converted Text: {}", text));
            }
        }
        UploadState::Failed(error) => {
            egui::Frame::group(ui.style())
                .stroke(egui::Stroke::new(1.0, egui::Color32::RED))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new("✖")
                                .size(28.0)
                                .color(egui::Color32::RED),
                        );
                        ui.vertical(|ui| {
                            ui.label("We apologize, but an error occurred:");
                            ui.label(error.to_string());
                        });
                    });
                });
        }
    }
}
