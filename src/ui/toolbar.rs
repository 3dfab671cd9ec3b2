// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload controls.
//!
//! This module provides the row of buttons for choosing, uploading and
//! removing media.

/// Button pressed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ChooseMedia,
    Upload,
    RemoveFile,
}

/// Display the toolbar. Upload and Remove are disabled while uploading.
pub fn show(ui: &mut egui::Ui, has_selection: bool, uploading: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Choose Media").clicked() {
            action = ToolbarAction::ChooseMedia;
        }

        if ui
            .add_enabled(!uploading, egui::Button::new("⬆ Upload Media"))
            .clicked()
        {
            action = ToolbarAction::Upload;
        }

        if has_selection
            && ui
                .add_enabled(!uploading, egui::Button::new("✖ Remove File"))
                .clicked()
        {
            action = ToolbarAction::RemoveFile;
        }
    });

    action
}
