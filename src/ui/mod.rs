// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the SignLens application.

pub mod canvas;
pub mod status;
pub mod toolbar;
