// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for selected media and inference results.

pub mod annotation;
pub mod media;
pub mod response;
