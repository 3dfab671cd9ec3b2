// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media files and the inference service.

pub mod media;
pub mod multipart;
pub mod transport;
