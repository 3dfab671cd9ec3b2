// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay rendering: geometry-driven drawing onto a recorded surface, and
//! the scheduler that decides when to redraw.

pub mod renderer;
pub mod scheduler;
pub mod surface;
