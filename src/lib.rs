// SPDX-License-Identifier: MPL-2.0

//! CPU/GPU temperature tray monitor.
//!
//! Samples temperature sensors on a timer, keeps running statistics, renders
//! a 16×16 two-line glyph icon and optionally records a CSV session log.

pub mod config;
pub mod engine;
pub mod error;
pub mod sensor;
pub mod tray;
