// SPDX-License-Identifier: MPL-2.0

//! Error types for the sampling engine.
//!
//! Sensor gaps never become errors: a channel without a reading keeps its
//! previous value. Everything else that can fail is listed here.

use thiserror::Error;

/// Icon rasterization could not complete.
///
/// Non-fatal for the sample loop: the previous icon stays in place.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cairo drawing failed: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("raster data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("failed to encode icon: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("failed to write icon: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the logging session (open, append, summarize).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("log file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("a logging session is already recording")]
    AlreadyRecording,

    #[error("no logging session is recording")]
    NotRecording,
}

/// Configuration could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no home directory to place the config in")]
    NoConfigDir,
}

/// Errors surfaced by a monitor command.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("unsupported refresh interval: {0}s")]
    InvalidInterval(u64),
}

/// A shell command line that does not name a [`Command`](crate::engine::Command).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0:?}")]
pub struct UnknownCommand(pub String);
