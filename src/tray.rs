// SPDX-License-Identifier: MPL-2.0

//! Output side of the monitor: the tray text contract and the shell that
//! displays icon and tooltip.

use crate::engine::glyph::Icon;
use crate::error::RenderError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Longest tooltip a tray icon can display, in characters.
pub const TRAY_TEXT_MAX: usize = 127;

/// Tooltip text guaranteed to fit the tray's 127-character limit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrayText(String);

/// Text longer than [`TRAY_TEXT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tray text has {0} characters, limit is {max}", max = TRAY_TEXT_MAX)]
pub struct TextTooLong(pub usize);

impl TrayText {
    /// Accept `text` only if it fits.
    pub fn new(text: impl Into<String>) -> Result<Self, TextTooLong> {
        let text = text.into();
        match text.chars().count() {
            n if n > TRAY_TEXT_MAX => Err(TextTooLong(n)),
            _ => Ok(Self(text)),
        }
    }

    /// Keep the first 127 characters, cutting mid-line if need be.
    pub fn truncated(text: &str) -> Self {
        match text.char_indices().nth(TRAY_TEXT_MAX) {
            Some((cut, _)) => Self(text[..cut].to_string()),
            None => Self(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The UI shell receiving each cycle's output.
pub trait TrayShell {
    fn set_icon(&mut self, icon: &Icon);

    fn set_text(&mut self, text: &TrayText);
}

/// Headless shell: icon written as PNG, tooltip logged.
pub struct PngTrayShell {
    icon_path: PathBuf,
}

impl PngTrayShell {
    pub fn new(icon_path: PathBuf) -> Self {
        Self { icon_path }
    }

    fn write(&self, icon: &Icon) -> Result<(), RenderError> {
        let tmp = self.icon_path.with_extension("png.tmp");
        icon.write_png(&tmp)?;
        std::fs::rename(&tmp, &self.icon_path)?;
        Ok(())
    }
}

impl TrayShell for PngTrayShell {
    fn set_icon(&mut self, icon: &Icon) {
        if let Err(e) = self.write(icon) {
            log::warn!("failed to publish icon to {}: {}", self.icon_path.display(), e);
        }
    }

    fn set_text(&mut self, text: &TrayText) {
        log::info!("tooltip:\n{}", text);
    }
}
