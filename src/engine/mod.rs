// SPDX-License-Identifier: MPL-2.0

//! Sampling, statistics and icon-rendering engine

pub mod classify;
pub mod cycle;
pub mod glyph;
pub mod names;
pub mod session;
pub mod stats;
pub mod units;

pub use classify::{ChannelColors, ColorThresholds, Rgb, Tier};
pub use cycle::{Command, CycleOutput, Flow, Monitor};
pub use glyph::{CairoGlyphRenderer, GlyphRenderer, Icon, RenderedFrame};
pub use session::{Confirm, LogSession};
pub use stats::{Channel, ChannelStats, Statistics};
pub use units::Unit;
