// SPDX-License-Identifier: MPL-2.0

//! # Glyph Icon Rendering
//!
//! Draws two short lines of text (one per channel) into a 16×16 ARGB32
//! raster with Cairo and Pango, and copies the result into an owned
//! [`Icon`] the tray shell can keep.
//!
//! ## Layout
//!
//! ```text
//!  (-1,-3) ┌────────────────┐
//!          │ 54°            │  line 1: CPU
//!  (-1, 7) │ 61°            │  line 2: GPU
//!          └────────────────┘
//! ```
//!
//! Text that does not fit is clipped by the canvas.
//!
//! ## Resource lifecycle
//!
//! - The font description is created once in [`CairoGlyphRenderer::new`] and
//!   released once by [`GlyphRenderer::shutdown`] (or on drop).
//! - Each render owns one transient image surface, held by a
//!   [`RasterGuard`]. The guard finishes the surface and decrements the
//!   live-raster count exactly once, whether the render succeeded or bailed
//!   out early with `?`.
//! - The Cairo context and Pango layout of a render never outlive it.

use crate::engine::classify::Rgb;
use crate::error::RenderError;
use std::cell::Cell;
use std::fs::File;
use std::path::Path;

/// Edge length of the icon in pixels.
pub const ICON_SIZE: i32 = 16;

/// Monospace face sized so two lines fit the 16 px canvas.
const GLYPH_FONT: &str = "Monospace 7";

const LINE1_ORIGIN: (f64, f64) = (-1.0, -3.0);
const LINE2_ORIGIN: (f64, f64) = (-1.0, 7.0);

// ============================================================================
// Frame and icon
// ============================================================================

/// Text and colors of one icon, rebuilt every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub line1: String,
    pub line1_color: Rgb,
    pub line2: String,
    pub line2_color: Rgb,
}

/// Owned icon pixels: premultiplied ARGB32 in native byte order, the
/// layout Cairo renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    width: i32,
    height: i32,
    stride: i32,
    argb: Vec<u8>,
}

impl Icon {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Straight (non-premultiplied) RGBA of one pixel, `None` outside the icon.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !(0..self.width).contains(&x) || !(0..self.height).contains(&y) {
            return None;
        }
        let offset = (y * self.stride + x * 4) as usize;
        let bytes = self.argb.get(offset..offset + 4)?;
        let word = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let a = (word >> 24) as u8;
        let unpremultiply = |c: u32| -> u8 {
            if a == 0 {
                0
            } else {
                ((c * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
            }
        };
        Some([
            unpremultiply((word >> 16) & 0xFF),
            unpremultiply((word >> 8) & 0xFF),
            unpremultiply(word & 0xFF),
            a,
        ])
    }

    /// Row-major straight RGBA, the format tray libraries expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                rgba.extend_from_slice(&self.pixel(x, y).unwrap_or_default());
            }
        }
        rgba
    }

    /// Encode as PNG.
    pub fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        let surface = cairo::ImageSurface::create_for_data(
            self.argb.clone(),
            cairo::Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?;
        let mut file = File::create(path)?;
        surface.write_to_png(&mut file)?;
        surface.finish();
        Ok(())
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Turns a [`RenderedFrame`] into an [`Icon`].
pub trait GlyphRenderer {
    fn render(&mut self, frame: &RenderedFrame) -> Result<Icon, RenderError>;

    /// Release long-lived resources. Called once at process exit.
    fn shutdown(&mut self) {}
}

/// Scoped owner of one transient Cairo surface.
///
/// Dropping the guard finishes the surface and releases the live-raster
/// count, on every exit path of the render.
struct RasterGuard<'a> {
    surface: cairo::ImageSurface,
    live: &'a Cell<usize>,
}

impl<'a> RasterGuard<'a> {
    fn acquire(live: &'a Cell<usize>) -> Result<Self, RenderError> {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, ICON_SIZE, ICON_SIZE)?;
        live.set(live.get() + 1);
        Ok(Self { surface, live })
    }

    /// Copy the pixels out. Needs every context on the surface dropped.
    fn snapshot(&mut self) -> Result<Icon, RenderError> {
        self.surface.flush();
        let width = self.surface.width();
        let height = self.surface.height();
        let stride = self.surface.stride();
        let data = self.surface.data()?;
        Ok(Icon {
            width,
            height,
            stride,
            argb: data.to_vec(),
        })
    }
}

impl Drop for RasterGuard<'_> {
    fn drop(&mut self) {
        self.surface.finish();
        let live = self.live.get();
        debug_assert!(live > 0, "raster released twice");
        self.live.set(live.saturating_sub(1));
    }
}

/// Cairo/Pango implementation of [`GlyphRenderer`].
pub struct CairoGlyphRenderer {
    font: Option<pango::FontDescription>,
    live_rasters: Cell<usize>,
}

impl CairoGlyphRenderer {
    /// Create the renderer and its process-lifetime font.
    pub fn new() -> Self {
        Self {
            font: Some(pango::FontDescription::from_string(GLYPH_FONT)),
            live_rasters: Cell::new(0),
        }
    }

    /// Transient surfaces currently alive. Zero between renders.
    pub fn live_rasters(&self) -> usize {
        self.live_rasters.get()
    }

    fn release_font(&mut self) {
        if self.font.take().is_some() {
            log::debug!("released glyph font");
        }
    }

    fn draw(&self, surface: &cairo::ImageSurface, frame: &RenderedFrame) -> Result<(), RenderError> {
        let cr = cairo::Context::new(surface)?;

        cr.set_operator(cairo::Operator::Source);
        cr.set_source_rgba(0.0, 0.0, 0.0, 0.0);
        cr.paint()?;
        cr.set_operator(cairo::Operator::Over);

        let layout = pangocairo::functions::create_layout(&cr);
        layout.set_font_description(self.font.as_ref());

        for (text, color, (x, y)) in [
            (&frame.line1, frame.line1_color, LINE1_ORIGIN),
            (&frame.line2, frame.line2_color, LINE2_ORIGIN),
        ] {
            if text.is_empty() {
                continue;
            }
            let (r, g, b) = color.to_unit();
            cr.set_source_rgb(r, g, b);
            layout.set_text(text);
            cr.move_to(x, y);
            pangocairo::functions::show_layout(&cr, &layout);
        }

        cr.status()?;
        Ok(())
    }
}

impl Default for CairoGlyphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRenderer for CairoGlyphRenderer {
    fn render(&mut self, frame: &RenderedFrame) -> Result<Icon, RenderError> {
        let mut raster = RasterGuard::acquire(&self.live_rasters)?;
        self.draw(&raster.surface, frame)?;
        raster.snapshot()
    }

    /// Release the cached font. Later renders fall back to Pango's default face.
    fn shutdown(&mut self) {
        self.release_font();
    }
}

impl Drop for CairoGlyphRenderer {
    fn drop(&mut self) {
        self.release_font();
    }
}
