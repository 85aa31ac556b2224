// SPDX-License-Identifier: MPL-2.0

//! Threshold-to-color mapping.
//!
//! Each channel has two ascending Celsius boundaries and three colors.
//! Lower bounds are inclusive: a reading equal to `high` is already hot.

use serde::{Deserialize, Serialize};

/// Built-in low-tier color, used when even the configured low color is unusable.
pub const FALLBACK_LOW: Rgb = Rgb::new(0x32, 0xCD, 0x32);

/// Severity bucket of a reading, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Low,
    Medium,
    High,
}

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse an HTML color: `#RRGGBB`, `#RGB` or one of a few common names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let named = match text.to_ascii_lowercase().as_str() {
            "black" => Self::new(0, 0, 0),
            "white" => Self::new(0xFF, 0xFF, 0xFF),
            "red" => Self::new(0xFF, 0, 0),
            "lime" => Self::new(0, 0xFF, 0),
            "green" => Self::new(0, 0x80, 0),
            "limegreen" => Self::new(0x32, 0xCD, 0x32),
            "yellow" => Self::new(0xFF, 0xFF, 0),
            "orange" => Self::new(0xFF, 0xA5, 0),
            "blue" => Self::new(0, 0, 0xFF),
            "cyan" => Self::new(0, 0xFF, 0xFF),
            _ => return None,
        };
        Some(named)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #RGB expands each digit: #F80 == #FF8800
            3 => Some(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            _ => None,
        }
    }

    /// Components scaled to 0.0..=1.0 for cairo.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

/// Per-channel tier boundaries in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThresholds {
    pub medium: i32,
    pub high: i32,
}

/// Tier colors as HTML color strings, exactly as stored in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierColors {
    pub low: String,
    pub medium: String,
    pub high: String,
}

/// Thresholds and colors of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelColors {
    pub thresholds: ColorThresholds,
    pub colors: TierColors,
}

impl Default for ChannelColors {
    fn default() -> Self {
        Self {
            thresholds: ColorThresholds { medium: 60, high: 80 },
            colors: TierColors {
                low: "#32CD32".into(),
                medium: "#FFA500".into(),
                high: "#FF0000".into(),
            },
        }
    }
}

impl ChannelColors {
    /// Color for a Celsius reading.
    ///
    /// An unparsable tier color falls back to the low color, and an
    /// unparsable low color to [`FALLBACK_LOW`].
    pub fn color_for(&self, celsius: i32) -> Rgb {
        let low = Rgb::parse(&self.colors.low).unwrap_or_else(|| {
            log::warn!("invalid low color {:?}, using default", self.colors.low);
            FALLBACK_LOW
        });
        let configured = match classify(celsius, &self.thresholds) {
            Tier::Low => return low,
            Tier::Medium => &self.colors.medium,
            Tier::High => &self.colors.high,
        };
        Rgb::parse(configured).unwrap_or_else(|| {
            log::warn!("invalid tier color {configured:?}, using low color");
            low
        })
    }
}

/// Map a Celsius reading to its tier. `high` is checked first, so the
/// result is well defined even when `medium > high`.
pub fn classify(celsius: i32, thresholds: &ColorThresholds) -> Tier {
    if celsius >= thresholds.high {
        Tier::High
    } else if celsius >= thresholds.medium {
        Tier::Medium
    } else {
        Tier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPU: ColorThresholds = ColorThresholds { medium: 50, high: 75 };

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(classify(49, &CPU), Tier::Low);
        assert_eq!(classify(50, &CPU), Tier::Medium);
        assert_eq!(classify(74, &CPU), Tier::Medium);
        assert_eq!(classify(75, &CPU), Tier::High);
    }

    #[test]
    fn classification_is_monotonic() {
        let mut previous = Tier::Low;
        for t in -10..=150 {
            let tier = classify(t, &CPU);
            assert!(tier >= previous, "tier dropped at {t}");
            previous = tier;
        }
    }

    #[test]
    fn inverted_thresholds_check_high_first() {
        let inverted = ColorThresholds { medium: 80, high: 60 };
        assert_eq!(classify(59, &inverted), Tier::Low);
        assert_eq!(classify(60, &inverted), Tier::High);
        assert_eq!(classify(85, &inverted), Tier::High);
    }

    #[test]
    fn parses_html_colors() {
        assert_eq!(Rgb::parse("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::parse("#f80"), Some(Rgb::new(255, 136, 0)));
        assert_eq!(Rgb::parse("Orange"), Some(Rgb::new(255, 165, 0)));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#GG0000"), None);
        assert_eq!(Rgb::parse("not a color"), None);
    }

    #[test]
    fn color_for_picks_the_tier_color() {
        let colors = ChannelColors {
            thresholds: CPU,
            ..ChannelColors::default()
        };
        assert_eq!(colors.color_for(20), Rgb::new(0x32, 0xCD, 0x32));
        assert_eq!(colors.color_for(50), Rgb::new(0xFF, 0xA5, 0x00));
        assert_eq!(colors.color_for(75), Rgb::new(0xFF, 0x00, 0x00));
    }

    #[test]
    fn invalid_colors_fall_back_to_low() {
        let mut colors = ChannelColors::default();
        colors.colors.high = "#nothex".into();
        colors.colors.low = "#0000FF".into();
        assert_eq!(colors.color_for(95), Rgb::new(0, 0, 0xFF));

        colors.colors.low = "".into();
        assert_eq!(colors.color_for(95), FALLBACK_LOW);
        assert_eq!(colors.color_for(10), FALLBACK_LOW);
    }
}
