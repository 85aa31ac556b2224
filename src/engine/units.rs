// SPDX-License-Identifier: MPL-2.0

//! Celsius to display-unit conversion.
//!
//! Statistics are always kept in Celsius; conversion happens only when text
//! is produced for the user (icon, tooltip, log rows).

/// The user-selected display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn from_celsius_flag(use_celsius: bool) -> Self {
        if use_celsius { Unit::Celsius } else { Unit::Fahrenheit }
    }
}

/// Convert a whole-degree Celsius reading to the display unit.
///
/// Fahrenheit is computed as `celsius * 1.8 + 32` in floating point and
/// then truncated toward zero, so 37 °C shows as 98 °F (98.6 truncated).
pub fn to_display(celsius: i32, unit: Unit) -> i32 {
    match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => (f64::from(celsius) * 1.8 + 32.0) as i32,
    }
}

/// Same formula as [`to_display`] without truncation; used for averages.
pub fn to_display_f(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => value,
        Unit::Fahrenheit => value * 1.8 + 32.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_is_identity() {
        for c in [0, 1, 37, 65, 100, 150] {
            assert_eq!(to_display(c, Unit::Celsius), c);
        }
    }

    #[test]
    fn fahrenheit_fixed_points() {
        assert_eq!(to_display(0, Unit::Fahrenheit), 32);
        assert_eq!(to_display(100, Unit::Fahrenheit), 212);
    }

    #[test]
    fn fahrenheit_truncates_toward_zero() {
        // 37 * 1.8 + 32 = 98.6
        assert_eq!(to_display(37, Unit::Fahrenheit), 98);
        // -20 * 1.8 + 32 = -4.0, -21 * 1.8 + 32 = -5.8
        assert_eq!(to_display(-21, Unit::Fahrenheit), -5);
    }

    #[test]
    fn float_variant_keeps_fraction() {
        assert!((to_display_f(37.0, Unit::Fahrenheit) - 98.6).abs() < 1e-9);
        assert_eq!(to_display_f(42.5, Unit::Celsius), 42.5);
    }
}
