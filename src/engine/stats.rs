// SPDX-License-Identifier: MPL-2.0

//! # Running Temperature Statistics
//!
//! One [`ChannelStats`] per monitored [`Channel`], updated once per sample
//! cycle. Values are whole degrees Celsius; conversion to the display unit
//! is left to the callers.
//!
//! ## Overflow
//!
//! The running sum is a `u64`. With readings capped at 150 °C it can absorb
//! roughly 1.2·10¹⁷ samples, which is millions of years at a one-second
//! refresh. Should it ever be reached, the sum saturates and a warning is
//! logged instead of wrapping.

use std::fmt;

/// Initial minimum: larger than any realistic temperature, so the first
/// sample after a reset always becomes the minimum.
pub const MIN_SENTINEL: i32 = 99_999;

// ============================================================================
// Channel
// ============================================================================

/// One of the two monitored temperature sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Cpu,
    Gpu,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Cpu, Channel::Gpu];

    fn index(self) -> usize {
        match self {
            Channel::Cpu => 0,
            Channel::Gpu => 1,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Cpu => f.write_str("CPU"),
            Channel::Gpu => f.write_str("GPU"),
        }
    }
}

// ============================================================================
// Per-channel accumulator
// ============================================================================

/// Running sum, count, extremes and latest value of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    pub sum: u64,
    pub count: u64,
    pub min: i32,
    pub max: i32,
    /// Latest reading. Survives [`ChannelStats::reset`] so a channel without
    /// a fresh reading still has a previous value to report.
    pub current: i32,
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            sum: 0,
            count: 0,
            min: MIN_SENTINEL,
            max: 0,
            current: 0,
        }
    }
}

impl ChannelStats {
    /// Record one sample. Negative readings are clamped to zero.
    pub fn update(&mut self, celsius: i32) {
        let celsius = celsius.max(0);
        self.current = celsius;
        self.count += 1;
        self.sum = match self.sum.checked_add(celsius as u64) {
            Some(sum) => sum,
            None => {
                log::warn!("temperature sum saturated after {} samples", self.count);
                u64::MAX
            }
        };
        self.min = self.min.min(celsius);
        self.max = self.max.max(celsius);
    }

    /// Back to empty; `current` is kept.
    pub fn reset(&mut self) {
        *self = Self {
            current: self.current,
            ..Self::default()
        };
    }

    /// `None` until the first sample after a reset.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

// ============================================================================
// Statistics for all channels
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    channels: [ChannelStats; 2],
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, channel: Channel, celsius: i32) {
        self.channels[channel.index()].update(celsius);
    }

    pub fn reset(&mut self, channel: Channel) {
        self.channels[channel.index()].reset();
    }

    pub fn reset_all(&mut self) {
        for channel in Channel::ALL {
            self.reset(channel);
        }
    }

    pub fn average(&self, channel: Channel) -> Option<f64> {
        self.get(channel).average()
    }

    pub fn get(&self, channel: Channel) -> &ChannelStats {
        &self.channels[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_has_no_average() {
        let stats = Statistics::new();
        assert_eq!(stats.average(Channel::Cpu), None);
        assert_eq!(stats.get(Channel::Gpu).min, MIN_SENTINEL);
        assert_eq!(stats.get(Channel::Gpu).max, 0);
    }

    #[test]
    fn sequence_after_reset_tracks_extremes_and_mean() {
        let mut stats = Statistics::new();
        stats.update(Channel::Cpu, 90);
        stats.reset(Channel::Cpu);

        let inputs = [55, 41, 73, 60, 41, 68];
        for t in inputs {
            stats.update(Channel::Cpu, t);
        }

        let cpu = stats.get(Channel::Cpu);
        assert_eq!(cpu.count, inputs.len() as u64);
        assert_eq!(cpu.min, 41);
        assert_eq!(cpu.max, 73);
        assert_eq!(cpu.current, 68);
        let expected = inputs.iter().sum::<i32>() as f64 / inputs.len() as f64;
        assert!((stats.average(Channel::Cpu).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn min_le_current_le_max() {
        let mut stats = ChannelStats::default();
        for t in [30, 70, 45, 12, 99, 50] {
            stats.update(t);
            assert!(stats.min <= stats.current && stats.current <= stats.max);
        }
    }

    #[test]
    fn channels_are_independent() {
        let mut stats = Statistics::new();
        stats.update(Channel::Cpu, 40);
        stats.update(Channel::Gpu, 70);
        stats.reset(Channel::Gpu);

        assert_eq!(stats.get(Channel::Cpu).count, 1);
        assert_eq!(stats.get(Channel::Gpu).count, 0);
        assert_eq!(stats.get(Channel::Gpu).current, 70);
    }

    #[test]
    fn negative_reading_is_clamped() {
        let mut stats = ChannelStats::default();
        stats.update(-5);
        assert_eq!(stats.current, 0);
        assert_eq!(stats.sum, 0);
        assert_eq!(stats.min, 0);
    }

    #[test]
    fn sum_saturates_instead_of_wrapping() {
        let mut stats = ChannelStats {
            sum: u64::MAX - 10,
            count: 1,
            ..ChannelStats::default()
        };
        stats.update(50);
        assert_eq!(stats.sum, u64::MAX);
        assert_eq!(stats.count, 2);
    }
}
