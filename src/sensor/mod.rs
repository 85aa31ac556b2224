// SPDX-License-Identifier: MPL-2.0

//! Hardware sensor interface consumed by the sample cycle.
//!
//! A provider exposes a list of hardware units, each with zero or more
//! sensors. Discovery and driver specifics stay behind [`SensorProvider`].

pub mod hwmon;

pub use hwmon::SysinfoProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareKind {
    Cpu,
    GpuNvidia,
    GpuAmd,
    GpuIntel,
    Other,
}

impl HardwareKind {
    pub fn is_gpu(self) -> bool {
        matches!(
            self,
            HardwareKind::GpuNvidia | HardwareKind::GpuAmd | HardwareKind::GpuIntel
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub kind: SensorKind,
    /// Celsius for temperature sensors; `None` if the driver has no value.
    pub value: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hardware {
    pub name: String,
    pub kind: HardwareKind,
    pub sensors: Vec<Sensor>,
}

impl Hardware {
    /// Value of the first temperature sensor, truncated to whole degrees.
    ///
    /// `None` when that sensor has no finite value; later temperature
    /// sensors are not consulted, so the caller keeps its previous reading.
    pub fn temperature(&self) -> Option<i32> {
        self.sensors
            .iter()
            .find(|s| s.kind == SensorKind::Temperature)
            .and_then(|s| s.value)
            .filter(|v| v.is_finite())
            .map(|v| v as i32)
    }
}

/// Source of hardware readings.
pub trait SensorProvider {
    /// Re-read all sensors. Called once per cycle before [`hardware`](Self::hardware).
    fn refresh(&mut self);

    fn hardware(&self) -> &[Hardware];
}

/// Default GPU when the user has not picked one: NVIDIA, then AMD, then Intel.
pub fn preferred_gpu(hardware: &[Hardware]) -> Option<&Hardware> {
    [HardwareKind::GpuNvidia, HardwareKind::GpuAmd, HardwareKind::GpuIntel]
        .into_iter()
        .find_map(|kind| hardware.iter().find(|h| h.kind == kind))
}
