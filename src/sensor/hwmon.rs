// SPDX-License-Identifier: MPL-2.0

//! # sysinfo Sensor Provider
//!
//! Builds [`Hardware`] units from the Linux hwmon components exposed by
//! the `sysinfo` crate.
//!
//! ## Grouping by label
//!
//! hwmon reports flat components ("k10temp Tctl", "amdgpu edge", ...),
//! labelled "<driver> <sensor>". CPU components are merged into one unit
//! named after the CPU brand string. GPU components become one unit per
//! device, named after the driver:
//!
//! - **CPU**: "cpu", "package", "core", "tctl", "tdie"
//! - **NVIDIA GPU**: "nvidia"
//! - **AMD GPU**: "amdgpu", "radeon", "edge"
//! - **Intel GPU**: driver "i915" or "xe"
//!
//! Components of one device are listed together, so a sensor label seen
//! again for the same driver starts the next device ("amdgpu", then
//! "amdgpu #2").

use super::{Hardware, HardwareKind, Sensor, SensorKind, SensorProvider};
use sysinfo::{Components, CpuRefreshKind, RefreshKind, System};

pub struct SysinfoProvider {
    components: Components,
    cpu_brand: String,
    hardware: Vec<Hardware>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let system =
            System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::new()));
        let cpu_brand = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| String::from("CPU"));

        let mut provider = Self {
            components: Components::new_with_refreshed_list(),
            cpu_brand,
            hardware: Vec::new(),
        };
        provider.regroup();
        log::info!(
            "sensor provider found {} hardware unit(s) in {} component(s)",
            provider.hardware.len(),
            provider.components.list().len()
        );
        provider
    }

    fn regroup(&mut self) {
        let readings = self
            .components
            .list()
            .iter()
            .map(|component| (component.label(), component.temperature()));
        self.hardware = group_components(readings, &self.cpu_brand);
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorProvider for SysinfoProvider {
    fn refresh(&mut self) {
        self.components.refresh();
        self.regroup();
    }

    fn hardware(&self) -> &[Hardware] {
        &self.hardware
    }
}

/// One GPU device being assembled, with the sensor labels seen so far.
struct Device {
    driver: String,
    labels: Vec<String>,
    unit: Hardware,
}

/// Group `(label, celsius)` readings into hardware units, in list order.
fn group_components<'a>(
    readings: impl IntoIterator<Item = (&'a str, f32)>,
    cpu_brand: &str,
) -> Vec<Hardware> {
    let mut cpu: Option<Hardware> = None;
    let mut gpus: Vec<Device> = Vec::new();

    for (label, value) in readings {
        let lower = label.to_lowercase();
        let kind = classify_label(&lower);
        let sensor = Sensor {
            kind: SensorKind::Temperature,
            value: value.is_finite().then_some(value),
        };

        match kind {
            HardwareKind::Other => continue,
            HardwareKind::Cpu => cpu
                .get_or_insert_with(|| Hardware {
                    name: cpu_brand.to_string(),
                    kind,
                    sensors: Vec::new(),
                })
                .sensors
                .push(sensor),
            _ => {
                let driver = lower.split_whitespace().next().unwrap_or_default().to_string();
                let current = gpus
                    .iter()
                    .rposition(|d| d.driver == driver)
                    .filter(|&i| !gpus[i].labels.contains(&lower));
                match current {
                    Some(i) => {
                        gpus[i].labels.push(lower);
                        gpus[i].unit.sensors.push(sensor);
                    }
                    None => {
                        let ordinal = gpus.iter().filter(|d| d.driver == driver).count() + 1;
                        let name = if ordinal == 1 {
                            driver.clone()
                        } else {
                            format!("{driver} #{ordinal}")
                        };
                        gpus.push(Device {
                            driver,
                            labels: vec![lower],
                            unit: Hardware {
                                name,
                                kind,
                                sensors: vec![sensor],
                            },
                        });
                    }
                }
            }
        }
    }

    cpu.into_iter()
        .chain(gpus.into_iter().map(|d| d.unit))
        .collect()
}

fn classify_label(label: &str) -> HardwareKind {
    let has = |needles: &[&str]| needles.iter().any(|n| label.contains(n));
    let driver = label.split_whitespace().next().unwrap_or_default();
    if has(&["nvidia"]) {
        HardwareKind::GpuNvidia
    } else if has(&["amdgpu", "radeon", "edge"]) {
        HardwareKind::GpuAmd
    } else if matches!(driver, "i915" | "xe") {
        HardwareKind::GpuIntel
    } else if has(&["cpu", "package", "core", "tctl", "tdie"]) {
        HardwareKind::Cpu
    } else {
        HardwareKind::Other
    }
}
