// SPDX-License-Identifier: MPL-2.0

//! # Sample Cycle
//!
//! [`Monitor`] owns every piece of mutable state: configuration, statistics,
//! the logging session, the renderer and the last published icon. It is
//! driven from a single execution context, either by timer ticks or by
//! discrete [`Command`]s coming from the UI shell, so nothing here is shared
//! or locked.
//!
//! ## One cycle
//!
//! ```text
//! provider.refresh ─► read CPU + selected GPU ─► stats.update
//!                                                    │
//!          ┌─────────────── session.append ◄─────────┤ (when recording)
//!          ▼                                          ▼
//!     tooltip (≤127 chars)                 classify + render icon
//!          └──────────────► TrayShell ◄───────────────┘
//! ```
//!
//! ## Failure policy
//!
//! - A channel without a reading keeps its previous value.
//! - A failed render keeps the previous icon; tooltip and stats still update.
//! - A failed log append is logged; sampling continues.

use crate::config::{Config, REFRESH_INTERVALS};
use crate::engine::glyph::{GlyphRenderer, Icon, RenderedFrame};
use crate::engine::names::clean_hardware_name;
use crate::engine::session::{Confirm, LogSession, NO_AVERAGE};
use crate::engine::stats::{Channel, Statistics};
use crate::engine::units::{Unit, to_display, to_display_f};
use crate::error::{MonitorError, UnknownCommand};
use crate::sensor::{HardwareKind, SensorProvider};
use crate::tray::{TrayShell, TrayText};
use chrono::{DateTime, Local};
use std::str::FromStr;
use std::time::Duration;

/// Degree glyph appended to every displayed temperature.
const DEGREE: char = '°';

// ============================================================================
// Commands
// ============================================================================

/// Requests from the timer or the UI shell, handled one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Timer tick or explicit refresh.
    Tick,
    SetUnit(Unit),
    /// New refresh interval in seconds, one of [`REFRESH_INTERVALS`].
    SetRefreshInterval(u64),
    /// Start a logging session (after confirmation) or stop the running one.
    ToggleLogging,
    ResetStatistics,
    /// Monitor the GPU with this hardware name.
    SelectGpu(String),
    Exit,
}

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Shell syntax: `update`, `celsius`, `fahrenheit`, `refresh <secs>`,
    /// `log`, `reset`, `gpu <name>`, `exit` (or `quit`).
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match (word, rest) {
            ("update", "") => Command::Tick,
            ("celsius", "") => Command::SetUnit(Unit::Celsius),
            ("fahrenheit", "") => Command::SetUnit(Unit::Fahrenheit),
            ("refresh", secs) => secs
                .parse()
                .map(Command::SetRefreshInterval)
                .map_err(|_| UnknownCommand(line.to_string()))?,
            ("log", "") => Command::ToggleLogging,
            ("reset", "") => Command::ResetStatistics,
            ("gpu", name) if !name.is_empty() => Command::SelectGpu(name.to_string()),
            ("exit" | "quit", "") => Command::Exit,
            _ => return Err(UnknownCommand(line.to_string())),
        };
        Ok(command)
    }
}

/// Whether the driving loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Result of one sample cycle.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    /// Most recent icon; the previous one if this cycle's render failed.
    pub icon: Option<Icon>,
    pub icon_updated: bool,
    pub tooltip: TrayText,
}

// ============================================================================
// Monitor
// ============================================================================

pub struct Monitor<P, R> {
    provider: P,
    renderer: R,
    config: Config,
    stats: Statistics,
    session: LogSession,
    cpu_name: String,
    gpu_name: String,
    icon: Option<Icon>,
}

impl<P: SensorProvider, R: GlyphRenderer> Monitor<P, R> {
    pub fn new(provider: P, renderer: R, config: Config) -> Self {
        let session = LogSession::new(&config.log_dir);
        Self {
            provider,
            renderer,
            config,
            stats: Statistics::new(),
            session,
            cpu_name: String::new(),
            gpu_name: String::new(),
            icon: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn session(&self) -> &LogSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.config.refresh_interval()
    }

    /// Sample all channels once and produce icon and tooltip.
    pub fn run_once(&mut self, now: DateTime<Local>) -> CycleOutput {
        self.sample();

        let unit = self.config.unit();
        let cpu = self.stats.get(Channel::Cpu).current;
        let gpu = self.stats.get(Channel::Gpu).current;

        if self.session.is_recording() {
            if let Err(e) = self
                .session
                .append(now, to_display(cpu, unit), to_display(gpu, unit))
            {
                log::error!("failed to append to temperature log: {}", e);
            }
        }

        let tooltip = self.tooltip();

        let frame = RenderedFrame {
            line1: format!("{}{DEGREE}", to_display(cpu, unit)),
            line1_color: self.config.cpu.color_for(cpu),
            line2: format!("{}{DEGREE}", to_display(gpu, unit)),
            line2_color: self.config.gpu.color_for(gpu),
        };
        let icon_updated = match self.renderer.render(&frame) {
            Ok(icon) => {
                self.icon = Some(icon);
                true
            }
            Err(e) => {
                log::warn!("icon render failed, keeping previous icon: {}", e);
                false
            }
        };

        CycleOutput {
            icon: self.icon.clone(),
            icon_updated,
            tooltip,
        }
    }

    /// Run a cycle and publish it to the shell.
    pub fn tick(&mut self, now: DateTime<Local>, shell: &mut dyn TrayShell) {
        let output = self.run_once(now);
        shell.set_text(&output.tooltip);
        if output.icon_updated {
            if let Some(icon) = &output.icon {
                shell.set_icon(icon);
            }
        }
    }

    /// Apply a command, then refresh immediately unless exiting.
    ///
    /// The refresh runs even when the command failed, so the shell always
    /// reflects the current state.
    pub fn handle(
        &mut self,
        command: Command,
        confirm: &mut dyn Confirm,
        now: DateTime<Local>,
        shell: &mut dyn TrayShell,
    ) -> Result<Flow, MonitorError> {
        log::debug!("handling {:?}", command);
        let result = match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Tick => Ok(()),
            Command::SetUnit(unit) => {
                self.config.use_celsius = unit == Unit::Celsius;
                Ok(())
            }
            Command::SetRefreshInterval(secs) => self.set_refresh_interval(secs),
            Command::ToggleLogging => self.toggle_logging(confirm),
            Command::ResetStatistics => {
                self.stats.reset_all();
                log::info!("statistics reset");
                Ok(())
            }
            Command::SelectGpu(name) => {
                log::info!("monitoring GPU {:?}", name);
                self.config.selected_gpu = Some(name);
                Ok(())
            }
        };
        self.tick(now, shell);
        result.map(|()| Flow::Continue)
    }

    /// Release the renderer's long-lived resources and hand back the config.
    ///
    /// A recording session is left as is: its raw log stays on disk without
    /// a summary.
    pub fn shutdown(mut self) -> Config {
        if self.session.is_recording() {
            log::warn!(
                "exiting while logging; {} left without summary",
                self.session.raw_path().display()
            );
        }
        self.renderer.shutdown();
        self.config
    }

    fn set_refresh_interval(&mut self, secs: u64) -> Result<(), MonitorError> {
        if !REFRESH_INTERVALS.contains(&secs) {
            return Err(MonitorError::InvalidInterval(secs));
        }
        self.config.refresh_interval_secs = secs;
        log::info!("refresh interval set to {}s", secs);
        Ok(())
    }

    fn toggle_logging(&mut self, confirm: &mut dyn Confirm) -> Result<(), MonitorError> {
        if self.session.is_recording() {
            self.session.stop(&self.stats)?;
        } else {
            self.session.start(confirm, &mut self.stats)?;
        }
        Ok(())
    }

    /// Refresh the provider and feed one reading per channel into the stats.
    fn sample(&mut self) {
        self.provider.refresh();
        let hardware = self.provider.hardware();

        let cpu = hardware.iter().find(|h| h.kind == HardwareKind::Cpu);
        let gpu = self.config.selected_gpu.as_deref().and_then(|name| {
            hardware
                .iter()
                .find(|h| h.kind.is_gpu() && h.name == name)
        });

        let readings = [(Channel::Cpu, cpu), (Channel::Gpu, gpu)].map(|(channel, unit)| {
            (
                channel,
                unit.map(|u| u.name.clone()),
                unit.and_then(|u| u.temperature()),
            )
        });

        for (channel, name, reading) in readings {
            if let Some(name) = name {
                match channel {
                    Channel::Cpu => self.cpu_name = name,
                    Channel::Gpu => self.gpu_name = name,
                }
            }
            let celsius = reading.unwrap_or_else(|| {
                let previous = self.stats.get(channel).current;
                log::debug!("{} sensor unavailable, keeping {}", channel, previous);
                previous
            });
            self.stats.update(channel, celsius);
        }
    }

    fn tooltip(&self) -> TrayText {
        let unit = self.config.unit();
        let mut lines = Vec::with_capacity(10);

        for (channel, raw_name) in [(Channel::Cpu, &self.cpu_name), (Channel::Gpu, &self.gpu_name)] {
            let stats = self.stats.get(channel);
            let name = clean_hardware_name(raw_name);
            lines.push(if name.is_empty() { channel.to_string() } else { name });
            lines.push(format!("  Cur: {}{DEGREE}", to_display(stats.current, unit)));
            match stats.average() {
                Some(avg) => {
                    lines.push(format!("  Avg: {:.2}{DEGREE}", to_display_f(avg, unit)));
                    lines.push(format!("  Min: {}{DEGREE}", to_display(stats.min, unit)));
                    lines.push(format!("  Max: {}{DEGREE}", to_display(stats.max, unit)));
                }
                None => {
                    for label in ["Avg", "Min", "Max"] {
                        lines.push(format!("  {label}: {NO_AVERAGE}"));
                    }
                }
            }
        }

        TrayText::truncated(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shell_commands() {
        assert_eq!("update".parse::<Command>(), Ok(Command::Tick));
        assert_eq!(" fahrenheit ".parse::<Command>(), Ok(Command::SetUnit(Unit::Fahrenheit)));
        assert_eq!("refresh 15".parse::<Command>(), Ok(Command::SetRefreshInterval(15)));
        assert_eq!("log".parse::<Command>(), Ok(Command::ToggleLogging));
        assert_eq!(
            "gpu NVIDIA GeForce RTX 3080".parse::<Command>(),
            Ok(Command::SelectGpu("NVIDIA GeForce RTX 3080".into()))
        );
        assert_eq!("quit".parse::<Command>(), Ok(Command::Exit));
    }

    #[test]
    fn rejects_malformed_commands() {
        for line in ["", "refresh", "refresh soon", "interval 15", "gpu", "log now", "explode"] {
            assert!(line.parse::<Command>().is_err(), "{line:?} parsed");
        }
    }
}
