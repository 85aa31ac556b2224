// SPDX-License-Identifier: MPL-2.0

//! Headless tray temperature monitor.
//!
//! Samples on the configured interval, writes the icon next to the config
//! file as `icon.png` and logs the tooltip. Commands are read from stdin,
//! one per line (`update`, `celsius`, `fahrenheit`, `refresh <secs>`,
//! `log`, `reset`, `gpu <name>`, `exit`).

use chrono::Local;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tray_temperature::config::ConfigStore;
use tray_temperature::engine::{CairoGlyphRenderer, Command, Confirm, Flow, Monitor};
use tray_temperature::sensor::{SensorProvider, SysinfoProvider, preferred_gpu};
use tray_temperature::tray::PngTrayShell;

/// Commands are typed on purpose, so their confirmation prompts are answered yes.
struct TypedCommandConfirm;

impl Confirm for TypedCommandConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        log::info!("{} yes", prompt);
        true
    }
}

/// Ticks first after one full period; late ticks are delayed, never bunched.
fn refresh_timer(period: Duration) -> Interval {
    let mut timer = tokio::time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = ConfigStore::new()?;
    let mut config = store.load();
    log::info!("config loaded from {}", store.path().display());

    let provider = SysinfoProvider::new();
    if config.selected_gpu.is_none() {
        config.selected_gpu = preferred_gpu(provider.hardware()).map(|gpu| gpu.name.clone());
        if let Some(name) = &config.selected_gpu {
            log::info!("no GPU configured, using {:?}", name);
        }
    }

    let mut shell = PngTrayShell::new(store.path().with_file_name("icon.png"));
    let mut confirm = TypedCommandConfirm;
    let mut monitor = Monitor::new(provider, CairoGlyphRenderer::new(), config);

    monitor.tick(Local::now(), &mut shell);

    let mut period = monitor.refresh_interval();
    let mut timer = refresh_timer(period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let command = tokio::select! {
            _ = timer.tick() => Command::Tick,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        log::warn!("{}", e);
                        continue;
                    }
                },
                Ok(None) => {
                    log::debug!("stdin closed, timer only");
                    stdin_open = false;
                    continue;
                }
                Err(e) => {
                    log::warn!("failed to read command: {}", e);
                    stdin_open = false;
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => Command::Exit,
        };

        let before = monitor.config().clone();
        match monitor.handle(command, &mut confirm, Local::now(), &mut shell) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => log::error!("command failed: {}", e),
        }

        if *monitor.config() != before {
            if let Err(e) = store.save(monitor.config()) {
                log::warn!("failed to save config: {}", e);
            }
        }
        if monitor.refresh_interval() != period {
            period = monitor.refresh_interval();
            timer = refresh_timer(period);
        }
    }

    log::info!("shutting down");
    let config = monitor.shutdown();
    store.save(&config)?;
    Ok(())
}
