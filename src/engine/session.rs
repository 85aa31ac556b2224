// SPDX-License-Identifier: MPL-2.0

//! # Logging Session
//!
//! A two-state machine recording samples to a CSV file.
//!
//! ```text
//!            start (confirmed)             stop
//!   Idle ───────────────────────► Recording ─────► Idle
//!    ▲  │ start (declined)            │ append
//!    └──┘                             └──► one CSV row per sample
//! ```
//!
//! On stop, a summary file is written with the per-channel statistics
//! followed by the raw log, and the raw log is removed.
//!
//! ## Files
//!
//! - `temp.log` — raw CSV: `DateTime,CPU,GPU` then `<timestamp>,<int>,<int>`
//! - `summary.log` — `CPU Avg: .. Min: .. Max: ..`, `GPU ..`, blank line, raw CSV

use crate::engine::stats::{Channel, Statistics};
use crate::error::SessionError;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RAW_LOG_NAME: &str = "temp.log";
pub const SUMMARY_LOG_NAME: &str = "summary.log";

const CSV_HEADER: &str = "DateTime,CPU,GPU";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown in place of an average when a channel has no samples.
pub const NO_AVERAGE: &str = "n/a";

/// Asks the user to confirm an action. Provided by the UI shell.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

enum State {
    Idle,
    Recording { writer: BufWriter<File> },
}

pub struct LogSession {
    raw_path: PathBuf,
    summary_path: PathBuf,
    state: State,
}

impl LogSession {
    /// A session writing into `dir`. Nothing is touched until [`start`](Self::start).
    pub fn new(dir: &Path) -> Self {
        Self {
            raw_path: dir.join(RAW_LOG_NAME),
            summary_path: dir.join(SUMMARY_LOG_NAME),
            state: State::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, State::Recording { .. })
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }

    /// Begin recording after asking for confirmation.
    ///
    /// Returns `Ok(false)` if the user declined. Statistics are reset only
    /// once the raw log has been created, so a failed start leaves both the
    /// session and the statistics untouched.
    pub fn start(
        &mut self,
        confirm: &mut dyn Confirm,
        stats: &mut Statistics,
    ) -> Result<bool, SessionError> {
        if self.is_recording() {
            return Err(SessionError::AlreadyRecording);
        }
        if !confirm.confirm("Start logging?") {
            log::info!("logging not started: declined");
            return Ok(false);
        }

        let mut writer = BufWriter::new(File::create(&self.raw_path)?);
        writeln!(writer, "{CSV_HEADER}")?;
        writer.flush()?;

        stats.reset_all();
        self.state = State::Recording { writer };
        log::info!("logging to {}", self.raw_path.display());
        Ok(true)
    }

    /// Write one row of display-unit temperatures. No-op while idle.
    pub fn append(
        &mut self,
        timestamp: DateTime<Local>,
        cpu: i32,
        gpu: i32,
    ) -> Result<(), SessionError> {
        if let State::Recording { writer } = &mut self.state {
            writeln!(writer, "{},{cpu},{gpu}", timestamp.format(TIMESTAMP_FORMAT))?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Close the raw log, write the summary and remove the raw log.
    ///
    /// The session is idle afterwards even on error; in that case the raw
    /// log stays on disk.
    pub fn stop(&mut self, stats: &Statistics) -> Result<(), SessionError> {
        let State::Recording { mut writer } = std::mem::replace(&mut self.state, State::Idle) else {
            return Err(SessionError::NotRecording);
        };
        writer.flush()?;
        drop(writer);

        let raw = fs::read_to_string(&self.raw_path)?;
        let summary = format!(
            "{}\n{}\n\n{raw}",
            summary_line(stats, Channel::Cpu),
            summary_line(stats, Channel::Gpu),
        );
        fs::write(&self.summary_path, summary)?;
        fs::remove_file(&self.raw_path)?;

        log::info!("session summary written to {}", self.summary_path.display());
        Ok(())
    }
}

/// `CPU Avg: 61.33 Min: 40 Max: 80`, raw Celsius statistics.
fn summary_line(stats: &Statistics, channel: Channel) -> String {
    let channel_stats = stats.get(channel);
    let average = match channel_stats.average() {
        Some(avg) => format!("{avg:.2}"),
        None => NO_AVERAGE.to_string(),
    };
    format!(
        "{channel} Avg: {average} Min: {} Max: {}",
        channel_stats.min, channel_stats.max
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stats::MIN_SENTINEL;
    use chrono::TimeZone;

    struct Answer(bool);

    impl Confirm for Answer {
        fn confirm(&mut self, _prompt: &str) -> bool {
            self.0
        }
    }

    fn at(second: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap()
    }

    #[test]
    fn declined_start_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        stats.update(Channel::Cpu, 50);

        assert!(!session.start(&mut Answer(false), &mut stats).unwrap());
        assert!(!session.is_recording());
        assert!(!session.raw_path().exists());
        assert_eq!(stats.get(Channel::Cpu).count, 1);
    }

    #[test]
    fn start_writes_header_and_resets_stats() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        stats.update(Channel::Gpu, 70);

        assert!(session.start(&mut Answer(true), &mut stats).unwrap());
        assert!(session.is_recording());
        assert_eq!(stats.get(Channel::Gpu).count, 0);
        assert_eq!(
            fs::read_to_string(session.raw_path()).unwrap(),
            "DateTime,CPU,GPU\n"
        );
    }

    #[test]
    fn start_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        session.start(&mut Answer(true), &mut stats).unwrap();

        assert!(matches!(
            session.start(&mut Answer(true), &mut stats),
            Err(SessionError::AlreadyRecording)
        ));
        assert!(session.is_recording());
    }

    #[test]
    fn unwritable_directory_stays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(&dir.path().join("missing"));
        let mut stats = Statistics::new();
        stats.update(Channel::Cpu, 42);

        assert!(matches!(
            session.start(&mut Answer(true), &mut stats),
            Err(SessionError::Io(_))
        ));
        assert!(!session.is_recording());
        assert_eq!(stats.get(Channel::Cpu).count, 1);
    }

    #[test]
    fn append_is_noop_while_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        session.append(at(0), 40, 30).unwrap();
        assert!(!session.raw_path().exists());
    }

    #[test]
    fn stop_without_samples_reports_sentinels() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        session.start(&mut Answer(true), &mut stats).unwrap();
        session.stop(&stats).unwrap();

        let summary = fs::read_to_string(session.summary_path()).unwrap();
        assert_eq!(
            summary,
            format!(
                "CPU Avg: n/a Min: {MIN_SENTINEL} Max: 0\n\
                 GPU Avg: n/a Min: {MIN_SENTINEL} Max: 0\n\
                 \n\
                 DateTime,CPU,GPU\n"
            )
        );
        assert!(!session.raw_path().exists());
        assert!(!session.is_recording());
    }

    #[test]
    fn full_session_summary_precedes_raw_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        session.start(&mut Answer(true), &mut stats).unwrap();

        for (i, (cpu, gpu)) in [(40, 30), (61, 50), (80, 70)].into_iter().enumerate() {
            stats.update(Channel::Cpu, cpu);
            stats.update(Channel::Gpu, gpu);
            session.append(at(i as u32), cpu, gpu).unwrap();
        }
        session.stop(&stats).unwrap();

        let summary = fs::read_to_string(session.summary_path()).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "CPU Avg: 60.33 Min: 40 Max: 80");
        assert_eq!(lines[1], "GPU Avg: 50.00 Min: 30 Max: 70");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "DateTime,CPU,GPU");
        assert_eq!(lines[4], "2024-03-01 12:00:00,40,30");
        assert_eq!(lines[6], "2024-03-01 12:00:02,80,70");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn stop_while_idle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        assert!(matches!(
            session.stop(&Statistics::new()),
            Err(SessionError::NotRecording)
        ));
    }

    #[test]
    fn failed_stop_keeps_raw_log_and_goes_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = LogSession::new(dir.path());
        let mut stats = Statistics::new();
        session.start(&mut Answer(true), &mut stats).unwrap();
        // a directory in the way of the summary file
        fs::create_dir(session.summary_path()).unwrap();

        assert!(session.stop(&stats).is_err());
        assert!(!session.is_recording());
        assert!(session.raw_path().exists());
    }
}
