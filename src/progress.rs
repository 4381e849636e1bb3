//! Sync progress reporting.
//!
//! Reports which id is being fetched and how many records have been merged
//! so far. Progress is emitted on **stderr** so stdout stays parseable for
//! scripts (the run summary goes to stdout).

use std::io::Write;

use clap::ValueEnum;

/// A single progress event for sync.
#[derive(Clone, Debug)]
pub enum SyncProgressEvent {
    /// A pipeline is starting over `total` candidate ids.
    Starting { pipeline: String, total: u64 },
    /// `n` of `total` ids have been visited; `merged` records are in the index.
    Fetching {
        pipeline: String,
        id: u32,
        n: u64,
        total: u64,
        merged: u64,
    },
}

/// Reports sync progress. Implementations write to stderr (human or JSON).
pub trait SyncProgressReporter {
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly progress on stderr: "sync items  id 12  12 / 569  merged 4".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = match &event {
            SyncProgressEvent::Starting { pipeline, total } => {
                format!("sync {}  {} ids\n", pipeline, format_number(*total))
            }
            SyncProgressEvent::Fetching {
                pipeline,
                id,
                n,
                total,
                merged,
            } => format!(
                "sync {}  id {}  {} / {}  merged {}\n",
                pipeline,
                id,
                format_number(*n),
                format_number(*total),
                format_number(*merged)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        let obj = match &event {
            SyncProgressEvent::Starting { pipeline, total } => serde_json::json!({
                "event": "progress",
                "pipeline": pipeline,
                "phase": "starting",
                "total": total
            }),
            SyncProgressEvent::Fetching {
                pipeline,
                id,
                n,
                total,
                merged,
            } => serde_json::json!({
                "event": "progress",
                "pipeline": pipeline,
                "phase": "fetching",
                "id": id,
                "n": n,
                "total": total,
                "merged": merged
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    Auto,
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Resolve `Auto` against the current stderr.
    pub fn resolve(self) -> Self {
        match self {
            ProgressMode::Auto => {
                if atty::is(atty::Stream::Stderr) {
                    ProgressMode::Human
                } else {
                    ProgressMode::Off
                }
            }
            other => other,
        }
    }

    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self.resolve() {
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
            ProgressMode::Off | ProgressMode::Auto => Box::new(NoProgress),
        }
    }
}
