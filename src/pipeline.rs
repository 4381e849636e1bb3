//! Pipeline orchestration.
//!
//! For each candidate id, in order: fetch → skip on 404 → selection policy →
//! normalize → resolve references → merge into the index → persist when the
//! schedule says so. Ids are visited sequentially; a fatal error stops the
//! run and leaves the last persisted snapshot in place.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::index::{Index, IndexSink, JsonFileSink, PersistSchedule};
use crate::models::{ItemRecord, MoveRecord};
use crate::normalize::{normalize_item, normalize_move, FieldRules};
use crate::progress::{ProgressMode, SyncProgressEvent, SyncProgressReporter};
use crate::raw::{RawItem, RawMove};
use crate::resolve::resolve_item;
use crate::selection::{item_is_eligible, move_is_eligible};
use crate::source::{fetch_as, HttpSource, ResourceKind, ResourceRef, Source};

/// Which index to build.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PipelineKind {
    Items,
    Moves,
    All,
}

/// Command-line overrides for one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub output: Option<PathBuf>,
    pub dry_run: bool,
    pub progress: ProgressMode,
}

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    /// Ids that returned a record.
    pub fetched: u64,
    /// Ids the source reported as not found.
    pub absent: u64,
    /// Records rejected by the selection policy.
    pub skipped: u64,
    pub merged: u64,
    /// Snapshots handed to the sink.
    pub persisted: u64,
}

/// Outcome of processing one id.
pub enum Step<R> {
    Absent,
    Skipped,
    Record { key: String, record: R },
}

/// Walks `ids`, merging every produced record into `index`.
///
/// With `sink = None` nothing is persisted (dry run).
pub fn drive<R, F>(
    pipeline: &str,
    ids: RangeInclusive<u32>,
    index: &mut Index<R>,
    sink: Option<&dyn IndexSink>,
    persist_every: usize,
    progress: &dyn SyncProgressReporter,
    mut step: F,
) -> Result<SyncStats>
where
    R: Serialize,
    F: FnMut(u32) -> Result<Step<R>>,
{
    let total = ids.clone().count() as u64;
    let mut stats = SyncStats::default();
    let mut schedule = PersistSchedule::new(persist_every);

    progress.report(SyncProgressEvent::Starting {
        pipeline: pipeline.to_string(),
        total,
    });

    for (n, id) in ids.enumerate() {
        progress.report(SyncProgressEvent::Fetching {
            pipeline: pipeline.to_string(),
            id,
            n: n as u64 + 1,
            total,
            merged: stats.merged,
        });

        match step(id).with_context(|| format!("{} id {}", pipeline, id))? {
            Step::Absent => {
                debug!(pipeline, id, "not found");
                stats.absent += 1;
            }
            Step::Skipped => {
                debug!(pipeline, id, "outside target generations");
                stats.fetched += 1;
                stats.skipped += 1;
            }
            Step::Record { key, record } => {
                stats.fetched += 1;
                debug!(pipeline, id, %key, "merged");
                index.merge(key, record);
                stats.merged += 1;

                if schedule.record_merge() {
                    if let Some(sink) = sink {
                        index.persist(sink)?;
                        stats.persisted += 1;
                    }
                    schedule.mark_persisted();
                }
            }
        }
    }

    if schedule.has_pending() {
        if let Some(sink) = sink {
            index.persist(sink)?;
            stats.persisted += 1;
        }
    }

    Ok(stats)
}

/// Fetch, select, normalize and resolve one item id.
pub fn item_step(
    source: &dyn Source,
    targets: &[String],
    rules: &FieldRules,
    id: u32,
) -> Result<Step<ItemRecord>> {
    let raw: Option<RawItem> = fetch_as(source, &ResourceRef::id(ResourceKind::Item, id))?;
    let Some(raw) = raw else {
        return Ok(Step::Absent);
    };
    if !item_is_eligible(&raw, targets) {
        return Ok(Step::Skipped);
    }

    let mut record = normalize_item(&raw, rules);
    resolve_item(source, &raw, &mut record, rules)?;
    Ok(Step::Record {
        key: raw.name,
        record,
    })
}

/// Fetch, select and normalize one move id.
pub fn move_step(
    source: &dyn Source,
    targets: &[String],
    rules: &FieldRules,
    id: u32,
) -> Result<Step<MoveRecord>> {
    let raw: Option<RawMove> = fetch_as(source, &ResourceRef::id(ResourceKind::Move, id))?;
    let Some(raw) = raw else {
        return Ok(Step::Absent);
    };
    if !move_is_eligible(&raw, targets) {
        return Ok(Step::Skipped);
    }

    let record = normalize_move(&raw, rules)?;
    Ok(Step::Record {
        key: raw.name,
        record,
    })
}

pub fn sync_items(
    config: &Config,
    source: &dyn Source,
    ids: RangeInclusive<u32>,
    sink: Option<&dyn IndexSink>,
    progress: &dyn SyncProgressReporter,
) -> Result<(Index<ItemRecord>, SyncStats)> {
    let rules = FieldRules::from(&config.items);
    let targets = &config.items.target_generations;
    let mut index = Index::new();
    let stats = drive(
        "items",
        ids,
        &mut index,
        sink,
        config.items.persist_every,
        progress,
        |id| item_step(source, targets, &rules, id),
    )?;
    Ok((index, stats))
}

pub fn sync_moves(
    config: &Config,
    source: &dyn Source,
    ids: RangeInclusive<u32>,
    sink: Option<&dyn IndexSink>,
    progress: &dyn SyncProgressReporter,
) -> Result<(Index<MoveRecord>, SyncStats)> {
    let rules = FieldRules::from(&config.moves);
    let targets = &config.moves.target_generations;
    let mut index = Index::new();
    let stats = drive(
        "moves",
        ids,
        &mut index,
        sink,
        config.moves.persist_every,
        progress,
        |id| move_step(source, targets, &rules, id),
    )?;
    Ok((index, stats))
}

fn id_range(start: u32, end: u32, options: &SyncOptions) -> Result<RangeInclusive<u32>> {
    let start = options.start.unwrap_or(start);
    let end = options.end.unwrap_or(end);
    if start == 0 || start > end {
        bail!("invalid id range {}..={}", start, end);
    }
    Ok(start..=end)
}

pub fn run_sync(config: &Config, kind: PipelineKind, options: &SyncOptions) -> Result<()> {
    if kind == PipelineKind::All && options.output.is_some() {
        bail!("--output names a single file; run items and moves separately");
    }

    let source = HttpSource::new(&config.source)?;
    let reporter = options.progress.reporter();

    if matches!(kind, PipelineKind::Items | PipelineKind::All) {
        let ids = id_range(config.items.id_start, config.items.id_end, options)?;
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| config.items.output.clone());
        let sink = JsonFileSink::new(&output);
        info!(
            start = ids.start(),
            end = ids.end(),
            output = %output.display(),
            "building item index"
        );

        let sink_ref: Option<&dyn IndexSink> = if options.dry_run {
            None
        } else {
            Some(&sink)
        };
        let (index, stats) =
            sync_items(config, &source, ids.clone(), sink_ref, reporter.as_ref())?;
        print_summary("items", &ids, &stats, index.len(), &sink, options.dry_run);
    }

    if matches!(kind, PipelineKind::Moves | PipelineKind::All) {
        let ids = id_range(config.moves.id_start, config.moves.id_end, options)?;
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| config.moves.output.clone());
        let sink = JsonFileSink::new(&output);
        info!(
            start = ids.start(),
            end = ids.end(),
            output = %output.display(),
            "building move index"
        );

        let sink_ref: Option<&dyn IndexSink> = if options.dry_run {
            None
        } else {
            Some(&sink)
        };
        let (index, stats) =
            sync_moves(config, &source, ids.clone(), sink_ref, reporter.as_ref())?;
        print_summary("moves", &ids, &stats, index.len(), &sink, options.dry_run);
    }

    Ok(())
}

fn print_summary(
    pipeline: &str,
    ids: &RangeInclusive<u32>,
    stats: &SyncStats,
    entries: usize,
    sink: &dyn IndexSink,
    dry_run: bool,
) {
    if dry_run {
        println!("sync {} (dry-run)", pipeline);
    } else {
        println!("sync {}", pipeline);
    }
    println!("  ids: {}..={}", ids.start(), ids.end());
    println!("  fetched: {}", stats.fetched);
    println!("  not found: {}", stats.absent);
    println!("  skipped (generation): {}", stats.skipped);
    println!("  merged: {}", stats.merged);
    println!("  index entries: {}", entries);
    if !dry_run {
        println!("  snapshots written: {}", stats.persisted);
        println!("  output: {}", sink.describe());
    }
    println!("ok");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemorySink;
    use crate::progress::NoProgress;

    fn numbers(id: u32) -> Result<Step<u32>> {
        Ok(match id % 3 {
            0 => Step::Absent,
            1 => Step::Skipped,
            _ => Step::Record {
                key: format!("n{}", id),
                record: id,
            },
        })
    }

    #[test]
    fn drive_counts_each_outcome() {
        let sink = MemorySink::new();
        let mut index = Index::new();
        let stats =
            drive("test", 1..=6, &mut index, Some(&sink), 1, &NoProgress, numbers).unwrap();
        assert_eq!(
            stats,
            SyncStats {
                fetched: 4,
                absent: 2,
                skipped: 2,
                merged: 2,
                persisted: 2,
            }
        );
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["n2", "n5"]);
    }

    #[test]
    fn drive_dry_run_never_persists() {
        let mut index = Index::new();
        let stats = drive("test", 1..=6, &mut index, None, 1, &NoProgress, numbers).unwrap();
        assert_eq!(stats.persisted, 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn drive_batches_and_flushes_tail() {
        let sink = MemorySink::new();
        let mut index = Index::new();
        // Records at 2, 5, 8: one batch of two, then a final flush.
        let stats =
            drive("test", 1..=9, &mut index, Some(&sink), 2, &NoProgress, numbers).unwrap();
        assert_eq!(stats.persisted, 2);
        assert_eq!(sink.last().unwrap(), r#"{"n2":2,"n5":5,"n8":8}"#);
    }

    #[test]
    fn drive_stops_on_error_keeping_last_snapshot() {
        let sink = MemorySink::new();
        let mut index = Index::new();
        let result = drive("test", 1..=9, &mut index, Some(&sink), 1, &NoProgress, |id| {
            if id == 7 {
                bail!("boom");
            }
            numbers(id)
        });
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("test id 7"));
        assert_eq!(sink.last().unwrap(), r#"{"n2":2,"n5":5}"#);
    }

    #[test]
    fn id_range_applies_overrides() {
        let options = SyncOptions {
            start: Some(10),
            end: None,
            output: None,
            dry_run: false,
            progress: ProgressMode::Off,
        };
        assert_eq!(id_range(1, 20, &options).unwrap(), 10..=20);

        let inverted = SyncOptions {
            end: Some(5),
            ..options
        };
        assert!(id_range(1, 20, &inverted).is_err());
    }
}
