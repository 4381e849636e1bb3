//! Experience thresholds per growth rate.
//!
//! Closed-form piecewise formulas for levels 1..=100. Every value is floored
//! at zero and rounded to one decimal place. Independent of the index
//! pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

pub const MAX_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthRate {
    Erratic,
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Fluctuating,
}

impl GrowthRate {
    pub const ALL: [GrowthRate; 6] = [
        GrowthRate::Erratic,
        GrowthRate::Fast,
        GrowthRate::MediumFast,
        GrowthRate::MediumSlow,
        GrowthRate::Slow,
        GrowthRate::Fluctuating,
    ];

    /// Total experience needed to reach `level`.
    pub fn experience(self, level: u32) -> f64 {
        let n = level as f64;
        let cube = n.powi(3);
        let raw = match self {
            GrowthRate::Erratic => match level {
                0..=49 => cube * (100.0 - n) / 50.0,
                50..=67 => cube * (150.0 - n) / 100.0,
                68..=97 => cube * ((1911 - 10 * level as i64) / 3) as f64 / 500.0,
                _ => cube * (160.0 - n) / 100.0,
            },
            GrowthRate::Fast => 4.0 * cube / 5.0,
            GrowthRate::MediumFast => cube,
            GrowthRate::MediumSlow => 1.2 * cube - 15.0 * n * n + 100.0 * n - 140.0,
            GrowthRate::Slow => 5.0 * cube / 4.0,
            GrowthRate::Fluctuating => match level {
                0..=14 => cube * (((level + 1) / 3) as f64 + 24.0) / 50.0,
                15..=35 => cube * (n + 14.0) / 50.0,
                _ => cube * ((level / 2) as f64 + 32.0) / 50.0,
            },
        };
        round1(raw).max(0.0)
    }
}

/// One decimal place, exact halves to even.
fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

/// `{growth rate: {level: experience}}` for levels 1..=100.
pub type XpTable = BTreeMap<GrowthRate, BTreeMap<u32, f64>>;

pub fn xp_table() -> XpTable {
    GrowthRate::ALL
        .iter()
        .map(|rate| {
            let levels = (1..=MAX_LEVEL)
                .map(|level| (level, rate.experience(level)))
                .collect();
            (*rate, levels)
        })
        .collect()
}

/// Print the table as JSON, or write it to `output`.
pub fn run_xp(output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&xp_table())?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} growth rates x {} levels to {}",
                GrowthRate::ALL.len(),
                MAX_LEVEL,
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
