// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tables and JSON documents written to stdout.

use std::io::Write;

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use ucn_core::OutcomeKind;
use ucn_run::{ParticleRecord, RunConfig, Tally};

/// What `ucn run --format json` prints.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub seed: u64,
    pub particles: u64,
    pub workers: usize,
    pub tally: &'a Tally,
}

pub fn tally_table(config: &RunConfig, tally: &Tally) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["outcome", "count", "fraction"]);
    for kind in OutcomeKind::TERMINAL {
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(tally.count(kind)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", tally.fraction(kind))).set_alignment(CellAlignment::Right),
        ]);
    }
    for (reason, count) in &tally.anomalies {
        table.add_row(vec![
            Cell::new(format!("  {}", reason.label())),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(""),
        ]);
    }
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(tally.particles).set_alignment(CellAlignment::Right),
        Cell::new(format!("seed {}", config.seed)),
    ]);
    table
}

pub fn totals_table(tally: &Tally) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["quantity", "value"]);
    let mean = tally.mean_lifetime().map_or_else(|| "-".to_owned(), |t| format!("{t:.3} s"));
    table.add_row(vec!["mean final time".to_owned(), mean]);
    table.add_row(vec!["specular bounces".to_owned(), tally.specular_bounces.to_string()]);
    table.add_row(vec!["diffuse bounces".to_owned(), tally.diffuse_bounces.to_string()]);
    table.add_row(vec!["path length".to_owned(), format!("{:.3} m", tally.total_distance)]);
    table
}

pub fn record_table(record: &ParticleRecord) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["field", "value"]);
    let [x, y, z] = record.position.to_array();
    let [vx, vy, vz] = record.velocity.to_array();
    table.add_row(vec!["particle".to_owned(), record.id.to_string()]);
    table.add_row(vec!["seed".to_owned(), format!("{:#018x}", record.seed)]);
    table.add_row(vec!["outcome".to_owned(), record.outcome.to_string()]);
    table.add_row(vec!["time".to_owned(), format!("{:.6} s", record.time)]);
    table.add_row(vec!["position".to_owned(), format!("({x:.4}, {y:.4}, {z:.4}) m")]);
    table.add_row(vec!["velocity".to_owned(), format!("({vx:.4}, {vy:.4}, {vz:.4}) m/s")]);
    table.add_row(vec!["path length".to_owned(), format!("{:.4} m", record.distance)]);
    table.add_row(vec![
        "bounces".to_owned(),
        format!("{} specular, {} diffuse", record.bounces.specular, record.bounces.diffuse),
    ]);
    table
}

pub fn print_tables(tables: &[Table]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for table in tables {
        writeln!(out, "{table}")?;
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
