//! Replay a trace through the path solver.

use std::path::PathBuf;

use reframe_common::clock::FrameTicker;
use reframe_path_solver::replay::{replay, ReplayOptions};
use reframe_path_solver::{KinematicOptions, KinematicPathSolver};
use reframe_trace_model::solved::{solved_to_jsonl, SolvedHeader};
use reframe_trace_model::trace::Axis;

pub struct SolveArgs {
    pub trace: PathBuf,
    pub options: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub tick_us: u64,
    pub skip_rejected: bool,
    pub min_location: Option<i32>,
    pub max_location: Option<i32>,
    pub pixels_per_degree: Option<f64>,
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let trace = super::load_trace(&args.trace)?;
    eprintln!(
        "Loaded {} records from {}",
        trace.records.len(),
        args.trace.display()
    );

    let options = match &args.options {
        Some(path) => KinematicOptions::from_json_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load options: {e}"))?,
        None => KinematicOptions::default(),
    };
    options
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid solver options: {e}"))?;

    let header = trace.header.as_ref();
    let min_location = args
        .min_location
        .or(header.map(|h| h.min_location))
        .ok_or_else(|| anyhow::anyhow!("Trace has no header; pass --min-location"))?;
    let max_location = args
        .max_location
        .or(header.map(|h| h.max_location))
        .ok_or_else(|| anyhow::anyhow!("Trace has no header; pass --max-location"))?;
    let pixels_per_degree = args
        .pixels_per_degree
        .or(header.map(|h| h.pixels_per_degree))
        .ok_or_else(|| anyhow::anyhow!("Trace has no header; pass --pixels-per-degree"))?;
    let axis = header.map(|h| h.axis).unwrap_or(Axis::Pan);

    tracing::debug!(
        min_location,
        max_location,
        pixels_per_degree,
        tick_us = args.tick_us,
        "building solver"
    );
    let mut solver =
        KinematicPathSolver::new(options, min_location, max_location, pixels_per_degree);
    let replay_options = ReplayOptions {
        ticker: FrameTicker::from_interval_us(args.tick_us),
        skip_rejected: args.skip_rejected,
    };

    let report = replay(&mut solver, &trace.records, &replay_options)
        .map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;

    let jsonl = solved_to_jsonl(&SolvedHeader::new(axis, report.samples.len()), &report.samples)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, jsonl)?;
            eprintln!("  Solved path written to: {}", path.display());
        }
        None => print!("{jsonl}"),
    }

    eprintln!(
        "  {} samples ({} ticks inserted)",
        report.samples.len(),
        report.ticks_inserted
    );
    if !report.rejected.is_empty() {
        eprintln!("  {} record(s) rejected:", report.rejected.len());
        for rejected in &report.rejected {
            eprintln!(
                "    - record {} (t={}us): {}",
                rejected.index, rejected.timestamp_us, rejected.error
            );
        }
    }
    if let (Ok(position), Ok(target)) = (solver.get_state(), solver.get_target_position()) {
        eprintln!("  Final position: {position} (target {target})");
    }

    Ok(())
}
