//! Drive a solver from a recorded trace.
//!
//! Each trace record maps onto one solver call. With a frame ticker
//! enabled, prediction ticks are inserted between records the way a
//! render loop polls the solver once per frame.

use reframe_common::clock::FrameTicker;
use reframe_common::error::{ReframeError, ReframeResult};
use reframe_trace_model::solved::SolvedSample;
use reframe_trace_model::trace::{RecordKind, TraceHeader, TraceRecord};

use crate::error::{SolverError, SolverResult};
use crate::options::KinematicOptions;
use crate::solver::KinematicPathSolver;

/// Replay behaviour.
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    /// Prediction ticks inserted between records.
    pub ticker: FrameTicker,

    /// Log and skip records the solver rejects instead of aborting.
    pub skip_rejected: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            ticker: FrameTicker::from_interval_us(0),
            skip_rejected: false,
        }
    }
}

/// A record the solver refused.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub timestamp_us: u64,
    pub error: SolverError,
}

/// Output of a replay run.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    /// One sample per applied record and per inserted tick, in time order.
    pub samples: Vec<SolvedSample>,
    pub rejected: Vec<RejectedRecord>,
    pub ticks_inserted: usize,
}

/// Build a solver from a trace header.
pub fn solver_for_header(options: KinematicOptions, header: &TraceHeader) -> KinematicPathSolver {
    KinematicPathSolver::new(
        options,
        header.min_location,
        header.max_location,
        header.pixels_per_degree,
    )
}

/// Replay `records` through `solver`.
///
/// Fails on the first rejected record unless `skip_rejected` is set.
pub fn replay(
    solver: &mut KinematicPathSolver,
    records: &[TraceRecord],
    options: &ReplayOptions,
) -> ReframeResult<ReplayReport> {
    let mut report = ReplayReport::default();
    let mut last_sample_us: Option<u64> = None;

    for (index, record) in records.iter().enumerate() {
        if options.ticker.is_enabled() {
            if let Some(from_us) = solver.current_time_us() {
                for tick_us in options.ticker.ticks_between(from_us, record.timestamp_us) {
                    if last_sample_us.is_some_and(|last| tick_us <= last) {
                        continue;
                    }
                    solver.update_prediction(tick_us)?;
                    report.ticks_inserted += 1;
                    push_sample(&mut report, &mut last_sample_us, solver, tick_us);
                }
            }
        }

        match apply(solver, &record.kind, record.timestamp_us) {
            Ok(()) => push_sample(&mut report, &mut last_sample_us, solver, record.timestamp_us),
            Err(error) if options.skip_rejected => {
                tracing::warn!(
                    index,
                    timestamp_us = record.timestamp_us,
                    %error,
                    "skipping rejected record"
                );
                report.rejected.push(RejectedRecord {
                    index,
                    timestamp_us: record.timestamp_us,
                    error,
                });
            }
            Err(error) => {
                return Err(ReframeError::solver(format!(
                    "record {index} (t={}us): {error}",
                    record.timestamp_us
                )));
            }
        }
    }

    tracing::info!(
        records = records.len(),
        samples = report.samples.len(),
        ticks = report.ticks_inserted,
        rejected = report.rejected.len(),
        "replay finished"
    );
    Ok(report)
}

fn apply(
    solver: &mut KinematicPathSolver,
    kind: &RecordKind,
    timestamp_us: u64,
) -> SolverResult<()> {
    match *kind {
        RecordKind::Observation { position } => solver.add_observation(position, timestamp_us),
        RecordKind::Tick => solver.update_prediction(timestamp_us),
        RecordKind::Bounds {
            min_location,
            max_location,
        } => solver.update_min_max_location(min_location, max_location),
        RecordKind::Scale { pixels_per_degree } => {
            solver.update_pixels_per_degree(pixels_per_degree)
        }
        RecordKind::Override { position } => solver.set_state(position),
        RecordKind::Reset => {
            solver.clear_history();
            Ok(())
        }
    }
}

/// Current solver output, once initialized.
pub fn sample(solver: &KinematicPathSolver, timestamp_us: u64) -> Option<SolvedSample> {
    Some(SolvedSample {
        timestamp_us,
        position: solver.get_state().ok()?,
        target: solver.get_target_position().ok()?,
        velocity_deg_s: solver.current_velocity(),
        moving: solver.is_moving(),
    })
}

fn push_sample(
    report: &mut ReplayReport,
    last_sample_us: &mut Option<u64>,
    solver: &KinematicPathSolver,
    timestamp_us: u64,
) {
    if let Some(sample) = sample(solver, timestamp_us) {
        report.samples.push(sample);
        *last_sample_us = Some(timestamp_us);
    }
}
