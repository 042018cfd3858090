//! Solved camera path output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trace::{Axis, TimestampUs};

/// Solver output after processing one trace record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvedSample {
    #[serde(rename = "t")]
    pub timestamp_us: TimestampUs,

    /// Rounded camera position (pixels).
    pub position: i32,

    /// Rounded target position (pixels).
    pub target: i32,

    /// Rate-limited velocity (degrees per second).
    pub velocity_deg_s: f64,

    /// Whether the camera is actively retargeting.
    pub moving: bool,
}

/// First line of a solved-path file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedHeader {
    pub schema_version: String,
    pub axis: Axis,
    pub generated_at: DateTime<Utc>,
    pub sample_count: usize,
}

impl SolvedHeader {
    pub fn new(axis: Axis, sample_count: usize) -> Self {
        Self {
            schema_version: crate::trace::TRACE_SCHEMA_VERSION.to_string(),
            axis,
            generated_at: Utc::now(),
            sample_count,
        }
    }
}

/// Render a solved path as JSONL with a `#`-prefixed header line.
pub fn solved_to_jsonl(
    header: &SolvedHeader,
    samples: &[SolvedSample],
) -> Result<String, serde_json::Error> {
    let mut out = format!("# {}\n", serde_json::to_string(header)?);
    for sample in samples {
        out.push_str(&serde_json::to_string(sample)?);
        out.push('\n');
    }
    Ok(out)
}
