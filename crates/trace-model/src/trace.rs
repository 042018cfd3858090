//! Observation trace types.
//!
//! A trace is an append-only JSONL stream. Lines starting with `#` carry
//! a JSON [`TraceHeader`]; every other non-blank line is one
//! [`TraceRecord`]. Timestamps are monotonic microseconds.

use reframe_common::error::{ReframeError, ReframeResult};
use serde::{Deserialize, Serialize};

/// Monotonic timestamp in microseconds.
pub type TimestampUs = u64;

/// Current trace schema version.
pub const TRACE_SCHEMA_VERSION: &str = "1";

/// Spatial axis a trace (and the solver replaying it) is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal framing.
    #[default]
    Pan,
    /// Vertical framing.
    Tilt,
    /// Crop size.
    Zoom,
}

/// Trace metadata: the solver construction parameters the trace was recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    #[serde(default)]
    pub axis: Axis,

    /// Lower bound of the output range (pixels).
    pub min_location: i32,

    /// Upper bound of the output range (pixels).
    pub max_location: i32,

    /// Initial pixels-per-degree calibration.
    pub pixels_per_degree: f64,

    /// Wall-clock time the trace was recorded (RFC 3339), if known.
    #[serde(default)]
    pub recorded_at: Option<String>,
}

/// A single trace record with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Monotonic microseconds.
    #[serde(rename = "t")]
    pub timestamp_us: TimestampUs,

    /// The record payload.
    #[serde(flatten)]
    pub kind: RecordKind,
}

/// Discriminated union of trace record types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    /// Raw observed position of the tracked subject.
    Observation { position: i32 },

    /// Render-loop poll with no new observation.
    Tick,

    /// Output range changed (resolution or crop-size change).
    Bounds { min_location: i32, max_location: i32 },

    /// Camera calibration changed.
    Scale { pixels_per_degree: f64 },

    /// Force the camera position.
    Override { position: i32 },

    /// Drop the observation history (e.g. on a scene cut).
    Reset,
}

impl TraceRecord {
    pub fn observation(timestamp_us: TimestampUs, position: i32) -> Self {
        Self {
            timestamp_us,
            kind: RecordKind::Observation { position },
        }
    }

    pub fn tick(timestamp_us: TimestampUs) -> Self {
        Self {
            timestamp_us,
            kind: RecordKind::Tick,
        }
    }

    /// Observed position if this record carries one.
    pub fn observed_position(&self) -> Option<i32> {
        match self.kind {
            RecordKind::Observation { position } => Some(position),
            _ => None,
        }
    }
}

/// A parsed trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub header: Option<TraceHeader>,
    pub records: Vec<TraceRecord>,
}

/// Per-kind record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub observations: usize,
    pub ticks: usize,
    pub bounds: usize,
    pub scales: usize,
    pub overrides: usize,
    pub resets: usize,
}

impl Trace {
    /// Number of records of each kind.
    pub fn counts(&self) -> RecordCounts {
        let mut counts = RecordCounts::default();
        for record in &self.records {
            match record.kind {
                RecordKind::Observation { .. } => counts.observations += 1,
                RecordKind::Tick => counts.ticks += 1,
                RecordKind::Bounds { .. } => counts.bounds += 1,
                RecordKind::Scale { .. } => counts.scales += 1,
                RecordKind::Override { .. } => counts.overrides += 1,
                RecordKind::Reset => counts.resets += 1,
            }
        }
        counts
    }

    /// First and last record timestamps.
    pub fn time_span_us(&self) -> Option<(TimestampUs, TimestampUs)> {
        let first = self.records.first()?.timestamp_us;
        let last = self.records.last()?.timestamp_us;
        Some((first, last))
    }

    /// Minimum and maximum observed position.
    pub fn position_range(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(TraceRecord::observed_position)
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })
    }

    /// Indices of records whose timestamp does not advance past the previous one.
    pub fn out_of_order_records(&self) -> Vec<usize> {
        self.records
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1].timestamp_us <= pair[0].timestamp_us)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Serialize back to JSONL, header first.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str("# ");
            out.push_str(&serde_json::to_string(header)?);
            out.push('\n');
        }
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Parse a trace from JSONL content.
///
/// The first `#` line that parses as a header is kept; other `#` lines are
/// comments. Errors carry the 1-based line number.
pub fn parse_trace(jsonl: &str) -> ReframeResult<Trace> {
    let mut trace = Trace::default();

    for (idx, line) in jsonl.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if trace.header.is_none() {
                if let Ok(header) = serde_json::from_str::<TraceHeader>(comment.trim()) {
                    if !trace.records.is_empty() {
                        return Err(ReframeError::trace(
                            line_no,
                            "header must precede all records",
                        ));
                    }
                    trace.header = Some(header);
                }
            }
            continue;
        }

        let record: TraceRecord = serde_json::from_str(line)
            .map_err(|e| ReframeError::trace(line_no, e.to_string()))?;
        trace.records.push(record);
    }

    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# {"schema_version":"1","axis":"tilt","min_location":0,"max_location":720,"pixels_per_degree":12.5}
{"t":0,"type":"observation","position":360}
{"t":33333,"type":"tick"}
{"t":66666,"type":"observation","position":400}
# scene cut
{"t":100000,"type":"reset"}
{"t":133333,"type":"bounds","min_location":0,"max_location":1080}
{"t":166666,"type":"scale","pixels_per_degree":18.0}
{"t":200000,"type":"override","position":500}
"#;

    #[test]
    fn test_parse_sample_trace() {
        let trace = parse_trace(SAMPLE).unwrap();
        let header = trace.header.as_ref().unwrap();
        assert_eq!(header.axis, Axis::Tilt);
        assert_eq!(header.max_location, 720);
        assert!(header.recorded_at.is_none());

        assert_eq!(trace.records.len(), 7);
        assert_eq!(trace.records[1].kind, RecordKind::Tick);
        assert_eq!(trace.records[3].kind, RecordKind::Reset);
        assert_eq!(
            trace.records[4].kind,
            RecordKind::Bounds {
                min_location: 0,
                max_location: 1080
            }
        );
    }

    #[test]
    fn test_counts_span_and_range() {
        let trace = parse_trace(SAMPLE).unwrap();
        let counts = trace.counts();
        assert_eq!(counts.observations, 2);
        assert_eq!(counts.ticks, 1);
        assert_eq!(counts.resets, 1);
        assert_eq!(counts.bounds, 1);
        assert_eq!(counts.scales, 1);
        assert_eq!(counts.overrides, 1);
        assert_eq!(trace.time_span_us(), Some((0, 200_000)));
        assert_eq!(trace.position_range(), Some((360, 400)));
        assert!(trace.out_of_order_records().is_empty());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_trace(
            "{\"t\":0,\"type\":\"observation\",\"position\":1}\n{\"t\":1,\"type\":\"warp\"}",
        )
        .unwrap_err();
        match err {
            ReframeError::Trace { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_after_records_is_rejected() {
        let content = "{\"t\":0,\"type\":\"tick\"}\n# {\"schema_version\":\"1\",\"min_location\":0,\"max_location\":10,\"pixels_per_degree\":1.0}";
        assert!(parse_trace(content).is_err());
    }

    #[test]
    fn test_out_of_order_detection() {
        let trace = Trace {
            header: None,
            records: vec![
                TraceRecord::observation(10, 1),
                TraceRecord::observation(10, 2),
                TraceRecord::tick(20),
                TraceRecord::tick(5),
            ],
        };
        assert_eq!(trace.out_of_order_records(), vec![1, 3]);
    }

    #[test]
    fn test_to_jsonl_parses_back() {
        let trace = parse_trace(SAMPLE).unwrap();
        let reparsed = parse_trace(&trace.to_jsonl().unwrap()).unwrap();
        assert_eq!(reparsed, trace);
    }

    mod props {
        use crate::trace::{Trace, TraceRecord};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn position_range_bounds_every_observation(
                positions in proptest::collection::vec(-5_000i32..5_000, 1..64)
            ) {
                let trace = Trace {
                    header: None,
                    records: positions
                        .iter()
                        .enumerate()
                        .map(|(i, p)| TraceRecord::observation(i as u64 * 1_000, *p))
                        .collect(),
                };
                let (lo, hi) = trace.position_range().unwrap();
                for p in &positions {
                    prop_assert!(lo <= *p && *p <= hi);
                }
            }
        }
    }
}
