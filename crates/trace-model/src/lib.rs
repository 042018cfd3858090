//! Reframe Trace Model
//!
//! Serializable data for feeding and inspecting the path solver:
//! - **Traces:** JSONL recordings of observations and reconfiguration events
//! - **Solved paths:** per-record solver output for downstream renderers

pub mod solved;
pub mod trace;

pub use solved::{solved_to_jsonl, SolvedHeader, SolvedSample};
pub use trace::{
    parse_trace, Axis, RecordCounts, RecordKind, TimestampUs, Trace, TraceHeader, TraceRecord,
    TRACE_SCHEMA_VERSION,
};
