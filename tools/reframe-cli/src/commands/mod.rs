//! CLI command implementations.

pub mod info;
pub mod init;
pub mod solve;
pub mod validate;

use std::path::Path;

use reframe_trace_model::trace::{parse_trace, Trace};

/// Read and parse a trace file.
pub(crate) fn load_trace(path: &Path) -> anyhow::Result<Trace> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read trace {}: {e}", path.display()))?;
    parse_trace(&content).map_err(|e| anyhow::anyhow!("Failed to parse trace: {e}"))
}
