//! Show trace information.

use std::path::PathBuf;

use reframe_common::clock::us_to_secs;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let trace = super::load_trace(&path)?;

    println!("Trace: {}", path.display());
    match &trace.header {
        Some(header) => {
            println!("  Schema: v{}", header.schema_version);
            println!("  Axis: {:?}", header.axis);
            println!("  Bounds: [{}, {}]", header.min_location, header.max_location);
            println!("  Pixels per degree: {}", header.pixels_per_degree);
            if let Some(recorded_at) = &header.recorded_at {
                println!("  Recorded: {recorded_at}");
            }
        }
        None => println!("  Header: none"),
    }

    let counts = trace.counts();
    println!("  Records: {}", trace.records.len());
    println!("    observations: {}", counts.observations);
    println!("    ticks: {}", counts.ticks);
    println!("    bounds changes: {}", counts.bounds);
    println!("    scale changes: {}", counts.scales);
    println!("    overrides: {}", counts.overrides);
    println!("    resets: {}", counts.resets);

    if let Some((first, last)) = trace.time_span_us() {
        let duration = us_to_secs(last.saturating_sub(first));
        println!("  Duration: {duration:.3}s");
        if counts.observations > 1 {
            println!(
                "  Mean observation rate: {:.1} Hz",
                (counts.observations - 1) as f64 / duration.max(f64::EPSILON)
            );
        }
    }
    if let Some((lo, hi)) = trace.position_range() {
        println!("  Observed positions: [{lo}, {hi}]");
    }

    let out_of_order = trace.out_of_order_records();
    if !out_of_order.is_empty() {
        println!(
            "\n{} record(s) do not advance time and will be rejected by the solver:",
            out_of_order.len()
        );
        for index in out_of_order.iter().take(10) {
            println!("  - record {index}");
        }
    }

    Ok(())
}
