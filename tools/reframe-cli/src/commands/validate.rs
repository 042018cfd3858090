//! Validate a solver options file.

use std::path::PathBuf;

use reframe_path_solver::motion::ReframeThreshold;
use reframe_path_solver::KinematicOptions;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating options at: {}", path.display());

    let options = KinematicOptions::from_json_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load options: {e}"))?;

    match options.validate() {
        Ok(threshold) => {
            match threshold {
                ReframeThreshold::Symmetric(value) => {
                    println!("  Reframe threshold: {value} deg (symmetric)")
                }
                ReframeThreshold::Asymmetric { upper, lower } => {
                    println!("  Reframe threshold: +{upper} / -{lower} deg (asymmetric)")
                }
            }
            println!("  Reframe window: {} deg", options.reframe_window);
            println!(
                "  Filtering window: {} ms",
                options.filtering_time_window_us as f64 / 1000.0
            );
            println!(
                "  Velocity: max {} deg/s, update rate {}s (max blend {})",
                options.max_velocity, options.update_rate_seconds, options.max_update_rate
            );
            println!("\nOptions are valid.");
            Ok(())
        }
        Err(e) => {
            println!("\nValidation failed:");
            println!("  - {e}");
            anyhow::bail!("invalid solver options")
        }
    }
}
