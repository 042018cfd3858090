//! Write default solver options or application config.

use std::path::{Path, PathBuf};

use reframe_common::config::{config_file_path, AppConfig};
use reframe_path_solver::KinematicOptions;

pub fn run(path: Option<PathBuf>, write_config: bool, force: bool) -> anyhow::Result<()> {
    if write_config {
        let path = path.unwrap_or_else(config_file_path);
        ensure_writable(&path, force)?;
        AppConfig::default()
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Default config written to: {}", path.display());
        return Ok(());
    }

    let path = path.ok_or_else(|| anyhow::anyhow!("An output path is required"))?;
    ensure_writable(&path, force)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = KinematicOptions::default().to_json_pretty()?;
    std::fs::write(&path, format!("{json}\n"))?;

    println!("Default solver options written to: {}", path.display());
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Ok(())
}
