//! Config file resolution and the `config` subcommand.

use std::path::{Path, PathBuf};

use anyhow::Result;
use psychoscore_config::{config_dir, config_file_path, load_and_prepare, redact, validate};

/// `--config` > `PSYCHOSCORE_CONFIG` > `<config dir>/config.yaml`.
pub fn resolve_config_path(flag: Option<PathBuf>) -> PathBuf {
    resolve_with(flag, std::env::var("PSYCHOSCORE_CONFIG").ok())
}

fn resolve_with(flag: Option<PathBuf>, env_path: Option<String>) -> PathBuf {
    flag.or_else(|| env_path.filter(|p| !p.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Prints the effective config with secrets masked, plus any warnings.
pub async fn run(path: &Path) -> Result<()> {
    let config = load_and_prepare(path).await?;
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&redact(&config))?);

    let report = validate(&config);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}
