use std::path::Path;

use canvas_lms::config::{CanvasConfig, save_config};
use color_eyre::eyre::Result;
use tracing::info;

/// Persist `--host` / `--token` and the log level into the settings file
pub fn save(
    path: &Path,
    settings: CanvasConfig,
    host: Option<String>,
    token: Option<String>,
    log_level: Option<String>,
) -> Result<()> {
    let updated = settings.updated(host, token, log_level);

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    save_config(path, &updated)?;

    info!(path = %path.display(), "Settings saved");
    println!("Saved settings to {}", path.display());
    show(path, &updated);
    Ok(())
}

pub fn show(path: &Path, settings: &CanvasConfig) {
    let unset = || "(not set)".to_string();

    println!("Config file: {}", path.display());
    println!("  canvas_host:  {}", settings.canvas_host.clone().unwrap_or_else(unset));
    println!("  canvas_token: {}", settings.masked_token().unwrap_or_else(unset));
    println!("  log_level:    {}", settings.log_level.clone().unwrap_or_else(unset));
}
