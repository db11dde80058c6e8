//! Settings file for the `canvas` binary

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{
    CanvasError, ClientConfig, Result,
    config::{HOST_ENV, TOKEN_ENV},
};

const CONFIG_FILE: &str = "canvas-lms.toml";

/// Values read from `canvas-lms.toml`; flags and environment variables win
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub canvas_host: Option<String>,
    pub canvas_token: Option<String>,
    pub log_level: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join(CONFIG_FILE)
    } else {
        PathBuf::from(CONFIG_FILE)
    }
}

/// Read the settings file; a missing file yields the defaults
pub fn load_config(config_file: &Path) -> Result<CanvasConfig> {
    if !config_file.exists() {
        debug!(path = %config_file.display(), "No config file, using defaults");
        return Ok(CanvasConfig::default());
    }

    confy::load_path(config_file).map_err(|e| {
        CanvasError::config(
            "config_file",
            format!("Failed to load configuration from {}: {e}", config_file.display()),
        )
    })
}

pub fn save_config(config_file: &Path, config: &CanvasConfig) -> Result<()> {
    confy::store_path(config_file, config).map_err(|e| {
        CanvasError::config(
            "config_file",
            format!("Failed to save configuration to {}: {e}", config_file.display()),
        )
    })
}

impl CanvasConfig {
    /// Overlay non-empty values; anything else keeps what the file has
    pub fn updated(
        mut self,
        host: Option<String>,
        token: Option<String>,
        log_level: Option<String>,
    ) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        if let Some(host) = non_empty(host) {
            self.canvas_host = Some(host);
        }
        if let Some(token) = non_empty(token) {
            self.canvas_token = Some(token);
        }
        if let Some(log_level) = non_empty(log_level) {
            self.log_level = Some(log_level);
        }
        self
    }

    /// The stored token with all but its last four characters hidden
    pub fn masked_token(&self) -> Option<String> {
        self.canvas_token.as_deref().map(|token| {
            let visible = token.len().saturating_sub(4);
            match token.get(visible..) {
                Some(tail) if visible > 0 => format!("{}{tail}", "*".repeat(visible)),
                _ => "*".repeat(token.chars().count()),
            }
        })
    }

    /// Resolve credentials: explicit values first, then `CANVAS_TOKEN` /
    /// `CANVAS_HOST` (a `.env` file included), then this file.
    pub fn client_config(
        &self,
        token: Option<String>,
        host: Option<String>,
    ) -> Result<ClientConfig> {
        // A missing .env file is not an error
        let _ = dotenv::dotenv();

        let token = pick(token, TOKEN_ENV, self.canvas_token.as_deref());
        let host = pick(host, HOST_ENV, self.canvas_host.as_deref());
        ClientConfig::resolve(token, host)
    }
}

fn pick(explicit: Option<String>, env_var: &str, file: Option<&str>) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
        .or_else(|| file.filter(|v| !v.is_empty()).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_file() {
        let picked = pick(Some("flag".into()), "CANVAS_LMS_TEST_UNSET", Some("file"));
        assert_eq!(picked.as_deref(), Some("flag"));

        let picked = pick(Some(String::new()), "CANVAS_LMS_TEST_UNSET", Some("file"));
        assert_eq!(picked.as_deref(), Some("file"));

        assert_eq!(pick(None, "CANVAS_LMS_TEST_UNSET", None), None);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("canvas-lms-missing-config.toml");
        assert_eq!(load_config(&path).unwrap(), CanvasConfig::default());
    }

    #[test]
    fn update_keeps_unset_fields() {
        let stored = CanvasConfig {
            canvas_host: Some("https://old.example.edu".into()),
            canvas_token: Some("old-token".into()),
            log_level: None,
        };

        let updated = stored.updated(
            Some("https://canvas.example.edu".into()),
            Some(String::new()),
            Some("debug".into()),
        );

        assert_eq!(updated.canvas_host.as_deref(), Some("https://canvas.example.edu"));
        assert_eq!(updated.canvas_token.as_deref(), Some("old-token"));
        assert_eq!(updated.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn token_is_masked_for_display() {
        let config = CanvasConfig {
            canvas_token: Some("1234~abcdwxyz".into()),
            ..Default::default()
        };
        assert_eq!(config.masked_token().as_deref(), Some("*********wxyz"));

        let short = CanvasConfig { canvas_token: Some("abc".into()), ..Default::default() };
        assert_eq!(short.masked_token().as_deref(), Some("***"));
        assert_eq!(CanvasConfig::default().masked_token(), None);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("canvas-lms-{}.toml", std::process::id()));
        let config = CanvasConfig {
            canvas_host: Some("https://canvas.example.edu".into()),
            canvas_token: Some("token".into()),
            log_level: Some("debug".into()),
        };

        save_config(&path, &config).unwrap();
        assert!(path.exists());
        assert_eq!(load_config(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }
}
