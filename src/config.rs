use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured chat endpoint.
pub const API_BASE_ENV: &str = "NESTEP_API_BASE";

/// Fallback chat endpoint when neither the environment nor the config file
/// provide one.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat backend (without the `/api/chat` path)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Nestep home directory (config, logs, transcripts)
    #[serde(skip)]
    pub nestep_home: PathBuf,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            api_base: default_api_base(),
            nestep_home: home.join(".nestep"),
        }
    }
}

impl Config {
    /// Load configuration from `~/.nestep/config.toml`, creating the home
    /// directory on first run. The `NESTEP_API_BASE` environment variable
    /// wins over the file.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Self::load_from(&home.join(".nestep"))
    }

    /// Load configuration rooted at an explicit home directory.
    pub fn load_from(nestep_home: &Path) -> Result<Self> {
        fs::create_dir_all(nestep_home)
            .context("Failed to create .nestep directory")?;

        let config_path = nestep_home.join("config.toml");
        let mut config: Config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.nestep_home = nestep_home.to_path_buf();
        config.api_base = resolve_api_base(
            std::env::var(API_BASE_ENV).ok().as_deref(),
            &config.api_base,
        );

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.nestep_home)
            .context("Failed to create .nestep directory")?;
        let config_path = self.nestep_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Diagnostic log file, kept out of the TUI's way.
    pub fn log_path(&self) -> PathBuf {
        self.nestep_home.join("nestep.log")
    }

    /// Directory where saved transcripts live.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.nestep_home.join("transcripts")
    }
}

/// Pick the effective endpoint: environment first, then the config file value,
/// ignoring blanks. Trailing slashes are stripped so the `/api/chat` path can
/// be appended uniformly.
fn resolve_api_base(env_value: Option<&str>, file_value: &str) -> String {
    let chosen = match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ if !file_value.trim().is_empty() => file_value,
        _ => DEFAULT_API_BASE,
    };
    chosen.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_wins_over_file() {
        let base = resolve_api_base(Some("https://chat.nestep.kr"), "http://other:9000");
        assert_eq!(base, "https://chat.nestep.kr");
    }

    #[test]
    fn blank_env_falls_back_to_file() {
        let base = resolve_api_base(Some("   "), "http://other:9000/");
        assert_eq!(base, "http://other:9000");
    }

    #[test]
    fn default_when_nothing_configured() {
        let base = resolve_api_base(None, "");
        assert_eq!(base, DEFAULT_API_BASE);
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("home")).unwrap();
        // Environment may override api_base on CI; the derived paths are what
        // this test pins down.
        assert_eq!(config.log_path(), dir.path().join("home").join("nestep.log"));
        assert_eq!(
            config.transcripts_dir(),
            dir.path().join("home").join("transcripts")
        );
    }

    #[test]
    fn save_then_load_round_trips_api_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path()).unwrap();
        config.api_base = "http://10.0.0.7:5000".to_string();
        config.save().unwrap();

        let content = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        let reloaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.api_base, "http://10.0.0.7:5000");
    }
}
