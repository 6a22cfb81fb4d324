use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ── Application config ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Base URL of the analytics backend the wizard talks to.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token for the backend. Supplied by the platform's auth
    /// layer; the wizard itself never refreshes it.
    pub api_token: Option<String>,

    /// Seconds between sync-status polls while a first sync is running.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8800".into()
}

fn default_poll_interval_secs() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_base_url: default_api_base_url(),
            api_token: None,
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let sourcesync_dir = home.join(".sourcesync");
        let config_path = sourcesync_dir.join("config.toml");

        if !sourcesync_dir.exists() {
            fs::create_dir_all(&sourcesync_dir)
                .context("Failed to create .sourcesync directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed path that is skipped during serialization
            config.config_path = config_path;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SOURCESYNC_API_URL") {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }

        if let Ok(token) = std::env::var("SOURCESYNC_API_TOKEN") {
            if !token.is_empty() {
                self.api_token = Some(token);
            }
        }

        if let Ok(secs) = std::env::var("SOURCESYNC_POLL_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                if secs > 0 {
                    self.poll_interval_secs = secs;
                }
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn config_default_has_sane_values() {
        let c = Config::default();
        assert_eq!(c.api_base_url, "http://127.0.0.1:8800");
        assert!(c.api_token.is_none());
        assert_eq!(c.poll_interval_secs, 3);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let c: Config = toml::from_str(r#"api_token = "tok-1""#).unwrap();
        assert_eq!(c.api_token.as_deref(), Some("tok-1"));
        assert_eq!(c.api_base_url, "http://127.0.0.1:8800");
        assert_eq!(c.poll_interval_secs, 3);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_path: dir.path().join("config.toml"),
            api_base_url: "https://api.example.test".into(),
            api_token: Some("tok-2".into()),
            poll_interval_secs: 5,
        };
        config.save().unwrap();

        let contents = fs::read_to_string(&config.config_path).unwrap();
        let reloaded: Config = toml::from_str(&contents).unwrap();
        assert_eq!(reloaded.api_base_url, "https://api.example.test");
        assert_eq!(reloaded.api_token.as_deref(), Some("tok-2"));
        assert_eq!(reloaded.poll_interval_secs, 5);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let _guard = env_lock();
        unsafe {
            std::env::set_var("SOURCESYNC_API_URL", "https://override.test");
            std::env::set_var("SOURCESYNC_API_TOKEN", "tok-env");
            std::env::set_var("SOURCESYNC_POLL_INTERVAL_SECS", "7");
        }

        let mut c = Config::default();
        c.apply_env_overrides();

        unsafe {
            std::env::remove_var("SOURCESYNC_API_URL");
            std::env::remove_var("SOURCESYNC_API_TOKEN");
            std::env::remove_var("SOURCESYNC_POLL_INTERVAL_SECS");
        }

        assert_eq!(c.api_base_url, "https://override.test");
        assert_eq!(c.api_token.as_deref(), Some("tok-env"));
        assert_eq!(c.poll_interval_secs, 7);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let c = Config {
            poll_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(c.poll_interval(), Duration::from_secs(1));
    }
}
