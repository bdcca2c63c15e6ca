//! Configuration Module
//!
//! Loads the relay configuration from defaults, an optional TOML file and
//! environment variables, and checks the settings each command needs.

mod secrets;

pub use secrets::SecretString;

use crate::error::RelayError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TTS_API_URL: &str = "TTS_API_URL";
pub const ENV_TEMP_DIR: &str = "TTS_TEMP_DIR";
pub const ENV_REQUEST_TIMEOUT: &str = "TTS_REQUEST_TIMEOUT_SECS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Telegram bot settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// TTS endpoint and scratch storage
    #[serde(default)]
    pub tts: TtsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather (usually via TELEGRAM_BOT_TOKEN)
    #[serde(default)]
    pub bot_token: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TtsConfig {
    /// Fully-qualified endpoint accepting `{"text", "format"}` POSTs
    #[serde(default)]
    pub api_url: Option<String>,

    /// Directory for in-flight audio files. Unset means [`DEFAULT_TEMP_DIR`].
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Whole-request timeout in seconds. Unset means wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Scratch directory used when no layer sets one.
pub const DEFAULT_TEMP_DIR: &str = "temp";

impl TtsConfig {
    /// The scratch directory, falling back to [`DEFAULT_TEMP_DIR`].
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIR))
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. System config: <config_dir>/tts-relay/config.toml
    /// 3. Local config: ./tts-relay.toml
    /// 4. Environment variables
    pub fn load() -> Result<Self> {
        tracing::debug!("Loading configuration...");

        let mut config = Self::default();

        if let Some(system_config_path) = Self::system_config_path()
            && system_config_path.exists()
        {
            tracing::debug!("Loading system config from: {:?}", system_config_path);
            config = Self::merge_from_file(config, &system_config_path)?;
        }

        let local_config_path = Self::local_config_path();
        if local_config_path.exists() {
            tracing::debug!("Loading local config from: {:?}", local_config_path);
            config = Self::merge_from_file(config, &local_config_path)?;
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        tracing::debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from a specific file, then apply the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from custom path: {:?}", path);

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let mut config = Self::merge_from_file(Self::default(), path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tts-relay").join("config.toml"))
    }

    fn local_config_path() -> PathBuf {
        PathBuf::from("./tts-relay.toml")
    }

    fn merge_from_file(base: Self, path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let file_config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(Self::merge(base, file_config))
    }

    /// Values set in `overlay` win; unset optionals keep the base value.
    fn merge(base: Self, overlay: Self) -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: overlay.telegram.bot_token.or(base.telegram.bot_token),
            },
            tts: TtsConfig {
                api_url: overlay.tts.api_url.or(base.tts.api_url),
                temp_dir: overlay.tts.temp_dir.or(base.tts.temp_dir),
                request_timeout_secs: overlay
                    .tts
                    .request_timeout_secs
                    .or(base.tts.request_timeout_secs),
            },
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Empty values count as unset, matching how `.env` files are usually
    /// written (`TTS_API_URL=`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_BOT_TOKEN) {
            self.telegram.bot_token = Some(SecretString::new(token));
        }

        if let Some(url) = get(ENV_TTS_API_URL) {
            self.tts.api_url = Some(url.trim().to_string());
        }

        if let Some(dir) = get(ENV_TEMP_DIR) {
            self.tts.temp_dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = get(ENV_REQUEST_TIMEOUT) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_REQUEST_TIMEOUT} must be a whole number of seconds"))?;
            self.tts.request_timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// The Telegram bot token, or a configuration error naming the variable.
    pub fn bot_token(&self) -> Result<&SecretString, RelayError> {
        self.telegram
            .bot_token
            .as_ref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayError::Config(format!("{ENV_BOT_TOKEN} is not set")))
    }

    /// The TTS endpoint, checked to be an absolute http(s) URL.
    pub fn tts_api_url(&self) -> Result<&str, RelayError> {
        let raw = self
            .tts
            .api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RelayError::Config(format!("{ENV_TTS_API_URL} is not set")))?;

        let url = reqwest::Url::parse(raw)
            .map_err(|e| RelayError::Config(format!("{ENV_TTS_API_URL} is not a valid URL ({raw}): {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RelayError::Config(format!(
                "{ENV_TTS_API_URL} must be an http(s) URL with a host, got {raw}"
            )));
        }

        Ok(raw)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.tts
            .request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// Everything the bot needs before it may accept events.
    pub fn validate_for_bot(&self) -> Result<(), RelayError> {
        self.bot_token()?;
        self.tts_api_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.telegram.bot_token.is_none());
        assert!(config.tts.api_url.is_none());
        assert!(config.tts.temp_dir.is_none());
        assert_eq!(config.tts.temp_dir(), PathBuf::from("temp"));
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                (ENV_BOT_TOKEN, "123:abc"),
                (ENV_TTS_API_URL, " http://localhost:5002/api/tts "),
                (ENV_TEMP_DIR, "/var/tmp/relay"),
                (ENV_REQUEST_TIMEOUT, "30"),
            ]))
            .unwrap();

        assert_eq!(config.bot_token().unwrap().expose_secret(), "123:abc");
        assert_eq!(config.tts_api_url().unwrap(), "http://localhost:5002/api/tts");
        assert_eq!(config.tts.temp_dir(), PathBuf::from("/var/tmp/relay"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.validate_for_bot().is_ok());
    }

    #[test]
    fn test_empty_env_value_is_unset() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[(ENV_BOT_TOKEN, ""), (ENV_TTS_API_URL, "  ")]))
            .unwrap();
        assert!(config.telegram.bot_token.is_none());
        assert!(config.tts.api_url.is_none());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(env(&[(ENV_REQUEST_TIMEOUT, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_tts_url_fails_validation() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[(ENV_BOT_TOKEN, "123:abc")]))
            .unwrap();

        let err = config.validate_for_bot().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Configuration);
        assert!(err.to_string().contains(ENV_TTS_API_URL));
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[(ENV_TTS_API_URL, "http://localhost:5002/tts")]))
            .unwrap();

        let err = config.validate_for_bot().unwrap_err();
        assert!(err.to_string().contains(ENV_BOT_TOKEN));
        // The smoke test only needs the URL
        assert!(config.tts_api_url().is_ok());
    }

    #[test]
    fn test_tts_url_must_be_http() {
        let mut config = Config::default();
        for bad in ["localhost:5002", "ftp://example.com/tts", "not a url"] {
            config.tts.api_url = Some(bad.to_string());
            assert!(config.tts_api_url().is_err(), "{bad} should be rejected");
        }
        config.tts.api_url = Some("https://tts.example.com/v1/speak".to_string());
        assert!(config.tts_api_url().is_ok());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let mut config = Config::default();
        config.tts.request_timeout_secs = Some(0);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
[telegram]
bot_token = "999:xyz"

[tts]
api_url = "http://tts.local/speak"
temp_dir = "/tmp/audio"
request_timeout_secs = 45
        "#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.bot_token().unwrap().expose_secret(), "999:xyz");
        assert_eq!(config.tts.api_url.as_deref(), Some("http://tts.local/speak"));
        assert_eq!(config.tts.temp_dir(), PathBuf::from("/tmp/audio"));
        assert_eq!(config.tts.request_timeout_secs, Some(45));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[tts]\napi_url = \"http://x/y\"\n").unwrap();
        assert!(config.tts.temp_dir.is_none());
        assert_eq!(config.tts.temp_dir(), PathBuf::from("temp"));
        assert!(config.telegram.bot_token.is_none());
    }

    #[test]
    fn test_merge_keeps_base_when_overlay_unset() {
        let mut base = Config::default();
        base.tts.api_url = Some("http://base/tts".to_string());
        base.telegram.bot_token = Some(SecretString::new("base-token"));

        let mut overlay = Config::default();
        overlay.tts.request_timeout_secs = Some(10);

        let merged = Config::merge(base, overlay);
        assert_eq!(merged.tts.api_url.as_deref(), Some("http://base/tts"));
        assert_eq!(merged.bot_token().unwrap().expose_secret(), "base-token");
        assert_eq!(merged.tts.request_timeout_secs, Some(10));
    }

    #[test]
    fn test_merge_keeps_base_temp_dir_when_overlay_omits_it() {
        let tmp = tempfile::tempdir().unwrap();
        let system = tmp.path().join("system.toml");
        let local = tmp.path().join("local.toml");
        std::fs::write(&system, "[tts]\ntemp_dir = \"/var/relay-audio\"\n").unwrap();
        std::fs::write(&local, "[tts]\napi_url = \"http://x/y\"\n").unwrap();

        let config = Config::merge_from_file(Config::default(), &system).unwrap();
        let config = Config::merge_from_file(config, &local).unwrap();

        assert_eq!(config.tts.temp_dir(), PathBuf::from("/var/relay-audio"));
        assert_eq!(config.tts.api_url.as_deref(), Some("http://x/y"));
    }

    #[test]
    fn test_merge_overlay_temp_dir_wins() {
        let mut base = Config::default();
        base.tts.temp_dir = Some(PathBuf::from("/var/relay-audio"));
        let mut overlay = Config::default();
        overlay.tts.temp_dir = Some(PathBuf::from("/srv/audio"));

        let merged = Config::merge(base, overlay);
        assert_eq!(merged.tts.temp_dir(), PathBuf::from("/srv/audio"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Config::load_from_path(tmp.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("relay.toml");
        std::fs::write(&path, "[tts]\ntemp_dir = \"scratch\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        // Env may add more, but the file value for temp_dir holds unless
        // TTS_TEMP_DIR is exported in the test environment.
        if std::env::var(ENV_TEMP_DIR).is_err() {
            assert_eq!(config.tts.temp_dir(), PathBuf::from("scratch"));
        }
    }
}
