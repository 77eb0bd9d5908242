//! Configuration for ytharvest.
//!
//! Runtime [`Settings`] start from defaults, are overlaid with an optional
//! TOML [`Config`] file, and finally with command-line/environment values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default database filename.
pub const DEFAULT_DATABASE: &str = "youtube.db";

/// Default site base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILENAME: &str = "ytharvest.toml";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite database path.
    pub database: PathBuf,
    /// Site base URL, without trailing slash.
    pub base_url: String,
    /// User agent: `None` for the crate default, `"impersonate"` for a
    /// browser UA, anything else verbatim.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Delay between requests in milliseconds.
    pub request_delay_ms: u64,
    /// Interface language requested from the site.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            request_timeout: 30,
            request_delay_ms: 0,
            language: "en".to_string(),
        }
    }
}

/// Configuration file contents. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Path the config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load the config at `path`, or `ytharvest.toml` in the working
    /// directory if it exists, or an empty config.
    pub async fn load(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(path) => Self::load_from_path(path).await,
            None => {
                let default = Path::new(CONFIG_FILENAME);
                if tokio::fs::try_exists(default).await.unwrap_or(false) {
                    Self::load_from_path(default).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a TOML file.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML config {}: {}", path.display(), e))?;

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Directory relative paths are resolved against: the config file's
    /// directory, or the working directory.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Expand `~` and resolve relative paths against `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Overlay the configured values onto `settings`.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref database) = self.database {
            settings.database = self.resolve_path(database, &self.base_dir());
        }
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(delay) = self.request_delay_ms {
            settings.request_delay_ms = delay;
        }
        if let Some(ref language) = self.language {
            settings.language = language.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.database, PathBuf::from("youtube.db"));
        assert_eq!(settings.base_url, "https://www.youtube.com");
        assert_eq!(settings.request_timeout, 30);
        assert_eq!(settings.request_delay_ms, 0);
        assert_eq!(settings.language, "en");
        assert!(settings.user_agent.is_none());
    }

    #[tokio::test]
    async fn test_load_and_apply() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ytharvest.toml");
        std::fs::write(
            &path,
            r#"
            database = "data/crawl.db"
            base_url = "http://localhost:8080/"
            request_delay_ms = 250
            "#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).await.unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.database, dir.path().join("data/crawl.db"));
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.request_delay_ms, 250);
        assert_eq!(settings.request_timeout, 30);
    }

    #[tokio::test]
    async fn test_unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "databse = \"x.db\"\n").unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(err.contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_resolve_path() {
        let config = Config::default();
        let base = Path::new("/srv/crawl");
        assert_eq!(config.resolve_path("/abs/db.sqlite", base), PathBuf::from("/abs/db.sqlite"));
        assert_eq!(config.resolve_path("db.sqlite", base), PathBuf::from("/srv/crawl/db.sqlite"));
    }
}
