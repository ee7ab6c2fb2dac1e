use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// OpenWeather current-weather endpoint. `{city}`, `{country_code}` and
/// `{api_key}` are substituted per request.
pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather?\
     q={city},{country_code}&appid={api_key}&units=metric";

/// History file used when none is configured, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

/// API key baked in at build time, used when the config file has none.
pub const BUILTIN_API_KEY: Option<&str> = option_env!("OPENWEATHER_API_KEY");

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// history_file = "/home/me/weather-history.txt"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Only written out when it differs from the built-in endpoint.
    #[serde(skip_serializing_if = "is_builtin_template")]
    pub url_template: String,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            url_template: OPENWEATHER_URL.to_string(),
            history_file: None,
        }
    }
}

fn is_builtin_template(template: &str) -> bool {
    template == OPENWEATHER_URL
}

/// Everything the API client needs to build request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub url_template: String,
    pub api_key: String,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Configured API key, falling back to the one compiled into the binary.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .or(BUILTIN_API_KEY)
    }

    pub fn api_settings(&self) -> Option<ApiSettings> {
        self.api_key().map(|api_key| ApiSettings {
            url_template: self.url_template.clone(),
            api_key: api_key.to_string(),
        })
    }

    /// Where lookups are appended; `history.txt` in the working directory by default.
    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => {
                let cwd = std::env::current_dir()
                    .context("Failed to determine current working directory")?;
                Ok(cwd.join(DEFAULT_HISTORY_FILE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_openweather_template() {
        let cfg = Config::default();
        assert_eq!(cfg.url_template, OPENWEATHER_URL);
        assert!(cfg.url_template.contains("{city}"));
        assert!(cfg.url_template.contains("{country_code}"));
        assert!(cfg.url_template.contains("{api_key}"));
    }

    #[test]
    fn configured_api_key_wins() {
        let cfg = Config { api_key: Some("OPEN_KEY".into()), ..Config::default() };

        assert_eq!(cfg.api_key(), Some("OPEN_KEY"));

        let settings = cfg.api_settings().expect("settings must exist");
        assert_eq!(settings.api_key, "OPEN_KEY");
        assert_eq!(settings.url_template, OPENWEATHER_URL);
    }

    #[test]
    fn empty_api_key_falls_back_to_builtin() {
        let cfg = Config { api_key: Some(String::new()), ..Config::default() };
        assert_eq!(cfg.api_key(), BUILTIN_API_KEY);
    }

    #[test]
    fn history_defaults_to_cwd() {
        let cfg = Config::default();
        let path = cfg.history_path().expect("cwd must be available");

        assert!(path.is_absolute());
        assert!(path.ends_with(DEFAULT_HISTORY_FILE));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.url_template, OPENWEATHER_URL);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "history_file = \"/tmp/lookups.txt\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.history_file, Some(PathBuf::from("/tmp/lookups.txt")));
        assert_eq!(cfg.url_template, OPENWEATHER_URL);
        assert_eq!(cfg.history_path().unwrap(), PathBuf::from("/tmp/lookups.txt"));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn saved_config_omits_builtin_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };

        cfg.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("url_template"), "{contents}");
        assert_eq!(Config::load_from(&path).unwrap().url_template, OPENWEATHER_URL);
    }

    #[test]
    fn saved_config_keeps_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let template = "http://localhost:8080/w?q={city},{country_code}&appid={api_key}";
        let cfg = Config { url_template: template.into(), ..Config::default() };

        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap().url_template, template);
    }

    #[test]
    fn garbage_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
