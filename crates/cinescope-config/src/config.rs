use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_backdrop_size() -> String {
    "w1280".to_string()
}

impl TmdbConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            language: default_language(),
            poster_size: default_poster_size(),
            backdrop_size: default_backdrop_size(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let tmdb = self
            .tmdb
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("TMDB is not configured"))?;
        if tmdb.api_key.is_empty() || tmdb.api_key == "YOUR_API_KEY" {
            return Err(anyhow::anyhow!("TMDB api_key is not configured"));
        }
        Ok(())
    }

    pub fn is_tmdb_configured(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            tmdb: Some(TmdbConfig::new("abc123".to_string())),
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        let tmdb = loaded.tmdb.unwrap();
        assert_eq!(tmdb.api_key, "abc123");
        assert_eq!(tmdb.language, "en-US");
        assert_eq!(tmdb.poster_size, "w500");
    }

    #[test]
    fn test_validate_rejects_placeholder_key() {
        let config = Config {
            tmdb: Some(TmdbConfig::new("YOUR_API_KEY".to_string())),
        };
        assert!(config.validate().is_err());
        assert!(!config.is_tmdb_configured());
    }

    #[test]
    fn test_validate_rejects_missing_section() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }
}
