use anyhow::Result;
use dirs;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("CINESCOPE_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinescope");

        Ok(Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
        })
    }

    pub fn from_container_env() -> Self {
        let base = container_base_path();
        // In containers, config files live at the base level with data in a subdir
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
        }
    }

    /// Rooted at an arbitrary directory. Used by tests and ephemeral setups.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Registered-user directory, credentials included. Session store only.
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// Currently signed-in public profile.
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Per-user collection records live under here, one directory per user id.
    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("users")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.collections_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container base directory is created in the Containerfile, so its
        // presence indicates we are running inside one
        let base = container_base_path();
        if base.exists() {
            return Self::from_container_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_container_env())
    }
}
