use cinescope_catalog::TmdbClient;
use cinescope_config::{Config, PathManager};
use cinescope_core::{CollectionStore, JsonFileStorage, SessionStore};
use cinescope_models::UserProfile;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

use crate::output::Output;

pub mod auth;
pub mod catalog;
pub mod collections;
pub mod config;
pub mod prompts;

/// Everything a command needs: paths, config, and the two stores wired
/// together so the collection store follows the active session identity.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub session: SessionStore,
    pub collections: Arc<Mutex<CollectionStore>>,
}

impl AppContext {
    pub fn init() -> Result<Self> {
        let paths = PathManager::default();
        paths.ensure_directories().map_err(|e| eyre!("{}", e))?;

        let config_file = paths.config_file();
        let config = if config_file.exists() {
            match Config::load_from_file(&config_file) {
                Ok(config) => config,
                Err(e) => {
                    warn!("could not read {}: {}. Using defaults.", config_file.display(), e);
                    Config::default()
                }
            }
        } else {
            Config::default()
        };

        let storage = Arc::new(JsonFileStorage::from_paths(&paths));
        let collections = Arc::new(Mutex::new(CollectionStore::new(storage)));

        let mut session = SessionStore::open(paths.users_file(), paths.session_file());
        let store = Arc::clone(&collections);
        session.subscribe(move |profile: Option<&UserProfile>| {
            if let Ok(mut store) = store.lock() {
                store.on_session_change(profile.map(|p| p.id.as_str()));
            }
        });

        // Prime with whoever is already signed in from a previous run
        let current = session.current_user_id().map(str::to_string);
        if let Ok(mut store) = collections.lock() {
            store.on_session_change(current.as_deref());
        }

        Ok(Self {
            paths,
            config,
            session,
            collections,
        })
    }

    pub fn store(&self) -> Result<MutexGuard<'_, CollectionStore>> {
        self.collections
            .lock()
            .map_err(|_| eyre!("collection store lock poisoned"))
    }

    pub fn tmdb_client(&self) -> Result<TmdbClient> {
        if !self.config.is_tmdb_configured() {
            return Err(eyre!(
                "TMDB is not configured. Run `cinescope config init` to set an API key."
            ));
        }
        let tmdb = self
            .config
            .tmdb
            .clone()
            .ok_or_else(|| eyre!("TMDB is not configured"))?;
        Ok(TmdbClient::new(tmdb))
    }

    pub fn require_user(&self) -> Result<&UserProfile> {
        self.session
            .current_user()
            .ok_or_else(|| eyre!("You are not signed in. Run `cinescope auth login` first."))
    }
}

/// Spinner shown while a catalog request is in flight. Hidden for quiet or
/// machine output and outside a terminal.
pub fn fetch_spinner(output: &Output, msg: &str) -> ProgressBar {
    if output.is_quiet() || !output.is_human() || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(msg.to_string());
    pb
}
