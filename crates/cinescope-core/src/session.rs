use chrono::Utc;
use cinescope_models::{UserProfile, UserRecord};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("no user is signed in")]
    NotSignedIn,
    #[error("session storage failure: {0}")]
    Storage(String),
}

type SessionListener = Box<dyn Fn(Option<&UserProfile>) + Send + Sync>;

/// Owns the active session identity.
///
/// Two durable records: the registered-user directory (credentials included)
/// and the currently signed-in public profile. Listeners are notified
/// synchronously on login, registration auto-login, and logout; the collection
/// store subscribes to follow the identity.
pub struct SessionStore {
    users_file: PathBuf,
    session_file: PathBuf,
    current: Option<UserProfile>,
    listeners: Vec<SessionListener>,
}

impl SessionStore {
    /// Open the store, restoring any persisted session. A malformed session
    /// record is discarded with a warning rather than failing startup.
    pub fn open(users_file: PathBuf, session_file: PathBuf) -> Self {
        let current = Self::load_session(&session_file);
        Self {
            users_file,
            session_file,
            current,
            listeners: Vec::new(),
        }
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current.as_ref().map(|u| u.id.as_str())
    }

    pub fn subscribe(&mut self, listener: impl Fn(Option<&UserProfile>) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register a new account and sign it in.
    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, SessionError> {
        let mut users = self.load_users();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(SessionError::EmailTaken);
        }

        let salt = Uuid::new_v4().to_string();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            join_date: Utc::now(),
            avatar: None,
            password_hash: hash_password(&salt, password),
            salt,
        };
        let profile = record.profile();

        users.push(record);
        self.save_users(&users)?;
        info!("registered user {}", profile.email);

        self.set_current(profile.clone());
        Ok(profile)
    }

    /// Sign in with email and password. Unknown email and wrong password
    /// produce the same error.
    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, SessionError> {
        let users = self.load_users();
        let record = users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .ok_or(SessionError::InvalidCredentials)?;

        let candidate = hash_password(&record.salt, password);
        if !constant_time_eq(candidate.as_bytes(), record.password_hash.as_bytes()) {
            return Err(SessionError::InvalidCredentials);
        }

        let profile = record.profile();
        info!("user {} signed in", profile.email);
        self.set_current(profile.clone());
        Ok(profile)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        if self.session_file.exists() {
            if let Err(e) = std::fs::remove_file(&self.session_file) {
                warn!("could not remove session record: {}", e);
            }
        }
        self.current = None;
        self.notify();
        Ok(())
    }

    fn set_current(&mut self, profile: UserProfile) {
        if let Err(e) = self.save_session(&profile) {
            // Signed in either way; the session just won't survive a restart
            warn!("session record not persisted: {}", e);
        }
        self.current = Some(profile);
        self.notify();
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(self.current.as_ref());
        }
    }

    fn load_session(path: &PathBuf) -> Option<UserProfile> {
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read session record: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(profile) => {
                debug!("restored persisted session");
                Some(profile)
            }
            Err(e) => {
                warn!("corrupt session record: {}. Discarding.", e);
                if let Err(rm_err) = std::fs::remove_file(path) {
                    warn!("failed to delete corrupt session record: {}", rm_err);
                }
                None
            }
        }
    }

    fn save_session(&self, profile: &UserProfile) -> Result<(), SessionError> {
        if let Some(parent) = self.session_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.session_file, json).map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn load_users(&self) -> Vec<UserRecord> {
        if !self.users_file.exists() {
            return Vec::new();
        }
        let content = match std::fs::read_to_string(&self.users_file) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read user directory: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(users) => users,
            Err(e) => {
                warn!("corrupt user directory: {}. Treating as empty.", e);
                Vec::new()
            }
        }
    }

    fn save_users(&self, users: &[UserRecord]) -> Result<(), SessionError> {
        if let Some(parent) = self.users_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(users).map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.users_file, json).map_err(|e| SessionError::Storage(e.to_string()))
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SessionStore {
        SessionStore::open(dir.path().join("users.json"), dir.path().join("session.json"))
    }

    #[test]
    fn test_register_signs_in_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let profile = store.register("Ada", "ada@example.com", "hunter2").unwrap();
        assert_eq!(store.current_user_id(), Some(profile.id.as_str()));

        // A fresh store restores the persisted session
        let reopened = open_store(&dir);
        assert_eq!(reopened.current_user().unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.register("Ada", "ada@example.com", "hunter2").unwrap();
        let err = store.register("Ada Again", "ADA@example.com", "other").unwrap_err();
        assert!(matches!(err, SessionError::EmailTaken));
    }

    #[test]
    fn test_login_verifies_password() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.register("Ada", "ada@example.com", "hunter2").unwrap();
        store.logout().unwrap();

        let err = store.login("ada@example.com", "wrong").unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(store.current_user().is_none());

        let profile = store.login("ada@example.com", "hunter2").unwrap();
        assert_eq!(profile.name, "Ada");
    }

    #[test]
    fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.register("Ada", "ada@example.com", "hunter2").unwrap();

        let unknown = store.login("nobody@example.com", "hunter2").unwrap_err();
        let wrong = store.login("ada@example.com", "wrong").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_passwords_are_not_stored_in_plaintext() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.register("Ada", "ada@example.com", "hunter2").unwrap();

        let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
        assert!(!raw.contains("hunter2"));
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.register("Ada", "ada@example.com", "hunter2").unwrap();

        store.logout().unwrap();
        assert!(store.current_user().is_none());
        assert!(!dir.path().join("session.json").exists());
        assert!(matches!(store.logout().unwrap_err(), SessionError::NotSignedIn));
    }

    #[test]
    fn test_corrupt_session_record_is_discarded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.json"), "{broken").unwrap();

        let store = open_store(&dir);
        assert!(store.current_user().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_listeners_fire_on_identity_changes() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.register("Ada", "ada@example.com", "hunter2").unwrap();
        store.logout().unwrap();
        store.login("ada@example.com", "hunter2").unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
