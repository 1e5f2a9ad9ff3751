use chrono::Utc;
use cinescope_models::{FavoriteEntry, MovieRef, WatchlistEntry};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::{CollectionStorage, StorageError};

/// Emitted after every in-memory state change so the view layer can re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    Session,
    Watchlist,
    Favorites,
}

type Listener = Box<dyn Fn(CollectionEvent) + Send + Sync>;

/// Per-user watchlist and favorites, mirrored to durable storage through an
/// injected [`CollectionStorage`] port.
///
/// Both collections are insertion-ordered sets keyed by movie id. Mutations
/// while no user is signed in are silent no-ops; callers gate mutating actions
/// behind their own authentication check. A failed save leaves the in-memory
/// state applied (the `Err` tells the caller the change is not yet durable).
pub struct CollectionStore {
    storage: Arc<dyn CollectionStorage>,
    active_user: Option<String>,
    watchlist: Vec<WatchlistEntry>,
    favorites: Vec<FavoriteEntry>,
    listeners: Vec<Listener>,
}

impl CollectionStore {
    pub fn new(storage: Arc<dyn CollectionStorage>) -> Self {
        Self {
            storage,
            active_user: None,
            watchlist: Vec::new(),
            favorites: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Follow a change of the active session identity.
    ///
    /// `None` clears the in-memory collections; durable records for the
    /// previous user are untouched. A new user's collections are loaded from
    /// storage, with missing or unreadable records degrading to empty.
    /// Idempotent for an unchanged user.
    pub fn on_session_change(&mut self, user: Option<&str>) {
        match user {
            None => {
                if self.active_user.is_none() {
                    return;
                }
                self.active_user = None;
                self.watchlist.clear();
                self.favorites.clear();
                self.emit(CollectionEvent::Session);
            }
            Some(user_id) => {
                if self.active_user.as_deref() == Some(user_id) {
                    return;
                }
                self.watchlist = match self.storage.load_watchlist(user_id) {
                    Ok(Some(entries)) => entries,
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        warn!("could not load watchlist for user {}: {}", user_id, e);
                        Vec::new()
                    }
                };
                self.favorites = match self.storage.load_favorites(user_id) {
                    Ok(Some(entries)) => entries,
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        warn!("could not load favorites for user {}: {}", user_id, e);
                        Vec::new()
                    }
                };
                self.active_user = Some(user_id.to_string());
                self.emit(CollectionEvent::Session);
            }
        }
    }

    pub fn add_to_watchlist(&mut self, movie: MovieRef) -> Result<(), StorageError> {
        if self.active_user.is_none() {
            debug!("add_to_watchlist ignored: no active user");
            return Ok(());
        }
        if self.is_in_watchlist(movie.id) {
            return Ok(());
        }
        self.watchlist.push(WatchlistEntry {
            movie,
            date_added: Utc::now(),
            watched: false,
        });
        self.emit(CollectionEvent::Watchlist);
        self.persist_watchlist()
    }

    pub fn remove_from_watchlist(&mut self, movie_id: u64) -> Result<(), StorageError> {
        let Some(pos) = self.watchlist.iter().position(|e| e.id() == movie_id) else {
            return Ok(());
        };
        self.watchlist.remove(pos);
        self.emit(CollectionEvent::Watchlist);
        self.persist_watchlist()
    }

    pub fn add_to_favorites(&mut self, movie: MovieRef) -> Result<(), StorageError> {
        if self.active_user.is_none() {
            debug!("add_to_favorites ignored: no active user");
            return Ok(());
        }
        if self.is_in_favorites(movie.id) {
            return Ok(());
        }
        self.favorites.push(FavoriteEntry {
            movie,
            date_added: Utc::now(),
        });
        self.emit(CollectionEvent::Favorites);
        self.persist_favorites()
    }

    pub fn remove_from_favorites(&mut self, movie_id: u64) -> Result<(), StorageError> {
        let Some(pos) = self.favorites.iter().position(|e| e.id() == movie_id) else {
            return Ok(());
        };
        self.favorites.remove(pos);
        self.emit(CollectionEvent::Favorites);
        self.persist_favorites()
    }

    pub fn mark_watched(&mut self, movie_id: u64) -> Result<(), StorageError> {
        self.set_watched(movie_id, true)
    }

    pub fn mark_unwatched(&mut self, movie_id: u64) -> Result<(), StorageError> {
        self.set_watched(movie_id, false)
    }

    fn set_watched(&mut self, movie_id: u64, watched: bool) -> Result<(), StorageError> {
        // date_added stays as it was at insertion
        let Some(entry) = self.watchlist.iter_mut().find(|e| e.id() == movie_id) else {
            return Ok(());
        };
        entry.watched = watched;
        self.emit(CollectionEvent::Watchlist);
        self.persist_watchlist()
    }

    pub fn is_in_watchlist(&self, movie_id: u64) -> bool {
        self.watchlist.iter().any(|e| e.id() == movie_id)
    }

    pub fn is_in_favorites(&self, movie_id: u64) -> bool {
        self.favorites.iter().any(|e| e.id() == movie_id)
    }

    pub fn is_watched(&self, movie_id: u64) -> bool {
        self.watchlist
            .iter()
            .find(|e| e.id() == movie_id)
            .map(|e| e.watched)
            .unwrap_or(false)
    }

    pub fn watchlist(&self) -> &[WatchlistEntry] {
        &self.watchlist
    }

    pub fn favorites(&self) -> &[FavoriteEntry] {
        &self.favorites
    }

    pub fn active_user(&self) -> Option<&str> {
        self.active_user.as_deref()
    }

    pub fn subscribe(&mut self, listener: impl Fn(CollectionEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: CollectionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    fn persist_watchlist(&self) -> Result<(), StorageError> {
        let Some(user_id) = self.active_user.as_deref() else {
            return Ok(());
        };
        self.storage.save_watchlist(user_id, &self.watchlist).map_err(|e| {
            warn!("watchlist for user {} not persisted: {}", user_id, e);
            e
        })
    }

    fn persist_favorites(&self) -> Result<(), StorageError> {
        let Some(user_id) = self.active_user.as_deref() else {
            return Ok(());
        };
        self.storage.save_favorites(user_id, &self.favorites).map_err(|e| {
            warn!("favorites for user {} not persisted: {}", user_id, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn movie(id: u64, title: &str) -> MovieRef {
        MovieRef {
            id,
            title: title.to_string(),
            poster: "https://image.tmdb.org/t/p/w500/x.jpg".to_string(),
            backdrop: None,
            rating: 8.8,
            year: Some(2010),
            genres: vec!["Science Fiction".to_string(), "Action".to_string()],
            overview: Some("A thief who steals corporate secrets.".to_string()),
        }
    }

    fn store_with_user(user: &str) -> CollectionStore {
        let mut store = CollectionStore::new(Arc::new(MemoryStorage::new()));
        store.on_session_change(Some(user));
        store
    }

    #[test]
    fn test_add_to_watchlist_is_unique_by_id() {
        let mut store = store_with_user("u1");

        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        store.add_to_watchlist(movie(27205, "Inception")).unwrap();

        assert_eq!(store.watchlist().len(), 1);
        assert_eq!(store.watchlist()[0].id(), 27205);
    }

    #[test]
    fn test_watchlist_and_favorites_are_independent() {
        let mut store = store_with_user("u1");

        store.add_to_favorites(movie(27205, "Inception")).unwrap();
        assert!(store.is_in_favorites(27205));
        assert!(!store.is_in_watchlist(27205));

        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        store.remove_from_favorites(27205).unwrap();
        assert!(store.is_in_watchlist(27205));
        assert!(!store.is_in_favorites(27205));
    }

    #[test]
    fn test_watched_toggle_keeps_date_added() {
        let mut store = store_with_user("u1");

        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        let added = store.watchlist()[0].date_added;

        store.mark_watched(27205).unwrap();
        assert!(store.is_watched(27205));
        assert_eq!(store.watchlist()[0].date_added, added);

        store.mark_unwatched(27205).unwrap();
        assert!(!store.is_watched(27205));
        assert_eq!(store.watchlist()[0].date_added, added);
    }

    #[test]
    fn test_collections_are_isolated_per_user() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CollectionStore::new(storage);

        store.on_session_change(Some("alice"));
        store.add_to_watchlist(movie(27205, "Inception")).unwrap();

        store.on_session_change(Some("bob"));
        assert!(store.watchlist().is_empty());
        assert!(!store.is_in_watchlist(27205));

        store.add_to_watchlist(movie(155, "The Dark Knight")).unwrap();

        store.on_session_change(Some("alice"));
        assert_eq!(store.watchlist().len(), 1);
        assert!(store.is_in_watchlist(27205));
        assert!(!store.is_in_watchlist(155));
    }

    #[test]
    fn test_remove_absent_id_is_a_no_op() {
        let mut store = store_with_user("u1");

        store.remove_from_watchlist(999).unwrap();
        store.remove_from_favorites(999).unwrap();
        store.mark_watched(999).unwrap();

        assert!(store.watchlist().is_empty());
        assert!(store.favorites().is_empty());
        assert!(!store.is_watched(999));
    }

    #[test]
    fn test_favorites_survive_session_switch() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CollectionStore::new(storage);

        store.on_session_change(Some("u1"));
        store.add_to_favorites(movie(27205, "Inception")).unwrap();
        let added = store.favorites()[0].date_added;

        store.on_session_change(None);
        assert!(store.favorites().is_empty());

        store.on_session_change(Some("u1"));
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(store.favorites()[0].id(), 27205);
        assert_eq!(store.favorites()[0].date_added, added);
    }

    #[test]
    fn test_mutations_without_user_are_ignored() {
        let mut store = CollectionStore::new(Arc::new(MemoryStorage::new()));

        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        store.add_to_favorites(movie(27205, "Inception")).unwrap();

        assert!(store.watchlist().is_empty());
        assert!(store.favorites().is_empty());
        assert!(store.active_user().is_none());
    }

    #[test]
    fn test_session_change_is_idempotent() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CollectionStore::new(storage.clone());

        store.on_session_change(Some("u1"));
        store.add_to_watchlist(movie(27205, "Inception")).unwrap();

        // Same user again must not reload and clobber in-memory state,
        // even if storage has since been overwritten behind our back
        storage.save_watchlist("u1", &[]).unwrap();
        store.on_session_change(Some("u1"));
        assert_eq!(store.watchlist().len(), 1);
    }

    #[test]
    fn test_signing_out_keeps_durable_records() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CollectionStore::new(storage.clone());

        store.on_session_change(Some("u1"));
        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        store.on_session_change(None);

        let persisted = storage.load_watchlist("u1").unwrap().unwrap();
        assert_eq!(persisted.len(), 1);
    }

    #[test]
    fn test_change_events_fire_on_mutation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();

        let mut store = CollectionStore::new(Arc::new(MemoryStorage::new()));
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.on_session_change(Some("u1"));
        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        store.mark_watched(27205).unwrap();
        store.remove_from_watchlist(27205).unwrap();

        // one session event plus three collection events
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut store = store_with_user("u1");

        store.add_to_watchlist(movie(27205, "Inception")).unwrap();
        assert_eq!(store.watchlist().len(), 1);
        assert!(!store.watchlist()[0].watched);
        let added = store.watchlist()[0].date_added;

        store.mark_watched(27205).unwrap();
        assert!(store.watchlist()[0].watched);
        assert_eq!(store.watchlist()[0].date_added, added);

        store.remove_from_watchlist(27205).unwrap();
        assert!(store.watchlist().is_empty());

        store.add_to_favorites(movie(27205, "Inception")).unwrap();
        assert_eq!(store.favorites().len(), 1);
        assert!(store.watchlist().is_empty());
    }
}
