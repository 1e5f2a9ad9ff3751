use cinescope_core::{CollectionStore, JsonFileStorage, SessionStore};
use cinescope_models::{MovieRef, UserProfile};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn movie(id: u64, title: &str) -> MovieRef {
    MovieRef {
        id,
        title: title.to_string(),
        poster: "https://image.tmdb.org/t/p/w500/x.jpg".to_string(),
        backdrop: None,
        rating: 8.8,
        year: Some(2010),
        genres: vec!["Science Fiction".to_string()],
        overview: None,
    }
}

fn wire_up(dir: &TempDir) -> (SessionStore, Arc<Mutex<CollectionStore>>) {
    let storage = Arc::new(JsonFileStorage::new(dir.path().join("users")));
    let collections = Arc::new(Mutex::new(CollectionStore::new(storage)));

    let mut session = SessionStore::open(
        dir.path().join("users.json"),
        dir.path().join("session.json"),
    );
    let store = Arc::clone(&collections);
    session.subscribe(move |profile: Option<&UserProfile>| {
        if let Ok(mut store) = store.lock() {
            store.on_session_change(profile.map(|p| p.id.as_str()));
        }
    });

    (session, collections)
}

#[test]
fn collection_store_follows_session_identity() {
    let dir = TempDir::new().unwrap();
    let (mut session, collections) = wire_up(&dir);

    session.register("Ada", "ada@example.com", "hunter2").unwrap();
    collections
        .lock()
        .unwrap()
        .add_to_watchlist(movie(27205, "Inception"))
        .unwrap();

    // Logout clears in-memory state but leaves the durable record alone
    session.logout().unwrap();
    assert!(collections.lock().unwrap().watchlist().is_empty());

    // Logging back in restores exactly what was persisted
    session.login("ada@example.com", "hunter2").unwrap();
    let store = collections.lock().unwrap();
    assert_eq!(store.watchlist().len(), 1);
    assert!(store.is_in_watchlist(27205));
    assert!(!store.is_watched(27205));
}

#[test]
fn switching_accounts_never_leaks_collections() {
    let dir = TempDir::new().unwrap();
    let (mut session, collections) = wire_up(&dir);

    session.register("Ada", "ada@example.com", "hunter2").unwrap();
    collections
        .lock()
        .unwrap()
        .add_to_watchlist(movie(27205, "Inception"))
        .unwrap();
    session.logout().unwrap();

    session.register("Grace", "grace@example.com", "s3cret").unwrap();
    {
        let store = collections.lock().unwrap();
        assert!(store.watchlist().is_empty());
        assert!(!store.is_in_watchlist(27205));
    }
    collections
        .lock()
        .unwrap()
        .add_to_favorites(movie(155, "The Dark Knight"))
        .unwrap();
    session.logout().unwrap();

    session.login("ada@example.com", "hunter2").unwrap();
    let store = collections.lock().unwrap();
    assert!(store.is_in_watchlist(27205));
    assert!(!store.is_in_favorites(155));
}

#[test]
fn mutations_while_signed_out_touch_nothing() {
    let dir = TempDir::new().unwrap();
    let (mut session, collections) = wire_up(&dir);

    session.register("Ada", "ada@example.com", "hunter2").unwrap();
    session.logout().unwrap();

    collections
        .lock()
        .unwrap()
        .add_to_watchlist(movie(27205, "Inception"))
        .unwrap();

    session.login("ada@example.com", "hunter2").unwrap();
    assert!(collections.lock().unwrap().watchlist().is_empty());
}
