use chrono::{DateTime, Utc};
use cinescope_models::{FavoriteEntry, MovieRef, WatchlistEntry};
use std::cmp::Ordering;

/// Counts shown on the watchlist screen header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistStats {
    pub total: usize,
    pub watched: usize,
    pub unwatched: usize,
}

pub fn watchlist_stats(entries: &[WatchlistEntry]) -> WatchlistStats {
    let watched = entries.iter().filter(|e| e.watched).count();
    WatchlistStats {
        total: entries.len(),
        watched,
        unwatched: entries.len() - watched,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateAdded,
    Title,
    Year,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchedFilter {
    #[default]
    All,
    Watched,
    Unwatched,
}

/// Common view over both entry kinds so sorting and searching apply to either.
pub trait EntryView {
    fn movie(&self) -> &MovieRef;
    fn date_added(&self) -> DateTime<Utc>;
}

impl EntryView for WatchlistEntry {
    fn movie(&self) -> &MovieRef {
        &self.movie
    }
    fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }
}

impl EntryView for FavoriteEntry {
    fn movie(&self) -> &MovieRef {
        &self.movie
    }
    fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }
}

/// Sort in place. DateAdded puts the newest first, Year and Rating the
/// highest first, Title ascending case-insensitively.
pub fn sort_entries<T: EntryView>(entries: &mut [T], key: SortKey) {
    match key {
        SortKey::DateAdded => entries.sort_by(|a, b| b.date_added().cmp(&a.date_added())),
        SortKey::Title => entries.sort_by(|a, b| {
            a.movie()
                .title
                .to_lowercase()
                .cmp(&b.movie().title.to_lowercase())
        }),
        SortKey::Year => entries.sort_by(|a, b| b.movie().year.cmp(&a.movie().year)),
        SortKey::Rating => entries.sort_by(|a, b| {
            b.movie()
                .rating
                .partial_cmp(&a.movie().rating)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

pub fn filter_watched(entries: Vec<WatchlistEntry>, filter: WatchedFilter) -> Vec<WatchlistEntry> {
    match filter {
        WatchedFilter::All => entries,
        WatchedFilter::Watched => entries.into_iter().filter(|e| e.watched).collect(),
        WatchedFilter::Unwatched => entries.into_iter().filter(|e| !e.watched).collect(),
    }
}

/// Case-insensitive title substring match.
pub fn search_entries<T: EntryView>(entries: Vec<T>, query: &str) -> Vec<T> {
    let query = query.to_lowercase();
    entries
        .into_iter()
        .filter(|e| e.movie().title.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(id: u64, title: &str, year: u32, rating: f64, watched: bool, age_days: i64) -> WatchlistEntry {
        WatchlistEntry {
            movie: MovieRef {
                id,
                title: title.to_string(),
                poster: String::new(),
                backdrop: None,
                rating,
                year: Some(year),
                genres: Vec::new(),
                overview: None,
            },
            date_added: Utc::now() - Duration::days(age_days),
            watched,
        }
    }

    fn sample() -> Vec<WatchlistEntry> {
        vec![
            entry(1, "Inception", 2010, 8.8, true, 3),
            entry(2, "Arrival", 2016, 7.9, false, 1),
            entry(3, "The Dark Knight", 2008, 9.0, false, 2),
        ]
    }

    #[test]
    fn test_watchlist_stats() {
        let stats = watchlist_stats(&sample());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.watched, 1);
        assert_eq!(stats.unwatched, 2);
    }

    #[test]
    fn test_sort_by_date_added_newest_first() {
        let mut entries = sample();
        sort_entries(&mut entries, SortKey::DateAdded);
        assert_eq!(entries[0].id(), 2);
        assert_eq!(entries[2].id(), 1);
    }

    #[test]
    fn test_sort_by_title_is_case_insensitive() {
        let mut entries = sample();
        sort_entries(&mut entries, SortKey::Title);
        let titles: Vec<&str> = entries.iter().map(|e| e.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Arrival", "Inception", "The Dark Knight"]);
    }

    #[test]
    fn test_sort_by_year_and_rating() {
        let mut entries = sample();
        sort_entries(&mut entries, SortKey::Year);
        assert_eq!(entries[0].id(), 2);

        sort_entries(&mut entries, SortKey::Rating);
        assert_eq!(entries[0].id(), 3);
    }

    #[test]
    fn test_filter_watched() {
        let watched = filter_watched(sample(), WatchedFilter::Watched);
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].id(), 1);

        let unwatched = filter_watched(sample(), WatchedFilter::Unwatched);
        assert_eq!(unwatched.len(), 2);

        assert_eq!(filter_watched(sample(), WatchedFilter::All).len(), 3);
    }

    #[test]
    fn test_search_matches_substrings() {
        let hits = search_entries(sample(), "dark");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), 3);

        assert!(search_entries(sample(), "zzz").is_empty());
    }
}
