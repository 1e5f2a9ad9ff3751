use cinescope_core::views::{
    filter_watched, search_entries, sort_entries, watchlist_stats, SortKey, WatchedFilter,
};
use clap::ValueEnum;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use serde_json::json;

use super::{fetch_spinner, AppContext};
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    DateAdded,
    Title,
    Year,
    Rating,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::DateAdded => SortKey::DateAdded,
            SortKeyArg::Title => SortKey::Title,
            SortKeyArg::Year => SortKey::Year,
            SortKeyArg::Rating => SortKey::Rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchedFilterArg {
    All,
    Watched,
    Unwatched,
}

impl From<WatchedFilterArg> for WatchedFilter {
    fn from(arg: WatchedFilterArg) -> Self {
        match arg {
            WatchedFilterArg::All => WatchedFilter::All,
            WatchedFilterArg::Watched => WatchedFilter::Watched,
            WatchedFilterArg::Unwatched => WatchedFilter::Unwatched,
        }
    }
}

pub fn run_watchlist_show(
    sort: SortKeyArg,
    filter: WatchedFilterArg,
    search: Option<String>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::init()?;
    if ctx.session.current_user().is_none() {
        output.info("Not signed in; your watchlist is empty.");
        return Ok(());
    }

    let store = ctx.store()?;
    let mut entries = store.watchlist().to_vec();
    drop(store);

    let stats = watchlist_stats(&entries);
    if let Some(query) = &search {
        entries = search_entries(entries, query);
    }
    entries = filter_watched(entries, filter.into());
    sort_entries(&mut entries, sort.into());

    if !output.is_human() {
        output.json(&json!({
            "stats": { "total": stats.total, "watched": stats.watched, "unwatched": stats.unwatched },
            "entries": entries,
        }));
        return Ok(());
    }

    output.info(format!(
        "{} total • {} to watch • {} watched",
        stats.total, stats.unwatched, stats.watched
    ));
    if entries.is_empty() {
        output.info("Nothing to show.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Title", "Year", "Rating", "Genres", "Added", "Watched"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(entry.id()),
            Cell::new(&entry.movie.title),
            Cell::new(entry.movie.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(format!("{:.1}", entry.movie.rating)),
            Cell::new(entry.movie.genre_label()),
            Cell::new(entry.date_added.format("%Y-%m-%d").to_string()),
            Cell::new(if entry.watched { "✓" } else { "" }),
        ]);
    }
    output.info(table.to_string());
    Ok(())
}

pub async fn run_watchlist_add(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    ctx.require_user()?;

    {
        let store = ctx.store()?;
        if store.is_in_watchlist(movie_id) {
            output.info("Already in your watchlist");
            return Ok(());
        }
    }

    let client = ctx.tmdb_client()?;
    let pb = fetch_spinner(output, "Fetching movie...");
    let details = client.details(movie_id).await?;
    pb.finish_and_clear();

    let movie = details.to_movie_ref();
    let title = movie.title.clone();

    let mut store = ctx.store()?;
    match store.add_to_watchlist(movie) {
        Ok(()) => output.success(format!("Added {} to your watchlist", title)),
        Err(e) => output.warn(format!(
            "Added {} to your watchlist, but it was not persisted: {}",
            title, e
        )),
    }
    Ok(())
}

pub fn run_watchlist_remove(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    ctx.require_user()?;

    let mut store = ctx.store()?;
    if !store.is_in_watchlist(movie_id) {
        output.info("Not in your watchlist");
        return Ok(());
    }
    match store.remove_from_watchlist(movie_id) {
        Ok(()) => output.success("Removed from your watchlist"),
        Err(e) => output.warn(format!("Removed from your watchlist, but not persisted: {}", e)),
    }
    Ok(())
}

pub fn run_watchlist_set_watched(movie_id: u64, watched: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    ctx.require_user()?;

    let mut store = ctx.store()?;
    if !store.is_in_watchlist(movie_id) {
        output.info("Not in your watchlist");
        return Ok(());
    }
    let result = if watched {
        store.mark_watched(movie_id)
    } else {
        store.mark_unwatched(movie_id)
    };
    let state = if watched { "watched" } else { "unwatched" };
    match result {
        Ok(()) => output.success(format!("Marked as {}", state)),
        Err(e) => output.warn(format!("Marked as {}, but not persisted: {}", state, e)),
    }
    Ok(())
}

pub fn run_favorites_show(sort: SortKeyArg, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    if ctx.session.current_user().is_none() {
        output.info("Not signed in; you have no favorites.");
        return Ok(());
    }

    let store = ctx.store()?;
    let mut entries = store.favorites().to_vec();
    drop(store);
    sort_entries(&mut entries, sort.into());

    if !output.is_human() {
        output.json(&json!({ "total": entries.len(), "entries": entries }));
        return Ok(());
    }

    output.info(format!("{} favorites", entries.len()));
    if entries.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Title", "Year", "Rating", "Genres", "Added"]);
    for entry in &entries {
        table.add_row(vec![
            Cell::new(entry.id()),
            Cell::new(&entry.movie.title),
            Cell::new(entry.movie.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(format!("{:.1}", entry.movie.rating)),
            Cell::new(entry.movie.genre_label()),
            Cell::new(entry.date_added.format("%Y-%m-%d").to_string()),
        ]);
    }
    output.info(table.to_string());
    Ok(())
}

pub async fn run_favorites_add(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    ctx.require_user()?;

    {
        let store = ctx.store()?;
        if store.is_in_favorites(movie_id) {
            output.info("Already in your favorites");
            return Ok(());
        }
    }

    let client = ctx.tmdb_client()?;
    let pb = fetch_spinner(output, "Fetching movie...");
    let details = client.details(movie_id).await?;
    pb.finish_and_clear();

    let movie = details.to_movie_ref();
    let title = movie.title.clone();

    let mut store = ctx.store()?;
    match store.add_to_favorites(movie) {
        Ok(()) => output.success(format!("Added {} to your favorites", title)),
        Err(e) => output.warn(format!(
            "Added {} to your favorites, but it was not persisted: {}",
            title, e
        )),
    }
    Ok(())
}

pub fn run_favorites_remove(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    ctx.require_user()?;

    let mut store = ctx.store()?;
    if !store.is_in_favorites(movie_id) {
        output.info("Not in your favorites");
        return Ok(());
    }
    match store.remove_from_favorites(movie_id) {
        Ok(()) => output.success("Removed from your favorites"),
        Err(e) => output.warn(format!("Removed from your favorites, but not persisted: {}", e)),
    }
    Ok(())
}
