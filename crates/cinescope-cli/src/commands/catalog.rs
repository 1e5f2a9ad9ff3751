use cinescope_catalog::{DiscoverFilters, TrendingWindow};
use cinescope_models::{Genre, MovieRef, Page};
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use serde_json::json;

use super::{fetch_spinner, AppContext};
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseCategory {
    Popular,
    Trending,
    TopRated,
    NowPlaying,
}

pub async fn run_browse(category: BrowseCategory, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    let client = ctx.tmdb_client()?;

    let pb = fetch_spinner(output, "Fetching movies...");
    let genres = client.genres().await?;
    let movies = match category {
        BrowseCategory::Popular => client.popular(page, &genres).await?,
        BrowseCategory::Trending => client.trending(TrendingWindow::Week, &genres).await?,
        BrowseCategory::TopRated => client.top_rated(page, &genres).await?,
        BrowseCategory::NowPlaying => client.now_playing(page, &genres).await?,
    };
    pb.finish_and_clear();

    render_movie_page(&ctx, &movies, output)
}

pub async fn run_search(query: &str, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    let client = ctx.tmdb_client()?;

    let pb = fetch_spinner(output, "Searching...");
    let genres = client.genres().await?;
    let movies = client.search(query, page, &genres).await?;
    pb.finish_and_clear();

    if movies.results.is_empty() {
        output.info(format!("No results for \"{}\"", query));
        return Ok(());
    }
    render_movie_page(&ctx, &movies, output)
}

pub async fn run_discover(
    genre: Option<String>,
    year: Option<u32>,
    min_rating: Option<f64>,
    sort_by: Option<String>,
    page: u32,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::init()?;
    let client = ctx.tmdb_client()?;

    let pb = fetch_spinner(output, "Fetching movies...");
    let genres = client.genres().await?;
    let genre_id = match genre {
        Some(wanted) => Some(resolve_genre(&wanted, &genres)?),
        None => None,
    };
    let filters = DiscoverFilters {
        genre_id,
        year,
        min_rating,
        sort_by,
    };
    let movies = client.discover(&filters, page, &genres).await?;
    pb.finish_and_clear();

    render_movie_page(&ctx, &movies, output)
}

pub async fn run_details(movie_id: u64, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    let client = ctx.tmdb_client()?;

    let pb = fetch_spinner(output, "Fetching movie...");
    let genres = client.genres().await?;
    let details = client.details(movie_id).await?;
    let credits = client.credits(movie_id).await?;
    let videos = client.videos(movie_id).await?;
    let similar = client.similar(movie_id, 1, &genres).await?;
    pb.finish_and_clear();

    if !output.is_human() {
        output.json(&json!({
            "details": details,
            "credits": credits,
            "videos": videos,
            "similar": similar.results,
        }));
        return Ok(());
    }

    let year = details
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    output.info(format!("{}{}", details.title, year));
    if let Some(tagline) = &details.tagline {
        output.info(format!("  \"{}\"", tagline));
    }
    output.info(format!(
        "  Rating: {}/10 ({} votes)   Runtime: {}",
        details.rating,
        details.vote_count,
        details.runtime.map(format_runtime).unwrap_or_else(|| "N/A".to_string()),
    ));
    if !details.genres.is_empty() {
        output.info(format!("  Genres: {}", details.genres.join(", ")));
    }
    if let Some(overview) = &details.overview {
        output.info(format!("\n{}\n", overview));
    }
    if let Some(director) = credits.director() {
        output.info(format!("Director: {}", director.name));
    }
    if !credits.cast.is_empty() {
        let cast: Vec<String> = credits
            .cast
            .iter()
            .take(5)
            .map(|c| format!("{} ({})", c.name, c.character))
            .collect();
        output.info(format!("Cast: {}", cast.join(", ")));
    }
    if let Some(trailer) = videos.iter().find_map(|v| v.youtube_url()) {
        output.info(format!("Trailer: {}", trailer));
    }
    if details.budget > 0 || details.revenue > 0 {
        output.info(format!(
            "Budget: {}   Revenue: {}",
            format_currency(details.budget),
            format_currency(details.revenue)
        ));
    }
    if let Some(homepage) = &details.homepage {
        output.info(format!("Homepage: {}", homepage));
    }
    if !similar.results.is_empty() {
        let titles: Vec<String> = similar
            .results
            .iter()
            .take(5)
            .map(|m| format!("{} ({})", m.title, m.id))
            .collect();
        output.info(format!("\nSimilar: {}", titles.join(", ")));
    }

    Ok(())
}

pub async fn run_genres(output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;
    let client = ctx.tmdb_client()?;

    let pb = fetch_spinner(output, "Fetching genres...");
    let genres = client.genres().await?;
    pb.finish_and_clear();

    if !output.is_human() {
        output.json(&serde_json::to_value(&genres)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Genre"]);
    for genre in &genres {
        table.add_row(vec![Cell::new(genre.id), Cell::new(&genre.name)]);
    }
    output.info(table.to_string());
    Ok(())
}

/// Accepts either a numeric genre id or a (case-insensitive) genre name.
fn resolve_genre(wanted: &str, genres: &[Genre]) -> Result<u64> {
    if let Ok(id) = wanted.parse::<u64>() {
        return Ok(id);
    }
    genres
        .iter()
        .find(|g| g.name.eq_ignore_ascii_case(wanted))
        .map(|g| g.id)
        .ok_or_else(|| eyre!("Unknown genre \"{}\". Run `cinescope genres` to list them.", wanted))
}

fn render_movie_page(ctx: &AppContext, movies: &Page<MovieRef>, output: &Output) -> Result<()> {
    if !output.is_human() {
        output.json(&serde_json::to_value(movies)?);
        return Ok(());
    }

    let store = ctx.store()?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Title", "Year", "Rating", "Genres", "Saved"]);
    for movie in &movies.results {
        let mut saved = String::new();
        if store.is_in_watchlist(movie.id) {
            saved.push('W');
        }
        if store.is_watched(movie.id) {
            saved.push('✓');
        }
        if store.is_in_favorites(movie.id) {
            saved.push('♥');
        }
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.year.map(|y| y.to_string()).unwrap_or_default()),
            Cell::new(format!("{:.1}", movie.rating)),
            Cell::new(movie.genre_label()),
            Cell::new(saved),
        ]);
    }
    output.info(table.to_string());
    output.info(format!(
        "Page {} of {} ({} results)",
        movies.page, movies.total_pages, movies.total_results
    ));
    Ok(())
}

pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        return "N/A".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

pub fn format_currency(amount: u64) -> String {
    if amount == 0 {
        return "N/A".to_string();
    }
    // 163000000 -> $163,000,000
    let digits = amount.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(148), "2h 28m");
        assert_eq!(format_runtime(45), "45m");
        assert_eq!(format_runtime(0), "N/A");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(163_000_000), "$163,000,000");
        assert_eq!(format_currency(999), "$999");
        assert_eq!(format_currency(1_000), "$1,000");
        assert_eq!(format_currency(0), "N/A");
    }

    #[test]
    fn test_resolve_genre_by_name_or_id() {
        let genres = vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 878, name: "Science Fiction".to_string() },
        ];
        assert_eq!(resolve_genre("28", &genres).unwrap(), 28);
        assert_eq!(resolve_genre("science fiction", &genres).unwrap(), 878);
        assert!(resolve_genre("Westerns", &genres).is_err());
    }
}
