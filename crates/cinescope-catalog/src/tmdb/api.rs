use anyhow::{anyhow, Result};
use cinescope_config::TmdbConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub production_companies: Vec<TmdbCompany>,
    #[serde(default)]
    pub production_countries: Vec<TmdbCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<TmdbLanguage>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCompany {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCountry {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbLanguage {
    pub english_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    pub page: u32,
    pub results: Vec<TmdbMovie>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

#[derive(Debug, Deserialize)]
struct TmdbVideoList {
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Filter set for the discover endpoint. Unset fields are omitted from the
/// request; sorting defaults to popularity.
#[derive(Debug, Clone, Default)]
pub struct DiscoverFilters {
    pub genre_id: Option<u64>,
    pub year: Option<u32>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<String>,
}

async fn fetch<T>(
    client: &Client,
    config: &TmdbConfig,
    path: &str,
    params: &[(&str, String)],
) -> Result<T>
where
    T: DeserializeOwned,
{
    let url = format!("{}{}", TMDB_BASE_URL, path);
    debug!("TMDB request: {}", path);

    let response = client
        .get(&url)
        .query(&[("api_key", config.api_key.as_str()), ("language", config.language.as_str())])
        .query(params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("TMDB request failed: {} - {}", status, error_text));
    }

    Ok(response.json().await?)
}

pub async fn popular(client: &Client, config: &TmdbConfig, page: u32) -> Result<TmdbSearchResponse> {
    fetch(client, config, "/movie/popular", &[("page", page.to_string())]).await
}

pub async fn trending(
    client: &Client,
    config: &TmdbConfig,
    window: TrendingWindow,
) -> Result<TmdbSearchResponse> {
    fetch(client, config, &format!("/trending/movie/{}", window.as_str()), &[]).await
}

pub async fn top_rated(client: &Client, config: &TmdbConfig, page: u32) -> Result<TmdbSearchResponse> {
    fetch(client, config, "/movie/top_rated", &[("page", page.to_string())]).await
}

pub async fn now_playing(
    client: &Client,
    config: &TmdbConfig,
    page: u32,
) -> Result<TmdbSearchResponse> {
    fetch(client, config, "/movie/now_playing", &[("page", page.to_string())]).await
}

pub async fn search(
    client: &Client,
    config: &TmdbConfig,
    query: &str,
    page: u32,
) -> Result<TmdbSearchResponse> {
    fetch(
        client,
        config,
        "/search/movie",
        &[("query", query.to_string()), ("page", page.to_string())],
    )
    .await
}

pub async fn discover(
    client: &Client,
    config: &TmdbConfig,
    filters: &DiscoverFilters,
    page: u32,
) -> Result<TmdbSearchResponse> {
    let mut params = vec![
        ("page", page.to_string()),
        (
            "sort_by",
            filters
                .sort_by
                .clone()
                .unwrap_or_else(|| "popularity.desc".to_string()),
        ),
    ];
    if let Some(genre_id) = filters.genre_id {
        params.push(("with_genres", genre_id.to_string()));
    }
    if let Some(year) = filters.year {
        params.push(("year", year.to_string()));
    }
    if let Some(min_rating) = filters.min_rating {
        params.push(("vote_average.gte", min_rating.to_string()));
    }

    fetch(client, config, "/discover/movie", &params).await
}

pub async fn details(client: &Client, config: &TmdbConfig, movie_id: u64) -> Result<TmdbMovieDetails> {
    fetch(client, config, &format!("/movie/{}", movie_id), &[]).await
}

pub async fn credits(client: &Client, config: &TmdbConfig, movie_id: u64) -> Result<TmdbCredits> {
    fetch(client, config, &format!("/movie/{}/credits", movie_id), &[]).await
}

pub async fn videos(client: &Client, config: &TmdbConfig, movie_id: u64) -> Result<Vec<TmdbVideo>> {
    let list: TmdbVideoList =
        fetch(client, config, &format!("/movie/{}/videos", movie_id), &[]).await?;
    Ok(list.results)
}

pub async fn similar(
    client: &Client,
    config: &TmdbConfig,
    movie_id: u64,
    page: u32,
) -> Result<TmdbSearchResponse> {
    fetch(
        client,
        config,
        &format!("/movie/{}/similar", movie_id),
        &[("page", page.to_string())],
    )
    .await
}

pub async fn recommendations(
    client: &Client,
    config: &TmdbConfig,
    movie_id: u64,
    page: u32,
) -> Result<TmdbSearchResponse> {
    fetch(
        client,
        config,
        &format!("/movie/{}/recommendations", movie_id),
        &[("page", page.to_string())],
    )
    .await
}

pub async fn genre_list(client: &Client, config: &TmdbConfig) -> Result<Vec<TmdbGenre>> {
    let list: TmdbGenreList = fetch(client, config, "/genre/movie/list", &[]).await?;
    Ok(list.genres)
}
