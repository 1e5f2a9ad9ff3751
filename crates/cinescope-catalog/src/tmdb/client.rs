use cinescope_config::TmdbConfig;
use cinescope_models::{Credits, Genre, MovieDetails, MovieRef, Page, Video};
use reqwest::Client;

use crate::convert;
use crate::error::CatalogError;
use crate::tmdb::api::{self, DiscoverFilters, TmdbSearchResponse, TrendingWindow};

/// Read-only client for the external movie catalog. Stateless: every call is
/// a single round-trip, converted straight into view models.
///
/// List operations take the genre label table as a parameter because the list
/// endpoints only carry genre ids; fetch it once per screen with [`genres`].
///
/// [`genres`]: TmdbClient::genres
#[derive(Clone)]
pub struct TmdbClient {
    http: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        api::genre_list(&self.http, &self.config)
            .await
            .map(|raw| raw.into_iter().map(convert::genre).collect())
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn popular(&self, page: u32, genres: &[Genre]) -> Result<Page<MovieRef>, CatalogError> {
        api::popular(&self.http, &self.config, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn trending(
        &self,
        window: TrendingWindow,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::trending(&self.http, &self.config, window)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn top_rated(&self, page: u32, genres: &[Genre]) -> Result<Page<MovieRef>, CatalogError> {
        api::top_rated(&self.http, &self.config, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn now_playing(
        &self,
        page: u32,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::now_playing(&self.http, &self.config, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn search(
        &self,
        query: &str,
        page: u32,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::search(&self.http, &self.config, query, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::discover(&self.http, &self.config, filters, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError> {
        api::details(&self.http, &self.config, movie_id)
            .await
            .map(|raw| convert::movie_details(&raw, &self.config))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn credits(&self, movie_id: u64) -> Result<Credits, CatalogError> {
        api::credits(&self.http, &self.config, movie_id)
            .await
            .map(convert::credits)
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn videos(&self, movie_id: u64) -> Result<Vec<Video>, CatalogError> {
        api::videos(&self.http, &self.config, movie_id)
            .await
            .map(convert::videos)
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn similar(
        &self,
        movie_id: u64,
        page: u32,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::similar(&self.http, &self.config, movie_id, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    pub async fn recommendations(
        &self,
        movie_id: u64,
        page: u32,
        genres: &[Genre],
    ) -> Result<Page<MovieRef>, CatalogError> {
        api::recommendations(&self.http, &self.config, movie_id, page)
            .await
            .map(|raw| self.movie_page(raw, genres))
            .map_err(|e| CatalogError::new(format!("{}", e)))
    }

    fn movie_page(&self, raw: TmdbSearchResponse, genres: &[Genre]) -> Page<MovieRef> {
        Page {
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
            results: raw
                .results
                .iter()
                .map(|m| convert::movie_ref(m, genres, &self.config))
                .collect(),
        }
    }
}
