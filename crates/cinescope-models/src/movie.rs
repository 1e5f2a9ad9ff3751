use serde::{Deserialize, Serialize};

/// Display snapshot of a movie at the moment it enters a collection.
/// Never refreshed afterwards; stale poster URLs are acceptable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRef {
    pub id: u64,
    pub title: String,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,
    pub rating: f64,
    pub year: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl MovieRef {
    pub fn genre_label(&self) -> String {
        self.genres.join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub poster: String,
    pub backdrop: Option<String>,
    pub rating: f64,
    pub year: Option<u32>,
    pub genres: Vec<String>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub budget: u64,
    pub revenue: u64,
    pub release_date: Option<String>,
    pub vote_count: u64,
    pub popularity: f64,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
}

impl MovieDetails {
    /// Snapshot used when adding this movie to a collection.
    pub fn to_movie_ref(&self) -> MovieRef {
        MovieRef {
            id: self.id,
            title: self.title.clone(),
            poster: self.poster.clone(),
            backdrop: self.backdrop.clone(),
            rating: self.rating,
            year: self.year,
            genres: self.genres.clone(),
            overview: self.overview.clone(),
        }
    }
}

/// One page of catalog results, as returned by the external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}
