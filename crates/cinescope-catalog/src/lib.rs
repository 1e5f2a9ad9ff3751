pub mod convert;
pub mod error;
pub mod images;
pub mod tmdb;

pub use error::CatalogError;
pub use tmdb::api::{DiscoverFilters, TrendingWindow};
pub use tmdb::TmdbClient;
