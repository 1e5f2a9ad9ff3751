pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const PROFILE_SIZE: &str = "w185";

/// Posters always render something, so a missing path maps to a placeholder.
pub fn poster_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) => format!("{}/{}{}", IMAGE_BASE_URL, size, p),
        None => "/placeholder-poster.jpg".to_string(),
    }
}

pub fn backdrop_url(path: Option<&str>, size: &str) -> Option<String> {
    path.map(|p| format!("{}/{}{}", IMAGE_BASE_URL, size, p))
}

pub fn profile_url(path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{}/{}{}", IMAGE_BASE_URL, PROFILE_SIZE, p))
}
