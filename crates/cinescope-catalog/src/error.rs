use std::fmt;

/// Single failure condition for catalog calls: the request did not produce a
/// usable response. No retry or rate-limit handling happens at this level.
#[derive(Debug)]
pub struct CatalogError {
    message: String,
}

impl CatalogError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CatalogError {}
