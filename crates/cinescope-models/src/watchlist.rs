use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::MovieRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub movie: MovieRef,
    pub date_added: DateTime<Utc>,
    #[serde(default)]
    pub watched: bool,
}

impl WatchlistEntry {
    pub fn id(&self) -> u64 {
        self.movie.id
    }
}
