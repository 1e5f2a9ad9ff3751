use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::MovieRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub movie: MovieRef,
    pub date_added: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn id(&self) -> u64 {
        self.movie.id
    }
}
