use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    pub kind: String,
    pub official: bool,
}

impl Video {
    pub fn is_trailer(&self) -> bool {
        self.kind == "Trailer"
    }

    /// Watch URL for YouTube-hosted videos, None for other sites.
    pub fn youtube_url(&self) -> Option<String> {
        if self.site == "YouTube" {
            Some(format!("https://www.youtube.com/watch?v={}", self.key))
        } else {
            None
        }
    }
}
