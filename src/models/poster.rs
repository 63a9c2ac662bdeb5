use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Audience rating reported by TMDb
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    NotAvailable,
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Score(score) => serializer.serialize_f64(*score),
            Rating::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_f64().map(Rating::Score).unwrap_or(Rating::NotAvailable))
    }
}

/// Poster, rating and tagline for one title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterDetails {
    pub poster_url: Option<String>,
    pub rating: Rating,
    pub tagline: String,
}

impl PosterDetails {
    /// Placeholder returned whenever the lookup cannot be completed
    pub fn unavailable() -> Self {
        Self {
            poster_url: None,
            rating: Rating::NotAvailable,
            tagline: String::new(),
        }
    }
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Subset of the TMDb `GET /movie/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub tagline: Option<String>,
}

impl TmdbMovie {
    pub fn into_details(self, image_base: &str) -> PosterDetails {
        PosterDetails {
            poster_url: self
                .poster_path
                .filter(|path| !path.is_empty())
                .map(|path| format!("{}{}", image_base, path)),
            rating: self
                .vote_average
                .map(Rating::Score)
                .unwrap_or(Rating::NotAvailable),
            tagline: self.tagline.unwrap_or_default(),
        }
    }
}
