use serde::{Deserialize, Serialize};

pub mod movie;
pub mod poster;
pub mod preferences;

pub use movie::{LocalDetails, MovieId, MovieRecord, TitleSummary};
pub use poster::{PosterDetails, Rating, TmdbMovie};
pub use preferences::{Mood, Preferences};

/// A recommended title with the justification shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub movie_id: MovieId,
    pub reason: String,
    /// Raw cosine similarity to the favorite
    pub similarity: f64,
    /// Sum of the preference boosts that fired
    pub boost: f64,
    /// `similarity + boost`, the ranking key
    pub score: f64,
}

/// Request body for the recommendations endpoint
///
/// Either `favorite_title` or `movie_id` identifies the favorite; the id wins
/// when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub favorite_title: Option<String>,
    #[serde(default)]
    pub movie_id: Option<MovieId>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl RecommendationRequest {
    pub fn preferences(&self) -> Preferences {
        Preferences::new(
            self.actor.clone(),
            self.director.clone(),
            self.genre.clone(),
            self.mood.clone(),
        )
    }
}
