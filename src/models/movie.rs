use serde::{Deserialize, Serialize};

use crate::catalog::soup::build_soup;

/// TMDb identifier shared by the three corpus files
pub type MovieId = i64;

/// One title in the corpus, with its derived feature soup.
///
/// Records are immutable once built, so the soup always matches the fields
/// it was derived from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieRecord {
    id: MovieId,
    title: String,
    genres: Vec<String>,
    keywords: Vec<String>,
    top_actors: Vec<String>,
    director: String,
    soup: String,
    genres_text: String,
}

impl MovieRecord {
    pub fn new(
        id: MovieId,
        title: String,
        genres: Vec<String>,
        keywords: Vec<String>,
        top_actors: Vec<String>,
        director: String,
    ) -> Self {
        let soup = build_soup(&genres, &keywords, &top_actors, &director);
        let genres_text = genres.join(" ");
        Self {
            id,
            title,
            genres,
            keywords,
            top_actors,
            director,
            soup,
            genres_text,
        }
    }

    pub fn id(&self) -> MovieId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Leading cast in billing order, at most three names
    pub fn top_actors(&self) -> &[String] {
        &self.top_actors
    }

    /// Empty when the crew lists no "Director"
    pub fn director(&self) -> &str {
        &self.director
    }

    /// Bag-of-words text indexed by the similarity engine
    pub fn soup(&self) -> &str {
        &self.soup
    }

    /// Genre names joined with spaces
    pub fn genres_text(&self) -> &str {
        &self.genres_text
    }

    pub fn local_details(&self) -> LocalDetails {
        LocalDetails {
            id: self.id,
            title: self.title.clone(),
            genres: self.genres_text.clone(),
            director: self.director.clone(),
            top_actors: self.top_actors.clone(),
        }
    }
}

/// Corpus-side details of a title, no network involved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalDetails {
    pub id: MovieId,
    pub title: String,
    pub genres: String,
    pub director: String,
    pub top_actors: Vec<String>,
}

/// Title and identifier, as listed by search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleSummary {
    pub title: String,
    pub movie_id: MovieId,
}
