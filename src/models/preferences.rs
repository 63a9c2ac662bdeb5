use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Mood a user can pick; each one points at a fixed set of genres
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Romantic,
    Curious,
    Dark,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Romantic,
        Mood::Curious,
        Mood::Dark,
        Mood::Calm,
    ];

    /// Lowercase genre fragments matched as substrings of a movie's genre text
    pub fn genres(&self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["comedy", "adventure", "family"],
            Mood::Sad => &["drama", "romance"],
            Mood::Excited => &["action", "sci-fi", "adventure"],
            Mood::Romantic => &["romance", "drama"],
            Mood::Curious => &["mystery", "documentary"],
            Mood::Dark => &["thriller", "horror", "crime"],
            Mood::Calm => &["documentary", "drama", "history"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
            Mood::Romantic => "romantic",
            Mood::Curious => "curious",
            Mood::Dark => "dark",
            Mood::Calm => "calm",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| format!("Unknown mood: {}", s))
    }
}

/// Soft preferences applied as boosts on top of similarity.
///
/// Every filter is optional: `None` means "no constraint of that kind".
/// Blank strings are treated as absent, see [`Preferences::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub actor: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    /// Raw mood label as the user wrote it, used in the reason text
    pub mood: Option<String>,
}

impl Preferences {
    pub fn new(
        actor: Option<String>,
        director: Option<String>,
        genre: Option<String>,
        mood: Option<String>,
    ) -> Self {
        Self {
            actor: non_blank(actor),
            director: non_blank(director),
            genre: non_blank(genre),
            mood: non_blank(mood),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = non_blank(Some(actor.into()));
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = non_blank(Some(director.into()));
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = non_blank(Some(genre.into()));
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = non_blank(Some(mood.into()));
        self
    }

    /// Known mood, if the label maps to one
    pub fn parsed_mood(&self) -> Option<Mood> {
        self.mood.as_deref().and_then(|m| m.parse().ok())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
