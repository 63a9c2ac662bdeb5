use crate::{
    catalog::Catalog,
    models::{MovieId, MovieRecord, Preferences, Recommendation},
};

/// Most-similar titles considered for re-ranking, favorite excluded
pub const CANDIDATE_POOL_SIZE: usize = 49;
pub const DEFAULT_TOP_N: usize = 5;

// Boost increments, tunable
pub const ACTOR_BOOST: f64 = 0.5;
pub const DIRECTOR_BOOST: f64 = 0.5;
pub const GENRE_BOOST: f64 = 0.3;
pub const MOOD_BOOST: f64 = 0.3;

const DEFAULT_REASON: &str = "Similar to your favorite movie";

/// Recommends titles for a favorite given by title.
///
/// An unknown title yields an empty list. With duplicate titles the favorite
/// is the last one loaded; use [`recommend_by_id`] to pick a specific one.
pub fn recommend(
    catalog: &Catalog,
    favorite_title: &str,
    preferences: &Preferences,
    top_n: usize,
) -> Vec<Recommendation> {
    match catalog.row_of_title(favorite_title) {
        Some(row) => rank(catalog, row, preferences, top_n),
        None => {
            tracing::debug!(title = %favorite_title, "Favorite title not in catalog");
            Vec::new()
        }
    }
}

/// Same as [`recommend`], with the favorite identified by its TMDb id
pub fn recommend_by_id(
    catalog: &Catalog,
    movie_id: MovieId,
    preferences: &Preferences,
    top_n: usize,
) -> Vec<Recommendation> {
    match catalog.row_of_id(movie_id) {
        Some(row) => rank(catalog, row, preferences, top_n),
        None => {
            tracing::debug!(movie_id, "Favorite id not in catalog");
            Vec::new()
        }
    }
}

/// Similarity pool around `favorite`, re-sorted by `similarity + boost`.
///
/// Both sorts are stable, so ties keep row order.
fn rank(
    catalog: &Catalog,
    favorite: usize,
    preferences: &Preferences,
    top_n: usize,
) -> Vec<Recommendation> {
    let mut pool: Vec<(usize, f64)> = catalog
        .similarity()
        .row(favorite)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(row, _)| row != favorite)
        .collect();
    pool.sort_by(|a, b| b.1.total_cmp(&a.1));
    pool.truncate(CANDIDATE_POOL_SIZE);

    let mut ranked: Vec<Recommendation> = pool
        .into_iter()
        .map(|(row, similarity)| {
            let record = &catalog.records()[row];
            let (boost, reason) = boost(record, preferences);
            Recommendation {
                title: record.title().to_string(),
                movie_id: record.id(),
                reason,
                similarity,
                boost,
                score: similarity + boost,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

/// Additive preference boost for one candidate and the reasons behind it
pub fn boost(record: &MovieRecord, preferences: &Preferences) -> (f64, String) {
    let genres = record.genres_text().to_lowercase();
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if let Some(actor) = &preferences.actor {
        if record.top_actors().iter().any(|a| a == actor) {
            score += ACTOR_BOOST;
            reasons.push(format!("Features {}", actor));
        }
    }

    if let Some(director) = &preferences.director {
        if record.director().to_lowercase() == director.to_lowercase() {
            score += DIRECTOR_BOOST;
            reasons.push(format!("Directed by {}", director));
        }
    }

    if let Some(genre) = &preferences.genre {
        if genres.contains(&genre.to_lowercase()) {
            score += GENRE_BOOST;
            reasons.push(format!("Is a {} movie", genre));
        }
    }

    if let (Some(label), Some(mood)) = (&preferences.mood, preferences.parsed_mood()) {
        if mood.genres().iter().any(|g| genres.contains(g)) {
            score += MOOD_BOOST;
            reasons.push(format!("Matches your '{}' mood", label));
        }
    }

    let reason = if reasons.is_empty() {
        DEFAULT_REASON.to_string()
    } else {
        reasons.join("; ")
    };
    (score, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{similarity::SimilarityMatrix, LoadStats};

    fn movie(
        id: MovieId,
        title: &str,
        genres: &[&str],
        actors: &[&str],
        director: &str,
    ) -> MovieRecord {
        MovieRecord::new(
            id,
            title.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
            vec![],
            actors.iter().map(|a| a.to_string()).collect(),
            director.to_string(),
        )
    }

    /// A..E with fixed similarities to A of 0.9, 0.5, 0.3, 0.1
    fn scenario_catalog() -> Catalog {
        let records = vec![
            movie(1, "A", &["Drama"], &["Lead A"], "Dir A"),
            movie(2, "B", &["Thriller"], &["Lead B"], "Kathryn Bigelow"),
            movie(3, "C", &["Comedy"], &["Lead C"], "Dir C"),
            movie(4, "D", &["Family", "Animation"], &["Tom Hanks"], "Dir D"),
            movie(5, "E", &["Science Fiction"], &["Lead E"], "Dir E"),
        ];
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.5, 0.3, 0.1],
            vec![0.9, 1.0, 0.2, 0.2, 0.2],
            vec![0.5, 0.2, 1.0, 0.2, 0.2],
            vec![0.3, 0.2, 0.2, 1.0, 0.2],
            vec![0.1, 0.2, 0.2, 0.2, 1.0],
        ])
        .unwrap();
        Catalog::with_similarity(records, matrix, LoadStats::default()).unwrap()
    }

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_director_boost_scenario() {
        let catalog = scenario_catalog();
        let prefs = Preferences::default().with_director("Kathryn Bigelow");
        let recs = recommend(&catalog, "A", &prefs, 3);

        assert_eq!(titles(&recs), vec!["B", "C", "D"]);
        assert!((recs[0].score - 1.4).abs() < 1e-9);
        assert_eq!(recs[0].reason, "Directed by Kathryn Bigelow");
        assert_eq!(recs[1].reason, DEFAULT_REASON);
    }

    #[test]
    fn test_unknown_title_is_empty() {
        let catalog = scenario_catalog();
        let prefs = Preferences::default().with_actor("Tom Hanks").with_mood("happy");
        assert!(recommend(&catalog, "Z", &prefs, 5).is_empty());
        assert!(recommend(&catalog, "a", &Preferences::default(), 5).is_empty());
        assert!(recommend_by_id(&catalog, 404, &prefs, 5).is_empty());
    }

    #[test]
    fn test_favorite_never_recommended() {
        let catalog = scenario_catalog();
        for title in ["A", "B", "C", "D", "E"] {
            let recs = recommend(&catalog, title, &Preferences::default(), 10);
            assert_eq!(recs.len(), 4);
            assert!(recs.iter().all(|r| r.title != title));
        }
    }

    #[test]
    fn test_boosts_can_reorder_pool() {
        let catalog = scenario_catalog();
        let prefs = Preferences::default()
            .with_actor("Tom Hanks")
            .with_mood("Happy");
        let recs = recommend(&catalog, "A", &prefs, 5);

        // D: 0.3 + 0.5 (actor) + 0.3 (family) = 1.1
        assert_eq!(titles(&recs), vec!["D", "B", "C", "E"]);
        assert_eq!(recs[0].reason, "Features Tom Hanks; Matches your 'Happy' mood");
        assert!((recs[0].boost - 0.8).abs() < 1e-9);
        // C: 0.5 + 0.3 (comedy) = 0.8
        assert!((recs[2].score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_recommend_by_id_matches_title() {
        let catalog = scenario_catalog();
        let prefs = Preferences::default().with_genre("comedy");
        assert_eq!(
            recommend(&catalog, "A", &prefs, 5),
            recommend_by_id(&catalog, 1, &prefs, 5)
        );
    }

    #[test]
    fn test_top_n_limits_output() {
        let catalog = scenario_catalog();
        assert_eq!(recommend(&catalog, "A", &Preferences::default(), 2).len(), 2);
        assert!(recommend(&catalog, "A", &Preferences::default(), 0).is_empty());
    }

    #[test]
    fn test_ties_keep_row_order() {
        let catalog = scenario_catalog();
        let recs = recommend(&catalog, "E", &Preferences::default(), 5);
        assert_eq!(titles(&recs), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_candidate_pool_is_capped() {
        let records: Vec<MovieRecord> = (0..60)
            .map(|i| movie(i, &format!("Movie {}", i), &["Drama"], &[], ""))
            .collect();
        let rows: Vec<Vec<f64>> = (0..60)
            .map(|i| {
                (0..60)
                    .map(|j| if i == j { 1.0 } else { 1.0 - (j as f64) / 100.0 })
                    .collect()
            })
            .collect();
        let catalog = Catalog::with_similarity(
            records,
            SimilarityMatrix::from_rows(rows).unwrap(),
            LoadStats::default(),
        )
        .unwrap();

        let recs = recommend(&catalog, "Movie 0", &Preferences::default(), 100);
        assert_eq!(recs.len(), CANDIDATE_POOL_SIZE);
        assert_eq!(recs[0].title, "Movie 1");
        assert_eq!(recs.last().unwrap().title, "Movie 49");
    }

    #[test]
    fn test_director_match_is_case_insensitive() {
        let record = movie(1, "X", &["Crime"], &[], "Michael Mann");
        let (score, reason) = boost(&record, &Preferences::default().with_director("michael mann"));
        assert!(score >= DIRECTOR_BOOST);
        assert!(reason.contains("Directed by"));
    }

    #[test]
    fn test_actor_match_is_exact() {
        let record = movie(1, "X", &["Crime"], &["Al Pacino"], "");
        let (score, _) = boost(&record, &Preferences::default().with_actor("al pacino"));
        assert_eq!(score, 0.0);
        let (score, _) = boost(&record, &Preferences::default().with_actor("Al Pacino"));
        assert_eq!(score, ACTOR_BOOST);
    }

    #[test]
    fn test_happy_mood_on_comedy() {
        let record = movie(1, "X", &["Romantic Comedy"], &[], "");
        let (score, reason) = boost(&record, &Preferences::default().with_mood("HAPPY"));
        assert_eq!(score, MOOD_BOOST);
        assert_eq!(reason, "Matches your 'HAPPY' mood");
    }

    #[test]
    fn test_genre_substring_match() {
        let record = movie(1, "X", &["Science Fiction", "Action"], &[], "");
        let (score, reason) = boost(&record, &Preferences::default().with_genre("fiction"));
        assert_eq!(score, GENRE_BOOST);
        assert_eq!(reason, "Is a fiction movie");
    }

    #[test]
    fn test_unknown_mood_gives_no_boost() {
        let record = movie(1, "X", &["Thriller"], &[], "");
        let (score, reason) = boost(&record, &Preferences::default().with_mood("thrilling"));
        assert_eq!(score, 0.0);
        assert_eq!(reason, DEFAULT_REASON);
    }
}
