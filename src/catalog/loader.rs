//! Reads the three corpus CSV files and joins them into movie records.

use serde::{de::DeserializeOwned, Deserialize};
use std::collections::HashMap;
use std::path::Path;

use super::{
    literal::{extract_director, extract_names, Extracted},
    Catalog, DataSources, LoadStats,
};
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord},
};

/// Leading cast members kept per movie
pub const TOP_ACTORS: usize = 3;

#[derive(Debug, Deserialize)]
struct MetadataRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    genres: String,
}

#[derive(Debug, Deserialize)]
struct CreditsRow {
    id: String,
    #[serde(default)]
    cast: String,
    #[serde(default)]
    crew: String,
}

#[derive(Debug, Deserialize)]
struct KeywordsRow {
    id: String,
    #[serde(default)]
    keywords: String,
}

trait Keyed {
    fn raw_id(&self) -> &str;
}

impl Keyed for MetadataRow {
    fn raw_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for CreditsRow {
    fn raw_id(&self) -> &str {
        &self.id
    }
}

impl Keyed for KeywordsRow {
    fn raw_id(&self) -> &str {
        &self.id
    }
}

/// Loads and indexes the corpus, degrading to an empty catalog when any
/// source cannot be read.
pub fn load_catalog(sources: &DataSources) -> Catalog {
    match read_records(sources) {
        Ok((records, stats)) => {
            tracing::info!(
                records = records.len(),
                invalid_ids = stats.invalid_ids,
                unreadable_rows = stats.unreadable_rows,
                unmatched = stats.unmatched,
                malformed_genres = stats.malformed_genres,
                malformed_keywords = stats.malformed_keywords,
                malformed_cast = stats.malformed_cast,
                malformed_crew = stats.malformed_crew,
                "Corpus loaded, building similarity index"
            );
            Catalog::build(records, stats)
        }
        Err(e) => {
            tracing::error!(error = %e, "Corpus unavailable, serving an empty catalog");
            Catalog::degraded()
        }
    }
}

/// Joined, normalised records in metadata order, plus load counters
pub fn read_records(sources: &DataSources) -> AppResult<(Vec<MovieRecord>, LoadStats)> {
    let mut stats = LoadStats::default();

    let metadata: Vec<(MovieId, MetadataRow)> = read_table(&sources.metadata, &mut stats)?;
    let credits: Vec<(MovieId, CreditsRow)> = read_table(&sources.credits, &mut stats)?;
    let keywords: Vec<(MovieId, KeywordsRow)> = read_table(&sources.keywords, &mut stats)?;
    stats.metadata_rows = metadata.len();
    stats.credits_rows = credits.len();
    stats.keywords_rows = keywords.len();

    let credits = group_by_id(credits);
    let keywords = group_by_id(keywords);

    let mut records = Vec::new();
    for (id, meta) in &metadata {
        let (Some(credit_rows), Some(keyword_rows)) = (credits.get(id), keywords.get(id)) else {
            stats.unmatched += 1;
            continue;
        };

        // Inner join: every combination of duplicate keys, in source order
        for credit in credit_rows {
            for keyword in keyword_rows {
                let genres =
                    counted(extract_names(&meta.genres, None), &mut stats.malformed_genres);
                let tags = counted(
                    extract_names(&keyword.keywords, None),
                    &mut stats.malformed_keywords,
                );
                let top_actors = counted(
                    extract_names(&credit.cast, Some(TOP_ACTORS)),
                    &mut stats.malformed_cast,
                );
                let director = counted(extract_director(&credit.crew), &mut stats.malformed_crew);

                records.push(MovieRecord::new(
                    *id,
                    meta.title.clone(),
                    genres,
                    tags,
                    top_actors,
                    director,
                ));
            }
        }
    }

    Ok((records, stats))
}

fn counted<T: Default>(extracted: Extracted<T>, malformed: &mut usize) -> T {
    if extracted.is_malformed() {
        *malformed += 1;
    }
    extracted.into_value()
}

/// Reads every decodable row with an integer id.
///
/// Failing to open the file is an error; bad rows are only counted.
fn read_table<T: DeserializeOwned + Keyed>(
    path: &Path,
    stats: &mut LoadStats,
) -> AppResult<Vec<(MovieId, T)>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::DataSource(format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable row");
                stats.unreadable_rows += 1;
                continue;
            }
        };
        match parse_id(row.raw_id()) {
            Some(id) => rows.push((id, row)),
            None => stats.invalid_ids += 1,
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "Read corpus file");
    Ok(rows)
}

fn group_by_id<T>(rows: Vec<(MovieId, T)>) -> HashMap<MovieId, Vec<T>> {
    let mut groups: HashMap<MovieId, Vec<T>> = HashMap::new();
    for (id, row) in rows {
        groups.entry(id).or_default().push(row);
    }
    groups
}

/// Integer id, also accepting integral floats such as `"862.0"`
pub fn parse_id(raw: &str) -> Option<MovieId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<MovieId>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as MovieId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const METADATA: &str = concat!(
        "id,title,genres\n",
        "862,Toy Story,\"[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}, ",
        "{'id': 10751, 'name': 'Family'}]\"\n",
        "8844,Jumanji,\"[{'id': 12, 'name': 'Adventure'}, {'id': 14, 'name': 'Fantasy'}]\"\n",
        "1997-08-20,Broken Id,\"[]\"\n",
        "15602,Grumpier Old Men,\"[{'id': 10749, 'name': 'Romance'\"\n",
        "999,Only In Metadata,\"[]\"\n",
    );

    const CREDITS: &str = concat!(
        "cast,crew,id\n",
        "\"[{'name': 'Tom Hanks'}, {'name': 'Tim Allen'}, {'name': 'Don Rickles'}, ",
        "{'name': 'Jim Varney'}]\",",
        "\"[{'job': 'Producer', 'name': 'Bonnie Arnold'}, ",
        "{'job': 'Director', 'name': 'John Lasseter'}]\",862\n",
        "\"[{'name': 'Robin Williams'}]\",",
        "\"[{'job': 'Director', 'name': 'Joe Johnston'}]\",8844.0\n",
        "\"[{'name': 'Walter Matthau'}]\",",
        "\"[{'job': 'Writer', 'name': 'Mark Steven Johnson'}]\",15602\n",
    );

    const KEYWORDS: &str = "\
id,keywords
862,\"[{'id': 931, 'name': 'jealousy'}, {'id': 4290, 'name': 'toy'}]\"
8844,\"[{'id': 10090, 'name': 'board game'}]\"
15602,not a literal
";

    fn write_sources(dir: &TempDir) -> DataSources {
        let sources = DataSources {
            metadata: dir.path().join("metadata.csv"),
            credits: dir.path().join("credits.csv"),
            keywords: dir.path().join("keywords.csv"),
        };
        fs::write(&sources.metadata, METADATA).unwrap();
        fs::write(&sources.credits, CREDITS).unwrap();
        fs::write(&sources.keywords, KEYWORDS).unwrap();
        sources
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("862"), Some(862));
        assert_eq!(parse_id(" 8844.0 "), Some(8844));
        assert_eq!(parse_id("1997-08-20"), None);
        assert_eq!(parse_id("12.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_read_records_joins_and_normalises() {
        let dir = TempDir::new().unwrap();
        let (records, stats) = read_records(&write_sources(&dir)).unwrap();

        let titles: Vec<&str> = records.iter().map(MovieRecord::title).collect();
        assert_eq!(titles, vec!["Toy Story", "Jumanji", "Grumpier Old Men"]);

        let toy_story = &records[0];
        assert_eq!(toy_story.genres(), ["Animation", "Comedy", "Family"]);
        assert_eq!(toy_story.top_actors(), ["Tom Hanks", "Tim Allen", "Don Rickles"]);
        assert_eq!(toy_story.director(), "John Lasseter");
        assert_eq!(
            toy_story.soup(),
            "Animation Comedy Family jealousy toy Tom Hanks Tim Allen Don Rickles John Lasseter"
        );

        assert_eq!(records[1].id(), 8844);
        assert_eq!(records[1].keywords(), ["board game"]);

        let grumpier = &records[2];
        assert!(grumpier.genres().is_empty());
        assert!(grumpier.keywords().is_empty());
        assert_eq!(grumpier.director(), "");

        assert_eq!(stats.invalid_ids, 1);
        assert_eq!(stats.unmatched, 1);
        assert_eq!(stats.malformed_genres, 1);
        assert_eq!(stats.malformed_keywords, 1);
        assert_eq!(stats.malformed_crew, 0);
        assert!(!stats.degraded);
    }

    #[test]
    fn test_duplicate_keys_yield_every_combination() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        fs::write(
            &sources.keywords,
            "id,keywords\n862,\"[{'name': 'toy'}]\"\n862,\"[{'name': 'cowboy'}]\"\n",
        )
        .unwrap();

        let (records, _) = read_records(&sources).unwrap();
        let keywords: Vec<Vec<String>> = records.iter().map(|r| r.keywords().to_vec()).collect();
        assert_eq!(keywords, vec![vec!["toy".to_string()], vec!["cowboy".to_string()]]);
    }

    #[test]
    fn test_deeply_nested_cell_only_drops_its_field() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        let metadata = format!(
            "id,title,genres\n\
             862,Toy Story,\"[{{'name': 'Animation'}}]\"\n\
             8844,Jumanji,\"{}\"\n",
            "[".repeat(100_000)
        );
        fs::write(&sources.metadata, metadata).unwrap();

        let (records, stats) = read_records(&sources).unwrap();

        let titles: Vec<&str> = records.iter().map(MovieRecord::title).collect();
        assert_eq!(titles, vec!["Toy Story", "Jumanji"]);
        assert_eq!(records[0].genres(), ["Animation"]);
        assert!(records[1].genres().is_empty());
        assert_eq!(records[1].director(), "Joe Johnston");
        assert_eq!(stats.malformed_genres, 1);
        assert_eq!(stats.unreadable_rows, 0);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        fs::remove_file(&sources.credits).unwrap();
        assert!(matches!(read_records(&sources), Err(AppError::DataSource(_))));
    }

    #[test]
    fn test_load_catalog_degrades_on_missing_source() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        fs::remove_file(&sources.keywords).unwrap();

        let catalog = load_catalog(&sources);
        assert!(!catalog.is_ready());
        assert!(catalog.is_empty());
        assert!(catalog.similarity().is_empty());
        assert!(catalog.list_genres().is_empty());
    }

    #[test]
    fn test_load_catalog_builds_index() {
        let dir = TempDir::new().unwrap();
        let catalog = load_catalog(&write_sources(&dir));

        assert!(catalog.is_ready());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.similarity().size(), 3);
        assert_eq!(catalog.row_of_title("Jumanji"), Some(1));
    }

    #[test]
    fn test_reload_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let sources = write_sources(&dir);
        let first = load_catalog(&sources);
        let second = load_catalog(&sources);
        assert_eq!(first.similarity(), second.similarity());
        assert_eq!(first.records(), second.records());
    }
}
