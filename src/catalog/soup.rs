/// Joins genres, keywords, top actors and director into one text blob.
///
/// Order is fixed; empty parts add nothing, not even a separator.
pub fn build_soup(
    genres: &[String],
    keywords: &[String],
    top_actors: &[String],
    director: &str,
) -> String {
    genres
        .iter()
        .chain(keywords)
        .chain(top_actors)
        .map(String::as_str)
        .chain(std::iter::once(director))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
