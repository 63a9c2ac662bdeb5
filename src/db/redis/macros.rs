/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds to
/// live, and returns it. A failed cache read is logged and treated as a miss;
/// errors from `$block` are propagated with `?`.
///
/// ```ignore
/// let details = cached!(cache, CacheKey::Poster(862), 86400, fetch_details(862))?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.get_from_cache(&$key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(key = %$key, error = %e, "Cache read failed, treating as miss");
                None
            }
        };
        if let Some(cached) = hit {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
