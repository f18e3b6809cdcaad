//! Image url resolution collaborator.
//!
//! The drawing model stores image urls as opaque references; turning them
//! into something displayable (a blob url, a signed download url) is the
//! host's job. The engine only needs an async lookup and an idempotent
//! patch, so the seam is a small object-safe trait plus a caching wrapper
//! that dedupes repeat lookups.

use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;
use thiserror::Error;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Image resolution errors.
#[derive(Debug, Error)]
pub enum ImageResolveError {
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("Resolver error: {0}")]
    Other(String),
}

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ImageResolveError>;

/// Outcome of resolving one stored url.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    /// Url the renderer should display.
    pub display_url: String,
    /// Canonical content url, when the store rewrote the original.
    pub content_url: Option<String>,
}

/// Sizing hints forwarded to the image store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolveHints {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Trait for the external store mapping stored urls to displayable ones.
///
/// Implementations live in the host; tests use an in-memory map.
pub trait ImageUrlResolver {
    /// Resolve one stored url.
    fn resolve(&self, url: &str, hints: ResolveHints) -> BoxFuture<'_, ResolveResult<ResolvedImage>>;
}

/// Caching wrapper that remembers every successful resolution, so repeated
/// lookups for the same url hit memory instead of the store.
pub struct CachedImageResolver<R> {
    inner: R,
    cache: RwLock<HashMap<String, ResolvedImage>>,
}

impl<R: ImageUrlResolver> CachedImageResolver<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, cache: RwLock::new(HashMap::new()) }
    }

    /// Number of cached urls.
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl<R: ImageUrlResolver> ImageUrlResolver for CachedImageResolver<R> {
    fn resolve(&self, url: &str, hints: ResolveHints) -> BoxFuture<'_, ResolveResult<ResolvedImage>> {
        let url = url.to_string();
        Box::pin(async move {
            let hit = self.cache.read().ok().and_then(|cache| cache.get(&url).cloned());
            if let Some(resolved) = hit {
                debug!("image cache hit for {url}");
                return Ok(resolved);
            }
            let resolved = self.inner.resolve(&url, hints).await?;
            if let Ok(mut cache) = self.cache.write() {
                cache.insert(url, resolved.clone());
            }
            Ok(resolved)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_resolvers::MapResolver;
    use super::*;
    use crate::test_support::block_on;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_resolve_hit_and_miss() {
        let resolver = MapResolver::new(&[("stored/a.png", "blob:a")]);

        let resolved = block_on(resolver.resolve("stored/a.png", ResolveHints::default())).unwrap();
        assert_eq!(resolved.display_url, "blob:a");

        let missing = block_on(resolver.resolve("stored/b.png", ResolveHints::default()));
        assert!(matches!(missing, Err(ImageResolveError::NotFound(_))));
    }

    #[test]
    fn test_cache_dedupes_lookups() {
        let cached = CachedImageResolver::new(MapResolver::new(&[("stored/a.png", "blob:a")]));

        for _ in 0..3 {
            let resolved =
                block_on(cached.resolve("stored/a.png", ResolveHints::default())).unwrap();
            assert_eq!(resolved.display_url, "blob:a");
        }

        assert_eq!(cached.inner.lookups.load(Ordering::Relaxed), 1);
        assert_eq!(cached.cached_len(), 1);
    }

    #[test]
    fn test_cache_does_not_remember_failures() {
        let cached = CachedImageResolver::new(MapResolver::new(&[]));

        assert!(block_on(cached.resolve("gone.png", ResolveHints::default())).is_err());
        assert!(block_on(cached.resolve("gone.png", ResolveHints::default())).is_err());

        // Both attempts reached the store; nothing was cached.
        assert_eq!(cached.inner.lookups.load(Ordering::Relaxed), 2);
        assert_eq!(cached.cached_len(), 0);
    }
}
