//! Shared post store
//!
//! Holds the current [`PostCollection`] for the lifetime of the process.
//! Readers take an `Arc` snapshot and keep using it even if a reload lands
//! meanwhile. A reload builds the next collection completely before swapping
//! it in, so nobody ever observes a half-built collection, and a failed
//! reload leaves the current one untouched.

use std::sync::{Arc, PoisonError, RwLock};

use crate::content::{ContentLoader, LoadError, PostCollection};
use crate::source::SourceProvider;

/// The live post collection plus the loader that rebuilds it
#[derive(Debug)]
pub struct PostStore {
    loader: ContentLoader,
    current: RwLock<Arc<PostCollection>>,
}

impl PostStore {
    /// Create a store holding an empty collection
    pub fn new(loader: ContentLoader) -> Self {
        Self::with_collection(loader, PostCollection::empty())
    }

    /// Create a store around an already loaded collection
    pub fn with_collection(loader: ContentLoader, collection: PostCollection) -> Self {
        Self {
            loader,
            current: RwLock::new(Arc::new(collection)),
        }
    }

    /// Load from `provider` and wrap the result in a store
    pub fn open<P: SourceProvider + ?Sized>(
        loader: ContentLoader,
        provider: &P,
    ) -> Result<Self, LoadError> {
        let collection = loader.load_from(provider)?;
        Ok(Self::with_collection(loader, collection))
    }

    /// The collection as of now
    pub fn snapshot(&self) -> Arc<PostCollection> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in `collection`, returning the previous one
    pub fn replace(&self, collection: PostCollection) -> Arc<PostCollection> {
        self.swap(Arc::new(collection))
    }

    fn swap(&self, next: Arc<PostCollection>) -> Arc<PostCollection> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild from `provider`, swap the result in and return it.
    ///
    /// Discovery and parsing run without holding the lock. The returned
    /// collection is the one this call built, even if another reload has
    /// already replaced it.
    pub fn reload<P: SourceProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> Result<Arc<PostCollection>, LoadError> {
        let next = Arc::new(self.loader.load_from(provider)?);
        self.swap(Arc::clone(&next));
        tracing::info!("Reloaded {} posts", next.len());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::thread;

    fn provider(n: usize) -> MemorySource {
        (0..n).fold(MemorySource::new(), |src, i| {
            src.with(
                format!("posts/post-{i}.md"),
                format!("---\ntitle: Post {i}\npubDate: 2024-01-{:02}\n---\n", i + 1),
            )
        })
    }

    #[test]
    fn test_reload_swaps_collection() {
        let store = PostStore::open(ContentLoader::default(), &provider(2)).unwrap();
        let before = store.snapshot();
        assert_eq!(before.len(), 2);

        store.reload(&provider(3)).unwrap();
        assert_eq!(store.snapshot().len(), 3);
        // Old snapshots are unaffected
        assert_eq!(before.len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let store = PostStore::open(ContentLoader::default(), &provider(2)).unwrap();
        let broken = provider(1)
            .with("a/dup.md", "---\n---\n")
            .with("b/dup.md", "---\n---\n");

        assert!(matches!(
            store.reload(&broken),
            Err(LoadError::DuplicateSlug { .. })
        ));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_readers_never_see_partial_collection() {
        let store = Arc::new(PostStore::open(ContentLoader::default(), &provider(2)).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = store.snapshot();
                        assert!(snap.len() == 2 || snap.len() == 5);
                        assert_eq!(snap.all_slugs().len(), snap.len());
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            store.reload(&provider(5)).unwrap();
            store.reload(&provider(2)).unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_reload_returns_what_it_built() {
        let store = PostStore::open(ContentLoader::default(), &provider(1)).unwrap();
        let built = store.reload(&provider(3)).unwrap();
        store.replace(PostCollection::empty());

        assert_eq!(built.len(), 3);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PostStore::new(ContentLoader::default());
        assert!(store.snapshot().is_empty());
    }
}
