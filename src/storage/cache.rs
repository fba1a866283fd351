use tracing::warn;

use super::Result;

/// Client-side view of a remote list: the last fetched items plus fetch
/// status. Mutations never touch `items` directly; callers revalidate after
/// a write and wait for the refetch.
#[derive(Debug, Clone)]
pub struct ListCache<T> {
    items: Vec<T>,
    loaded: bool,
    loading: bool,
    revalidating: bool,
    error: Option<String>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            loading: false,
            revalidating: false,
            error: None,
        }
    }
}

impl<T> ListCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True during the first fetch.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True during a refetch while stale items are still shown.
    pub fn is_revalidating(&self) -> bool {
        self.revalidating
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_fetch(&mut self) {
        if self.loaded {
            self.revalidating = true;
        } else {
            self.loading = true;
        }
    }

    /// A failed refetch keeps the previous items.
    pub fn finish_fetch(&mut self, result: Result<Vec<T>>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "list fetch failed");
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
        self.revalidating = false;
    }

    pub fn revalidate<F>(&mut self, fetch: F)
    where
        F: FnOnce() -> Result<Vec<T>>,
    {
        self.begin_fetch();
        let result = fetch();
        self.finish_fetch(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DojoError;

    #[test]
    fn first_fetch_loads_then_refetch_revalidates() {
        let mut cache: ListCache<u32> = ListCache::new();
        cache.begin_fetch();
        assert!(cache.is_loading());
        assert!(!cache.is_revalidating());
        cache.finish_fetch(Ok(vec![1, 2]));
        assert!(!cache.is_loading());

        cache.begin_fetch();
        assert!(cache.is_revalidating());
        assert_eq!(cache.items(), &[1, 2]);
        cache.finish_fetch(Ok(vec![1, 2, 3]));
        assert_eq!(cache.items().len(), 3);
    }

    #[test]
    fn failed_refetch_keeps_stale_items() {
        let mut cache: ListCache<u32> = ListCache::new();
        cache.revalidate(|| Ok(vec![7]));
        cache.revalidate(|| Err(DojoError::Storage("disk gone".into())));
        assert_eq!(cache.items(), &[7]);
        assert_eq!(cache.error(), Some("Persistence error: disk gone"));

        cache.revalidate(|| Ok(vec![8]));
        assert_eq!(cache.error(), None);
    }
}
