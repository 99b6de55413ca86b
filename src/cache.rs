//! Lazily populated document slot with force-refresh.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;

/// A two-state (`Empty | Populated`) cache holding one fetched document.
///
/// `get_or_refresh` performs exactly one fetch when the slot is empty or
/// `force` is set, and zero fetches otherwise. A failed fetch propagates
/// the error and leaves the slot as it was.
#[derive(Debug)]
pub(crate) struct Cached<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// A slot already holding `value`, so the first read fetches nothing.
    pub fn prefilled(value: T) -> Self {
        Self { slot: Mutex::new(Some(Arc::new(value))) }
    }

    pub async fn get_or_refresh<F, Fut>(&self, force: bool, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut slot = self.slot.lock().await;
        if !force {
            if let Some(doc) = slot.as_ref() {
                return Ok(Arc::clone(doc));
            }
        }
        let fresh = Arc::new(fetch().await?);
        *slot = Some(Arc::clone(&fresh));
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ArcadiaError;

    #[tokio::test]
    async fn fetches_once_until_forced() {
        let cache: Cached<u32> = Cached::new();
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        };

        assert_eq!(*cache.get_or_refresh(false, fetch).await.unwrap(), 7);
        assert_eq!(*cache.get_or_refresh(false, fetch).await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.get_or_refresh(true, fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn error_leaves_slot_empty() {
        let cache: Cached<u32> = Cached::new();

        let err = cache
            .get_or_refresh(false, || async {
                Err(ArcadiaError::validation("boom"))
            })
            .await;
        assert!(err.is_err());

        let calls = AtomicUsize::new(0);
        let value = cache
            .get_or_refresh(false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(9)
            })
            .await
            .unwrap();
        assert_eq!(*value, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prefilled_slot_never_fetches() {
        let cache = Cached::prefilled(3u32);
        let value = cache
            .get_or_refresh(false, || async { unreachable!("slot is populated") })
            .await
            .unwrap();
        assert_eq!(*value, 3);
    }
}
