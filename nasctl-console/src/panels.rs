//! List/detail panels
//!
//! A panel owns the collection it fetched. It loads on mount and on manual
//! refresh, and every per-item action re-fetches the whole collection once
//! the backend confirms it. Nothing is updated optimistically.

use crate::error::Result;
use crate::loaders::load;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// A backend collection a panel can list
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    type Item: Clone + Send + Sync;
    /// Unique key of an item (path, name or id)
    type Key: Clone + PartialEq + fmt::Display + Send + Sync;

    /// Used in log events
    const NAME: &'static str;

    fn key_of(item: &Self::Item) -> Self::Key;

    async fn fetch(&self) -> Result<Vec<Self::Item>>;
}

pub struct ListPanel<C: Collection> {
    service: Arc<C>,
    items: Vec<C::Item>,
    loading: bool,
    error: Option<String>,
    loaded_once: bool,
}

impl<C: Collection> ListPanel<C> {
    pub fn new(service: Arc<C>) -> Self {
        Self {
            service,
            items: Vec::new(),
            loading: false,
            error: None,
            loaded_once: false,
        }
    }

    pub fn service(&self) -> &Arc<C> {
        &self.service
    }

    pub fn items(&self) -> &[C::Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error from the last fetch or action
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether a fetch has ever succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded_once
    }

    pub fn find(&self, key: &C::Key) -> Option<&C::Item> {
        self.items.iter().find(|item| &C::key_of(item) == key)
    }

    /// Initial load. Once the panel has loaded this is a no-op.
    pub async fn mount(&mut self) -> bool {
        if self.loaded_once {
            return true;
        }
        self.refresh().await
    }

    /// Re-fetch the collection. On failure the previous items stay and the
    /// error is set.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        let result = load(self.service.as_ref()).await;
        self.loading = false;

        match result {
            Ok(items) => {
                debug!(collection = C::NAME, count = items.len(), "Collection loaded");
                self.items = items;
                self.error = None;
                self.loaded_once = true;
                true
            }
            Err(message) => {
                warn!(collection = C::NAME, error = %message, "Failed to load collection");
                self.error = Some(message);
                false
            }
        }
    }

    /// Run one per-item action.
    ///
    /// Success is followed by exactly one refresh. Failure sets the inline
    /// error and leaves the items as they were.
    pub async fn run<F, Fut>(&mut self, action: F) -> Result<()>
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        match action(self.service.clone()).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                warn!(collection = C::NAME, error = %message, "Action failed");
                self.error = Some(message);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Numbers {
        fetches: AtomicUsize,
        next: Mutex<Result<Vec<u32>>>,
    }

    impl Numbers {
        fn new(items: Vec<u32>) -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                next: Mutex::new(Ok(items)),
            }
        }

        fn respond(&self, result: Result<Vec<u32>>) {
            *self.next.lock().unwrap() = result;
        }
    }

    #[async_trait]
    impl Collection for Numbers {
        type Item = u32;
        type Key = u32;
        const NAME: &'static str = "numbers";

        fn key_of(item: &u32) -> u32 {
            *item
        }

        async fn fetch(&self) -> Result<Vec<u32>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.next.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_mount_loads_once() {
        let service = Arc::new(Numbers::new(vec![1, 2, 3]));
        let mut panel = ListPanel::new(service.clone());
        assert!(!panel.is_loaded());

        assert!(panel.mount().await);
        assert!(panel.mount().await);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(panel.items(), &[1, 2, 3]);
        assert_eq!(panel.find(&2), Some(&2));
        assert_eq!(panel.find(&9), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_items() {
        let service = Arc::new(Numbers::new(vec![1, 2]));
        let mut panel = ListPanel::new(service.clone());
        panel.refresh().await;

        service.respond(Err(ConsoleError::rejected("Samba not available")));
        assert!(!panel.refresh().await);
        assert_eq!(panel.items(), &[1, 2]);
        assert_eq!(panel.error(), Some("Samba not available"));
        assert!(!panel.is_loading());

        service.respond(Ok(vec![3]));
        assert!(panel.refresh().await);
        assert_eq!(panel.error(), None);
        assert_eq!(panel.items(), &[3]);
    }

    #[tokio::test]
    async fn test_action_success_refetches_once() {
        let service = Arc::new(Numbers::new(vec![1]));
        let mut panel = ListPanel::new(service.clone());
        panel.mount().await;

        panel.run(|_| async { Ok(()) }).await.unwrap();
        assert_eq!(service.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_action_failure_does_not_refetch() {
        let service = Arc::new(Numbers::new(vec![1]));
        let mut panel = ListPanel::new(service.clone());
        panel.mount().await;

        let result = panel
            .run(|_| async { Err(ConsoleError::rejected("Pool is busy")) })
            .await;
        assert!(result.is_err());
        assert_eq!(panel.error(), Some("Pool is busy"));
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);
    }
}
