use std::future::Future;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cache::QueryCache;
use super::key::QueryKey;
use crate::error::Result;

/// A mounted view's interest in one cache key.
///
/// Responses that arrive after the view was deactivated are dropped instead
/// of being handed back, so an unmounted page never sees late data.
#[derive(Debug)]
pub struct ViewHandle {
    cache: QueryCache,
    key: QueryKey,
    id: u64,
}

impl ViewHandle {
    pub(crate) fn new(cache: QueryCache, key: QueryKey, id: u64) -> Self {
        Self { cache, key, id }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    pub fn is_active(&self) -> bool {
        self.cache.is_subscribed(self.key, self.id)
    }

    /// Deregister without dropping the handle.
    pub fn deactivate(&self) {
        self.cache.unsubscribe(self.key, self.id);
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading(self.key)
    }

    /// Fetch through the cache. `Ok(None)` means the data arrived after the
    /// view was deactivated; the cache still keeps it.
    pub async fn load<T, F, Fut>(&self, fetcher: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = self.cache.fetch(self.key, fetcher).await?;
        if self.is_active() {
            Ok(Some(value))
        } else {
            debug!("view {} gone, discarding {} response", self.id, self.key);
            Ok(None)
        }
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.cache.unsubscribe(self.key, self.id);
    }
}
