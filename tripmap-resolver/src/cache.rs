use crate::error::Result;
use crate::resolver::Resolve;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Keyed storage for resolved short links.
pub trait ResolutionStore {
    fn get(&self, url: &str) -> Result<Option<String>>;
    fn put(&self, url: &str, target: &str) -> Result<()>;
}

/// In-process store; nothing survives the run.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResolutionStore for MemoryStore {
    fn get(&self, url: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(url).cloned())
    }

    fn put(&self, url: &str, target: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(url.to_string(), target.to_string());
        Ok(())
    }
}

/// Memoizing decorator around a [`Resolve`] implementation.
///
/// Lookups go memo -> store -> network. Each URL gets its own `OnceCell`, so
/// concurrent callers asking for the same link wait on a single request
/// instead of racing. Store failures are logged and treated as misses.
pub struct CachedResolver<R, S> {
    inner: R,
    store: S,
    in_flight: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl<R: Resolve, S: ResolutionStore> CachedResolver<R, S> {
    pub fn new(inner: R, store: S) -> Self {
        Self {
            inner,
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn cell_for(&self, url: &str) -> Arc<OnceCell<String>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.entry(url.to_string()).or_default().clone()
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        match self.store.get(url) {
            Ok(Some(target)) => {
                debug!("Cache hit for {}", url);
                return Ok(target);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache lookup for {} failed, resolving anyway: {}", url, e),
        }

        let target = self.inner.resolve(url).await?;

        if let Err(e) = self.store.put(url, &target) {
            warn!("Could not cache resolution of {}: {}", url, e);
        }
        Ok(target)
    }
}

impl<R: Resolve, S: ResolutionStore> Resolve for CachedResolver<R, S> {
    async fn resolve(&self, url: &str) -> Result<String> {
        let cell = self.cell_for(url);
        let target = cell.get_or_try_init(|| self.fetch(url)).await?;
        Ok(target.clone())
    }
}
