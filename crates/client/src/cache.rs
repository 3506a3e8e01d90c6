//! Credential cache — at most one [`UpstreamClient`] per API key.

use crate::UpstreamClient;
use chatrelay_config::Config;
use chatrelay_types::Result;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

struct Inner {
    map: HashMap<String, Arc<UpstreamClient>>,
    /// Insertion order, used only when `max_cached_keys` bounds the cache.
    order: VecDeque<String>,
}

/// In-memory map from API key to a constructed upstream handle.
///
/// Concurrent `get_or_create` calls for an uncached key may both construct a
/// handle, but only the first insert is retained; readers never observe a
/// partially built entry because the `Arc` goes into the map fully formed.
pub struct KeyCache {
    config: Arc<Config>,
    inner: Mutex<Inner>,
}

impl KeyCache {
    /// Creates an empty cache constructing handles from `config`.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Returns the cached handle for `key`, constructing and caching one on miss.
    ///
    /// Construction happens outside the lock so requests for other keys are
    /// never blocked behind it.
    ///
    /// # Errors
    ///
    /// Propagates [`UpstreamClient::new`] failures; nothing is cached on error.
    pub fn get_or_create(&self, key: &str) -> Result<Arc<UpstreamClient>> {
        if let Some(handle) = self.inner.lock().unwrap().map.get(key) {
            return Ok(Arc::clone(handle));
        }

        let built = Arc::new(UpstreamClient::new(key, &self.config)?);

        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.map.get(key) {
            // Lost the construction race; keep the retained handle.
            return Ok(Arc::clone(existing));
        }
        tracing::debug!(key = %mask(key), "caching new upstream handle");
        inner.map.insert(key.to_string(), Arc::clone(&built));
        inner.order.push_back(key.to_string());

        if let Some(cap) = self.config.max_cached_keys
            && inner.map.len() > cap
            && let Some(oldest) = inner.order.pop_front()
        {
            tracing::debug!(key = %mask(&oldest), "evicting oldest upstream handle");
            inner.map.remove(&oldest);
        }
        Ok(built)
    }

    /// Obfuscated listing of the cached keys, for the diagnostic route.
    ///
    /// The transform hides most of the key but is not a secrecy mechanism.
    #[must_use]
    pub fn known_keys(&self) -> Vec<String> {
        self.inner.lock().unwrap().order.iter().map(|k| mask(k)).collect()
    }

    /// Number of cached handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().map.len()
    }

    /// Whether the cache holds no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mask(key: &str) -> String {
    if key.len() <= 6 {
        "****".to_string()
    } else {
        let prefix: String = key.chars().take(6).collect();
        format!("{prefix}****")
    }
}
