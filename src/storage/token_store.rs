use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::TokenStoreSettings;

/// Per-user vault access tokens.
pub trait TokenStore: Send + Sync {
    fn store_token(&self, user_id: &str, token: &str);

    fn token(&self, user_id: &str) -> Option<String>;

    fn remove_token(&self, user_id: &str) -> bool;
}

#[derive(Debug, Clone)]
struct TokenEntry {
    token: String,
    stored_at: Instant,
}

impl TokenEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Process-local token map with a TTL and a size cap.
#[derive(Debug)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<String, TokenEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::from_settings(&TokenStoreSettings::default())
    }
}

impl InMemoryTokenStore {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_settings(settings: &TokenStoreSettings) -> Self {
        Self::new(Duration::from_secs(settings.ttl_seconds), settings.max_entries)
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panic while the lock was held leaves the map intact, so keep using it.
    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, TokenEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Vault token store lock was poisoned, recovering entries");
            PoisonError::into_inner(poisoned)
        })
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, TokenEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Vault token store lock was poisoned, recovering entries");
            PoisonError::into_inner(poisoned)
        })
    }

    fn evict_oldest(entries: &mut HashMap<String, TokenEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.stored_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!("Evicting oldest vault token for {}", key);
            entries.remove(&key);
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn store_token(&self, user_id: &str, token: &str) {
        if user_id.is_empty() || token.is_empty() {
            return;
        }

        let mut entries = self.write_entries();

        if !entries.contains_key(user_id) {
            entries.retain(|_, entry| !entry.is_expired(self.ttl));
            while entries.len() >= self.max_entries {
                Self::evict_oldest(&mut entries);
            }
        }

        entries.insert(
            user_id.to_string(),
            TokenEntry {
                token: token.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    fn token(&self, user_id: &str) -> Option<String> {
        let entries = self.read_entries();
        let entry = entries.get(user_id)?;

        if entry.is_expired(self.ttl) {
            return None;
        }

        Some(entry.token.clone())
    }

    fn remove_token(&self, user_id: &str) -> bool {
        self.write_entries().remove(user_id).is_some()
    }
}
