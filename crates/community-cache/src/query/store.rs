//! In-memory query cache.
//!
//! Every mutation of an entry (write, optimistic update, invalidate, cancel)
//! moves it to a new generation. Fetches capture the generation when they
//! start and are only stored if nothing touched the entry in between, so a
//! response that raced with a local write or a newer fetch is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::keys::{CachedValue, Query, QueryKey};

/// Cache entry
#[derive(Debug, Clone)]
struct Entry {
    value: Option<CachedValue>,
    stale: bool,
    generation: u64,
}

impl Entry {
    fn empty(generation: u64) -> Self {
        Self {
            value: None,
            stale: true,
            generation,
        }
    }
}

/// Proof that a fetch was started, tied to the entry generation at that time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    /// Key the fetch was started for
    pub fn key(&self) -> QueryKey {
        self.key
    }
}

/// Prior value of an entry, captured before an optimistic write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<V> {
    value: Option<V>,
}

impl<V> Snapshot<V> {
    /// The captured value, if the entry held one
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Consume the snapshot
    pub fn into_inner(self) -> Option<V> {
        self.value
    }
}

struct Inner {
    entries: DashMap<QueryKey, Entry>,
    generation: AtomicU64,
}

/// Shared query cache. Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .field("generation", &self.inner.generation.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                generation: AtomicU64::new(0),
            }),
        }
    }

    fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Read the cached value, stale or not
    pub fn read<Q: Query>(&self, query: &Q) -> Option<Q::Value> {
        self.inner
            .entries
            .get(&query.key())
            .and_then(|entry| entry.value.as_ref().and_then(Q::unwrap).cloned())
    }

    /// Check whether a value is cached and has not been invalidated
    pub fn is_fresh<Q: Query>(&self, query: &Q) -> bool {
        self.inner
            .entries
            .get(&query.key())
            .is_some_and(|entry| entry.value.is_some() && !entry.stale)
    }

    /// Store a value, replacing whatever was there
    pub fn write<Q: Query>(&self, query: &Q, value: Q::Value) {
        let generation = self.next_generation();
        self.inner.entries.insert(
            query.key(),
            Entry {
                value: Some(Q::wrap(value)),
                stale: false,
                generation,
            },
        );
    }

    /// Mutate the cached value in place.
    ///
    /// Returns the value as it was before `f` ran together with `f`'s result,
    /// or `None` when nothing is cached under the key.
    pub fn update<Q, F, R>(&self, query: &Q, f: F) -> Option<(Snapshot<Q::Value>, R)>
    where
        Q: Query,
        F: FnOnce(&mut Q::Value) -> R,
    {
        let generation = self.next_generation();
        let mut entry = self.inner.entries.get_mut(&query.key())?;
        let current = entry.value.as_mut().and_then(Q::unwrap_mut)?;
        let snapshot = Snapshot {
            value: Some(current.clone()),
        };
        let result = f(current);
        entry.generation = generation;
        Some((snapshot, result))
    }

    /// Capture the current value without changing it
    pub fn snapshot<Q: Query>(&self, query: &Q) -> Snapshot<Q::Value> {
        Snapshot {
            value: self.read(query),
        }
    }

    /// Put a snapshot back verbatim
    pub fn restore<Q: Query>(&self, query: &Q, snapshot: Snapshot<Q::Value>) {
        match snapshot.value {
            Some(value) => self.write(query, value),
            None => {
                let generation = self.next_generation();
                self.inner
                    .entries
                    .insert(query.key(), Entry::empty(generation));
            }
        }
        tracing::debug!(key = %query.key(), "Restored cache snapshot");
    }

    /// Mark the entry stale so the next read refetches.
    ///
    /// In-flight fetches for the key are discarded when they land.
    pub fn invalidate<Q: Query>(&self, query: &Q) {
        let generation = self.next_generation();
        let mut entry = self
            .inner
            .entries
            .entry(query.key())
            .or_insert_with(|| Entry::empty(generation));
        entry.stale = true;
        entry.generation = generation;

        tracing::debug!(key = %query.key(), "Invalidated cache entry");
    }

    /// Discard in-flight fetches for the key without marking it stale
    pub fn cancel_fetches<Q: Query>(&self, query: &Q) {
        let generation = self.next_generation();
        if let Some(mut entry) = self.inner.entries.get_mut(&query.key()) {
            entry.generation = generation;
        }
    }

    /// Start a fetch for the key
    pub fn begin_fetch<Q: Query>(&self, query: &Q) -> FetchTicket {
        let key = query.key();
        let entry = self
            .inner
            .entries
            .entry(key)
            .or_insert_with(|| Entry::empty(self.next_generation()));
        FetchTicket {
            key,
            generation: entry.generation,
        }
    }

    /// Store a fetched value if the entry was not touched since the ticket was
    /// issued. Returns whether the value was stored.
    pub fn complete_fetch<Q: Query>(&self, query: &Q, ticket: FetchTicket, value: Q::Value) -> bool {
        let key = query.key();
        if ticket.key != key {
            tracing::warn!(key = %key, ticket_key = %ticket.key, "Fetch ticket used for another key");
            return false;
        }

        let generation = self.next_generation();
        let Some(mut entry) = self.inner.entries.get_mut(&key) else {
            return false;
        };

        if entry.generation != ticket.generation {
            tracing::debug!(
                key = %key,
                ticket_generation = ticket.generation,
                current_generation = entry.generation,
                "Discarded superseded fetch"
            );
            return false;
        }

        entry.value = Some(Q::wrap(value));
        entry.stale = false;
        entry.generation = generation;
        true
    }

    /// Drop an entry entirely
    pub fn remove<Q: Query>(&self, query: &Q) -> bool {
        self.inner.entries.remove(&query.key()).is_some()
    }

    /// Number of keys tracked
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.entries.clear();
    }
}
