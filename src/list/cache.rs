//! Shared query cache with fenced writes.
//!
//! Entries are keyed by resource kind and the exact read (filters, page, limit) and are replaced
//! wholesale. Each read takes a [`ReadTicket`] before going to the network. The ticket carries a
//! sequence number and the kind's invalidation generation, and [`QueryCache::complete_read`] refuses
//! to store a response that an invalidation or a later read has overtaken.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::resources::ResourceKind;

use super::ListState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Page { state: ListState, limit: u32 },
    /// Unpaginated listing used for select options
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ResourceKind,
    pub scope: Scope,
}

impl CacheKey {
    pub fn page(kind: ResourceKind, state: ListState, limit: u32) -> Self {
        Self {
            kind,
            scope: Scope::Page { state, limit },
        }
    }

    pub fn all(kind: ResourceKind) -> Self {
        Self {
            kind,
            scope: Scope::All,
        }
    }
}

#[derive(Debug)]
pub struct ReadTicket {
    key: CacheKey,
    seq: u64,
    generation: u64,
}

/// What happened to a completed read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    Stored,
    /// The kind was invalidated while the read was in flight
    Invalidated,
    /// A read issued later has already been stored for the same key
    Superseded,
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    seq: u64,
    stored_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    generations: HashMap<ResourceKind, u64>,
}

pub struct QueryCache {
    ttl: Duration,
    next_seq: AtomicU64,
    inner: Mutex<Inner>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_seq: AtomicU64::new(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Nothing in the critical sections can leave Inner half-written
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh cached value for `key`, if any
    pub fn get<T: Any + Send + Sync>(&self, key: &CacheKey) -> Option<Arc<T>> {
        let inner = self.lock();
        let entry = inner.entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        entry.value.clone().downcast::<T>().ok()
    }

    pub fn begin_read(&self, key: CacheKey) -> ReadTicket {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let generation = self.generation(key.kind);
        ReadTicket {
            key,
            seq,
            generation,
        }
    }

    /// Store the response of a ticketed read unless it has gone stale in flight
    pub fn complete_read<T: Any + Send + Sync>(&self, ticket: ReadTicket, value: Arc<T>) -> Fence {
        let mut inner = self.lock();

        let current = inner.generations.get(&ticket.key.kind).copied().unwrap_or(0);
        if current != ticket.generation {
            tracing::debug!(resource = ticket.key.kind.slug(), seq = ticket.seq, "read fenced by invalidation");
            return Fence::Invalidated;
        }
        if let Some(existing) = inner.entries.get(&ticket.key) {
            if existing.seq > ticket.seq {
                tracing::debug!(resource = ticket.key.kind.slug(), seq = ticket.seq, "read superseded");
                return Fence::Superseded;
            }
        }

        inner.entries.insert(
            ticket.key,
            Entry {
                value,
                seq: ticket.seq,
                stored_at: Instant::now(),
            },
        );
        Fence::Stored
    }

    /// Drop every cached read of `kind` and fence reads already in flight
    pub fn invalidate(&self, kind: ResourceKind) {
        let mut inner = self.lock();
        *inner.generations.entry(kind).or_insert(0) += 1;
        inner.entries.retain(|key, _| key.kind != kind);
        tracing::debug!(resource = kind.slug(), "cache invalidated");
    }

    pub fn generation(&self, kind: ResourceKind) -> u64 {
        self.lock().generations.get(&kind).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
