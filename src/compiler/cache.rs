//! Producer cache shared by concurrent renders.
//!
//! Producers are keyed by [`ShapeId`]. Entries are inserted once and never mutated or
//! removed, so readers never observe a half-built producer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use super::Producer;
use crate::template::{Shape, ShapeId};

/// Hit/miss counters of a [`ProducerCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to compile.
    pub misses: usize,
    /// Producers currently retained.
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Insert-only map from shape identity to compiled producer.
///
/// Uses DashMap so concurrent renders read without a global lock. An optional capacity
/// bounds the number of retained producers: once it is reached, newly compiled producers
/// are handed out but not stored, and existing entries stay in place.
#[derive(Debug, Default)]
pub struct ProducerCache {
    producers: DashMap<ShapeId, Arc<Producer>>,
    capacity: Option<usize>,
    len: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ProducerCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache retaining at most `capacity` producers (`None` for unbounded).
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// The configured bound.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Return the producer for `shape`, compiling it on first use.
    ///
    /// The bound is exact: a slot is reserved before the producer is stored, so the
    /// number of retained producers never exceeds [`capacity`](Self::capacity), even
    /// under concurrent misses.
    pub fn get_or_compile(&self, shape: &Shape) -> Arc<Producer> {
        let id = shape.id();
        if let Some(producer) = self.producers.get(&id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("producer cache hit for {}", id);
            return Arc::clone(producer.value());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        // Reserve a slot before inserting so concurrent misses on different shapes cannot
        // push the cache past its bound.
        let capacity = self.capacity;
        let reserved = self.len.fetch_update(Ordering::AcqRel, Ordering::Acquire, |len| match capacity {
            Some(cap) if len >= cap => None,
            _ => Some(len + 1),
        });
        if let Err(len) = reserved {
            tracing::warn!("producer cache full ({} entries); compiling {} without caching", len, id);
            return Arc::new(Producer::compile(shape));
        }

        // A concurrent miss on the same shape may have inserted in the meantime; the entry
        // API keeps exactly one producer per shape, and the loser hands its slot back.
        let mut inserted = false;
        let entry = self.producers.entry(id).or_insert_with(|| {
            inserted = true;
            tracing::debug!(
                "compiled producer for {} ({} segments, {} slots)",
                id,
                shape.segments().len(),
                shape.slots()
            );
            Arc::new(Producer::compile(shape))
        });
        let producer = Arc::clone(entry.value());
        drop(entry);
        if !inserted {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        producer
    }

    /// Whether a producer for `id` is retained.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.producers.contains_key(&id)
    }

    /// Number of retained producers.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether no producer is retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
