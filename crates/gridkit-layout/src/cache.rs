//! Generation-tagged cache of placement results.
//!
//! Default cell assignment only depends on the children's layout params and
//! the grid configuration, so it is computed once and reused until something
//! changes. Every mutation of the engine's inputs bumps the generation; an
//! entry stored under an older generation is stale and is recomputed on the
//! next lookup.

use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::placer::CellAssignment;

/// Resolved placement of every child plus the resulting grid size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacementSnapshot {
    pub assignments: Vec<CellAssignment>,
    pub row_count: usize,
    pub column_count: usize,
}

/// Cache statistics for debugging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub lookups: usize,
    pub hits: usize,
    pub stores: usize,
}

#[derive(Debug, Default)]
pub struct PlacementCache {
    generation: Cell<u64>,
    entry: RefCell<Option<(u64, PlacementSnapshot)>>,
    stats: Cell<CacheStats>,
}

impl PlacementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Mark every stored entry stale.
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        trace!(generation = self.generation.get(), "Placement cache invalidated");
    }

    /// The cached snapshot for the current generation, if any.
    pub fn lookup(&self) -> Option<PlacementSnapshot> {
        let mut stats = self.stats.get();
        stats.lookups += 1;

        let generation = self.generation.get();
        let hit = self
            .entry
            .borrow()
            .as_ref()
            .filter(|(tag, _)| *tag == generation)
            .map(|(_, snapshot)| snapshot.clone());
        if hit.is_some() {
            stats.hits += 1;
        }
        self.stats.set(stats);
        hit
    }

    pub fn store(&self, snapshot: PlacementSnapshot) {
        let mut stats = self.stats.get();
        stats.stores += 1;
        self.stats.set(stats);
        *self.entry.borrow_mut() = Some((self.generation.get(), snapshot));
    }

    /// Look up the current snapshot, computing and storing it on a miss.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> PlacementSnapshot) -> PlacementSnapshot {
        if let Some(snapshot) = self.lookup() {
            return snapshot;
        }
        let snapshot = compute();
        self.store(snapshot.clone());
        snapshot
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }
}
