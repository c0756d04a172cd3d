use super::registry::MinimaRegistry;
use crate::core::models::structure::Structure;
use std::collections::HashMap;

/// What the cache knows about one input structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkRecord {
    /// Times the structure appeared in the input.
    pub count: usize,
    /// Registry index of the minimum the structure descended to; `None` when it was rejected
    /// before descent.
    pub minimum: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub distinct: usize,
    pub visits: usize,
    /// Distinct structures that never reached a minimum.
    pub unresolved: usize,
}

impl CacheStats {
    pub fn duplicates(&self) -> usize {
        self.visits - self.distinct
    }
}

/// Remembers every input structure so repeated candidates skip the descent.
#[derive(Debug, Default, Clone)]
pub struct WalkCache {
    records: HashMap<Structure, WalkRecord>,
}

impl WalkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts another appearance of `structure`; returns `false` if it has not been seen.
    pub fn revisit(&mut self, structure: &Structure) -> bool {
        match self.records.get_mut(structure) {
            Some(record) => {
                record.count += 1;
                true
            }
            None => false,
        }
    }

    /// Records a first appearance of `structure`.
    pub fn insert(&mut self, structure: Structure) {
        self.records.insert(
            structure,
            WalkRecord {
                count: 1,
                minimum: None,
            },
        );
    }

    pub fn link(&mut self, structure: &Structure, minimum: usize) {
        if let Some(record) = self.records.get_mut(structure) {
            record.minimum = Some(minimum);
        }
    }

    pub fn get(&self, structure: &Structure) -> Option<&WalkRecord> {
        self.records.get(structure)
    }

    pub fn stats(&self) -> CacheStats {
        self.records.values().fold(CacheStats::default(), |mut stats, record| {
            stats.distinct += 1;
            stats.visits += record.count;
            if record.minimum.is_none() {
                stats.unresolved += 1;
            }
            stats
        })
    }

    /// Drops the cache, crediting each minimum with the repeat appearances of the structures
    /// that descended to it. The first appearance was already counted during the walk.
    pub fn fold_into(self, registry: &mut MinimaRegistry) -> CacheStats {
        let stats = self.stats();
        for record in self.records.into_values() {
            if let Some(num) = record.minimum {
                registry.add_hits(num, record.count - 1);
            }
        }
        stats
    }
}
