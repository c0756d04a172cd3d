use super::flood::{Escape, Flooder};
use crate::core::energy::EnergyModel;
use crate::core::models::energy::Energy;
use crate::core::models::minimum::Minimum;
use std::collections::BTreeMap;
use tracing::debug;

/// Distinct local minima, kept in ascending `(energy, structure)` order.
///
/// Each minimum receives a dense index (`num`) in discovery order; hit counts are stored per
/// index so walk-cache entries can refer to a minimum without holding the record itself.
#[derive(Debug, Default, Clone)]
pub struct MinimaRegistry {
    index: BTreeMap<Minimum, usize>,
    hits: Vec<usize>,
}

/// A minimum that survived selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMinimum {
    pub minimum: Minimum,
    /// Discovery index in the registry.
    pub num: usize,
    pub hits: usize,
}

/// A minimum discarded because it escapes over a saddle below the height threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowMinimum {
    pub minimum: Minimum,
    pub escape: Escape,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub minima: Vec<SelectedMinimum>,
    pub shallow: Vec<ShallowMinimum>,
    /// How many minima were asked for, before shallow ones were set aside.
    pub requested: usize,
}

impl MinimaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Counts one hit on `minimum`, inserting it with a single hit if it is new.
    ///
    /// Returns the minimum's index and whether it was inserted.
    pub fn record_hit(&mut self, minimum: Minimum) -> (usize, bool) {
        self.insert_with_hits(minimum, 1)
    }

    /// Adds `hits` to `minimum`, inserting it if necessary.
    pub fn insert_with_hits(&mut self, minimum: Minimum, hits: usize) -> (usize, bool) {
        if let Some(&num) = self.index.get(&minimum) {
            self.hits[num] += hits;
            return (num, false);
        }
        let num = self.hits.len();
        self.index.insert(minimum, num);
        self.hits.push(hits);
        (num, true)
    }

    pub fn add_hits(&mut self, num: usize, extra: usize) {
        if let Some(hits) = self.hits.get_mut(num) {
            *hits += extra;
        }
    }

    pub fn get(&self, minimum: &Minimum) -> Option<usize> {
        self.index.get(minimum).copied()
    }

    pub fn hits(&self, num: usize) -> Option<usize> {
        self.hits.get(num).copied()
    }

    /// Minima in ascending energy order with their indices and hit counts.
    pub fn iter(&self) -> impl Iterator<Item = (&Minimum, usize, usize)> + '_ {
        self.index
            .iter()
            .map(|(minimum, &num)| (minimum, num, self.hits[num]))
    }

    /// Consumes the registry and picks the minima to report.
    ///
    /// Minima are visited in ascending energy order until `limit` of them are accepted. With
    /// `shallow` set to a flooder and a height threshold, each minimum is flooded first and set
    /// aside if it escapes within the threshold. With `keep_insertion_order`, only minima
    /// whose discovery index is below `limit` are accepted and the result is ordered by that
    /// index.
    pub fn select<M: EnergyModel + ?Sized>(
        self,
        limit: Option<usize>,
        shallow: Option<(&Flooder<'_, M>, Energy)>,
        keep_insertion_order: bool,
    ) -> Selection {
        let limit = limit.map_or(self.len(), |l| l.min(self.len()));
        let mut selection = Selection {
            requested: limit,
            ..Selection::default()
        };

        for (minimum, num) in self.index {
            if selection.minima.len() >= limit {
                break;
            }
            if let Some((flooder, min_height)) = shallow {
                if let Some(escape) = flooder.flood(&minimum, Some(min_height)) {
                    debug!(
                        structure = %minimum.structure,
                        energy = minimum.energy,
                        saddle = escape.saddle,
                        "Discarding shallow minimum"
                    );
                    selection.shallow.push(ShallowMinimum { minimum, escape });
                    continue;
                }
            }
            if keep_insertion_order && num >= limit {
                continue;
            }
            selection.minima.push(SelectedMinimum {
                minimum,
                num,
                hits: self.hits[num],
            });
        }

        if keep_insertion_order {
            selection.minima.sort_by_key(|m| m.num);
        }
        selection
    }
}
