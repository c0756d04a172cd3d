use super::cache::{CacheStats, WalkCache};
use super::config::DescentConfig;
use super::error::EngineError;
use super::registry::MinimaRegistry;
use super::walker::Walker;
use crate::core::energy::EnergyModel;
use crate::core::io::candidates::{CandidateError, CandidateLine, classify_line, parse_candidate};
use crate::core::models::structure::Structure;
use std::io::BufRead;
use tracing::{trace, warn};

/// Result of feeding one candidate to the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The structure was seen before; only its count changed.
    Duplicate,
    /// The structure descended to the minimum with this registry index.
    Minimum { num: usize, is_new: bool },
    /// The structure contains lone pairs while lone-pair-free descent is required.
    NonCanonical,
    /// The line held no usable structure.
    Skipped,
    EndOfStream,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub lines: usize,
    pub duplicates: usize,
    pub descents: usize,
    pub non_canonical: usize,
    pub skipped: usize,
}

/// Maps a stream of candidate structures onto distinct local minima.
///
/// Each new structure is descended once; repeated structures are only counted. The walk
/// cache and registry are owned here until [`Explorer::finish`] folds the cached repeat
/// counts into the registry and drops the cache.
pub struct Explorer<'a, M: EnergyModel + ?Sized> {
    walker: Walker<'a, M>,
    cache: WalkCache,
    registry: MinimaRegistry,
    require_canonical: bool,
    stats: WalkStats,
}

impl<'a, M: EnergyModel + ?Sized> Explorer<'a, M> {
    pub fn new(model: &'a M, config: &DescentConfig) -> Self {
        Self::with_registry(model, config, MinimaRegistry::new())
    }

    /// Starts from minima known from an earlier run.
    pub fn with_registry(model: &'a M, config: &DescentConfig, registry: MinimaRegistry) -> Self {
        Self {
            walker: Walker::new(model, config),
            cache: WalkCache::new(),
            registry,
            require_canonical: config.no_lone_pairs,
            stats: WalkStats::default(),
        }
    }

    pub fn distinct_minima(&self) -> usize {
        self.registry.len()
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    pub fn registry(&self) -> &MinimaRegistry {
        &self.registry
    }

    /// Descends a single structure, or counts it if it was seen before.
    pub fn process(&mut self, candidate: Structure) -> Result<WalkOutcome, EngineError> {
        let model = self.walker.model();
        let expected = model.sequence().len();
        if candidate.len() != expected {
            return Err(CandidateError::LengthMismatch {
                expected,
                found: candidate.len(),
                line: candidate.to_string(),
            }
            .into());
        }
        if !model.admits(&candidate) {
            return Err(CandidateError::ForbiddenPair {
                structure: candidate.to_string(),
            }
            .into());
        }

        if self.cache.revisit(&candidate) {
            self.stats.duplicates += 1;
            return Ok(WalkOutcome::Duplicate);
        }
        self.cache.insert(candidate.clone());

        if self.require_canonical && model.has_lone_pairs(&candidate) {
            warn!(structure = %candidate, "Structure has lone pairs, skipping");
            self.stats.non_canonical += 1;
            return Ok(WalkOutcome::NonCanonical);
        }

        let mut current = model.evaluate(candidate);
        let key = current.structure.clone();
        let steps = self.walker.descend(&mut current)?;
        trace!(from = %key, to = %current.structure, energy = current.energy, steps, "Descended");
        self.stats.descents += 1;

        let (num, is_new) = self.registry.record_hit(current);
        self.cache.link(&key, num);
        Ok(WalkOutcome::Minimum { num, is_new })
    }

    /// Interprets one line of a candidate stream and processes its structure.
    pub fn process_line(&mut self, line: &str) -> Result<WalkOutcome, EngineError> {
        self.stats.lines += 1;
        match classify_line(line) {
            CandidateLine::Header => {
                self.stats.skipped += 1;
                Ok(WalkOutcome::Skipped)
            }
            CandidateLine::NoStructure => {
                warn!(line, "No structure-like token found, skipping line");
                self.stats.skipped += 1;
                Ok(WalkOutcome::Skipped)
            }
            CandidateLine::Structure {
                token, ambiguous, ..
            } => {
                if ambiguous {
                    warn!(line, "Two structure-like tokens found, using the first");
                }
                let expected = self.walker.model().sequence().len();
                let structure = parse_candidate(token, expected, line)?;
                self.process(structure)
            }
        }
    }

    /// Reads and processes the next line of `reader`.
    pub fn process_next(&mut self, reader: &mut impl BufRead) -> Result<WalkOutcome, EngineError> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(WalkOutcome::EndOfStream);
        }
        self.process_line(line.trim_end_matches(['\n', '\r']))
    }

    /// Credits repeat visits to their minima and hands back the registry.
    pub fn finish(self) -> (MinimaRegistry, CacheStats, WalkStats) {
        let mut registry = self.registry;
        let cache_stats = self.cache.fold_into(&mut registry);
        (registry, cache_stats, self.stats)
    }
}
