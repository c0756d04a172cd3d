use crate::core::energy::EnergyModel;
use crate::core::io::report::{BarrierColumns, ReportRow};
use crate::core::io::resume::PreviousMinimum;
use crate::core::models::energy::Energy;
use crate::core::models::structure::Structure;
use crate::engine::barrier_tree::BarrierTree;
use crate::engine::cache::CacheStats;
use crate::engine::config::ExploreConfig;
use crate::engine::context::LandscapeContext;
use crate::engine::direct_path::SaddleEstimator;
use crate::engine::error::EngineError;
use crate::engine::explorer::{Explorer, WalkOutcome, WalkStats};
use crate::engine::flood::Flooder;
use crate::engine::matrix::BarrierMatrix;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::registry::{MinimaRegistry, SelectedMinimum, Selection, ShallowMinimum};
use crate::engine::union_find::UnionFind;
use crate::engine::walker::Walker;
use itertools::Itertools;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How often the live status line is refreshed while reading candidates.
const STATUS_INTERVAL: usize = 1000;

#[derive(Debug, Clone)]
pub struct BarrierAnalysis {
    pub matrix: BarrierMatrix,
    pub tree: BarrierTree,
    /// Minima whose flood reached a lower selected minimum.
    pub flooded: usize,
    /// Minima that were flooded at all.
    pub flood_attempts: usize,
    pub direct_paths: usize,
}

#[derive(Debug, Clone)]
pub struct ExploreResult {
    /// Reported minima, in energy order unless insertion order was requested.
    pub minima: Vec<SelectedMinimum>,
    pub shallow: Vec<ShallowMinimum>,
    pub barriers: Option<BarrierAnalysis>,
    pub walk_stats: WalkStats,
    pub cache_stats: CacheStats,
}

impl ExploreResult {
    pub fn energies(&self) -> Vec<Energy> {
        self.minima.iter().map(|m| m.minimum.energy).collect()
    }

    pub fn report_rows(&self) -> Vec<ReportRow<'_>> {
        self.minima
            .iter()
            .enumerate()
            .map(|(i, m)| ReportRow {
                structure: &m.minimum.structure,
                energy: m.minimum.energy,
                hits: m.hits,
                barrier: self.barriers.as_ref().map(|b| BarrierColumns {
                    father: b.tree.father(i),
                    barrier: b.tree.barrier(i),
                }),
            })
            .collect()
    }
}

#[instrument(skip_all, name = "explore_workflow")]
pub fn run<M, S>(
    model: &M,
    estimator: &S,
    candidates: &mut impl BufRead,
    previous: &[PreviousMinimum],
    config: &ExploreConfig,
    reporter: &ProgressReporter,
) -> Result<ExploreResult, EngineError>
where
    M: EnergyModel + ?Sized,
    S: SaddleEstimator + ?Sized,
{
    let context = LandscapeContext::new(model, reporter, config);

    // === Phase 1: Descend every candidate to its local minimum ===
    let registry = seed_registry(&context, previous);
    let (registry, cache_stats, walk_stats) = descend_candidates(&context, candidates, registry)?;

    // === Phase 2: Select minima, discarding shallow ones ===
    let Selection {
        minima,
        shallow,
        requested,
    } = select_minima(&context, registry);

    // === Phase 3: Saddles and barrier forest (optional) ===
    let barriers = if config.barriers.compute {
        Some(analyze_barriers(&context, estimator, &minima, requested)?)
    } else {
        None
    };

    info!(
        minima = minima.len(),
        shallow = shallow.len(),
        "Exploration complete."
    );
    Ok(ExploreResult {
        minima,
        shallow,
        barriers,
        walk_stats,
        cache_stats,
    })
}

fn seed_registry<M: EnergyModel + ?Sized>(
    context: &LandscapeContext<M, ExploreConfig>,
    previous: &[PreviousMinimum],
) -> MinimaRegistry {
    let mut registry = MinimaRegistry::new();
    for record in previous {
        let minimum = context.model.evaluate(record.structure.clone());
        if minimum.energy != record.energy {
            debug!(
                structure = %minimum.structure,
                listed = record.energy,
                evaluated = minimum.energy,
                "Resumed minimum re-evaluated"
            );
        }
        registry.insert_with_hits(minimum, record.hits);
    }
    if !previous.is_empty() {
        info!(minima = registry.len(), "Resumed minima from a previous run.");
    }
    registry
}

fn descend_candidates<M: EnergyModel + ?Sized>(
    context: &LandscapeContext<M, ExploreConfig>,
    candidates: &mut impl BufRead,
    registry: MinimaRegistry,
) -> Result<(MinimaRegistry, CacheStats, WalkStats), EngineError> {
    context.reporter.report(Progress::PhaseStart { name: "Descent" });
    let find_num = context.config.selection.find_num;
    let mut explorer = Explorer::with_registry(context.model, context.descent(), registry);

    while find_num.is_none_or(|target| explorer.distinct_minima() < target) {
        match explorer.process_next(candidates)? {
            WalkOutcome::EndOfStream => break,
            WalkOutcome::Minimum { is_new: true, .. } => {
                let found = explorer.distinct_minima();
                if found % STATUS_INTERVAL == 0 {
                    context.reporter.report(Progress::StatusUpdate {
                        text: format!("{found} minima"),
                    });
                }
            }
            _ => {}
        }
    }

    let (registry, cache_stats, walk_stats) = explorer.finish();
    info!(
        lines = walk_stats.lines,
        distinct_structures = cache_stats.distinct,
        duplicates = cache_stats.duplicates(),
        non_canonical = walk_stats.non_canonical,
        minima = registry.len(),
        "Descent finished."
    );
    context.reporter.report(Progress::PhaseFinish);
    Ok((registry, cache_stats, walk_stats))
}

fn select_minima<M: EnergyModel + ?Sized>(
    context: &LandscapeContext<M, ExploreConfig>,
    registry: MinimaRegistry,
) -> Selection {
    context.reporter.report(Progress::PhaseStart {
        name: "Selecting minima",
    });
    let config = context.config;
    let flooder = Flooder::new(context.model, config.flood.max_visited);
    let shallow = config.flood.min_height.map(|height| (&flooder, height));
    let selection = registry.select(
        config.selection.min_num,
        shallow,
        config.selection.keep_insertion_order,
    );
    if !selection.shallow.is_empty() {
        info!(count = selection.shallow.len(), "Discarded shallow minima.");
    }
    context.reporter.report(Progress::PhaseFinish);
    selection
}

/// Hit count at or below which a minimum is flooded.
///
/// The quantile position is `portion` of `requested`, the number of minima asked for before
/// shallow ones were discarded, so it can point past the end of `hits`; it is then clamped to
/// the most visited minimum.
pub fn flood_threshold(hits: &[usize], requested: usize, portion: f64) -> usize {
    let mut sorted = hits.to_vec();
    sorted.sort_unstable();
    let count = (requested as f64 * portion) as usize;
    match (count.checked_sub(1), sorted.last()) {
        (Some(i), Some(&most)) => sorted.get(i).copied().unwrap_or(most),
        _ => 0,
    }
}

fn analyze_barriers<M, S>(
    context: &LandscapeContext<M, ExploreConfig>,
    estimator: &S,
    minima: &[SelectedMinimum],
    requested: usize,
) -> Result<BarrierAnalysis, EngineError>
where
    M: EnergyModel + ?Sized,
    S: SaddleEstimator + ?Sized,
{
    let mut matrix = BarrierMatrix::new(minima.len());
    let mut clusters = UnionFind::new(minima.len());

    let (flooded, flood_attempts) = flood_minima(context, minima, requested, &mut matrix, &mut clusters)?;
    let direct_paths = estimate_direct_paths(context, estimator, minima, &mut matrix, &mut clusters);

    let heights: Vec<_> = minima.iter().map(|m| m.minimum.energy).collect();
    let tree = BarrierTree::assemble(&heights, &matrix);
    info!(roots = tree.roots().len(), "Barrier forest assembled.");

    Ok(BarrierAnalysis {
        matrix,
        tree,
        flooded,
        flood_attempts,
        direct_paths,
    })
}

fn flood_minima<M: EnergyModel + ?Sized>(
    context: &LandscapeContext<M, ExploreConfig>,
    minima: &[SelectedMinimum],
    requested: usize,
    matrix: &mut BarrierMatrix,
    clusters: &mut UnionFind,
) -> Result<(usize, usize), EngineError> {
    context.reporter.report(Progress::PhaseStart { name: "Flooding" });

    let hits: Vec<_> = minima.iter().map(|m| m.hits).collect();
    let threshold = flood_threshold(&hits, requested, context.config.flood.portion);
    let candidates: Vec<usize> = (0..minima.len()).rev().filter(|&i| hits[i] <= threshold).collect();
    let position: HashMap<&Structure, usize> = minima
        .iter()
        .enumerate()
        .map(|(i, m)| (&m.minimum.structure, i))
        .collect();

    let flooder = Flooder::new(context.model, context.config.flood.max_visited);
    let mut walker = Walker::steepest(context.model, context.descent());
    let mut flooded = 0;

    context.reporter.report(Progress::TaskStart {
        total_steps: candidates.len() as u64,
    });
    for &i in &candidates {
        let seed = &minima[i].minimum;
        if let Some(escape) = flooder.flood(seed, None) {
            let mut exit = escape.exit;
            walker.descend(&mut exit)?;
            match position.get(&exit.structure) {
                Some(&father) if father != i => {
                    debug!(minimum = i, father, saddle = escape.saddle, "Flood reached a lower minimum");
                    matrix.set(i, father, Some(escape.saddle), false);
                    clusters.union(i, father);
                    flooded += 1;
                }
                _ => debug!(minimum = i, reached = %exit.structure, "Flood left the selected minima"),
            }
        }
        context.reporter.report(Progress::TaskIncrement);
    }
    context.reporter.report(Progress::TaskFinish);

    info!(
        flooded,
        attempted = candidates.len(),
        total = minima.len(),
        threshold,
        "Flooding finished."
    );
    context.reporter.report(Progress::PhaseFinish);
    Ok((flooded, candidates.len()))
}

fn estimate_direct_paths<M, S>(
    context: &LandscapeContext<M, ExploreConfig>,
    estimator: &S,
    minima: &[SelectedMinimum],
    matrix: &mut BarrierMatrix,
    clusters: &mut UnionFind,
) -> usize
where
    M: EnergyModel + ?Sized,
    S: SaddleEstimator + ?Sized,
{
    context.reporter.report(Progress::PhaseStart {
        name: "Direct paths",
    });
    let depth = context.config.barriers.search_depth;
    let pairs: Vec<_> = clusters.representatives().into_iter().combinations(2).collect();
    debug!(clusters = pairs.len(), "Estimating saddles between cluster representatives");

    context.reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter();

    let saddles: Vec<(usize, usize, Option<Energy>)> = iterator
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let saddle = estimator.estimate_saddle(
                &minima[a].minimum.structure,
                &minima[b].minimum.structure,
                depth,
            );
            context.reporter.report(Progress::TaskIncrement);
            (a, b, saddle)
        })
        .collect();
    context.reporter.report(Progress::TaskFinish);

    for &(a, b, saddle) in &saddles {
        matrix.set(a, b, saddle, true);
    }
    info!(pairs = saddles.len(), "Direct-path estimation finished.");
    context.reporter.report(Progress::PhaseFinish);
    saddles.len()
}
