use crate::core::energy::EnergyModel;
use crate::core::io::resume::BarrierRecord;
use crate::core::models::barrier::BarrierAggregate;
use crate::core::models::energy::to_kcal;
use crate::core::models::minimum::Minimum;
use crate::engine::config::FixBarriersConfig;
use crate::engine::context::LandscapeContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::walker::Walker;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct FixBarriersResult {
    /// Distinct minima in ascending energy order.
    pub records: Vec<(Minimum, BarrierAggregate)>,
    /// Listed structures that were not local minima of the model.
    pub moved: usize,
    /// Listed structures that merged into a record seen earlier in the file.
    pub merged: usize,
}

/// Re-descends every listed minimum and merges records that reach the same minimum.
///
/// Listed energies are ignored; each structure is re-evaluated under `model`. Records are
/// merged in file order. When a record is merged into an earlier one, the earlier record's
/// `e_diff` grows by how far the merged structure descended.
#[instrument(skip_all, name = "fix_barriers_workflow")]
pub fn run<M: EnergyModel + ?Sized>(
    model: &M,
    records: &[BarrierRecord],
    config: &FixBarriersConfig,
    reporter: &ProgressReporter,
) -> Result<FixBarriersResult, EngineError> {
    let context = LandscapeContext::new(model, reporter, config);
    context.reporter.report(Progress::PhaseStart {
        name: "Re-descending minima",
    });
    context.reporter.report(Progress::TaskStart {
        total_steps: records.len() as u64,
    });

    let mut walker = Walker::new(context.model, context.descent());
    let mut fixed: BTreeMap<Minimum, BarrierAggregate> = BTreeMap::new();
    let mut moved = 0;
    let mut merged = 0;

    for record in records {
        let mut current = context.model.evaluate(record.structure.clone());
        let listed_energy = current.energy;
        walker.descend(&mut current)?;

        if current.energy != listed_energy {
            moved += 1;
            info!(
                "{:6.2} -> {:6.2} {}",
                to_kcal(listed_energy),
                to_kcal(current.energy),
                current.structure
            );
        }

        let descended = listed_energy - current.energy;
        match fixed.entry(current) {
            Entry::Occupied(mut entry) => {
                let combined = entry.get().merge(&record.aggregate);
                *entry.get_mut() = BarrierAggregate {
                    e_diff: combined.e_diff + descended,
                    ..combined
                };
                merged += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert(record.aggregate);
            }
        }
        context.reporter.report(Progress::TaskIncrement);
    }

    context.reporter.report(Progress::TaskFinish);
    context.reporter.report(Progress::PhaseFinish);
    info!(
        listed = records.len(),
        distinct = fixed.len(),
        moved,
        merged,
        "Barrier listing corrected."
    );

    Ok(FixBarriersResult {
        records: fixed.into_iter().collect(),
        moved,
        merged,
    })
}
