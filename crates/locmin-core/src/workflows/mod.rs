//! # Workflows Module
//!
//! End-to-end procedures built from the engine.
//!
//! - **Exploration** ([`explore`]) - Descends a candidate stream to local minima, filters
//!   shallow minima, and optionally computes saddles and the barrier forest.
//! - **Barrier Correction** ([`fix_barriers`]) - Re-descends the minima of an existing
//!   barrier listing and merges records that turn out to share a minimum.
//!
//! Both take an [`EnergyModel`](crate::core::energy::EnergyModel) and a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and return plain result
//! structures; writing them out is left to the caller.

pub mod explore;
pub mod fix_barriers;
