//! # Core Module
//!
//! Stateless building blocks for landscape exploration.
//!
//! - **Landscape Representation** ([`models`]) - Sequences, pair-table structures, minimum
//!   records and fixed-point energies
//! - **Energy Evaluation** ([`energy`]) - The `EnergyModel` trait, a loop-based nearest-neighbor
//!   model, and the move set that drives descent
//! - **File I/O** ([`io`]) - Candidate streams, sequence files, resume files, reports and rates

pub mod energy;
pub mod io;
pub mod models;
