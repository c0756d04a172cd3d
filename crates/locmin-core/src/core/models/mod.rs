//! Core data models for landscape exploration.
//!
//! - [`sequence`] - Validated nucleotide sequences and pairing rules
//! - [`structure`] - Pair-table secondary structures and dot-bracket conversion
//! - [`energy`] - Fixed-point energies in hundredths of kcal/mol
//! - [`minimum`] - Energy-ordered minimum records
//! - [`barrier`] - Barrier information carried through fixed-barrier runs

pub mod barrier;
pub mod energy;
pub mod minimum;
pub mod sequence;
pub mod structure;
