//! Line-oriented readers and writers for landscape files.
//!
//! Candidate streams carry one structure per line, optionally followed by an energy, in the
//! style of suboptimal-folding or sampling output. Resume files (previous runs and fixed
//! barrier listings) share a common layout: the sequence on the first line, then one indexed
//! minimum per line. Reports and rate matrices are written back in the same column formats.

pub mod candidates;
pub mod rates;
pub mod report;
pub mod resume;
pub mod sequence;
