//! # Engine Module
//!
//! The stateful landscape-exploration machinery.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Descent, flooding, barrier and selection parameters
//! - **Error Handling** ([`error`]) - Engine-level error taxonomy
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Deduplication** ([`cache`], [`registry`]) - The walk cache mapping visited structures
//!   to their minimum, and the energy-ordered registry of distinct minima
//! - **Descent** ([`walker`], [`explorer`]) - Gradient walks and the per-candidate driver
//! - **Barriers** ([`flood`], [`union_find`], [`matrix`], [`direct_path`], [`barrier_tree`]) -
//!   Escape saddles by flooding, clustering of flooded minima, pairwise direct-path saddles,
//!   and assembly of the barrier forest
//!
//! All structures here are singly owned by the driving workflow; nothing is shared between
//! threads except the read-only energy model during the optional parallel direct-path stage.

pub mod barrier_tree;
pub mod cache;
pub mod config;
pub(crate) mod context;
pub mod direct_path;
pub mod error;
pub mod explorer;
pub mod flood;
pub mod matrix;
pub mod progress;
pub mod registry;
pub mod union_find;
pub mod walker;
