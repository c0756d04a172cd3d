//! # RNAlocmin Core Library
//!
//! A library for exploring the energy landscape of RNA secondary structures over a fixed
//! sequence: it maps arbitrary structures onto canonical local minima, floods basins to find
//! their escape saddles, and assembles the resulting saddle matrix into a barrier tree.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Minimum`), the
//!   `EnergyModel` abstraction with a nearest-neighbor implementation, the move set built on
//!   top of it, and line-oriented I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful exploration machinery: the deduplicating
//!   walk cache, the minima registry, the gradient-descent walker, the flood-fill barrier
//!   detector, union-find clustering, and barrier-tree assembly.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures (`explore`, `fix_barriers`) that
//!   tie the engine and core together and hand back result structures ready for reporting.

pub mod core;
pub mod engine;
pub mod workflows;
