#![doc = document_features::document_features!()]
//! Exact and heuristic solvers for one-dimensional Bin Packing and Cutting Stock problems,
//! plus a small 2D sheet-cutting knapsack.
//!
//! Every solver is a free function over a borrowed, immutable instance.
//! Input is validated once at the solver boundary, see [`error::SolveError`].

/// Entities to model Bin Packing and Cutting Stock problems
pub mod entities;

/// Errors reported by the solvers
pub mod error;

/// Importing problem instances into and exporting solutions out of this library
pub mod io;

/// Exact and heuristic solution strategies
pub mod solvers;

/// Helper functions which do not belong to any specific module
pub mod util;
