// src/lib.rs
//! Rider catalog + team optimizer.
//!
//! Pipeline: raw startlist names → `catalog::normalize` → `catalog::merge`
//! → `catalog::aggregate` → `optimize` → `Roster`.

#[macro_use]
pub mod macros;

pub mod error;
pub mod log;
pub mod progress;
pub mod config;
pub mod core;
pub mod specs;

pub mod catalog;
pub mod optimize;
pub mod ingest;

pub mod csv;
pub mod file;
pub mod store;
pub mod seed;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use catalog::{Catalog, Entity};
pub use optimize::{optimize, Constraints, Optimization, Outcome, Roster};
