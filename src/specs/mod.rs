// src/specs/mod.rs
//! # Page specs
//!
//! Each spec knows *where the ground truth lives* in one kind of saved page
//! and how to extract it tolerantly. Specs are pure: text in, values out.
//! Fetching, retries and pauses between requests belong to whoever produced
//! the saved page; merging belongs to `catalog::merge`.
//!
//! Specs should stay testable offline against captured fixtures.
pub mod startlist;
