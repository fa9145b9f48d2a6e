// src/config/mod.rs

//! Configuration loading and validation for the change filter.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config document from disk or a string (`loader.rs`).
//! - Validate basic invariants like a non-empty `dest` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{FilterConfig, RawFilterConfig};
