//! Core domain and pipelines for the lossbook inventory-loss tracker.
//!
//! This crate is storage-agnostic: repositories are trait objects injected
//! by the application entry point, with the SQLite implementation living in
//! `lossbook-storage-sqlite` and an in-memory implementation in [`memory`].

pub mod entries;
pub mod errors;
pub mod export;
pub mod import;
pub mod memory;
pub mod products;
pub mod reasons;

pub use errors::{Error, Result};
