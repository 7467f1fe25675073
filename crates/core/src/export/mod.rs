//! Export pipeline: turns unsynchronized entries into one flat file per
//! reason and flips their synchronization flag once the file is durable.

pub mod format;

mod export_model;
mod export_service;

pub use export_model::*;
pub use export_service::*;
