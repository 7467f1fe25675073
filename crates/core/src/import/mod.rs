//! Import pipeline: parses exported flat files back into entries, isolating
//! failures per line, and records an audit row per run.

mod import_model;
mod import_run_model;
mod import_service;

pub use import_model::*;
pub use import_run_model::*;
pub use import_service::*;
