//! Loss entries: domain model, repository contract, and the form-path
//! service.

mod entries_model;
mod entries_service;
mod entries_traits;

pub use entries_model::*;
pub use entries_service::*;
pub use entries_traits::*;
