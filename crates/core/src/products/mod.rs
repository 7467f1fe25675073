//! Product catalog: domain model and repository contract.

mod products_model;
mod products_traits;

pub use products_model::*;
pub use products_traits::*;
