//! Loss reason catalog: domain model and repository contract.

mod reasons_model;
mod reasons_traits;

pub use reasons_model::*;
pub use reasons_traits::*;
