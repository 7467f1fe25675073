//! SQLite storage for the loss reason catalog.

mod model;
mod repository;

pub use model::ReasonDB;
pub use repository::ReasonRepository;
