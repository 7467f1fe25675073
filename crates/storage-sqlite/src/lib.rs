//! SQLite storage backend for lossbook.
//!
//! Diesel over a pooled connection for reads; all mutations are serialized
//! through a single writer thread (see [`db::write_actor`]). The schema is
//! managed by embedded, versioned migrations applied once at startup.

mod convert;

pub mod db;
pub mod entries;
pub mod errors;
pub mod import_runs;
pub mod products;
pub mod reasons;
pub mod schema;

pub use entries::EntryRepository;
pub use errors::StorageError;
pub use import_runs::ImportRunRepository;
pub use products::ProductRepository;
pub use reasons::ReasonRepository;
