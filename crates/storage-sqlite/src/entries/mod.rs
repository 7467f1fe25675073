//! SQLite storage for loss entries.

mod model;
mod repository;

pub use model::{EntryDB, NewEntryDB};
pub use repository::EntryRepository;
