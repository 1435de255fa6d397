//! Local catalog (SQLite via sqlx).
//!
//! Stores named search polygons and a log of every product a search has
//! returned, so repeated queries are idempotent and can be inspected later.

pub mod db;
pub mod store;
pub mod types;

mod polygons;
mod query;

pub use db::*;
pub use store::CatalogStore;
pub use types::*;
