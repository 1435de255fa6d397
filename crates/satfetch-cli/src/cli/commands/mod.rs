//! CLI command handlers. Each command is in its own file.

mod catalog;
mod checksum;
mod download;
mod history;
mod polygons;
mod query;
pub(super) mod session;

pub use catalog::open_catalog;
pub use checksum::run_checksum;
pub use download::run_download;
pub use history::run_history;
pub use polygons::{run_polygons_add, run_polygons_list};
pub use query::run_query;
