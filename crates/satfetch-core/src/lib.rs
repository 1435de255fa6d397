pub mod config;
pub mod logging;

pub mod catalog;
pub mod checksum;
pub mod detect;
pub mod fetch;
pub mod loader;
pub mod platform;
pub mod retry;
pub mod search;
pub mod unpack;
