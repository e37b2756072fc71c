pub mod api;
pub mod models;
pub mod parsers;
pub mod search;
pub mod state;
pub mod watcher;
