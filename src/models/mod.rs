mod config;
mod document;
mod milestone;
mod phase;
mod project;
mod requirement;
mod search;
mod status;
mod todo;

pub use config::*;
pub use document::*;
pub use milestone::*;
pub use phase::*;
pub use project::*;
pub use requirement::*;
pub use search::*;
pub use status::*;
pub use todo::*;
