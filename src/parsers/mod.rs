pub mod config;
pub mod extract;
pub mod frontmatter;
pub mod markdown;
pub mod plan;
pub mod requirements;
pub mod roadmap;
pub mod status;
pub mod summary;
pub mod todo;
pub mod verification;
