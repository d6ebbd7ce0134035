//! Content module - parses markdown posts and answers queries over them

mod collection;
mod error;
pub mod frontmatter;
pub mod loader;
mod post;
pub mod toc;

pub use collection::PostCollection;
pub use error::LoadError;
pub use frontmatter::RawFrontMatter;
pub use loader::{slug_from_path, ContentLoader};
pub use post::{FrontMatter, Image, Post, TocEntry};
pub use toc::{extract_toc, normalize_id};
