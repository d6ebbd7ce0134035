//! Configuration module

mod site;

pub use site::DuplicateSlugs;
pub use site::FeedConfig;
pub use site::LoaderConfig;
pub use site::MissingFrontMatter;
pub use site::PostDefaults;
pub use site::SiteConfig;
