//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,

    // Directory
    pub source_dir: String,
    pub post_pattern: String,
    pub public_dir: String,

    // Content
    #[serde(default)]
    pub defaults: PostDefaults,
    #[serde(default)]
    pub loader: LoaderConfig,

    // Feed
    #[serde(default)]
    pub feed: FeedConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: "Cooper Wallace".to_string(),
            url: "http://localhost:4000".to_string(),
            language: "en".to_string(),

            source_dir: "content/posts".to_string(),
            post_pattern: "*.md".to_string(),
            public_dir: "public".to_string(),

            defaults: PostDefaults::default(),
            loader: LoaderConfig::default(),

            feed: FeedConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// Fallback values applied to posts whose frontmatter omits a field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostDefaults {
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_image: String,
    pub author_image_alt: String,
    pub image: String,
    pub image_alt: String,
    pub ttr: String,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            description: String::new(),
            author: "Cooper Wallace".to_string(),
            author_image:
                "https://blog-photo-bucket.s3.amazonaws.com/high_qual_pfp_informal_cropped_circle.jpg"
                    .to_string(),
            author_image_alt: "Author".to_string(),
            image: "/default-post-image.jpg".to_string(),
            image_alt: "Post image".to_string(),
            ttr: "5 min".to_string(),
        }
    }
}

/// What to do with a file that has no frontmatter block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFrontMatter {
    /// Load it as a post with default metadata and the whole file as content
    #[default]
    Permissive,
    /// Skip it with a warning
    Strict,
}

/// What to do when two source files produce the same slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSlugs {
    /// Fail the whole load
    #[default]
    Error,
    /// Keep the file whose path sorts last
    LastWins,
}

/// Loader policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub missing_frontmatter: MissingFrontMatter,
    pub duplicate_slugs: DuplicateSlugs,
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Output file name inside `public_dir`, also the self link
    pub path: String,
    /// Maximum number of items, 0 for no limit
    pub limit: usize,
    /// URL prefix of a post page, joined with the slug
    pub post_path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "rss.xml".to_string(),
            limit: 20,
            post_path: "/post/".to_string(),
        }
    }
}
