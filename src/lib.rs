//! postkit: content loading for a markdown blog
//!
//! Turns a directory of markdown posts with `---` frontmatter headers into
//! an immutable, newest-first [`content::PostCollection`] with a table of
//! contents per post, and answers the queries the blog pages need (by slug,
//! by tag, tag list, search). An RSS feed and a small JSON dev server sit on
//! top of the same collection.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod server;
pub mod source;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts
    pub source_dir: PathBuf,
    /// Output directory for generated files
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Filesystem discovery for this site's posts
    pub fn source(&self) -> Result<source::FsSource> {
        Ok(source::FsSource::new(
            &self.source_dir,
            &self.config.post_pattern,
        )?)
    }

    /// Loader configured with this site's defaults and policies
    pub fn loader(&self) -> content::ContentLoader {
        content::ContentLoader::new(&self.config)
    }

    /// Discover and load every post
    pub fn load_posts(&self) -> Result<content::PostCollection> {
        let source = self.source()?;
        Ok(self.loader().load_from(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_site_loads_posts_from_config_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Test\nsource_dir: src/posts\n",
        )
        .unwrap();
        let posts_dir = dir.path().join("src/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("hello-world.md"),
            "---\ntitle: Hello\npubDate: 2024-05-01\ntags: Intro\n---\n# Hello\n",
        )
        .unwrap();
        fs::write(posts_dir.join("ignored.txt"), "not markdown").unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Test");

        let posts = site.load_posts().unwrap();
        assert_eq!(posts.all_slugs(), vec!["hello-world"]);
        assert_eq!(posts.get_by_slug("hello-world").unwrap().table_of_contents.len(), 1);
    }

    #[test]
    fn test_site_without_config_or_posts() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("content/posts"));
        assert!(site.load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_non_utf8_post_does_not_hide_others() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("content/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("good.md"), "---\ntitle: Good\n---\nBody\n").unwrap();
        fs::write(posts_dir.join("latin1.md"), b"---\ntitle: Caf\xe9\n---\n").unwrap();

        let posts = Site::new(dir.path()).unwrap().load_posts().unwrap();
        assert_eq!(posts.all_slugs(), vec!["good"]);
    }
}
