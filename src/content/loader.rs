//! Content loader - turns raw markdown sources into posts

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::frontmatter::RawFrontMatter;
use super::toc::extract_toc;
use super::{LoadError, Post, PostCollection};
use crate::config::{DuplicateSlugs, LoaderConfig, MissingFrontMatter, PostDefaults, SiteConfig};
use crate::helpers::{date_only, parse_date_string};
use crate::source::{SourceMap, SourceProvider};

/// Builds posts from a path to text mapping.
///
/// Pure: no I/O happens here. The policies for files without a header and
/// for clashing slugs are fixed per loader and apply to every file.
#[derive(Debug, Clone, Default)]
pub struct ContentLoader {
    defaults: PostDefaults,
    policy: LoaderConfig,
}

impl ContentLoader {
    /// Create a loader from site configuration
    pub fn new(config: &SiteConfig) -> Self {
        Self::with_options(config.defaults.clone(), config.loader.clone())
    }

    /// Create a loader with explicit defaults and policies
    pub fn with_options(defaults: PostDefaults, policy: LoaderConfig) -> Self {
        Self { defaults, policy }
    }

    /// Load every post from `sources`, newest first
    pub fn load_all(&self, sources: &SourceMap) -> Result<Vec<Post>, LoadError> {
        self.load_collection(sources).map(PostCollection::into_posts)
    }

    /// Discover sources with `provider` and load them
    pub fn load_from<P: SourceProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> Result<PostCollection, LoadError> {
        let sources = provider.discover()?;
        self.load_collection(&sources)
    }

    /// Load every post from `sources` into a queryable collection
    pub fn load_collection(&self, sources: &SourceMap) -> Result<PostCollection, LoadError> {
        self.load_collection_at(sources, Utc::now())
    }

    /// Load with a fixed "now".
    ///
    /// `now` is the date of every post whose `pubDate` is missing or cannot be
    /// parsed, so such posts sort as the newest.
    pub fn load_collection_at(
        &self,
        sources: &SourceMap,
        now: DateTime<Utc>,
    ) -> Result<PostCollection, LoadError> {
        let today = date_only(&now);
        let mut posts: Vec<Post> = Vec::with_capacity(sources.len());
        let mut seen: HashMap<String, (usize, &str)> = HashMap::new();
        let mut skipped = 0;

        for (path, text) in sources {
            let Some(post) = self.load_post(path, text, now, &today) else {
                skipped += 1;
                continue;
            };

            match seen.get(&post.slug) {
                Some(&(idx, first)) => match self.policy.duplicate_slugs {
                    DuplicateSlugs::Error => {
                        return Err(LoadError::DuplicateSlug {
                            slug: post.slug,
                            first: first.to_string(),
                            second: path.clone(),
                        });
                    }
                    DuplicateSlugs::LastWins => {
                        tracing::warn!(
                            "Slug `{}` from {} replaces the post from {}",
                            post.slug,
                            path,
                            first
                        );
                        seen.insert(post.slug.clone(), (idx, path.as_str()));
                        posts[idx] = post;
                    }
                },
                None => {
                    seen.insert(post.slug.clone(), (posts.len(), path.as_str()));
                    posts.push(post);
                }
            }
        }

        tracing::info!("Loaded {} posts ({} skipped)", posts.len(), skipped);
        Ok(PostCollection::new(posts, now))
    }

    /// Build one post, or `None` when the file is skipped
    fn load_post(&self, path: &str, text: &str, now: DateTime<Utc>, today: &str) -> Option<Post> {
        let slug = slug_from_path(path);
        if slug.is_empty() {
            tracing::warn!("Skipping {}: file name yields an empty slug", path);
            return None;
        }

        let parsed = RawFrontMatter::parse(text);
        if !parsed.has_block {
            match self.policy.missing_frontmatter {
                MissingFrontMatter::Strict => {
                    tracing::warn!("Skipping {}: no frontmatter block", path);
                    return None;
                }
                MissingFrontMatter::Permissive => {
                    tracing::debug!("{} has no frontmatter block, using defaults", path);
                }
            }
        }

        let frontmatter = parsed.frontmatter.to_frontmatter(&self.defaults, today);
        let date = match parsed.frontmatter.get("pubDate").filter(|d| !d.is_empty()) {
            Some(raw) => parse_date_string(raw).unwrap_or_else(|| {
                tracing::warn!("{}: unparseable pubDate {:?}, treating as now", path, raw);
                now
            }),
            None => now,
        };
        let table_of_contents = extract_toc(parsed.body);

        tracing::debug!(
            "Parsed {} as `{}` ({} headings)",
            path,
            slug,
            table_of_contents.len()
        );

        Some(Post {
            slug,
            frontmatter,
            content: parsed.body.to_string(),
            table_of_contents,
            date,
        })
    }
}

/// Slug of a source path: the last path segment without its `.md` suffix.
///
/// `./content/posts/my-post.md` becomes `my-post`. Nothing else is changed.
pub fn slug_from_path(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name).to_string()
}
