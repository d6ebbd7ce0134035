//! Loaded post collection and its read-only queries

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::Post;

/// Every post of one load, newest first.
///
/// Built once and never mutated; a content change produces a new collection.
#[derive(Debug, Clone)]
pub struct PostCollection {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
    loaded_at: DateTime<Utc>,
}

impl PostCollection {
    /// Build a collection, ordering posts by date descending.
    ///
    /// The sort is stable, so posts with equal dates keep the order they were
    /// handed in. Slugs are expected to be unique; if they are not, lookups
    /// resolve to the newest post with that slug.
    pub fn new(mut posts: Vec<Post>, loaded_at: DateTime<Utc>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut by_slug = HashMap::with_capacity(posts.len());
        for (idx, post) in posts.iter().enumerate() {
            by_slug.entry(post.slug.clone()).or_insert(idx);
        }

        Self {
            posts,
            by_slug,
            loaded_at,
        }
    }

    /// Collection with no posts
    pub fn empty() -> Self {
        Self::new(Vec::new(), Utc::now())
    }

    /// All posts, newest first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// When the posts were loaded; also the date given to undated posts
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Post with exactly this slug
    pub fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&idx| &self.posts[idx])
    }

    /// Posts tagged `tag`, compared case-insensitively, newest first
    pub fn get_by_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// Every tag used by any post, as written, sorted and de-duplicated
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.posts
            .iter()
            .flat_map(|p| p.frontmatter.tags.iter().cloned())
            .collect()
    }

    /// Number of posts carrying each tag (case-sensitive, as written)
    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for post in &self.posts {
            let unique: BTreeSet<&String> = post.frontmatter.tags.iter().collect();
            for tag in unique {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Slugs in collection order
    pub fn all_slugs(&self) -> Vec<&str> {
        self.posts.iter().map(|p| p.slug.as_str()).collect()
    }

    /// The `limit` newest posts
    pub fn recent(&self, limit: usize) -> &[Post] {
        &self.posts[..limit.min(self.posts.len())]
    }

    /// Posts whose title, description or a tag contains `query`, ignoring
    /// case. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        let query = query.trim();
        if query.is_empty() {
            return self.posts.iter().collect();
        }
        self.posts
            .iter()
            .filter(|p| p.matches_query(query))
            .collect()
    }

    /// Posts carrying every tag in `tags` (case-insensitive). An empty list
    /// matches everything.
    pub fn filter_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| tags.iter().all(|t| p.has_tag(t.as_ref())))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostDefaults;
    use crate::content::frontmatter::RawFrontMatter;
    use crate::helpers::parse_date_string;

    fn post(slug: &str, date: &str, tags: &str, title: &str) -> Post {
        let text = format!("---\ntitle: {title}\npubDate: {date}\ntags: {tags}\n---\nBody\n");
        let frontmatter = RawFrontMatter::parse(&text)
            .frontmatter
            .to_frontmatter(&PostDefaults::default(), "2026-01-01");
        Post {
            slug: slug.to_string(),
            frontmatter,
            content: "Body\n".to_string(),
            table_of_contents: Vec::new(),
            date: parse_date_string(date).unwrap(),
        }
    }

    fn sample() -> PostCollection {
        PostCollection::new(
            vec![
                post("older", "2023-05-01", "Security, Cloud", "Hardening S3"),
                post("newest", "2024-02-10", "Rust", "Async Rust"),
                post("middle", "2023-11-20", "security, DevSecOps", "Pipeline scanning"),
            ],
            Utc::now(),
        )
    }

    #[test]
    fn test_sorted_newest_first() {
        let posts = sample();
        assert_eq!(posts.all_slugs(), vec!["newest", "middle", "older"]);
    }

    #[test]
    fn test_get_by_slug() {
        let posts = sample();
        assert_eq!(posts.get_by_slug("middle").unwrap().frontmatter.title, "Pipeline scanning");
        assert!(posts.get_by_slug("nonexistent").is_none());
        assert!(posts.get_by_slug("Middle").is_none());
    }

    #[test]
    fn test_get_by_tag_case_insensitive() {
        let posts = sample();
        let upper: Vec<_> = posts.get_by_tag("Security").into_iter().map(|p| p.slug.as_str()).collect();
        let lower: Vec<_> = posts.get_by_tag("security").into_iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(upper, lower);
        assert_eq!(upper, vec!["middle", "older"]);
        assert!(posts.get_by_tag("secure").is_empty());
    }

    #[test]
    fn test_all_tags_case_sensitive_set() {
        let tags: Vec<_> = sample().all_tags().into_iter().collect();
        assert_eq!(tags, vec!["Cloud", "DevSecOps", "Rust", "Security", "security"]);
    }

    #[test]
    fn test_tag_counts() {
        let counts = sample().tag_counts();
        assert_eq!(counts["Security"], 1);
        assert_eq!(counts["security"], 1);
        assert_eq!(counts["Rust"], 1);
    }

    #[test]
    fn test_recent() {
        let posts = sample();
        assert_eq!(posts.recent(2).len(), 2);
        assert_eq!(posts.recent(2)[0].slug, "newest");
        assert_eq!(posts.recent(10).len(), 3);
        assert!(posts.recent(0).is_empty());
    }

    #[test]
    fn test_search() {
        let posts = sample();
        let hits: Vec<_> = posts.search("RUST").into_iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(hits, vec!["newest"]);
        let hits: Vec<_> = posts.search("devsec").into_iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(hits, vec!["middle"]);
        assert_eq!(posts.search("  ").len(), 3);
        assert!(posts.search("kubernetes").is_empty());
    }

    #[test]
    fn test_filter_by_tags_requires_all() {
        let posts = sample();
        let hits: Vec<_> = posts
            .filter_by_tags(&["security", "cloud"])
            .into_iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(hits, vec!["older"]);
        assert_eq!(posts.filter_by_tags::<&str>(&[]).len(), 3);
    }

    #[test]
    fn test_empty_collection() {
        let posts = PostCollection::empty();
        assert!(posts.is_empty());
        assert!(posts.all_tags().is_empty());
        assert!(posts.get_by_slug("anything").is_none());
    }
}
