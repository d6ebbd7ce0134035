//! Post model

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An image reference with its alternative text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub alt: String,
}

impl Image {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
        }
    }
}

/// One heading of a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Anchor id derived from the heading text
    pub id: String,
    /// Heading text, trimmed
    pub title: String,
    /// Number of `#` markers, 1 to 6
    pub level: u8,
}

/// Typed post metadata with every default already applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    /// Publication date exactly as written, or today's date when absent
    pub pub_date: String,
    pub description: String,
    pub author: String,
    pub author_image: Image,
    /// Cover image
    pub image: Image,
    pub tags: Vec<String>,
    /// Time to read
    pub ttr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_link: Option<String>,

    /// Keys outside the typed fields, in source order
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without the `.md` extension
    pub slug: String,

    pub frontmatter: FrontMatter,

    /// Markdown body with the frontmatter header removed
    pub content: String,

    pub table_of_contents: Vec<TocEntry>,

    /// `pubDate` resolved to an instant; used for ordering
    pub date: DateTime<Utc>,
}

impl Post {
    /// Whether the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.frontmatter
            .tags
            .iter()
            .any(|t| t.to_lowercase() == tag)
    }

    /// Case-insensitive substring match over title, description and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let fm = &self.frontmatter;
        fm.title.to_lowercase().contains(&query)
            || fm.description.to_lowercase().contains(&query)
            || fm.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    /// Absolute link of the post page
    pub fn permalink(&self, base_url: &str, post_path: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        match post_path.trim_matches('/') {
            "" => format!("{}/{}", base_url, self.slug),
            prefix => format!("{}/{}/{}", base_url, prefix, self.slug),
        }
    }
}
