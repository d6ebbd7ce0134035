//! Front-matter parsing
//!
//! The header grammar is a flat `key: value` subset of YAML:
//!
//! ```text
//! ---
//! title: Hello
//! description: "quoted value"
//! tags: a, b, c
//! ---
//! (markdown body)
//! ```
//!
//! There are no nested maps, no multi-line scalars and no `- item` lists.
//! Each line is split on its first `:`, so values may contain further colons
//! (`projectLink: https://example.com`).

use indexmap::IndexMap;

use super::post::{FrontMatter, Image};
use crate::config::PostDefaults;

/// Keys that map onto typed [`FrontMatter`] fields
const TYPED_KEYS: &[&str] = &[
    "title",
    "pubDate",
    "description",
    "author",
    "authorImage",
    "authorImageAlt",
    "image",
    "imageAlt",
    "tags",
    "ttr",
    "projectLink",
];

/// Untyped header fields in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrontMatter {
    fields: IndexMap<String, String>,
}

/// Result of splitting a source file into header and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource<'a> {
    pub frontmatter: RawFrontMatter,
    /// Text after the closing delimiter, or the whole input without a header
    pub body: &'a str,
    /// Whether a delimited header block was found
    pub has_block: bool,
}

impl RawFrontMatter {
    /// Parse a source file into header fields and body.
    ///
    /// Never fails: a file without a well-formed `---` block yields empty
    /// fields and the input unchanged as the body.
    pub fn parse(text: &str) -> ParsedSource<'_> {
        match split_block(text) {
            Some((block, body)) => ParsedSource {
                frontmatter: Self::parse_block(block),
                body,
                has_block: true,
            },
            None => ParsedSource {
                frontmatter: Self::default(),
                body: text,
                has_block: false,
            },
        }
    }

    /// Parse the lines between the two delimiters
    fn parse_block(block: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in block.lines() {
            if line.trim().is_empty() {
                continue;
            }
            // Lines without a colon carry no key and are ignored
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            fields.insert(key.to_string(), unquote(value.trim()).to_string());
        }

        Self { fields }
    }

    /// Value of `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not empty
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over all fields in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build typed metadata, filling every missing or empty field from
    /// `defaults`. `today` stands in for a missing `pubDate`.
    pub fn to_frontmatter(&self, defaults: &PostDefaults, today: &str) -> FrontMatter {
        let title = self.non_empty("title");
        let author = self.non_empty("author");

        let image = Image::new(
            self.non_empty("image").unwrap_or(defaults.image.as_str()),
            self.non_empty("imageAlt")
                .or(title)
                .unwrap_or(defaults.image_alt.as_str()),
        );
        let author_image = Image::new(
            self.non_empty("authorImage")
                .unwrap_or(defaults.author_image.as_str()),
            self.non_empty("authorImageAlt")
                .or(author)
                .unwrap_or(defaults.author_image_alt.as_str()),
        );

        let extra = self
            .fields
            .iter()
            .filter(|(k, _)| !TYPED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        FrontMatter {
            title: title.unwrap_or(defaults.title.as_str()).to_string(),
            pub_date: self.non_empty("pubDate").unwrap_or(today).to_string(),
            description: self
                .non_empty("description")
                .unwrap_or(defaults.description.as_str())
                .to_string(),
            author: author.unwrap_or(defaults.author.as_str()).to_string(),
            author_image,
            image,
            tags: self.get("tags").map(split_tags).unwrap_or_default(),
            ttr: self.non_empty("ttr").unwrap_or(defaults.ttr.as_str()).to_string(),
            project_link: self.non_empty("projectLink").map(str::to_string),
            extra,
        }
    }
}

/// Locate the header block.
///
/// The first line must be `---` (trailing whitespace allowed); the block
/// ends at the next such line. Returns `(block, body)`.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let first = lines.next()?;
    if !is_delimiter(first) || !first.ends_with('\n') {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }

    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Strip one layer of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split a comma-separated tag list, trimming pieces and dropping empties
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
