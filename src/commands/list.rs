//! List site content

use anyhow::Result;

use crate::content::{Post, PostCollection};
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, tag: Option<&str>, search: Option<&str>) -> Result<()> {
    let posts = site.load_posts()?;

    match content_type {
        "post" | "posts" => {
            let selected = select(&posts, tag, search);
            println!("Posts ({}):", selected.len());
            for post in selected {
                println!("  {}", format_post_line(post));
            }
        }
        "tag" | "tags" => {
            let mut tags: Vec<_> = posts.tag_counts().into_iter().collect();
            println!("Tags ({}):", tags.len());
            // Most used first, ties alphabetical
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "slug" | "slugs" => {
            for slug in posts.all_slugs() {
                println!("{}", slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, slug",
                content_type
            );
        }
    }

    Ok(())
}

/// Posts matching the optional tag filter and search text
fn select<'a>(posts: &'a PostCollection, tag: Option<&str>, search: Option<&str>) -> Vec<&'a Post> {
    let mut selected = match tag {
        Some(tag) => posts.get_by_tag(tag),
        None => posts.iter().collect(),
    };
    if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
        selected.retain(|p| p.matches_query(query));
    }
    selected
}

fn format_post_line(post: &Post) -> String {
    let fm = &post.frontmatter;
    if fm.tags.is_empty() {
        format!("{} - {} [{}]", fm.pub_date, fm.title, post.slug)
    } else {
        format!(
            "{} - {} [{}] ({})",
            fm.pub_date,
            fm.title,
            post.slug,
            fm.tags.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use crate::source::MemorySource;

    fn posts() -> PostCollection {
        let source = MemorySource::new()
            .with("a.md", "---\ntitle: Pipelines\npubDate: 2024-01-02\ntags: DevOps, Security\n---\n")
            .with("b.md", "---\ntitle: Notes\npubDate: 2024-01-01\n---\n");
        ContentLoader::default().load_from(&source).unwrap()
    }

    #[test]
    fn test_select_by_tag_and_search() {
        let posts = posts();
        assert_eq!(select(&posts, None, None).len(), 2);
        assert_eq!(select(&posts, Some("security"), None).len(), 1);
        assert_eq!(select(&posts, None, Some("notes")).len(), 1);
        assert!(select(&posts, Some("devops"), Some("notes")).is_empty());
    }

    #[test]
    fn test_format_post_line() {
        let posts = posts();
        assert_eq!(
            format_post_line(posts.get_by_slug("a").unwrap()),
            "2024-01-02 - Pipelines [a] (DevOps, Security)"
        );
        assert_eq!(
            format_post_line(posts.get_by_slug("b").unwrap()),
            "2024-01-01 - Notes [b]"
        );
    }
}
