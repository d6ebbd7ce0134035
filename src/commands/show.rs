//! Show one post

use anyhow::Result;

use crate::Site;

/// Print a post, including its table of contents, as pretty JSON
pub fn run(site: &Site, slug: &str) -> Result<()> {
    let posts = site.load_posts()?;
    match posts.get_by_slug(slug) {
        Some(post) => {
            println!("{}", serde_json::to_string_pretty(post)?);
            Ok(())
        }
        None => anyhow::bail!("No post with slug `{}`", slug),
    }
}
