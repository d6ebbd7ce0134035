//! Create a new post

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use crate::content::frontmatter::split_tags;
use crate::Site;

/// Create `<slug>.md` in the posts directory and return its path
pub fn create_post(site: &Site, title: &str, tags: Option<&str>) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    fs::create_dir_all(&site.source_dir)?;
    let file_path = site.source_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let tags = tags.map(split_tags).unwrap_or_default();
    fs::write(&file_path, scaffold(site, title, &tags, Utc::now()))?;

    tracing::info!("Created post `{}`", slug);
    Ok(file_path)
}

/// Frontmatter header plus a first heading for a new post
fn scaffold(site: &Site, title: &str, tags: &[String], now: DateTime<Utc>) -> String {
    format!(
        "---\ntitle: \"{title}\"\npubDate: {date}\ndescription: \"\"\nauthor: {author}\ntags: {tags}\nttr: {ttr}\n---\n\n# {title}\n",
        title = title.replace('"', "'"),
        date = now.format("%Y-%m-%d"),
        author = site.config.defaults.author,
        tags = tags.join(", "),
        ttr = site.config.defaults.ttr,
    )
}

/// Run the new command
pub fn run(site: &Site, title: &str, tags: Option<&str>) -> Result<()> {
    let path = create_post(site, title, tags)?;
    println!("Created: {:?}", path);
    Ok(())
}
