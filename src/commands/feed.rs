//! Write the RSS feed

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::feed::RssFeed;
use crate::Site;

/// Render the feed into `public_dir` and return the written path
pub fn generate(site: &Site) -> Result<PathBuf> {
    let posts = site.load_posts()?;
    let xml = RssFeed::new(&site.config).render(posts.posts(), Utc::now());

    fs::create_dir_all(&site.public_dir)?;
    let output_path = site
        .public_dir
        .join(site.config.feed.path.trim_start_matches('/'));
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, xml)?;

    tracing::info!("Generated {:?} with {} posts", output_path, posts.len());
    Ok(output_path)
}

/// Run the feed command
pub fn run(site: &Site) -> Result<()> {
    let path = generate(site)?;
    println!("Wrote {:?}", path);
    Ok(())
}
