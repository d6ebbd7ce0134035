//! RSS 2.0 feed generation

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{cdata, escape_xml, parse_date_string, rfc822};

/// Renders posts as an RSS 2.0 document
pub struct RssFeed<'a> {
    config: &'a SiteConfig,
}

impl<'a> RssFeed<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Render `posts` in the given order, honouring `feed.limit`
    pub fn render(&self, posts: &[Post], build_date: DateTime<Utc>) -> String {
        let config = self.config;
        let site_url = config.url.trim_end_matches('/');
        let limit = match config.feed.limit {
            0 => posts.len(),
            n => n,
        };

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:atom="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str("  <channel>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!("    <link>{}</link>\n", escape_xml(site_url)));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&config.description)
        ));
        feed.push_str(&format!(
            "    <language>{}</language>\n",
            escape_xml(&config.language)
        ));
        feed.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            rfc822(&build_date)
        ));
        feed.push_str(&format!(
            "    <atom:link href=\"{}/{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            escape_xml(site_url),
            escape_xml(config.feed.path.trim_start_matches('/'))
        ));

        for post in posts.iter().take(limit) {
            self.push_item(&mut feed, post);
        }

        feed.push_str("  </channel>\n");
        feed.push_str("</rss>\n");
        feed
    }

    fn push_item(&self, feed: &mut String, post: &Post) {
        let fm = &post.frontmatter;
        let link = escape_xml(&post.permalink(&self.config.url, &self.config.feed.post_path));
        // Prefer the date as written; undated posts fall back to their load date
        let date = parse_date_string(&fm.pub_date).unwrap_or(post.date);

        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", cdata(&fm.title)));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!(
            "      <guid isPermaLink=\"true\">{}</guid>\n",
            link
        ));
        feed.push_str(&format!("      <pubDate>{}</pubDate>\n", rfc822(&date)));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            cdata(&fm.description)
        ));
        feed.push_str(&format!(
            "      <content:encoded>{}</content:encoded>\n",
            cdata(&post.content)
        ));
        feed.push_str(&format!("      <author>{}</author>\n", escape_xml(&fm.author)));
        for tag in &fm.tags {
            feed.push_str(&format!("      <category>{}</category>\n", escape_xml(tag)));
        }
        feed.push_str("    </item>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use crate::source::SourceMap;
    use chrono::TimeZone;

    fn posts() -> Vec<Post> {
        let mut sources = SourceMap::new();
        sources.insert(
            "posts/first.md".into(),
            "---\ntitle: First & Best\npubDate: 2024-01-15\ndescription: Intro\ntags: Rust, <Security>\n---\nHello ]]> world\n".into(),
        );
        sources.insert(
            "posts/second.md".into(),
            "---\ntitle: Second\npubDate: 2024-02-01\n---\nMore\n".into(),
        );
        ContentLoader::default().load_all(&sources).unwrap()
    }

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Engineering Notes".into(),
            url: "https://blog.example.com/".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_items() {
        let config = config();
        let build = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let xml = RssFeed::new(&config).render(&posts(), build);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<title>Engineering Notes</title>"));
        assert!(xml.contains("<lastBuildDate>Fri, 01 Mar 2024 12:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains(r#"href="https://blog.example.com/rss.xml""#));
        assert!(xml.contains("<link>https://blog.example.com/post/first</link>"));
        assert!(xml.contains("<pubDate>Mon, 15 Jan 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("<title><![CDATA[First & Best]]></title>"));
        assert!(xml.contains("<category>Rust</category>"));
        assert!(xml.contains("<category>&lt;Security&gt;</category>"));
        assert!(xml.contains("Hello ]]]]><![CDATA[> world"));
        assert_eq!(xml.matches("<item>").count(), 2);

        // Newest first, as handed in
        let second = xml.find("/post/second").unwrap();
        let first = xml.find("/post/first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_limit() {
        let mut config = config();
        config.feed.limit = 1;
        let xml = RssFeed::new(&config).render(&posts(), Utc::now());
        assert_eq!(xml.matches("<item>").count(), 1);
    }

    #[test]
    fn test_empty_feed() {
        let config = config();
        let xml = RssFeed::new(&config).render(&[], Utc::now());
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }
}
