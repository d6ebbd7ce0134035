//! Table of contents extraction

use lazy_static::lazy_static;
use regex::Regex;

use super::post::TocEntry;

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Turn heading text into an anchor id.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, then trims hyphens from both ends. Applying it twice gives the
/// same result as applying it once.
pub fn normalize_id(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Collect ATX headings (`#` to `######`) from a markdown body in document
/// order. Ids are not deduplicated. Lines inside fenced code blocks are
/// skipped.
pub fn extract_toc(body: &str) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if let Some(open) = fence {
            if closes_fence(trimmed, open) {
                fence = None;
            }
            continue;
        }
        if let Some(open) = opening_fence(trimmed) {
            fence = Some(open);
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            let title = caps[2].trim();
            if title.is_empty() {
                continue;
            }
            toc.push(TocEntry {
                id: normalize_id(title),
                title: title.to_string(),
                level: caps[1].len() as u8,
            });
        }
    }

    toc
}

/// Fence character and run length when `line` opens a code block
fn opening_fence(line: &str) -> Option<(char, usize)> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

/// A closing fence is only fence characters, at least as many as opened it
fn closes_fence(line: &str, (marker, len): (char, usize)) -> bool {
    let line = line.trim_end();
    line.chars().count() >= len && line.chars().all(|c| c == marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("Hello, World! 2024"), "hello-world-2024");
        assert_eq!(normalize_id("  --Leading and trailing--  "), "leading-and-trailing");
        assert_eq!(normalize_id("C++ & Rust: a_b"), "c-rust-a-b");
        assert_eq!(normalize_id("!!!"), "");
        assert_eq!(normalize_id("Ünïcode Títle"), "n-code-t-tle");
    }

    #[test]
    fn test_normalize_idempotent() {
        for text in [
            "Hello, World! 2024",
            "Zero-Trust --- Architecture",
            "  spaced   out  ",
            "Ünïcode Títle",
            "already-normal",
            "",
        ] {
            let once = normalize_id(text);
            assert_eq!(normalize_id(&once), once, "input: {:?}", text);
        }
    }

    #[test]
    fn test_extract_toc() {
        let body = "# Intro\n\nText\n\n## Getting Started  \n### Step 1: Install\n###### Deep\n";
        let toc = extract_toc(body);
        let flat: Vec<_> = toc
            .iter()
            .map(|e| (e.level, e.title.as_str(), e.id.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                (1, "Intro", "intro"),
                (2, "Getting Started", "getting-started"),
                (3, "Step 1: Install", "step-1-install"),
                (6, "Deep", "deep"),
            ]
        );
    }

    #[test]
    fn test_not_headings() {
        let body = "#NoSpace\n####### Seven\n   # Indented\ntext # inline\n#\n";
        assert!(extract_toc(body).is_empty());
    }

    #[test]
    fn test_duplicate_ids_kept() {
        let toc = extract_toc("## Setup\ntext\n## Setup!\n");
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].id, "setup");
        assert_eq!(toc[1].id, "setup");
    }

    #[test]
    fn test_skips_fenced_code() {
        let body = "# Real\n```bash\n# install deps\nnpm ci\n```\n~~~\n## also code\n~~~\n## After\n";
        let titles: Vec<_> = extract_toc(body).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Real", "After"]);
    }

    #[test]
    fn test_crlf_headings() {
        let toc = extract_toc("# Title\r\n## Sub\r\n");
        assert_eq!(toc[0].title, "Title");
        assert_eq!(toc[1].id, "sub");
    }

    #[test]
    fn test_info_string_does_not_close_fence() {
        let toc = extract_toc("# Real\n```\n```rust\n# inside code\n```\n");
        let titles: Vec<_> = toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Real"]);
    }

    #[test]
    fn test_longer_fence_needs_long_close() {
        let toc = extract_toc("````md\n```\n# Quoted\n````\n## After\n");
        let titles: Vec<_> = toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["After"]);
    }
}
