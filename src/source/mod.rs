//! Source discovery
//!
//! The loader never touches the filesystem. A [`SourceProvider`] hands it a
//! complete path to text mapping instead; [`FsSource`] reads a directory and
//! [`MemorySource`] serves fixed text, mostly for tests.

use glob::Pattern;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Raw markdown text keyed by source path.
///
/// Ordered by path so every load processes files in the same order.
pub type SourceMap = BTreeMap<String, String>;

/// Errors that stop discovery as a whole.
///
/// A single unreadable file is logged and skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Something that can list post sources
pub trait SourceProvider {
    /// Return the full path to text mapping for every matching file
    fn discover(&self) -> Result<SourceMap, SourceError>;
}

/// Markdown files under a directory whose relative path matches a glob
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    pattern: Pattern,
}

impl FsSource {
    /// Create a source for `pattern` (for example `*.md` or `**/*.md`)
    /// relative to `root`
    pub fn new<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Self, SourceError> {
        let pattern = Pattern::new(pattern).map_err(|source| SourceError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            pattern,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches(&self, relative: &Path) -> bool {
        let relative = relative.to_string_lossy().replace('\\', "/");
        self.pattern.matches_with(
            &relative,
            glob::MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            },
        )
    }
}

impl SourceProvider for FsSource {
    fn discover(&self) -> Result<SourceMap, SourceError> {
        let mut sources = SourceMap::new();

        // A missing posts directory is an empty blog, not an error
        if !self.root.exists() {
            tracing::debug!("Source directory {:?} does not exist", self.root);
            return Ok(sources);
        }

        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(SourceError::Walk {
                        path: self.root.clone(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {:?}: {}", self.root, e);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if !self.matches(relative) {
                continue;
            }

            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", path, e);
                    continue;
                }
            };
            sources.insert(path.to_string_lossy().replace('\\', "/"), text);
        }

        tracing::debug!("Discovered {} source files in {:?}", sources.len(), self.root);
        Ok(sources)
    }
}

/// A fixed set of sources held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: SourceMap,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one file
    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(path.into(), text.into());
        self
    }
}

impl From<SourceMap> for MemorySource {
    fn from(sources: SourceMap) -> Self {
        Self { sources }
    }
}

impl SourceProvider for MemorySource {
    fn discover(&self) -> Result<SourceMap, SourceError> {
        Ok(self.sources.clone())
    }
}
