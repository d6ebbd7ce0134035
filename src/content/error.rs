//! Content loading errors

use crate::source::SourceError;

/// Errors that abort a whole load.
///
/// Problems confined to a single file (missing header, bad date, missing
/// fields) never show up here; they degrade that file and are logged.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("duplicate slug `{slug}` produced by {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}
