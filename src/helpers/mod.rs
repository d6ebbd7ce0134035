//! Helper functions shared by the loader, the feed and the server
//!
//! Date parsing for `pubDate` values and XML text handling live here so
//! every consumer formats dates and escapes text the same way.

mod date;
mod xml;

pub use date::*;
pub use xml::*;
