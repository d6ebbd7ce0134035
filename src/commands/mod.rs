//! CLI subcommands

pub mod feed;
pub mod list;
pub mod new;
pub mod show;
