//! CLI entry point for postkit

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postkit")]
#[command(version)]
#[command(about = "Load, query and publish markdown blog posts", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, tags or slugs
    List {
        /// Type of content to list (post, tag, slug)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts with this tag (case-insensitive)
        #[arg(short, long)]
        tag: Option<String>,

        /// Only posts whose title, description or tags contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print one post as JSON, including its table of contents
    Show {
        /// Slug of the post (file name without .md)
        slug: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Write the RSS feed into the public directory
    Feed,

    /// Serve posts as JSON with live reload
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Disable file watching
        #[arg(long)]
        r#static: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postkit=debug,info"
    } else {
        "postkit=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = postkit::Site::new(&base_dir)?;

    match cli.command {
        Commands::List {
            r#type,
            tag,
            search,
        } => {
            postkit::commands::list::run(&site, &r#type, tag.as_deref(), search.as_deref())?;
        }

        Commands::Show { slug } => {
            postkit::commands::show::run(&site, &slug)?;
        }

        Commands::New { title, tags } => {
            tracing::info!("Creating new post with title: {}", title);
            postkit::commands::new::run(&site, &title, tags.as_deref())?;
        }

        Commands::Feed => {
            postkit::commands::feed::run(&site)?;
        }

        Commands::Serve { port, ip, r#static } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            postkit::server::start(&site, &ip, port, !r#static).await?;
        }
    }

    Ok(())
}
