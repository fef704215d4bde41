//! CLI entry point for devlog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devlog")]
#[command(version)]
#[command(about = "A static site generator for a categorised technical blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category of the new post
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Series id the post belongs to
        #[arg(short, long)]
        series: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (posts, categories, sections, series)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devlog=debug,info"
    } else {
        "devlog=info"
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

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            devlog::commands::init::init_site(&target_dir)?;
            println!("Initialized devlog site in {:?}", target_dir);
        }

        Commands::New {
            title,
            category,
            series,
        } => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = blog.new_post(&title, category.as_deref(), series.as_deref())?;
            println!("Created {:?}", path);
        }

        Commands::Generate { watch } => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let summary = blog.generate()?;
            println!(
                "Generated {} posts and {} listing pages",
                summary.posts, summary.listing_pages
            );
            if summary.skipped_posts > 0 {
                println!("Skipped {} posts whose URL was taken", summary.skipped_posts);
            }

            if watch {
                tokio::task::spawn_blocking(move || devlog::commands::generate::watch(&blog))
                    .await??;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = devlog::Blog::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            blog.generate()?;

            devlog::server::start(&blog, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let blog = devlog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = devlog::Blog::new(&base_dir)?;
            devlog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Version => {
            println!("devlog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
