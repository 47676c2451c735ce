//! CLI entry point for vellum

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "vellum")]
#[command(version)]
#[command(about = "A small blog server that composes pages from template fragments", long_about = None)]
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
    /// Initialize a new vellum site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every template fragment parses
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "vellum=debug,info"
    } else {
        "vellum=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine site directory
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
            tracing::info!("Initializing vellum site in {:?}", target_dir);
            vellum::commands::init::init_site(&target_dir)?;
            println!("Initialized empty vellum site in {:?}", target_dir);
        }

        Commands::Serve { port, ip, open } => {
            let app = vellum::Vellum::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            vellum::server::start(&app, &ip, port, open).await?;
        }

        Commands::List { r#type, json } => {
            let app = vellum::Vellum::new(&base_dir)?;
            vellum::commands::list::run(&app, &r#type, json)?;
        }

        Commands::Check => {
            let app = vellum::Vellum::new(&base_dir)?;
            vellum::commands::check::run(&app)?;
        }

        Commands::Version => {
            println!("vellum version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
