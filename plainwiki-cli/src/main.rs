use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{history, list, render, revision, save, serve, show};

#[derive(Parser)]
#[command(name = "plainwiki")]
#[command(version, about = "A minimal personal wiki with page history", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Wiki root directory, overrides the configuration file
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the wiki over HTTP
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8000
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Render markup from a file (or stdin) to HTML
    Render {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Print a stored page, rendered as HTML unless --raw is given
    Show {
        title: String,

        /// Print the stored text instead of HTML
        #[arg(long)]
        raw: bool,
    },

    /// Save new content for a page from a file (or stdin)
    Save {
        title: String,

        /// Input file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List stored pages
    List,

    /// Show the change history of a page
    History {
        title: String,

        /// Number of revisions to show, most recent last
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a page as it was after a given revision
    Revision {
        title: String,

        /// Revision number, starting at 1
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config, cli.root)?;

    match cli.command {
        Commands::Serve { bind } => {
            serve::run(config, bind).await?;
        }
        Commands::Render { file } => {
            render::run(file)?;
        }
        Commands::Show { title, raw } => {
            show::run(&config, &title, raw)?;
        }
        Commands::Save { title, file } => {
            save::run(&config, &title, file)?;
        }
        Commands::List => {
            list::run(&config)?;
        }
        Commands::History { title, limit } => {
            history::run(&config, &title, limit)?;
        }
        Commands::Revision { title, index } => {
            revision::run(&config, &title, index)?;
        }
    }

    Ok(())
}
