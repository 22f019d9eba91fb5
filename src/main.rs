//! Command line interface: list classes, search feeds, render posts and
//! export whole classes from a forum archive.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use forum_digest::config::Settings;
use forum_digest::{ArchiveClient, FeedQuery, Session};

#[derive(Parser)]
#[command(
    name = "forum-digest",
    version,
    about = "Render forum posts and feeds as readable text"
)]
struct Cli {
    /// Path to the `.env` configuration file.
    #[arg(long, default_value = ".env")]
    env: String,
    /// Archive directory, overriding `FORUM_ARCHIVE_ROOT`.
    #[arg(long)]
    archive: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active enrolled classes.
    Classes,
    /// Select a class and show its folders.
    Folders { network_id: String },
    /// Search by keyword, filter by folder, or both. No arguments lists recent posts.
    Search {
        /// Class to search; defaults to `FORUM_NETWORK`.
        #[arg(long)]
        network: Option<String>,
        /// Keywords; every one must appear in a result.
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        folder: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Render one post with its answers and follow-ups.
    Post {
        #[arg(long)]
        network: Option<String>,
        nr: u64,
    },
    /// Render every archived post of a class into `<dest>/<nr>.md`.
    Export {
        #[arg(long)]
        network: Option<String>,
        dest: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env(&cli.env, cli.archive.as_deref())?;
    let mut session = Session::new(ArchiveClient::new(settings.archive_root.clone()));

    match cli.command {
        Commands::Classes => println!("{}", session.list_classes()?),
        Commands::Folders { network_id } => println!("{}", session.set_class(&network_id)?),
        Commands::Search {
            network,
            query,
            folder,
            limit,
        } => {
            select_class(&mut session, network.or(settings.network.clone()))?;
            let query = FeedQuery {
                query,
                folder,
                limit: limit.unwrap_or(settings.search_limit),
            };
            println!("{}", session.search_posts(&query)?);
        }
        Commands::Post { network, nr } => {
            select_class(&mut session, network.or(settings.network.clone()))?;
            println!("{}", session.get_post(nr)?);
        }
        Commands::Export { network, dest } => {
            select_class(&mut session, network.or(settings.network.clone()))?;
            export(&session, &dest)?;
        }
    }
    Ok(())
}

/// Select `network` if one was given. Without one the session stays
/// unselected and post operations report that a class is required.
fn select_class(session: &mut Session<ArchiveClient>, network: Option<String>) -> anyhow::Result<()> {
    if let Some(network) = network {
        session.set_class(&network)?;
    }
    Ok(())
}

fn export(session: &Session<ArchiveClient>, dest: &Path) -> anyhow::Result<()> {
    let network = session.network()?;
    fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;

    let numbers = session.client().post_numbers(network)?;
    for nr in &numbers {
        let document = session.get_post(*nr)?;
        let path = dest.join(format!("{nr}.md"));
        info!(nr, path = %path.display(), "writing post");
        fs::write(&path, format!("{document}\n"))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    println!("Exported {} post(s) to {}", numbers.len(), dest.display());
    Ok(())
}
