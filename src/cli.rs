use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cinebrowse::models::{MediaKind, TmdbId};

#[derive(Parser)]
#[command(name = "cinebrowse")]
#[command(author, version, about = "Browse movie and TV catalogs from the terminal")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through a list view, resuming where the last visit left off
    Browse {
        /// Address of the view, e.g. /movies, /genres/28 or "/search?q=dune"
        #[arg(default_value = "/movies")]
        route: String,

        /// Number of pages to show
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Ignore saved state and start from the first page
        #[arg(long)]
        fresh: bool,
    },

    /// List genres
    Genres {
        /// TV genres instead of movie genres
        #[arg(long)]
        tv: bool,
    },

    /// Show one title
    Detail {
        /// movie or tv
        kind: MediaKind,

        id: TmdbId,
    },

    /// Run the featured carousel for a while
    Featured {
        /// How long to keep it running
        #[arg(short, long, default_value = "30")]
        seconds: u64,
    },
}
