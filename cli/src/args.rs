use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recordshelf")]
#[command(about = "Cache album artwork and tracklists for a record collection")]
pub struct Args {
    /// Collection document (defaults to COLLECTION_PATH or collection.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub collection: Option<PathBuf>,

    /// Image cache directory (defaults to IMAGES_DIR or images)
    #[arg(long, global = true, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download cover and back images and point records at them
    Images(ImagesArgs),
    /// Fill in missing tracklists
    Tracklists(TracklistsArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImagesArgs {
    /// Process at most N albums (0 = all)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Re-download images even if they are already cached
    #[arg(long)]
    pub force: bool,

    /// Do everything except writing the collection
    #[arg(long)]
    pub dry_run: bool,

    /// Only process these release ids
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub ids: Vec<String>,

    /// Seconds to sleep after each download (defaults to DISCOGS_DELAY_SEC)
    #[arg(long, value_name = "SEC")]
    pub delay: Option<f64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TracklistsArgs {
    /// Process at most N albums (0 = all)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Do everything except writing the collection
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds to sleep between albums
    #[arg(long, value_name = "SEC", default_value = "1.0")]
    pub delay: f64,
}
