use anyhow::{Context, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use recordshelf::colors::ColorScheme;
use recordshelf::display::display_summary;
use recordshelf::*;
use recordshelf_core::{CatalogClient, CollectionStore, Config, ImageResolver, RetryPolicy};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let colors = ColorScheme::new(!args.no_color);

    let mut config = Config::from_env();
    if let Some(collection) = args.collection {
        config.paths.collection = collection;
    }
    if let Some(images_dir) = args.images_dir {
        config.paths.images_dir = images_dir;
    }
    config.warn_missing_credentials();

    let store = CollectionStore::new(&config.paths.collection);
    let mut document = store
        .load()
        .await
        .with_context(|| format!("Failed to load collection {:?}", store.path()))?;
    if document.albums.is_empty() {
        bail!("No albums found in {:?}", store.path());
    }

    let (summary, dry_run) = match args.command {
        Command::Images(images) => {
            let delay = match images.delay {
                Some(secs) => seconds(secs)?,
                None => config.catalog.delay,
            };
            let run = ImageRun {
                force: images.force,
                delay,
            };
            let resolver = ImageResolver::from_config(&config)?;
            let targets = select_targets(&document.albums, &images.ids, images.limit);

            println!(
                "🎵 Caching images for {} albums into {:?}",
                colors.number(&targets.len().to_string()),
                config.paths.images_dir
            );
            let progress = progress_bar(targets.len())?;
            let summary = import_images(
                &mut document.albums,
                &targets,
                &resolver,
                &run,
                &progress,
                &colors,
            )
            .await;
            progress.finish_and_clear();
            (summary, images.dry_run)
        }
        Command::Tracklists(tracklists) => {
            let run = TracklistRun {
                delay: seconds(tracklists.delay)?,
                retry: RetryPolicy::default(),
            };
            let client = CatalogClient::new(&config.catalog)?;
            let targets = tracklist_targets(&document.albums, tracklists.limit);

            println!(
                "🎵 Fetching tracklists for {} albums",
                colors.number(&targets.len().to_string())
            );
            let progress = progress_bar(targets.len())?;
            let summary = import_tracklists(
                &mut document.albums,
                &targets,
                &client,
                &run,
                &progress,
                &colors,
            )
            .await;
            progress.finish_and_clear();
            (summary, tracklists.dry_run)
        }
    };

    display_summary(&summary, &colors);

    if dry_run {
        println!("{}", colors.skipped("Dry run: collection not written"));
    } else if summary.changed > 0 {
        store
            .save(document)
            .await
            .with_context(|| format!("Failed to write collection {:?}", store.path()))?;
        println!("{} {:?}", colors.success("✅ Wrote"), store.path());
    } else {
        println!("No changes to write");
    }

    Ok(())
}

fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(progress)
}

fn seconds(secs: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| format!("Invalid delay: {}", secs))
}
