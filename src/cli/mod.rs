use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{catalog::Catalog, config::Config, download::Downloader, feed::RedditFeed};

#[derive(Parser)]
#[command(name = "l2tdl")]
#[command(version = "0.1")]
#[command(about = "Archiver for the monthly r/listentothis top-50 lists")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Month key to operate on, e.g. jan20. Omit to cover every month.
    #[arg(short, long)]
    pub month: Option<String>,

    /// Bypass the cache and always resolve from the feed
    #[arg(long)]
    pub disable_cache: bool,

    /// Normalize genre names against the canonical list
    #[arg(long)]
    pub unify_genres: bool,

    /// Re-download songs that already exist on disk
    #[arg(long)]
    pub reload: bool,

    /// Skip the tag-writing step after download
    #[arg(long)]
    pub skip_tags: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the month's tracks (every cached month when -m is omitted)
    Download,
    /// Report which tracks of the catalog are not on disk yet
    CheckMissing,
    /// Re-write ID3 tags for tracks already on disk
    Retag,
    /// Refresh the local cache from the feed without downloading
    UpdateCache,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    let mut cfg = Config::load(&cli.config)?;
    cfg.pipeline.use_cache &= !cli.disable_cache;
    cfg.pipeline.unify_genres |= cli.unify_genres;
    cfg.pipeline.reload_songs |= cli.reload;
    cfg.pipeline.write_tags &= !cli.skip_tags;

    let catalog = Catalog::new(RedditFeed::new(&cfg.feed), &cfg.paths, cfg.pipeline);
    let downloader = Downloader::new(&cfg.paths.songs_dir, &cfg.feed.community, cfg.pipeline);

    match &cli.command {
        Commands::Download => match &cli.month {
            Some(month) => {
                let Some(tracks) = catalog.get_song_list(month)? else {
                    println!("{month} not found");
                    return Ok(());
                };
                downloader.download_month(month, &tracks)?;
            }
            None => {
                let months = catalog.refresh_cache()?;
                for (month, tracks) in &months {
                    downloader.download_month(month, tracks)?;
                }
            }
        },

        Commands::CheckMissing => {
            for month in months_in_scope(&cli.month, &cfg.paths.songs_dir)? {
                let Some(tracks) = catalog.get_song_list(&month)? else {
                    println!("{month} not found");
                    continue;
                };
                let missing = downloader.check_missing(&month, &tracks)?;
                println!("{month}: {} songs missing", missing.len());
            }
        }

        Commands::Retag => {
            for month in months_in_scope(&cli.month, &cfg.paths.songs_dir)? {
                let Some(tracks) = catalog.get_song_list(&month)? else {
                    println!("{month} not found");
                    continue;
                };
                let count = downloader.retag_month(&tracks);
                println!("{month}: re-tagged {count} songs");
            }
        }

        Commands::UpdateCache => match &cli.month {
            Some(month) => {
                let found = catalog.get_song_list(month)?.is_some();
                println!("{month}: {}", if found { "cached" } else { "not found" });
            }
            None => {
                let months = catalog.refresh_cache()?;
                println!("cached {} months", months.len());
            }
        },
    }

    Ok(())
}

/// The requested month, or every month directory under the songs dir.
fn months_in_scope(month: &Option<String>, songs_dir: &Path) -> anyhow::Result<Vec<String>> {
    if let Some(m) = month {
        return Ok(vec![m.clone()]);
    }
    let mut months = Vec::new();
    let entries = fs::read_dir(songs_dir)
        .with_context(|| format!("cannot list {}", songs_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            months.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    months.sort();
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_month_wins_over_directory_scan() -> anyhow::Result<()> {
        let months = months_in_scope(&Some("jan20".to_string()), Path::new("/nonexistent"))?;
        assert_eq!(months, vec!["jan20".to_string()]);
        Ok(())
    }

    #[test]
    fn directory_scan_lists_month_dirs_sorted() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("jan20"))?;
        fs::create_dir(dir.path().join("dec19"))?;
        fs::write(dir.path().join("missingSongsjan20.txt"), "")?;

        let months = months_in_scope(&None, dir.path())?;
        assert_eq!(months, vec!["dec19".to_string(), "jan20".to_string()]);
        Ok(())
    }
}
