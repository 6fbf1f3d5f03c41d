//! Per-track media retrieval, transcoding and reporting.
//!
//! Thin glue around `yt-dlp` and `ffmpeg`. A failure on one track marks
//! it missing and the batch continues; nothing here aborts a month.

pub mod tags;

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, bail};

use crate::{
    config::Pipeline,
    domain::track::Track,
};

/// On-disk filename for a track, with characters that are unsafe in
/// filenames removed or substituted.
pub fn file_name(track: &Track) -> String {
    let raw = format!("{} - {}.mp3", track.artist, track.title);
    raw.chars()
        .filter_map(|c| match c {
            '/' | '?' | '*' => None,
            '"' => Some('\''),
            ':' => Some(';'),
            other => Some(other),
        })
        .collect()
}

/// `<songs_dir>/<month>/<artist> - <title>.mp3`
pub fn target_path(songs_dir: &Path, track: &Track) -> PathBuf {
    songs_dir.join(&track.month).join(file_name(track))
}

pub fn song_exists(songs_dir: &Path, track: &Track) -> bool {
    target_path(songs_dir, track).exists()
}

/// Writes the per-month missing-songs report, one `artist - title` line
/// per track. Returns the report path.
pub fn write_missing_report<'a>(
    dir: &Path,
    month: &str,
    missing: impl IntoIterator<Item = &'a Track>,
) -> std::io::Result<PathBuf> {
    let path = dir.join(format!("missingSongs{month}.txt"));
    let mut contents = String::new();
    for track in missing {
        contents.push_str(&format!("{} - {}\n", track.artist, track.title));
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Sequential download driver over one month's catalog.
pub struct Downloader {
    songs_dir: PathBuf,
    community: String,
    pipeline: Pipeline,
}

impl Downloader {
    pub fn new(songs_dir: impl AsRef<Path>, community: &str, pipeline: Pipeline) -> Self {
        Self {
            songs_dir: songs_dir.as_ref().to_path_buf(),
            community: community.to_string(),
            pipeline,
        }
    }

    /// Downloads every track of the month in rank order, then writes the
    /// missing-songs report for the ones that failed.
    pub fn download_month(&self, month: &str, tracks: &[Track]) -> anyhow::Result<()> {
        fs::create_dir_all(self.songs_dir.join(month))
            .with_context(|| format!("cannot create month directory for {month}"))?;

        let missing: Vec<&Track> = tracks
            .iter()
            .filter(|track| !self.download(track))
            .collect();

        if !missing.is_empty() {
            log::info!("{month}: {} songs missing", missing.len());
        }
        write_missing_report(&self.songs_dir, month, missing)
            .map(|_| ())
            .with_context(|| format!("cannot write missing-songs report for {month}"))
    }

    /// Existence-only pass over the month's catalog; writes the same
    /// report without downloading anything.
    pub fn check_missing(&self, month: &str, tracks: &[Track]) -> anyhow::Result<Vec<Track>> {
        let missing: Vec<Track> = tracks
            .iter()
            .filter(|track| !song_exists(&self.songs_dir, track))
            .cloned()
            .collect();

        for track in &missing {
            log::info!("missing: {} - {}", track.artist, track.title);
        }
        write_missing_report(&self.songs_dir, month, &missing)
            .with_context(|| format!("cannot write missing-songs report for {month}"))?;
        Ok(missing)
    }

    /// Re-writes ID3 tags for every track of the month that exists on
    /// disk. Returns how many files were touched.
    pub fn retag_month(&self, tracks: &[Track]) -> usize {
        let mut count = 0;
        for track in tracks {
            let path = target_path(&self.songs_dir, track);
            if !path.exists() {
                continue;
            }
            match tags::write_tags(&path, track, &self.community) {
                Ok(()) => count += 1,
                Err(e) => log::warn!("tagging {} failed: {e}", path.display()),
            }
        }
        count
    }

    /// One track, blocking to completion. Returns false when the track
    /// ends up missing; failures never propagate past this boundary.
    fn download(&self, track: &Track) -> bool {
        let target = target_path(&self.songs_dir, track);
        if !self.pipeline.reload_songs && target.exists() {
            log::debug!("skipping existing {}", target.display());
            return true;
        }

        log::info!("loading {} - {} from {}", track.artist, track.title, track.url);
        match self.fetch_and_transcode(track, &target) {
            Ok(()) => {
                if self.pipeline.write_tags {
                    if let Err(e) = tags::write_tags(&target, track, &self.community) {
                        log::warn!("tagging {} failed: {e}", target.display());
                    }
                }
                true
            }
            Err(e) => {
                log::warn!("download of {} - {} failed: {e:#}", track.artist, track.title);
                false
            }
        }
    }

    fn fetch_and_transcode(&self, track: &Track, target: &Path) -> anyhow::Result<()> {
        let raw = target.with_extension("dl");
        let transcoded = target.with_extension("dl.mp3");

        let status = Command::new("yt-dlp")
            .args(["--no-playlist", "-f", "bestaudio/best", "-o"])
            .arg(&raw)
            .arg(&track.url)
            .status()
            .context("failed to run yt-dlp")?;
        if !status.success() {
            let _ = fs::remove_file(&raw);
            bail!("yt-dlp exited with {status}");
        }

        let status = Command::new("ffmpeg")
            .args(["-v", "0", "-y", "-i"])
            .arg(&raw)
            .args(["-vn", "-acodec", "libmp3lame", "-b:a", "192k"])
            .arg(&transcoded)
            .status()
            .context("failed to run ffmpeg")?;
        let _ = fs::remove_file(&raw);
        if !status.success() {
            let _ = fs::remove_file(&transcoded);
            bail!("ffmpeg exited with {status}");
        }

        fs::rename(&transcoded, target).context("cannot move transcoded file into place")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn track(artist: &str, title: &str, month: &str) -> Track {
        Track {
            url: "https://example.com/v".into(),
            artist: artist.into(),
            title: title.into(),
            genre: vec![],
            year: String::new(),
            month: month.into(),
        }
    }

    #[test]
    fn file_name_strips_forbidden_characters() {
        let t = track("AC/DC", "Thunderstruck", "jan20");
        assert_eq!(file_name(&t), "ACDC - Thunderstruck.mp3");

        let t = track("Who?", "\"Quote\": a *story*", "jan20");
        assert_eq!(file_name(&t), "Who - 'Quote'; a story.mp3");
    }

    #[test]
    fn target_path_is_month_scoped() {
        let t = track("AC/DC", "Thunderstruck", "jan20");
        assert_eq!(
            target_path(Path::new(""), &t),
            PathBuf::from("jan20/ACDC - Thunderstruck.mp3")
        );
        assert_eq!(
            target_path(Path::new("songs"), &t),
            PathBuf::from("songs/jan20/ACDC - Thunderstruck.mp3")
        );
    }

    #[test]
    fn check_missing_reports_only_absent_tracks() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let songs_dir = dir.path();

        let present = track("Here", "Song", "jan20");
        let absent = track("Gone", "Song", "jan20");

        fs::create_dir_all(songs_dir.join("jan20"))?;
        fs::write(target_path(songs_dir, &present), b"mp3")?;

        let downloader = Downloader::new(songs_dir, "r/listentothis", Pipeline::default());
        let missing =
            downloader.check_missing("jan20", &[present.clone(), absent.clone()])?;

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].artist, "Gone");

        let report = fs::read_to_string(songs_dir.join("missingSongsjan20.txt"))?;
        assert_eq!(report, "Gone - Song\n");

        Ok(())
    }

    #[test]
    fn missing_report_is_empty_when_nothing_is_missing() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let none: Vec<Track> = Vec::new();
        let path = write_missing_report(dir.path(), "feb20", &none)?;
        assert_eq!(fs::read_to_string(path)?, "");
        Ok(())
    }
}
