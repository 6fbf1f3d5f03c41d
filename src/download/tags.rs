use std::path::Path;

use id3::{Tag, TagLike, Version};

use crate::domain::{month, track::Track};

/// Writes the ID3 tags for a downloaded track. The album string is
/// synthesized from the month key and the community name.
pub fn write_tags(path: &Path, track: &Track, community: &str) -> anyhow::Result<()> {
    log::debug!("tagging {} - {}", track.artist, track.title);

    let mut tag = Tag::new();
    tag.set_title(track.title.as_str());
    tag.set_artist(track.artist.as_str());
    tag.set_album_artist("Various Artists");
    tag.set_album(month::album_title(&track.month, community));
    if let Ok(year) = track.year.trim().parse::<i32>() {
        tag.set_year(year);
    }
    if !track.genre.is_empty() {
        tag.set_genre(track.genre.join("; "));
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}
