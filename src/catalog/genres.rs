//! Normalizes near-duplicate genre spellings against a canonical list.

use std::path::Path;

use crate::domain::track::Track;

/// Loads the canonical genre list, one spelling per line.
pub fn load_canonical(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(std::fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Spacing, hyphens and case are not significant when comparing spellings.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

fn same_genre(canonical: &str, token: &str) -> bool {
    let (Some(a), Some(b)) = (canonical.chars().next(), token.chars().next()) else {
        return false;
    };
    if !a.to_lowercase().eq(b.to_lowercase()) {
        return false;
    }
    squash(canonical) == squash(token)
}

/// Replaces each genre token by its canonical spelling where a confident
/// match exists. Tokens already in the list verbatim are never altered;
/// when several canonical entries match, the first in list order wins.
/// Records are rebuilt only when at least one token changed.
pub fn unify(tracks: Vec<Track>, canonical: &[String]) -> Vec<Track> {
    tracks
        .into_iter()
        .map(|track| unify_track(track, canonical))
        .collect()
}

fn unify_track(track: Track, canonical: &[String]) -> Track {
    let mut changed = false;
    let unified: Vec<String> = track
        .genre
        .iter()
        .map(|token| {
            if canonical.iter().any(|c| c == token) {
                return token.clone();
            }
            match canonical.iter().find(|c| same_genre(c, token)) {
                Some(found) => {
                    log::info!("changing genre {token:?} to {found:?}");
                    changed = true;
                    found.clone()
                }
                None => token.clone(),
            }
        })
        .collect();

    if changed {
        track.with_genres(unified)
    } else {
        track
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Vec<String> {
        ["Hip-Hop", "Hiphop", "Indie Rock", "Post Rock", "Folk"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn track(genres: &[&str]) -> Track {
        Track {
            url: "u".into(),
            artist: "A".into(),
            title: "T".into(),
            genre: genres.iter().map(|s| s.to_string()).collect(),
            year: String::new(),
            month: "jan20".into(),
        }
    }

    #[test]
    fn verbatim_member_is_never_altered() {
        // "Hiphop" is itself canonical, so it must not become "Hip-Hop"
        // even though both squash to the same form.
        let out = unify(vec![track(&["Hiphop"])], &canonical());
        assert_eq!(out[0].genre, vec!["Hiphop".to_string()]);
    }

    #[test]
    fn near_duplicates_adopt_first_canonical_match() {
        let out = unify(vec![track(&["hip hop", "indierock", "post-rock"])], &canonical());
        assert_eq!(
            out[0].genre,
            vec![
                "Hip-Hop".to_string(),
                "Indie Rock".to_string(),
                "Post Rock".to_string()
            ]
        );
    }

    #[test]
    fn first_letter_must_match() {
        // squashed forms are equal but the first characters differ
        let canonical = vec!["Electro".to_string()];
        let out = unify(vec![track(&["-electro"])], &canonical);
        assert_eq!(out[0].genre, vec!["-electro".to_string()]);
    }

    #[test]
    fn unmatched_tokens_are_left_unchanged() {
        let out = unify(vec![track(&["vaporwave"])], &canonical());
        assert_eq!(out[0].genre, vec!["vaporwave".to_string()]);
    }

    #[test]
    fn unification_is_deterministic() {
        let a = unify(vec![track(&["hip hop"])], &canonical());
        let b = unify(vec![track(&["hip hop"])], &canonical());
        assert_eq!(a, b);
    }

    #[test]
    fn untouched_record_is_identical() {
        let original = track(&["Folk"]);
        let out = unify(vec![original.clone()], &canonical());
        assert_eq!(out[0], original);
    }

    #[test]
    fn track_order_survives_unification() {
        let tracks = vec![track(&["folk"]), track(&[]), track(&["hip hop"])];
        let titles_before: Vec<String> = tracks.iter().map(|t| t.url.clone()).collect();
        let out = unify(tracks, &canonical());
        let titles_after: Vec<String> = out.iter().map(|t| t.url.clone()).collect();
        assert_eq!(titles_before, titles_after);
    }
}
