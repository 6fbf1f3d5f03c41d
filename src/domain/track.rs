use serde::{Deserialize, Serialize};

/// One entry of a monthly top-50 list.
///
/// Built by the comment parser or by cache deserialization, never edited
/// afterwards. Genre unification produces a new record instead of mutating
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Source location of the audio.
    pub url: String,
    pub artist: String,
    pub title: String,
    /// Ordered genre annotations, possibly empty.
    pub genre: Vec<String>,
    /// 4-digit year, or empty when the source row carried none.
    pub year: String,
    /// Compact month key, e.g. "jan20". Cache partition key and songs
    /// subdirectory name.
    pub month: String,
}

impl Track {
    /// Copy of the record with the genre list replaced.
    pub fn with_genres(&self, genre: Vec<String>) -> Track {
        Track {
            genre,
            ..self.clone()
        }
    }
}
