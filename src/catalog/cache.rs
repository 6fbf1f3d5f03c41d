//! Durable month-keyed store of track records.
//!
//! The whole mapping is serialized on every save; at a few hundred months
//! of ~50 tracks each there is nothing to gain from incremental writes.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{catalog::error::CacheError, domain::track::Track};

pub type MonthMap = BTreeMap<String, Vec<Track>>;

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the persisted mapping. Callers check `exists` first; a file
    /// that is present but unreadable or corrupt is a fatal condition.
    pub fn load(&self) -> Result<MonthMap, CacheError> {
        if !self.exists() {
            return Err(CacheError::Missing(self.path.clone()));
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Serializes the entire mapping, overwriting prior content.
    pub fn save(&self, data: &MonthMap) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        log::debug!("saved {} months to {}", data.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn track(artist: &str, title: &str, genre: &[&str], year: &str, month: &str) -> Track {
        Track {
            url: format!("https://example.com/{artist}"),
            artist: artist.into(),
            title: title.into(),
            genre: genre.iter().map(|s| s.to_string()).collect(),
            year: year.into(),
            month: month.into(),
        }
    }

    #[test]
    fn save_then_load_round_trips_exactly() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = CacheStore::new(dir.path().join("cache.json"));

        let mut data = MonthMap::new();
        data.insert(
            "jan20".into(),
            vec![
                track("B Artist", "Second", &["rock", "pop"], "2019", "jan20"),
                // empty year and empty genre list must survive the trip
                track("A Artist", "First", &[], "", "jan20"),
            ],
        );
        data.insert(
            "feb20".into(),
            vec![track("C", "Third", &["folk"], "2020", "feb20")],
        );

        store.save(&data)?;
        let loaded = store.load()?;

        assert_eq!(loaded, data);
        // per-month order is positional, not sorted
        assert_eq!(loaded["jan20"][0].title, "Second");
        assert_eq!(loaded["jan20"][1].title, "First");

        Ok(())
    }

    #[test]
    fn load_without_file_reports_missing() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache.json"));

        assert!(!store.exists());
        assert!(matches!(store.load(), Err(CacheError::Missing(_))));
    }

    #[test]
    fn corrupt_file_is_a_fatal_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json")?;

        let store = CacheStore::new(&path);
        assert!(matches!(store.load(), Err(CacheError::Corrupt(_))));

        Ok(())
    }

    #[test]
    fn save_overwrites_prior_content() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = CacheStore::new(dir.path().join("cache.json"));

        let mut first = MonthMap::new();
        first.insert("jan20".into(), vec![track("A", "T", &[], "", "jan20")]);
        store.save(&first)?;

        let mut second = MonthMap::new();
        second.insert("feb20".into(), vec![track("B", "U", &[], "", "feb20")]);
        store.save(&second)?;

        assert_eq!(store.load()?, second);
        Ok(())
    }
}
