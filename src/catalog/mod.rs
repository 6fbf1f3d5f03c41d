//! Month-keyed catalog of the bot's top-50 lists.
//!
//! Decides, per month, whether to serve from the cache or resolve from
//! the feed, and persists newly resolved months without discarding the
//! ones already cached.

pub mod cache;
pub mod error;
pub mod genres;
pub mod parser;
pub mod resolver;

use std::path::PathBuf;

use crate::{
    config::{Paths, Pipeline},
    domain::track::Track,
    feed::SubmissionSource,
};
use cache::{CacheStore, MonthMap};
use error::CatalogError;

pub struct Catalog<S> {
    source: S,
    store: CacheStore,
    genres_file: PathBuf,
    pipeline: Pipeline,
}

impl<S: SubmissionSource> Catalog<S> {
    pub fn new(source: S, paths: &Paths, pipeline: Pipeline) -> Self {
        Self {
            source,
            store: CacheStore::new(&paths.cache_file),
            genres_file: paths.genres_file.clone(),
            pipeline,
        }
    }

    /// Track list for one month, cache first.
    ///
    /// Returns `Ok(None)` when the month cannot be found in the feed;
    /// only cache and feed failures are errors.
    pub fn get_song_list(&self, month: &str) -> Result<Option<Vec<Track>>, CatalogError> {
        if !self.pipeline.use_cache {
            return self.resolve_from_feed(month);
        }

        let mut data = if self.store.exists() {
            self.store.load()?
        } else {
            MonthMap::new()
        };

        if let Some(tracks) = data.get(month) {
            if !tracks.is_empty() {
                log::debug!("cache hit for {month}");
                return Ok(Some(tracks.clone()));
            }
        }

        let resolved = self.resolve_from_feed(month)?;
        if let Some(tracks) = &resolved {
            data.insert(month.to_string(), tracks.clone());
            self.store.save(&data)?;
        }
        Ok(resolved)
    }

    /// Resolves every discoverable month in one feed fetch.
    pub fn get_all_song_lists(&self) -> Result<MonthMap, CatalogError> {
        let submissions = self.source.fetch()?;
        let mut months = resolver::resolve_all(&submissions);
        if self.pipeline.unify_genres {
            let canonical = self.load_canonical()?;
            months = months
                .into_iter()
                .map(|(key, tracks)| (key, genres::unify(tracks, &canonical)))
                .collect();
        }
        Ok(months)
    }

    /// Bulk variant that also seeds or refreshes the persisted cache.
    pub fn refresh_cache(&self) -> Result<MonthMap, CatalogError> {
        let months = self.get_all_song_lists()?;
        self.store.save(&months)?;
        Ok(months)
    }

    fn resolve_from_feed(&self, month: &str) -> Result<Option<Vec<Track>>, CatalogError> {
        let submissions = self.source.fetch()?;
        match resolver::resolve_month(month, &submissions) {
            Some(tracks) if self.pipeline.unify_genres => {
                let canonical = self.load_canonical()?;
                Ok(Some(genres::unify(tracks, &canonical)))
            }
            other => Ok(other),
        }
    }

    fn load_canonical(&self) -> Result<Vec<String>, CatalogError> {
        genres::load_canonical(&self.genres_file).map_err(CatalogError::GenreList)
    }
}
