use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub paths: Paths,
    pub pipeline: Pipeline,
}

impl Config {
    /// Reads the TOML config, falling back to built-in defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            log::warn!("no config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "failed to parse config TOML")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub user_agent: String,
    /// Prefixed community name the feed is filtered to.
    pub community: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://www.reddit.com/user/l2tbot/comments.json?limit=1000".into(),
            user_agent: "l2tdl".into(),
            community: "r/listentothis".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Root under which per-month song directories live.
    pub songs_dir: PathBuf,
    pub cache_file: PathBuf,
    /// Canonical genre list, one spelling per line. Only read when genre
    /// unification is enabled.
    pub genres_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            songs_dir: "songs".into(),
            cache_file: "cache.json".into(),
            genres_file: "genres".into(),
        }
    }
}

/// Per-run pipeline toggles, threaded explicitly into the catalog and the
/// download driver.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    pub use_cache: bool,
    pub unify_genres: bool,
    pub write_tags: bool,
    pub reload_songs: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            use_cache: true,
            unify_genres: false,
            write_tags: true,
            reload_songs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
[feed]
url = "https://example.com/comments.json"
user_agent = "archiver-test"
community = "r/listentothis"

[paths]
songs_dir = "/data/songs"
cache_file = "/data/cache.json"
genres_file = "/data/genres"

[pipeline]
use_cache = false
unify_genres = true
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.feed.url, "https://example.com/comments.json");
        assert_eq!(cfg.paths.songs_dir, PathBuf::from("/data/songs"));
        assert!(!cfg.pipeline.use_cache);
        assert!(cfg.pipeline.unify_genres);
        // untouched toggles keep their defaults
        assert!(cfg.pipeline.write_tags);
        assert!(!cfg.pipeline.reload_songs);

        Ok(())
    }

    #[test]
    fn empty_config_gives_defaults() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("")?;

        assert_eq!(cfg.feed.community, "r/listentothis");
        assert_eq!(cfg.paths.cache_file, PathBuf::from("cache.json"));
        assert!(cfg.pipeline.use_cache);

        Ok(())
    }

    #[test]
    fn load_without_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = Config::load(&dir.path().join("config.toml"))?;

        assert_eq!(cfg.feed.community, "r/listentothis");
        assert_eq!(cfg.paths.songs_dir, PathBuf::from("songs"));
        assert!(cfg.pipeline.write_tags);

        Ok(())
    }
}
