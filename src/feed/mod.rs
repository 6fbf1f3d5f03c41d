//! Fetching the bot's comments feed.
//!
//! The feed is a single reddit listing; the core only ever sees the
//! submissions that belong to the configured community.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::FeedConfig;

/// One comment of the bot's feed, as the core sees it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    /// Raw escaped HTML containing the track table.
    #[serde(default)]
    pub body_html: String,
    /// Title of the submission the comment was posted under.
    #[serde(default)]
    pub link_title: String,
    #[serde(default)]
    pub subreddit_name_prefixed: String,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
    data: Submission,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("cannot decode feed response: {0}")]
    Decode(#[from] std::io::Error),
}

/// Source of submissions. One fetch per resolver invocation; the catalog
/// never fetches on a cache hit.
pub trait SubmissionSource {
    fn fetch(&self) -> Result<Vec<Submission>, FeedError>;
}

/// Blocking reddit comments-feed client.
pub struct RedditFeed {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
    community: String,
}

impl RedditFeed {
    pub fn new(cfg: &FeedConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(30))
            .build();
        Self {
            agent,
            url: cfg.url.clone(),
            user_agent: cfg.user_agent.clone(),
            community: cfg.community.clone(),
        }
    }
}

impl SubmissionSource for RedditFeed {
    fn fetch(&self) -> Result<Vec<Submission>, FeedError> {
        log::debug!("fetching {}", self.url);
        let listing: Listing = self
            .agent
            .get(&self.url)
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(Box::new)?
            .into_json()?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .filter(|s| s.subreddit_name_prefixed == self.community)
            .collect())
    }
}
