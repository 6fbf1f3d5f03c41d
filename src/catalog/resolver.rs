//! Locates the comment(s) covering a month among fetched submissions.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    catalog::{cache::MonthMap, parser},
    domain::{month, track::Track},
    feed::Submission,
};

/// Fixed shape of the bot's submission titles, e.g.
/// "Top 50 posts in r/listentothis for January 2020".
static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Top 50 posts .*?for ([A-Za-z]+) (\d\d)(\d\d)").unwrap());

/// Single-month resolution: parses the submissions whose title contains
/// the expanded `<MonthName> <YYYY>` token and returns the first
/// non-empty track list. Not finding the month is non-fatal.
pub fn resolve_month(month_key: &str, submissions: &[Submission]) -> Option<Vec<Track>> {
    let Some((name, year)) = month::expand_key(month_key) else {
        log::warn!("{month_key} is not a valid month key");
        return None;
    };
    let token = format!("{name} {year}");

    let tracks = submissions
        .iter()
        .filter(|s| s.link_title.contains(&token))
        .map(|s| parser::parse_comment(&s.body_html, month_key))
        .find(|tracks| !tracks.is_empty());

    if tracks.is_none() {
        log::warn!("{month_key} not found");
    }
    tracks
}

/// Bulk resolution: derives a month key from every submission title in
/// one pass. Titles that do not match the expected pattern are skipped;
/// the first submission seen for a month wins.
pub fn resolve_all(submissions: &[Submission]) -> MonthMap {
    let mut months = BTreeMap::new();
    for submission in submissions {
        let Some(caps) = TITLE_PATTERN.captures(&submission.link_title) else {
            continue;
        };
        let Some(key) = month::key_from_title_parts(&caps[1], &caps[3]) else {
            continue;
        };
        if months.contains_key(&key) {
            continue;
        }
        months.insert(key.clone(), parser::parse_comment(&submission.body_html, &key));
    }
    months
}
