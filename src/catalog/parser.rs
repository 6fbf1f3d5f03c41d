//! Turns one raw comment body into track records.
//!
//! Comment bodies arrive HTML-escaped twice (the upstream feed escapes an
//! already-escaped body), so the text is unescaped twice before scanning.
//! Rows that do not match the expected table shape are skipped silently.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::track::Track;

/// One table row: link, `artist - title`, then zero or more bracketed or
/// parenthesized annotations up to the closing anchor tag. Title capture
/// stops at the first `[` or `(`, so a title containing a literal bracket
/// loses its tail to the annotations. Known limitation of the source
/// format.
static TRACK_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<tr>\n<td align="left"><a href="(?P<url>[^"]+)">(?P<artist>.+?) (?:--|-) (?P<title>[^\[(]+?)(?P<annotations>(?: ?(?:\[[^\]]*\]|\([^)]*\)))*)\s*</a>"#,
    )
    .unwrap()
});

// each bracket kind closes with its own closer, so parentheses are legal
// inside a square-bracketed annotation and vice versa
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]|\(([^)]*)\)").unwrap());

/// One bracketed or parenthesized annotation after the track title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Year(String),
    Genres(Vec<String>),
}

/// A year iff the content is nothing but digits and spaces; anything else
/// is a genre list, split on `,` or `/` with each piece trimmed.
pub fn classify_annotation(raw: &str) -> Annotation {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        Annotation::Year(trimmed.to_string())
    } else {
        Annotation::Genres(
            raw.split([',', '/'])
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Decodes the HTML entities the feed emits in comment bodies. Unknown
/// entities and bare ampersands pass through untouched, which makes the
/// function the identity on already-decoded text.
pub fn unescape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        // longest recognized entity body is 8 chars (e.g. "#x1F3B5")
        match rest[1..].find(';') {
            Some(end) if end <= 8 => {
                if let Some(decoded) = decode_entity(&rest[1..end + 1]) {
                    out.push(decoded);
                    rest = &rest[end + 2..];
                } else {
                    out.push('&');
                    rest = &rest[1..];
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(body: &str) -> Option<char> {
    match body {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" => return Some('\''),
        "nbsp" => return Some(' '),
        _ => {}
    }
    let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code)
}

/// Parses one raw comment body into the track records it contains, each
/// tagged with the supplied month key. Source order is preserved.
pub fn parse_comment(body_html: &str, month: &str) -> Vec<Track> {
    let decoded = unescape_html(&unescape_html(body_html));
    TRACK_ROW
        .captures_iter(&decoded)
        .filter_map(|caps| track_from_captures(&caps, month))
        .collect()
}

fn track_from_captures(caps: &Captures, month: &str) -> Option<Track> {
    let artist = caps["artist"].trim();
    let title = caps["title"].trim();
    if artist.is_empty() || title.is_empty() {
        return None;
    }

    let mut year = String::new();
    let mut genre = Vec::new();
    for ann in ANNOTATION.captures_iter(&caps["annotations"]) {
        let Some(content) = ann.get(1).or_else(|| ann.get(2)) else {
            continue;
        };
        match classify_annotation(content.as_str()) {
            // a repeated year annotation overwrites; genres accumulate
            Annotation::Year(y) => year = y,
            Annotation::Genres(g) => genre.extend(g),
        }
    }

    Some(Track {
        url: caps["url"].to_string(),
        artist: artist.to_string(),
        title: title.to_string(),
        genre,
        year,
        month: month.to_string(),
    })
}
