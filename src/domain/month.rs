//! Month key helpers.
//!
//! A month key is the compact form used everywhere as a partition key:
//! an abbreviated lowercase month name followed by a 2-digit year, e.g.
//! "jan20". The bot only posts 21st-century lists, so expansion fixes the
//! century at 20xx.

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Splits a key like "jan20" into its name part and 2-digit year.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    if key.len() < 3 {
        return None;
    }
    let (name, yy) = key.split_at(key.len() - 2);
    if name.is_empty() || !yy.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((name, yy))
}

/// Expands "jan20" to ("January", "2020").
///
/// The name part needs at least three letters so that abbreviations stay
/// unambiguous ("ju" could be June or July).
pub fn expand_key(key: &str) -> Option<(&'static str, String)> {
    let (name, yy) = split_key(key)?;
    if name.len() < 3 {
        return None;
    }
    let lower = name.to_lowercase();
    let full = MONTH_NAMES
        .iter()
        .find(|m| m.to_lowercase().starts_with(&lower))
        .copied()?;
    Some((full, format!("20{yy}")))
}

/// Builds a compact key from the `<MonthName> <YYYY>` token of a
/// submission title. Returns None when the name is not a month.
pub fn key_from_title_parts(name: &str, yy: &str) -> Option<String> {
    let lower = name.to_lowercase();
    MONTH_NAMES.iter().find(|m| m.to_lowercase() == lower)?;
    Some(format!("{}{}", &lower[..3], yy))
}

/// Album string written into the tags of every track of one month,
/// e.g. "Best of jan 2020 on /r/listentothis".
pub fn album_title(key: &str, community: &str) -> String {
    match split_key(key) {
        Some((name, yy)) => format!("Best of {name} 20{yy} on /{community}"),
        None => format!("Best of {key} on /{community}"),
    }
}
