use lazy_static::lazy_static;
use regex::Regex;

use crate::models::NormalizedTitle;

lazy_static! {
    /// Leading language code like "EN - " (at most one is stripped)
    static ref LANG_PREFIX: Regex = Regex::new(r"^[A-Za-z]{2,3}\s*-\s*").unwrap();
    /// Four-digit year in parentheses, anywhere in the title
    static ref YEAR_PAREN: Regex = Regex::new(r"\s*\((\d{4})\)").unwrap();
    /// Season/episode code: S01E01, s1e1, S02 E05
    static ref EPISODE_CODE: Regex = Regex::new(r"(?i)\bS(\d{1,2})\s*E(\d{1,2})").unwrap();
}

/// Strip decorations from a raw display name.
///
/// Fixed precedence: language prefix, then parenthesized year, then episode
/// code. The episode code and everything after it are dropped from the
/// title. Pure and deterministic.
pub fn normalize_title(name: &str) -> NormalizedTitle {
    let mut title = LANG_PREFIX.replace(name, "").trim().to_string();

    let mut year: Option<u16> = None;
    let year_match = YEAR_PAREN.captures(&title).and_then(|caps| {
        Some((caps.get(1)?.as_str().parse::<u16>().ok()?, caps.get(0)?.range()))
    });
    if let Some((y, range)) = year_match {
        year = Some(y);
        title.replace_range(range, "");
    }

    let mut season: Option<u8> = None;
    let mut episode: Option<u16> = None;
    let code_match = EPISODE_CODE.captures(&title).and_then(|caps| {
        Some((
            caps.get(1)?.as_str().parse::<u8>().ok()?,
            caps.get(2)?.as_str().parse::<u16>().ok()?,
            caps.get(0)?.start(),
        ))
    });
    if let Some((s, e, start)) = code_match {
        season = Some(s);
        episode = Some(e);
        title.truncate(start);
    }

    NormalizedTitle {
        title: trim_separators(&title),
        year,
        season,
        episode,
    }
}

/// Trim residual whitespace and trailing separator punctuation.
fn trim_separators(title: &str) -> String {
    title
        .trim()
        .trim_end_matches(['-', '.', '_', ':'])
        .trim()
        .to_string()
}
