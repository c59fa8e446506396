use std::iter::Peekable;
use std::str::Lines;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, SyncError};
use crate::models::RawEntry;

lazy_static! {
    /// Regex to parse EXTINF attributes (tvg-name="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"(\w+(?:-\w+)*)="([^"]*)""#).unwrap();
}

/// Lazy iterator over the entries of an M3U document.
///
/// Construction validates that the document carries an `#EXTM3U` header
/// directive; everything else is tolerated. Malformed individual entries
/// (metadata line with no URL line, missing display name) are dropped and
/// counted via [`EntryParser::skipped`], never raised. Blank lines and
/// non-EXTINF comments are skipped silently. Re-create the parser from the
/// same text to restart the sequence.
pub struct EntryParser<'a> {
    lines: Peekable<Lines<'a>>,
    skipped: usize,
}

impl<'a> EntryParser<'a> {
    pub fn new(text: &'a str) -> Result<Self> {
        let has_header = text.lines().any(|l| l.trim().starts_with("#EXTM3U"));
        if !has_header {
            return Err(SyncError::Format("missing #EXTM3U header".to_string()));
        }
        Ok(Self {
            lines: text.lines().peekable(),
            skipped: 0,
        })
    }

    /// Entries dropped so far. Final once the iterator is exhausted.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consume the line(s) following an EXTINF and return the stream URL,
    /// or `None` when the metadata line is not followed by one. Blank lines
    /// in between are tolerated; another directive means the entry has no URL.
    fn take_url(&mut self) -> Option<String> {
        loop {
            let &line = self.lines.peek()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.lines.next();
                continue;
            }
            if trimmed.starts_with('#') {
                return None;
            }
            self.lines.next();
            return Some(trimmed.to_string());
        }
    }
}

impl Iterator for EntryParser<'_> {
    type Item = RawEntry;

    fn next(&mut self) -> Option<RawEntry> {
        loop {
            let line = self.lines.next()?;
            let trimmed = line.trim();
            if !trimmed.starts_with("#EXTINF:") {
                continue;
            }

            let (name, group) = parse_extinf(trimmed);

            let Some(url) = self.take_url() else {
                self.skipped += 1;
                continue;
            };

            if name.is_empty() {
                self.skipped += 1;
                continue;
            }

            return Some(RawEntry { name, group, url });
        }
    }
}

/// Parse an EXTINF line into (display name, group label).
/// Format: #EXTINF:duration tvg-name="..." group-title="...",Title
/// The display name comes from `tvg-name`, falling back to the post-comma title.
fn parse_extinf(line: &str) -> (String, String) {
    let content = &line["#EXTINF:".len()..];

    let (header, title) = match content.find(',') {
        Some(idx) => (&content[..idx], content[idx + 1..].trim()),
        None => (content, ""),
    };

    let mut name = String::new();
    let mut group = String::new();
    for caps in ATTR_REGEX.captures_iter(header) {
        let value = caps[2].trim();
        match &caps[1] {
            "tvg-name" => name = value.to_string(),
            "group-title" => group = value.to_string(),
            _ => {}
        }
    }

    if name.is_empty() {
        name = title.to_string();
    }

    (name, group)
}
