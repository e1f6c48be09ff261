//! Regex patterns and text helpers shared by the rule families

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::fold_char;
use std::collections::HashSet;

lazy_static! {
    /// Reference list heading on its own line
    static ref REFERENCE_HEADING: Regex =
        Regex::new(r"(?im)^[ \t]*#*[ \t]*(?:references|reference list|bibliography)[ \t]*$").unwrap();

    /// Surname followed by initials, as written in a reference entry
    pub static ref REFERENCE_AUTHOR: Regex =
        Regex::new(r"\b[A-Z][A-Za-z'’\-]+,\s(?:[A-Z]\.[\s-]?)+").unwrap();

    /// Full calendar date: month, day, year
    pub static ref FULL_DATE: Regex = Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}\b"
    )
    .unwrap();

    /// Four-digit year, optionally with a letter suffix
    pub static ref YEAR: Regex = Regex::new(r"\b(1[5-9]\d{2}|20\d{2})([a-z])?\b").unwrap();
}

/// Byte offset where the reference list begins, if the document has one
pub fn reference_section_start(text: &str) -> Option<usize> {
    REFERENCE_HEADING.find_iter(text).last().map(|m| m.start())
}

/// Text before the reference list (the whole text if there is none)
pub fn body_text(text: &str) -> &str {
    match reference_section_start(text) {
        Some(start) => &text[..start],
        None => text,
    }
}

/// Non-empty entries of the reference list with their byte offsets
pub fn reference_entries(text: &str) -> Vec<(usize, &str)> {
    let Some(start) = reference_section_start(text) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut offset = start;
    for (i, line) in text[start..].split('\n').enumerate() {
        // First line is the heading itself
        if i > 0 && !line.trim().is_empty() {
            entries.push((offset, line));
        }
        offset += line.len() + 1;
    }
    entries
}

/// Bounded context window around a byte span, snapped to char boundaries
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut from = start.saturating_sub(radius);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + radius).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}

/// Byte span of the line containing `offset`
pub fn line_bounds(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len());
    (start, end)
}

/// Byte span of the sentence containing `offset`, bounded by its line
pub fn sentence_bounds(text: &str, offset: usize) -> (usize, usize) {
    let (line_start, line_end) = line_bounds(text, offset);
    let line = &text[line_start..line_end];
    let rel = offset - line_start;

    let start = line[..rel]
        .rfind(". ")
        .map(|i| line_start + i + 2)
        .unwrap_or(line_start);
    let end = line[rel..]
        .find(". ")
        .map(|i| offset + i + 1)
        .unwrap_or(line_end);
    (start, end)
}

/// Locate `needle` in `text` (case-sensitive first, then ignoring case)
pub fn find_literal(text: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    if let Some(start) = text.find(needle) {
        return Some((start, start + needle.len()));
    }
    find_case_insensitive(text, needle)
}

/// Case-insensitive search that returns byte offsets into the original text
pub fn find_case_insensitive(text: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().map(fold_char).collect();
    if needle.is_empty() {
        return None;
    }

    for (start, _) in text.char_indices() {
        let mut chars = text[start..].char_indices();
        let mut matched = 0;
        let mut end = start;
        for expected in &needle {
            match chars.next() {
                Some((i, c)) if fold_char(c) == *expected => {
                    matched += 1;
                    end = start + i + c.len_utf8();
                }
                _ => break,
            }
        }
        if matched == needle.len() {
            return Some((start, end));
        }
    }
    None
}

/// Deterministic issue id: `<code>-<byte offset>`
pub fn issue_id(code: &str, offset: usize) -> String {
    format!("{}-{}", code, offset)
}

/// Structural sub-issues already reported during one validator call.
///
/// Created fresh inside each `validate` so validators stay reentrant.
#[derive(Debug, Default)]
pub struct ReportedTypes {
    seen: HashSet<String>,
}

impl ReportedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `key` is seen
    pub fn first(&mut self, key: impl Into<String>) -> bool {
        self.seen.insert(key.into())
    }
}
