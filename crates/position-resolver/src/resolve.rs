//! Turning issue anchors into tree ranges

use crate::map::{build_position_map, PositionMap};
use crate::tree::DocumentTree;
use serde::{Deserialize, Serialize};
use shared_types::{fold_char, Issue, TextLocation};
use tracing::debug;

/// Stand-in for leaf nodes when searching block text
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Half-open span of tree positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRange {
    pub from: usize,
    pub to: usize,
}

impl TreeRange {
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_insensitive: bool,
}

/// Resolve one anchor.
///
/// A literal anchor is searched in the live tree and its result is final.
/// Without a literal (or without a tree) the location is mapped through
/// the textblock table. `None` when nothing fits.
pub fn resolve<T: DocumentTree>(
    location: Option<&TextLocation>,
    map: &PositionMap,
    literal: Option<&str>,
    root: Option<&T>,
    options: SearchOptions,
) -> Option<TreeRange> {
    if let (Some(needle), Some(root)) = (literal.filter(|l| !l.is_empty()), root) {
        return find_text(root, needle, options);
    }
    resolve_location(location?, map)
}

/// Index path: block ordinal plus char offset inside the block
pub fn resolve_location(location: &TextLocation, map: &PositionMap) -> Option<TreeRange> {
    let block = map.get(location.paragraph_index)?;
    let from = block.content_start().checked_add(location.char_offset)?;
    let to = from.checked_add(location.length)?;
    if to > block.content_end() {
        return None;
    }
    Some(TreeRange { from, to })
}

/// First occurrence of `needle` inside a single textblock, in document order
pub fn find_text<T: DocumentTree>(
    root: &T,
    needle: &str,
    options: SearchOptions,
) -> Option<TreeRange> {
    let fold = |c: char| {
        if options.case_insensitive {
            fold_char(c)
        } else {
            c
        }
    };
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() {
        return None;
    }

    for (pos, block) in root.descendants() {
        if !block.is_textblock() {
            continue;
        }
        let table = block_chars(block, pos + 1);
        if table.len() < needle.len() {
            continue;
        }
        let found = table.windows(needle.len()).find(|window| {
            window
                .iter()
                .zip(&needle)
                .all(|((c, _), expected)| fold(*c) == *expected)
        });
        if let Some(window) = found {
            let from = window[0].1;
            let to = window[window.len() - 1].1 + 1;
            return Some(TreeRange { from, to });
        }
    }
    None
}

/// Characters of a textblock with the position of each one
fn block_chars<T: DocumentTree>(block: &T, start: usize) -> Vec<(char, usize)> {
    let mut table = Vec::new();
    let mut pos = start;
    for child in block.children() {
        match child.text() {
            Some(text) if child.is_text() => {
                for c in text.chars() {
                    table.push((c, pos));
                    pos += 1;
                }
            }
            _ => {
                table.push((OBJECT_REPLACEMENT, pos));
                pos += child.node_size();
            }
        }
    }
    table
}

/// Current text of a span; leaf nodes contribute nothing
pub fn text_between<T: DocumentTree>(root: &T, range: TreeRange) -> Option<String> {
    if range.from > range.to || range.to > root.content_size() {
        return None;
    }
    let mut out = String::new();
    for (pos, node) in root.descendants() {
        let Some(text) = node.text() else { continue };
        let len = text.chars().count();
        if pos + len <= range.from || pos >= range.to {
            continue;
        }
        let skip = range.from.saturating_sub(pos);
        let take = range.to.min(pos + len) - pos.max(range.from);
        out.extend(text.chars().skip(skip).take(take));
    }
    Some(out)
}

/// Whether `range` still holds `expected` in the current tree
pub fn validate_position<T: DocumentTree>(root: &T, range: TreeRange, expected: &str) -> bool {
    text_between(root, range).is_some_and(|current| current == expected)
}

/// Options for resolving a batch of issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Search model-sourced anchors without regard to case
    pub case_insensitive_ai: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            case_insensitive_ai: true,
        }
    }
}

/// An issue with its resolved range, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub range: Option<TreeRange>,
}

/// Resolves issues against one tree snapshot
pub struct Resolver<'a, T> {
    root: &'a T,
    map: PositionMap,
    options: ResolveOptions,
}

impl<'a, T: DocumentTree> Resolver<'a, T> {
    pub fn new(root: &'a T, options: ResolveOptions) -> Self {
        Self {
            root,
            map: build_position_map(root),
            options,
        }
    }

    pub fn map(&self) -> &PositionMap {
        &self.map
    }

    pub fn resolve_issue(&self, issue: &Issue) -> Option<TreeRange> {
        let options = SearchOptions {
            case_insensitive: issue.ai_generated && self.options.case_insensitive_ai,
        };
        let range = resolve(
            issue.location.as_ref(),
            &self.map,
            issue.text.as_deref(),
            Some(self.root),
            options,
        );
        if range.is_none() && !issue.is_document_level() {
            debug!(id = %issue.id, "issue anchor not found in tree");
        }
        range
    }
}

/// Resolve every issue against one snapshot, keeping order and keeping
/// unresolved issues with no range.
pub fn resolve_issues<T: DocumentTree>(
    issues: Vec<Issue>,
    root: &T,
    options: ResolveOptions,
) -> Vec<PositionedIssue> {
    let resolver = Resolver::new(root, options);
    issues
        .into_iter()
        .map(|issue| {
            let range = resolver.resolve_issue(&issue);
            PositionedIssue { issue, range }
        })
        .collect()
}
