//! Maps issue anchors onto positions in a live rich-text document tree.
//!
//! A [`PositionMap`] is built from one snapshot of the tree and must not be
//! reused after the tree changes. Resolution never fails loudly: an anchor
//! that cannot be placed resolves to `None` and the issue stays in the
//! report without a range.

pub mod error;
pub mod json;
pub mod map;
pub mod resolve;
pub mod tree;

pub use error::TreeError;
pub use json::JsonNode;
pub use map::{build_position_map, BlockDescriptor, PositionMap};
pub use resolve::{
    find_text, resolve, resolve_issues, resolve_location, text_between, validate_position,
    PositionedIssue, ResolveOptions, Resolver, SearchOptions, TreeRange,
};
pub use tree::{text_content, Descendants, DocumentTree};
