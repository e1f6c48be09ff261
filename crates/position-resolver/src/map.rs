//! Ordinal-to-position table for the textblocks of one tree snapshot

use crate::tree::{text_content, DocumentTree};
use serde::Serialize;

/// One textblock of the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    /// Ordinal among textblocks, contiguous from 0
    pub index: usize,
    /// Position just before the block's opening token
    pub tree_position: usize,
    /// Full node size, opening and closing tokens included
    pub node_length: usize,
    pub text_content: String,
}

impl BlockDescriptor {
    /// First position inside the block
    pub fn content_start(&self) -> usize {
        self.tree_position + 1
    }

    /// Position of the closing token
    pub fn content_end(&self) -> usize {
        self.tree_position + self.node_length.saturating_sub(1)
    }
}

/// Valid only for the snapshot it was built from; rebuild after any edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionMap {
    blocks: Vec<BlockDescriptor>,
}

impl PositionMap {
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&BlockDescriptor> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One traversal of the tree, recording every textblock in document order
pub fn build_position_map<T: DocumentTree>(root: &T) -> PositionMap {
    let blocks = root
        .descendants()
        .filter(|(_, node)| node.is_textblock())
        .enumerate()
        .map(|(index, (pos, node))| BlockDescriptor {
            index,
            tree_position: pos,
            node_length: node.node_size(),
            text_content: text_content(node),
        })
        .collect();
    PositionMap { blocks }
}
