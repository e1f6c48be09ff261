//! Document tree snapshots in ProseMirror JSON form

use crate::error::TreeError;
use crate::tree::DocumentTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node types that live inside a textblock
const INLINE_TYPES: &[&str] = &[
    "text",
    "hard_break",
    "hardBreak",
    "image",
    "mention",
    "emoji",
    "math_inline",
    "inlineMath",
    "citation",
];

/// Node types without content (one position each)
const ATOM_TYPES: &[&str] = &[
    "hard_break",
    "hardBreak",
    "image",
    "mention",
    "emoji",
    "math_inline",
    "inlineMath",
    "citation",
    "horizontal_rule",
    "horizontalRule",
    "page_break",
    "pageBreak",
];

/// Block types that hold inline content even when empty
const TEXTBLOCK_TYPES: &[&str] = &["paragraph", "heading", "code_block", "codeBlock", "title"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<JsonNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Value>,
}

impl JsonNode {
    pub fn new(node_type: impl Into<String>, content: Vec<JsonNode>) -> Self {
        Self {
            node_type: node_type.into(),
            content,
            text: None,
            attrs: None,
            marks: Vec::new(),
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text", Vec::new())
        }
    }

    pub fn atom(node_type: impl Into<String>) -> Self {
        Self::new(node_type, Vec::new())
    }

    /// `doc` of plain paragraphs, one per string
    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let blocks = paragraphs
            .iter()
            .map(|p| {
                let text = p.as_ref();
                let content = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Self::text_node(text)]
                };
                Self::new("paragraph", content)
            })
            .collect();
        Self::new("doc", blocks)
    }

    /// Parse and check a tree snapshot
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let node: JsonNode = serde_json::from_str(json)?;
        node.check()?;
        Ok(node)
    }

    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        let node: JsonNode = serde_json::from_value(value)?;
        node.check()?;
        Ok(node)
    }

    fn check(&self) -> Result<(), TreeError> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.node_type.is_empty() {
                return Err(TreeError::MissingType);
            }
            if node.node_type == "text" {
                if node.text.is_none() {
                    return Err(TreeError::MissingText);
                }
                if !node.content.is_empty() {
                    return Err(TreeError::UnexpectedContent(node.node_type.clone()));
                }
            }
            if ATOM_TYPES.contains(&node.node_type.as_str()) && !node.content.is_empty() {
                return Err(TreeError::UnexpectedContent(node.node_type.clone()));
            }
            stack.extend(node.content.iter());
        }
        Ok(())
    }
}

impl DocumentTree for JsonNode {
    fn child_count(&self) -> usize {
        self.content.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.content.get(index)
    }

    fn is_text(&self) -> bool {
        self.node_type == "text"
    }

    fn is_block(&self) -> bool {
        !INLINE_TYPES.contains(&self.node_type.as_str())
    }

    fn text(&self) -> Option<&str> {
        if self.is_text() {
            self.text.as_deref()
        } else {
            None
        }
    }

    fn is_atom(&self) -> bool {
        ATOM_TYPES.contains(&self.node_type.as_str())
    }

    fn is_textblock(&self) -> bool {
        if !self.is_block() || self.is_atom() {
            return false;
        }
        if TEXTBLOCK_TYPES.contains(&self.node_type.as_str()) {
            return true;
        }
        !self.content.is_empty() && self.content.iter().all(|child| !child.is_block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_prosemirror_json() {
        let json = r#"{
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Method"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Bold", "marks": [{"type": "bold"}]},
                    {"type": "hard_break"},
                    {"type": "text", "text": "line"}
                ]},
                {"type": "paragraph"}
            ]
        }"#;
        let doc = JsonNode::from_json(json).unwrap();
        assert_eq!(doc.child_count(), 3);
        assert_eq!(doc.content[1].marks.len(), 0);
        assert_eq!(doc.content[1].content[0].marks.len(), 1);
        assert!(doc.content[2].is_textblock());
        assert_eq!(doc.content_size(), 8 + 11 + 2);
    }

    #[test]
    fn test_text_node_without_text_is_rejected() {
        let err = JsonNode::from_json(r#"{"type": "doc", "content": [{"type": "paragraph", "content": [{"type": "text"}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::MissingText));
    }

    #[test]
    fn test_atom_with_content_is_rejected() {
        let err = JsonNode::from_json(r#"{"type": "hard_break", "content": [{"type": "text", "text": "x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::UnexpectedContent(_)));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(JsonNode::from_json("{"), Err(TreeError::Parse(_))));
    }

    #[test]
    fn test_from_paragraphs() {
        let doc = JsonNode::from_paragraphs(&["One", "", "Two"]);
        assert_eq!(doc.child_count(), 3);
        assert_eq!(doc.content_size(), 5 + 2 + 5);
    }
}
