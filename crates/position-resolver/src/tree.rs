//! Abstract document-tree interface and traversal
//!
//! Positions follow the ProseMirror model: a text node is as long as its
//! text, a leaf (atom) node takes one position, and every other node takes
//! two (its opening and closing token) plus its content. The content of
//! the root starts at position 0. Text length is counted in Unicode scalar
//! values.

/// Read-only view of a rich-text document node
pub trait DocumentTree: Sized {
    fn child_count(&self) -> usize;

    fn child(&self, index: usize) -> Option<&Self>;

    fn is_text(&self) -> bool;

    fn is_block(&self) -> bool;

    /// Text of a text node; `None` for every other node
    fn text(&self) -> Option<&str>;

    /// Leaf node without content (hard break, image, ...)
    fn is_atom(&self) -> bool {
        false
    }

    /// Block whose children are all inline
    fn is_textblock(&self) -> bool {
        self.is_block() && !self.is_atom() && self.children().all(|child| !child.is_block())
    }

    fn children(&self) -> Children<'_, Self> {
        Children {
            node: self,
            next: 0,
        }
    }

    /// Number of positions the node occupies in its parent
    fn node_size(&self) -> usize {
        if self.is_text() {
            self.text().map_or(0, |t| t.chars().count())
        } else if self.is_atom() {
            1
        } else {
            2 + self.content_size()
        }
    }

    /// Sum of the children's sizes, walked with an explicit stack
    fn content_size(&self) -> usize {
        let mut size = 0;
        let mut stack: Vec<&Self> = self.children().collect();
        while let Some(node) = stack.pop() {
            if node.is_text() {
                size += node.text().map_or(0, |t| t.chars().count());
            } else if node.is_atom() {
                size += 1;
            } else {
                size += 2;
                stack.extend(node.children());
            }
        }
        size
    }

    /// Every node below this one, in document order, with its position
    fn descendants(&self) -> Descendants<'_, Self> {
        Descendants::new(self)
    }
}

/// Direct children of a node
pub struct Children<'a, T> {
    node: &'a T,
    next: usize,
}

impl<'a, T: DocumentTree> Iterator for Children<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.node.child_count() {
            return None;
        }
        let child = self.node.child(self.next);
        self.next += 1;
        child
    }
}

/// Pre-order walk with an explicit stack. Sizes are computed the same
/// way, so neither recurses per level of nesting.
pub struct Descendants<'a, T> {
    stack: Vec<(usize, &'a T)>,
}

impl<'a, T: DocumentTree> Descendants<'a, T> {
    pub fn new(root: &'a T) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_children(root, 0);
        walk
    }

    /// Queue the children of `node`, whose content starts at `start`
    fn push_children(&mut self, node: &'a T, start: usize) {
        let mut pos = start;
        let mut queued = Vec::with_capacity(node.child_count());
        for child in node.children() {
            queued.push((pos, child));
            pos += child.node_size();
        }
        self.stack.extend(queued.into_iter().rev());
    }
}

impl<'a, T: DocumentTree> Iterator for Descendants<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, node) = self.stack.pop()?;
        if !node.is_text() && !node.is_atom() {
            self.push_children(node, pos + 1);
        }
        Some((pos, node))
    }
}

/// Plain text of a node, leaf nodes contributing nothing
pub fn text_content<T: DocumentTree>(node: &T) -> String {
    if node.is_text() {
        return node.text().unwrap_or_default().to_string();
    }
    node.descendants()
        .filter_map(|(_, n)| n.text())
        .collect()
}
