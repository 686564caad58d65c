//! One iterator type over sequences and maps.
//!
//! A [`NodeIter`] walks a sequence or a map behind the same interface. What
//! it yields depends on the kind of its owner:
//!
//! - a sequence yields [`IterValue::Node`], one per element;
//! - a map yields [`IterValue::Pair`], one per entry, in insertion order;
//! - any other node yields nothing, and its begin equals its end.
//!
//! ```rust
//! use yaml_node::{Document, IterValue};
//!
//! let mut doc = Document::new();
//! doc.root_mut().insert("a", 1).unwrap();
//! doc.root_mut().insert("b", 2).unwrap();
//!
//! let keys: Vec<_> = doc
//!     .root()
//!     .iter()
//!     .filter_map(|entry| entry.key().and_then(|k| k.scalar()))
//!     .collect();
//! assert_eq!(keys, vec!["a", "b"]);
//! ```

use crate::memory::NodeId;
use crate::node::{Document, NodeMut, NodeRef};
use std::fmt;

/// Where an iterator stands, tagged by the kind being walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterPosition {
    /// The owner is neither a sequence nor a map.
    #[default]
    None,
    Sequence(usize),
    Map(usize),
}

impl IterPosition {
    #[must_use]
    pub fn offset(self) -> usize {
        match self {
            IterPosition::None => 0,
            IterPosition::Sequence(i) | IterPosition::Map(i) => i,
        }
    }

    /// Moves one step forward. A `None` position stays put.
    pub fn advance(&mut self) {
        match self {
            IterPosition::None => {}
            IterPosition::Sequence(i) | IterPosition::Map(i) => *i += 1,
        }
    }

    /// Moves one step back, saturating at zero.
    pub fn retreat(&mut self) {
        match self {
            IterPosition::None => {}
            IterPosition::Sequence(i) | IterPosition::Map(i) => *i = i.saturating_sub(1),
        }
    }
}

/// What an iterator yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterValue<V> {
    /// Past the end, or walking something that has no children.
    Empty,
    /// A sequence element.
    Node(V),
    /// A map entry.
    Pair { key: V, value: V },
}

impl<V> IterValue<V> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, IterValue::Empty)
    }

    /// The element, when walking a sequence.
    pub fn node(&self) -> Option<&V> {
        match self {
            IterValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The entry, when walking a map.
    pub fn pair(&self) -> Option<(&V, &V)> {
        match self {
            IterValue::Pair { key, value } => Some((key, value)),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&V> {
        self.pair().map(|(key, _)| key)
    }

    /// The element of a sequence or the value of a map entry.
    pub fn value(&self) -> Option<&V> {
        match self {
            IterValue::Node(node) => Some(node),
            IterValue::Pair { value, .. } => Some(value),
            IterValue::Empty => None,
        }
    }
}

fn value_at<'a>(doc: &'a Document, owner: Option<NodeId>, pos: IterPosition) -> IterValue<NodeRef<'a>> {
    let Some(owner) = owner else {
        return IterValue::Empty;
    };
    let node = doc.node(owner);
    match pos {
        IterPosition::None => IterValue::Empty,
        IterPosition::Sequence(i) => node
            .children()
            .get(i)
            .map_or(IterValue::Empty, |&child| IterValue::Node(doc.node(child))),
        IterPosition::Map(i) => node
            .pairs()
            .get(i)
            .map_or(IterValue::Empty, |&(key, value)| IterValue::Pair {
                key: doc.node(key),
                value: doc.node(value),
            }),
    }
}

/// Read-only iterator over a node's elements or entries.
///
/// Besides the standard [`Iterator`] protocol it offers cursor-style access
/// ([`get`](Self::get), [`advance`](Self::advance), [`retreat`](Self::retreat))
/// and compares equal to another iterator at the same position over the same
/// node.
#[derive(Clone, Copy)]
pub struct NodeIter<'a> {
    doc: &'a Document,
    owner: Option<NodeId>,
    pos: IterPosition,
    back: IterPosition,
}

impl<'a> NodeIter<'a> {
    pub(crate) fn new(
        doc: &'a Document,
        owner: Option<NodeId>,
        start: IterPosition,
        end: IterPosition,
    ) -> Self {
        NodeIter {
            doc,
            owner,
            pos: start,
            back: end,
        }
    }

    #[must_use]
    pub fn position(&self) -> IterPosition {
        self.pos
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos.offset() >= self.back.offset()
    }

    /// The value at the current position; [`IterValue::Empty`] at the end.
    #[must_use]
    pub fn get(&self) -> IterValue<NodeRef<'a>> {
        if self.at_end() {
            return IterValue::Empty;
        }
        value_at(self.doc, self.owner, self.pos)
    }

    pub fn advance(&mut self) {
        self.pos.advance();
    }

    pub fn retreat(&mut self) {
        self.pos.retreat();
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = IterValue<NodeRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        let value = self.get();
        self.pos.advance();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.offset().saturating_sub(self.pos.offset());
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for NodeIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        self.back.retreat();
        Some(value_at(self.doc, self.owner, self.back))
    }
}

impl ExactSizeIterator for NodeIter<'_> {}

impl PartialEq for NodeIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.owner == other.owner && self.pos == other.pos
    }
}

impl fmt::Debug for NodeIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIter")
            .field("owner", &self.owner)
            .field("pos", &self.pos)
            .field("back", &self.back)
            .finish()
    }
}

/// Cursor over a node's elements or entries that can modify what it visits.
///
/// Keys stay read-only. Values are reachable through
/// [`value_mut`](Self::value_mut). A mutable iterator converts into a
/// [`NodeIter`] with [`From`]; there is no conversion the other way.
pub struct NodeIterMut<'a> {
    doc: &'a mut Document,
    owner: NodeId,
    pos: IterPosition,
    back: IterPosition,
}

impl<'a> NodeIterMut<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        owner: NodeId,
        start: IterPosition,
        end: IterPosition,
    ) -> Self {
        NodeIterMut {
            doc,
            owner,
            pos: start,
            back: end,
        }
    }

    #[must_use]
    pub fn position(&self) -> IterPosition {
        self.pos
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos.offset() >= self.back.offset()
    }

    pub fn advance(&mut self) {
        self.pos.advance();
    }

    pub fn retreat(&mut self) {
        self.pos.retreat();
    }

    #[must_use]
    pub fn get(&self) -> IterValue<NodeRef<'_>> {
        if self.at_end() {
            return IterValue::Empty;
        }
        value_at(self.doc, Some(self.owner), self.pos)
    }

    /// The key of the current map entry.
    #[must_use]
    pub fn key(&self) -> Option<NodeRef<'_>> {
        self.get().key().copied()
    }

    /// Mutable handle to the current element, or to the current entry's value.
    pub fn value_mut(&mut self) -> Option<NodeMut<'_>> {
        let target = self.get().value().and_then(NodeRef::id)?;
        Some(self.doc.handle_mut(target))
    }
}

impl<'a> From<NodeIterMut<'a>> for NodeIter<'a> {
    fn from(iter: NodeIterMut<'a>) -> Self {
        let NodeIterMut {
            doc,
            owner,
            pos,
            back,
        } = iter;
        NodeIter::new(doc, Some(owner), pos, back)
    }
}

impl fmt::Debug for NodeIterMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIterMut")
            .field("owner", &self.owner)
            .field("pos", &self.pos)
            .field("back", &self.back)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn numbers() -> Document {
        let mut doc = Document::sequence();
        for n in 1..=3 {
            doc.root_mut().push(n).unwrap();
        }
        doc
    }

    #[test]
    fn test_sequence_yields_nodes() {
        let doc = numbers();
        let values: Vec<i32> = doc
            .root()
            .iter()
            .filter_map(|entry| entry.node().and_then(|n| n.decode()))
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_begin_equals_end_for_scalar() {
        let doc = Document::scalar("x");
        let root = doc.root();
        assert_eq!(root.begin(), root.end());
        assert_eq!(root.begin().position(), IterPosition::None);
        assert!(root.begin().get().is_empty());
        assert_eq!(root.iter().count(), 0);
    }

    #[test]
    fn test_begin_advanced_len_times_equals_end() {
        let doc = numbers();
        let root = doc.root();
        let mut it = root.begin();
        assert_ne!(it, root.end());
        for _ in 0..root.len() {
            it.advance();
        }
        assert_eq!(it, root.end());
        it.retreat();
        assert_eq!(it.get().node().and_then(|n| n.decode::<i32>()), Some(3));
    }

    #[test]
    fn test_reverse_and_exact_size() {
        let doc = numbers();
        let it = doc.root().iter();
        assert_eq!(it.len(), 3);
        let reversed: Vec<i32> = it
            .rev()
            .filter_map(|entry| entry.node().and_then(|n| n.decode()))
            .collect();
        assert_eq!(reversed, vec![3, 2, 1]);
    }

    #[test]
    fn test_iterators_over_different_documents_differ() {
        let a = numbers();
        let b = numbers();
        assert_ne!(a.root().begin(), b.root().begin());
    }

    #[test]
    fn test_cursor_copies_are_independent() {
        let doc = numbers();
        let mut cursor = doc.root().begin();
        let saved = cursor;
        cursor.advance();
        assert_eq!(saved.position(), IterPosition::Sequence(0));
        assert_eq!(cursor.position(), IterPosition::Sequence(1));
        assert_eq!(saved.count(), 3);
    }

    #[test]
    fn test_value_mut_updates_entries() {
        let mut doc = Document::new();
        doc.root_mut().insert("a", 1).unwrap();
        doc.root_mut().insert("b", 2).unwrap();

        let mut root = doc.root_mut();
        let mut it = root.begin();
        while !it.at_end() {
            let doubled = it.get().value().and_then(|v| v.decode::<i32>()).map(|v| v * 2);
            if let (Some(mut value), Some(doubled)) = (it.value_mut(), doubled) {
                value.set(doubled);
            }
            it.advance();
        }

        assert_eq!(doc.root().get("a").unwrap().decode::<i32>(), Some(2));
        assert_eq!(doc.root().get("b").unwrap().decode::<i32>(), Some(4));
    }

    #[test]
    fn test_mutable_widens_to_read_only() {
        let mut doc = numbers();
        let mut root = doc.root_mut();
        let mut it = root.begin();
        it.advance();
        let read: NodeIter<'_> = it.into();
        assert_eq!(read.position(), IterPosition::Sequence(1));
        assert_eq!(read.count(), 2);
    }

    #[test]
    fn test_map_key_is_read_only_view() {
        let mut doc = Document::new();
        doc.root_mut().insert("k", "v").unwrap();
        let mut root = doc.root_mut();
        let it = root.begin();
        let key = it.key().unwrap();
        assert_eq!(key.kind(), NodeType::Scalar);
        assert_eq!(key.scalar(), Some("k"));
    }
}
