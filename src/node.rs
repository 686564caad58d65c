//! The in-memory document model.
//!
//! A [`Document`] owns a [`Memory`] arena and the id of its root node. Nodes
//! are addressed through two kinds of handles:
//!
//! - [`NodeRef`]: a read-only view. Reading a key that is not present never
//!   changes the tree; it yields a detached Undefined node instead.
//! - [`NodeMut`]: a mutable view. Writing through a key that is not present
//!   builds the missing structure on the fly (auto-vivification).
//!
//! ## Auto-vivification rules
//!
//! | receiver kind        | read `get(key)`            | write `get_mut(key)`                         |
//! |----------------------|----------------------------|----------------------------------------------|
//! | Undefined / Null     | Undefined                  | index `== len` appends, otherwise becomes Map |
//! | Sequence             | element or Undefined       | element, index `== len` appends, otherwise Map |
//! | Map                  | value or Undefined         | value, otherwise a new `(key, Undefined)` pair |
//! | Scalar               | [`Error::BadSubscript`]    | [`Error::BadSubscript`]                      |
//!
//! Promoting a sequence to a map discards its elements.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_node::{Document, NodeType};
//!
//! let mut doc = Document::new();
//! doc.root_mut().get_mut("name").unwrap().set("Alice");
//! doc.root_mut().get_mut("langs").unwrap().push("rust").unwrap();
//!
//! let root = doc.root();
//! assert_eq!(root.kind(), NodeType::Map);
//! assert_eq!(root.get("name").unwrap().scalar(), Some("Alice"));
//! assert_eq!(root.get("missing").unwrap().kind(), NodeType::Undefined);
//! ```
//!
//! Map lookups compare keys by decoding each stored key into the type of the
//! probe and comparing the results, so a lookup costs one decode per entry.
//! Iterators and handles borrow the document; the tree cannot be restructured
//! while a traversal is in progress.

use crate::convert::{Convertible, Encode, NodeKey};
use crate::iterator::{IterPosition, NodeIter, NodeIterMut};
use crate::memory::{Memory, NodeId};
use crate::{Emitter, Error, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The kind tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Undefined,
    Null,
    Scalar,
    Sequence,
    Map,
}

/// Payload of a node, tagged by kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeValue {
    #[default]
    Undefined,
    Null,
    Scalar(String),
    Sequence(Vec<NodeId>),
    /// Key/value pairs in insertion order. Keys are not deduplicated by the
    /// container itself.
    Map(Vec<(NodeId, NodeId)>),
}

impl NodeValue {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> NodeType {
        match self {
            NodeValue::Undefined => NodeType::Undefined,
            NodeValue::Null => NodeType::Null,
            NodeValue::Scalar(_) => NodeType::Scalar,
            NodeValue::Sequence(_) => NodeType::Sequence,
            NodeValue::Map(_) => NodeType::Map,
        }
    }
}

/// Storage for a single node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeData {
    pub(crate) value: NodeValue,
    pub(crate) tag: Option<String>,
}

impl NodeData {
    pub(crate) fn rebase(&mut self, offset: usize) {
        match &mut self.value {
            NodeValue::Sequence(children) => {
                for child in children.iter_mut() {
                    *child = child.rebased(offset);
                }
            }
            NodeValue::Map(pairs) => {
                for (key, value) in pairs.iter_mut() {
                    *key = key.rebased(offset);
                    *value = value.rebased(offset);
                }
            }
            _ => {}
        }
    }
}

/// A document: one arena plus the id of its root node.
#[derive(Debug, Clone)]
pub struct Document {
    memory: Memory,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document whose root is Undefined.
    #[must_use]
    pub fn new() -> Self {
        let mut memory = Memory::new();
        let root = memory.create_node();
        Document { memory, root }
    }

    /// Creates a document whose root is Null.
    #[must_use]
    pub fn null() -> Self {
        Self::with_root(NodeValue::Null)
    }

    /// Creates a document whose root is a scalar holding `text`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::Document;
    ///
    /// let doc = Document::scalar("42");
    /// assert_eq!(doc.root().decode::<i32>(), Some(42));
    /// ```
    #[must_use]
    pub fn scalar(text: impl Into<String>) -> Self {
        Self::with_root(NodeValue::Scalar(text.into()))
    }

    /// Creates a document whose root is an empty sequence.
    #[must_use]
    pub fn sequence() -> Self {
        Self::with_root(NodeValue::Sequence(Vec::new()))
    }

    /// Creates a document whose root is an empty map.
    #[must_use]
    pub fn map() -> Self {
        Self::with_root(NodeValue::Map(Vec::new()))
    }

    fn with_root(value: NodeValue) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        doc.memory.node_mut(root).value = value;
        doc
    }

    /// Encodes `value` through its [`Encode`] implementation.
    #[must_use]
    pub fn from_value<T: Encode + ?Sized>(value: &T) -> Self {
        value.encode()
    }

    /// Copies the subtree under `node` into a fresh arena.
    ///
    /// Children shared by several parents stay shared in the copy. A detached
    /// node copies to an Undefined document.
    #[must_use]
    pub fn from_subtree(node: NodeRef<'_>) -> Self {
        let Some(id) = node.id() else {
            return Document::new();
        };
        let mut doc = Document {
            memory: Memory::new(),
            root: NodeId::new(0),
        };
        let mut copied = HashMap::new();
        doc.root = doc.copy_node(node.document(), id, &mut copied);
        doc
    }

    fn copy_node(
        &mut self,
        source: &Document,
        id: NodeId,
        copied: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(&done) = copied.get(&id) {
            return done;
        }
        let target = self.memory.create_node();
        copied.insert(id, target);

        let data = source.memory.node(id);
        let value = match &data.value {
            NodeValue::Sequence(children) => NodeValue::Sequence(
                children
                    .iter()
                    .map(|&child| self.copy_node(source, child, copied))
                    .collect(),
            ),
            NodeValue::Map(pairs) => NodeValue::Map(
                pairs
                    .iter()
                    .map(|&(key, value)| {
                        (
                            self.copy_node(source, key, copied),
                            self.copy_node(source, value, copied),
                        )
                    })
                    .collect(),
            ),
            other => other.clone(),
        };
        *self.memory.node_mut(target) = NodeData {
            value,
            tag: data.tag.clone(),
        };
        target
    }

    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    pub fn root_mut(&mut self) -> NodeMut<'_> {
        let root = self.root;
        self.handle_mut(root)
    }

    /// Read-only handle to `id`. An id this document never allocated gives a
    /// detached Undefined handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.memory.contains(id).then_some(id),
        }
    }

    /// Mutable handle to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for an id from another document.
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.check(id)?;
        Ok(self.handle_mut(id))
    }

    /// `id` must already be known to this arena.
    pub(crate) fn handle_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut { doc: self, id }
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if self.memory.contains(id) {
            Ok(())
        } else {
            Err(Error::UnknownNode { id })
        }
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.memory.get_mut(id).ok_or(Error::UnknownNode { id })
    }

    /// Whether `target` is `from` or lies somewhere below it.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            match &self.memory.node(id).value {
                NodeValue::Sequence(children) => stack.extend(children.iter().copied()),
                NodeValue::Map(pairs) => {
                    stack.extend(pairs.iter().flat_map(|&(key, value)| [key, value]));
                }
                _ => {}
            }
        }
        false
    }

    /// Checks that `child` may be linked under `parent`.
    fn check_link(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check(child)?;
        if self.reaches(child, parent) {
            return Err(Error::Cycle { id: child });
        }
        Ok(())
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    // ------------------------------------------------------------------
    // Construction surface driven by a parser.
    // ------------------------------------------------------------------

    /// Allocates a new Undefined node in this document's arena.
    pub fn create_node(&mut self) -> NodeId {
        self.memory.create_node()
    }

    /// Kind of `id`; Undefined for an id this document never allocated.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeType {
        self.memory
            .get(id)
            .map_or(NodeType::Undefined, |data| data.value.kind())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for an id from another document.
    pub fn set_scalar(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        self.data_mut(id)?.value = NodeValue::Scalar(text.into());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for an id from another document.
    pub fn set_null(&mut self, id: NodeId) -> Result<()> {
        self.data_mut(id)?.value = NodeValue::Null;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for an id from another document.
    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<String>) -> Result<()> {
        self.data_mut(id)?.tag = Some(tag.into());
        Ok(())
    }

    /// Changes the kind of a node, resetting its payload when the kind differs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] for an id from another document.
    pub fn set_type(&mut self, id: NodeId, kind: NodeType) -> Result<()> {
        reset_type(self.data_mut(id)?, kind);
        Ok(())
    }

    /// Turns a node into a map.
    ///
    /// Undefined and Null nodes become empty maps; a sequence loses its
    /// elements. Maps are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] for a scalar node and
    /// [`Error::UnknownNode`] for an id from another document.
    pub fn promote_to_map(&mut self, id: NodeId) -> Result<()> {
        let data = self.data_mut(id)?;
        match data.value.kind() {
            NodeType::Map => Ok(()),
            NodeType::Scalar => Err(Error::bad_subscript(NodeType::Scalar)),
            from => {
                tracing::debug!(node = id.index(), ?from, "promoting node to map");
                data.value = NodeValue::Map(Vec::new());
                Ok(())
            }
        }
    }

    /// Appends `child` to the sequence `id`, turning an Undefined or Null
    /// node into a sequence first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadPushback`] when `id` is a scalar or a map,
    /// [`Error::UnknownNode`] when either id is foreign, and [`Error::Cycle`]
    /// when `id` already lies under `child`.
    pub fn append_sequence_child(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        self.check(id)?;
        self.check_link(id, child)?;
        let data = self.memory.node_mut(id);
        match &mut data.value {
            NodeValue::Sequence(children) => children.push(child),
            NodeValue::Undefined | NodeValue::Null => {
                data.value = NodeValue::Sequence(vec![child]);
            }
            other => return Err(Error::bad_pushback(other.kind())),
        }
        Ok(())
    }

    /// Appends a raw `(key, value)` pair to the map `id`.
    ///
    /// No lookup happens here: a parser that feeds duplicate keys gets
    /// duplicate entries. Use [`NodeMut::insert`] for overwrite semantics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when `id` is a scalar,
    /// [`Error::UnknownNode`] when any id is foreign, and [`Error::Cycle`]
    /// when `id` already lies under `key` or `value`.
    pub fn insert_map_pair(&mut self, id: NodeId, key: NodeId, value: NodeId) -> Result<()> {
        self.check(id)?;
        self.check_link(id, key)?;
        self.check_link(id, value)?;
        self.promote_to_map(id)?;
        if let NodeValue::Map(pairs) = &mut self.memory.node_mut(id).value {
            pairs.push((key, value));
        }
        Ok(())
    }

    /// Moves every node of `other` into this document and returns the new id
    /// of `other`'s root.
    pub fn adopt(&mut self, other: Document) -> NodeId {
        let offset = self.memory.merge(other.memory);
        other.root.rebased(offset)
    }

    pub(crate) fn set_sequence(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.memory.node_mut(id).value = NodeValue::Sequence(children);
    }

    pub(crate) fn set_map(&mut self, id: NodeId, pairs: Vec<(NodeId, NodeId)>) {
        self.memory.node_mut(id).value = NodeValue::Map(pairs);
    }

    /// Replaces the content of `id` with the root of `value`.
    pub(crate) fn assign(&mut self, id: NodeId, value: Document) {
        let root = self.adopt(value);
        let data = std::mem::take(self.memory.node_mut(root));
        *self.memory.node_mut(id) = data;
    }

    // ------------------------------------------------------------------
    // Keyed access.
    // ------------------------------------------------------------------

    /// Read-only lookup of `key` under `id`. A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when `id` is a scalar and
    /// [`Error::UnknownNode`] for an id from another document.
    pub fn lookup<K: NodeKey>(&self, id: NodeId, key: K) -> Result<Option<NodeId>> {
        let data = self.memory.get(id).ok_or(Error::UnknownNode { id })?;
        match &data.value {
            NodeValue::Undefined | NodeValue::Null => Ok(None),
            NodeValue::Scalar(_) => Err(Error::bad_subscript(NodeType::Scalar)),
            NodeValue::Sequence(children) => Ok(key
                .index()
                .position()
                .and_then(|position| children.get(position).copied())),
            NodeValue::Map(pairs) => Ok(self.find_pair(pairs, &key).map(|i| pairs[i].1)),
        }
    }

    /// Mutable lookup of `key` under `id`, creating whatever is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when `id` is a scalar; the node is
    /// left untouched. Returns [`Error::UnknownNode`] for a foreign id.
    pub fn lookup_or_insert<K: NodeKey>(&mut self, id: NodeId, key: K) -> Result<NodeId> {
        self.check(id)?;
        match self.kind(id) {
            NodeType::Scalar => return Err(Error::bad_subscript(NodeType::Scalar)),
            NodeType::Map => {}
            NodeType::Undefined | NodeType::Null | NodeType::Sequence => {
                if let Some(child) = self.sequence_slot(id, &key) {
                    return Ok(child);
                }
                self.promote_to_map(id)?;
            }
        }

        if let NodeValue::Map(pairs) = &self.memory.node(id).value {
            if let Some(i) = self.find_pair(pairs, &key) {
                return Ok(pairs[i].1);
            }
        }

        let key_node = self.adopt(key.to_document());
        let value_node = self.memory.create_node();
        if let NodeValue::Map(pairs) = &mut self.memory.node_mut(id).value {
            pairs.push((key_node, value_node));
        }
        Ok(value_node)
    }

    /// Removes the first entry whose key equals `key`. Only maps have
    /// removable entries; every other kind returns `false`.
    pub fn remove<K: NodeKey>(&mut self, id: NodeId, key: K) -> bool {
        let position = match self.memory.get(id).map(|data| &data.value) {
            Some(NodeValue::Map(pairs)) => self.find_pair(pairs, &key),
            _ => None,
        };
        let Some(i) = position else {
            return false;
        };
        if let NodeValue::Map(pairs) = &mut self.memory.node_mut(id).value {
            pairs.remove(i);
            return true;
        }
        false
    }

    fn find_pair<K: NodeKey>(&self, pairs: &[(NodeId, NodeId)], key: &K) -> Option<usize> {
        pairs
            .iter()
            .position(|&(stored, _)| key.matches(self.node(stored)))
    }

    /// Resolves an integral key against a sequence-like node, appending a
    /// fresh element when the index is exactly one past the end.
    fn sequence_slot<K: NodeKey>(&mut self, id: NodeId, key: &K) -> Option<NodeId> {
        let position = key.index().position()?;
        let len = match &self.memory.node(id).value {
            NodeValue::Sequence(children) => children.len(),
            _ => 0,
        };
        if position > len {
            return None;
        }
        if position == len {
            let child = self.memory.create_node();
            // Undefined/Null become a sequence here.
            self.append_sequence_child(id, child).ok()?;
            return Some(child);
        }
        match &self.memory.node(id).value {
            NodeValue::Sequence(children) => children.get(position).copied(),
            _ => None,
        }
    }
}

fn reset_type(data: &mut NodeData, kind: NodeType) {
    if data.value.kind() == kind {
        return;
    }
    data.value = match kind {
        NodeType::Undefined => NodeValue::Undefined,
        NodeType::Null => NodeValue::Null,
        NodeType::Scalar => NodeValue::Scalar(String::new()),
        NodeType::Sequence => NodeValue::Sequence(Vec::new()),
        NodeType::Map => NodeValue::Map(Vec::new()),
    };
}

/// A read-only handle to a node.
///
/// A handle with no id is a detached Undefined node, produced by read
/// lookups that miss.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: Option<NodeId>,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn detached(doc: &'a Document) -> Self {
        NodeRef { doc, id: None }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[inline]
    fn data(&self) -> Option<&'a NodeData> {
        self.id.map(|id| self.doc.memory.node(id))
    }

    #[must_use]
    pub fn kind(&self) -> NodeType {
        self.data().map_or(NodeType::Undefined, |data| data.value.kind())
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.kind() != NodeType::Undefined
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == NodeType::Null
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.kind() == NodeType::Scalar
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.kind() == NodeType::Sequence
    }

    #[must_use]
    pub fn is_map(&self) -> bool {
        self.kind() == NodeType::Map
    }

    /// The scalar text, if this is a scalar node.
    #[must_use]
    pub fn scalar(&self) -> Option<&'a str> {
        match self.data().map(|data| &data.value) {
            Some(NodeValue::Scalar(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&'a str> {
        self.data().and_then(|data| data.tag.as_deref())
    }

    /// Number of elements of a sequence or entries of a map; zero otherwise.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.data().map(|data| &data.value) {
            Some(NodeValue::Sequence(children)) => children.len(),
            Some(NodeValue::Map(pairs)) => pairs.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `key` without modifying the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when this node is a scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::{Document, NodeType};
    ///
    /// let doc = Document::new();
    /// let missing = doc.root().get(0).unwrap();
    /// assert_eq!(missing.kind(), NodeType::Undefined);
    /// assert_eq!(doc.root().kind(), NodeType::Undefined);
    /// ```
    pub fn get<K: NodeKey>(&self, key: K) -> Result<NodeRef<'a>> {
        let Some(id) = self.id else {
            return Ok(*self);
        };
        Ok(match self.doc.lookup(id, key)? {
            Some(found) => self.doc.node(found),
            None => NodeRef::detached(self.doc),
        })
    }

    /// Decodes this node as `T`, returning `None` on any mismatch.
    #[must_use]
    pub fn decode<T: Convertible>(&self) -> Option<T> {
        T::decode(*self)
    }

    /// Decodes this node as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadConversion`] when the node does not hold a `T`.
    pub fn convert<T: Convertible>(&self) -> Result<T> {
        self.decode()
            .ok_or_else(|| Error::bad_conversion(std::any::type_name::<T>()))
    }

    /// Returns `true` when both handles name the same arena slot.
    #[must_use]
    pub fn same_node(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id.is_some() && self.id == other.id
    }

    #[must_use]
    pub fn begin(&self) -> NodeIter<'a> {
        NodeIter::new(self.doc, self.id, self.start_position(), self.end_position())
    }

    #[must_use]
    pub fn end(&self) -> NodeIter<'a> {
        let end = self.end_position();
        NodeIter::new(self.doc, self.id, end, end)
    }

    /// Iterates over the elements or entries of this node.
    #[must_use]
    pub fn iter(&self) -> NodeIter<'a> {
        self.begin()
    }

    fn start_position(&self) -> IterPosition {
        match self.kind() {
            NodeType::Sequence => IterPosition::Sequence(0),
            NodeType::Map => IterPosition::Map(0),
            _ => IterPosition::None,
        }
    }

    fn end_position(&self) -> IterPosition {
        match self.kind() {
            NodeType::Sequence => IterPosition::Sequence(self.len()),
            NodeType::Map => IterPosition::Map(self.len()),
            _ => IterPosition::None,
        }
    }

    pub(crate) fn children(&self) -> &'a [NodeId] {
        match self.data().map(|data| &data.value) {
            Some(NodeValue::Sequence(children)) => children,
            _ => &[],
        }
    }

    pub(crate) fn pairs(&self) -> &'a [(NodeId, NodeId)] {
        match self.data().map(|data| &data.value) {
            Some(NodeValue::Map(pairs)) => pairs,
            _ => &[],
        }
    }
}

impl<'a> IntoIterator for NodeRef<'a> {
    type Item = crate::IterValue<NodeRef<'a>>;
    type IntoIter = NodeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Renders the subtree with a default-configured [`Emitter`].
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Emitter::new();
        out.emit(*self);
        f.write_str(out.as_str())
    }
}

/// A mutable handle to a node.
pub struct NodeMut<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        self.doc.node(self.id)
    }

    #[must_use]
    pub fn kind(&self) -> NodeType {
        self.doc.kind(self.id)
    }

    /// Looks up `key`, building the missing structure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when this node is a scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_node::{Document, NodeType};
    ///
    /// let mut doc = Document::new();
    /// doc.root_mut().get_mut(0).unwrap().set("first");
    /// assert_eq!(doc.root().kind(), NodeType::Sequence);
    ///
    /// doc.root_mut().get_mut("name").unwrap().set("now a map");
    /// assert_eq!(doc.root().kind(), NodeType::Map);
    /// assert_eq!(doc.root().len(), 1);
    /// ```
    pub fn get_mut<K: NodeKey>(&mut self, key: K) -> Result<NodeMut<'_>> {
        let child = self.doc.lookup_or_insert(self.id, key)?;
        Ok(self.doc.handle_mut(child))
    }

    /// Like [`get_mut`](Self::get_mut) but consumes the handle, keeping the
    /// full document borrow.
    pub fn into_child<K: NodeKey>(self, key: K) -> Result<NodeMut<'a>> {
        let NodeMut { doc, id } = self;
        let child = doc.lookup_or_insert(id, key)?;
        Ok(doc.handle_mut(child))
    }

    /// Replaces this node's content with the encoding of `value`.
    pub fn set<T: Encode>(&mut self, value: T) {
        self.doc.assign(self.id, value.encode());
    }

    /// Replaces this node's content with the root of `value`, without copying.
    pub fn set_document(&mut self, value: Document) {
        self.doc.assign(self.id, value);
    }

    pub fn set_null(&mut self) {
        self.data_mut().value = NodeValue::Null;
    }

    pub fn set_scalar(&mut self, text: impl Into<String>) {
        self.data_mut().value = NodeValue::Scalar(text.into());
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.data_mut().tag = Some(tag.into());
    }

    pub fn set_type(&mut self, kind: NodeType) {
        reset_type(self.data_mut(), kind);
    }

    fn data_mut(&mut self) -> &mut NodeData {
        self.doc.memory.node_mut(self.id)
    }

    /// Appends the encoding of `value` to this sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadPushback`] when this node is a scalar or a map.
    pub fn push<T: Encode>(&mut self, value: T) -> Result<()> {
        match self.kind() {
            NodeType::Scalar | NodeType::Map => Err(Error::bad_pushback(self.kind())),
            _ => {
                let child = self.doc.adopt(value.encode());
                self.doc.append_sequence_child(self.id, child)
            }
        }
    }

    /// Sets `key` to `value`, overwriting the entry of a value-equal key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadSubscript`] when this node is a scalar.
    pub fn insert<K: NodeKey, T: Encode>(&mut self, key: K, value: T) -> Result<()> {
        self.get_mut(key)?.set(value);
        Ok(())
    }

    /// Removes the entry for `key`; `false` when nothing matched.
    pub fn remove<K: NodeKey>(&mut self, key: K) -> bool {
        self.doc.remove(self.id, key)
    }

    /// Mutable iteration over this node's elements or entries.
    pub fn begin(&mut self) -> NodeIterMut<'_> {
        let node = self.doc.node(self.id);
        let start = node.start_position();
        let end = node.end_position();
        NodeIterMut::new(self.doc, self.id, start, end)
    }
}

impl fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}
