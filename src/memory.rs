//! Node arena.
//!
//! Every node of a [`Document`](crate::Document) lives in one [`Memory`].
//! Nodes refer to each other through [`NodeId`] indices, never through
//! pointers, so a node handle stays valid for as long as its arena does.
//!
//! A value encoded on its own (for example a map key) is built in a
//! temporary arena. Attaching it to an existing tree goes through
//! [`Memory::merge`], which moves the temporary nodes over and shifts their
//! child indices by the receiving arena's length.

use crate::node::NodeData;

/// Index into a document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Shifts the id by `offset`, used when the owning arena is merged
    /// into another one.
    #[inline]
    #[must_use]
    pub(crate) fn rebased(self, offset: usize) -> Self {
        NodeId::new(self.index() + offset)
    }
}

/// Owning storage for every node of one document.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    nodes: Vec<NodeData>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new Undefined node and returns its id.
    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData::default());
        id
    }

    /// Moves every node of `other` into this arena.
    ///
    /// Returns the offset that was added to each of `other`'s ids; callers
    /// use it to translate handles they held into `other`.
    pub fn merge(&mut self, other: Memory) -> usize {
        let offset = self.nodes.len();
        tracing::debug!(
            into = offset,
            moved = other.nodes.len(),
            "merging node arena"
        );
        self.nodes.reserve(other.nodes.len());
        for mut data in other.nodes {
            data.rebase(offset);
            self.nodes.push(data);
        }
        offset
    }

    /// Number of nodes owned, including nodes no longer reachable from a root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a node of this arena.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index())
    }

    /// Callers hold ids checked against this arena.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }
}
