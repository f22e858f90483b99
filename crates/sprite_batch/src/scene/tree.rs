//! Arena-backed sprite tree
//!
//! Nodes live in a slot map and refer to each other by [`SpriteId`]. Children
//! are kept sorted by `(z_order, arrival)`, where `arrival` is a stamp taken
//! every time a node is attached or reordered, so equal z-orders keep the order
//! in which they arrived.
//!
//! Batch bookkeeping (`atlas_index`, the owning batch) is stored on the node but
//! only the batch module may write it. [`SpriteTree::detach`] refuses batched
//! nodes and [`SpriteTree::attach`] refuses batched parents, so sprites enter
//! and leave a batch only through the batch itself.

use crate::foundation::collections::{SpriteId, SpriteMap};
use crate::render::{Quad, TextureId};

use super::sprite::AtlasRenderable;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised by tree mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The handle does not refer to a live node
    #[error("Unknown node: {0:?}")]
    UnknownNode(SpriteId),

    /// The node already has a parent
    #[error("Node {0:?} is already attached to a parent")]
    AlreadyAttached(SpriteId),

    /// The node has no parent to detach from
    #[error("Node {0:?} is not attached to a parent")]
    NotAttached(SpriteId),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent
        parent: SpriteId,
        /// Node being attached
        child: SpriteId,
    },

    /// The node belongs to a batch and must be removed through it
    #[error("Node {0:?} is batched; remove it through its batch")]
    Batched(SpriteId),
}

#[derive(Debug)]
pub(crate) struct SpriteNode {
    pub(crate) parent: Option<SpriteId>,
    pub(crate) children: Vec<SpriteId>,
    pub(crate) z_order: i32,
    pub(crate) arrival: u64,
    pub(crate) tag: Option<i32>,
    pub(crate) atlas_index: Option<usize>,
    pub(crate) batch: Option<SpriteId>,
    pub(crate) batch_root: bool,
    pub(crate) dirty: bool,
    pub(crate) content: Option<Box<dyn AtlasRenderable>>,
}

impl SpriteNode {
    fn new(content: Option<Box<dyn AtlasRenderable>>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            z_order: 0,
            arrival: 0,
            tag: None,
            atlas_index: None,
            batch: None,
            batch_root: false,
            dirty: false,
            content,
        }
    }
}

/// Tree of sprites stored in an arena
#[derive(Debug, Default)]
pub struct SpriteTree {
    nodes: SpriteMap<SpriteNode>,
    next_arrival: u64,
}

impl SpriteTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unattached node holding `content`
    pub fn create<T: AtlasRenderable>(&mut self, content: T) -> SpriteId {
        self.create_boxed(Box::new(content))
    }

    /// Create an unattached node holding boxed content
    pub fn create_boxed(&mut self, content: Box<dyn AtlasRenderable>) -> SpriteId {
        self.nodes.insert(SpriteNode::new(Some(content)))
    }

    /// Create an unattached node with no content, used to group children
    pub fn create_container(&mut self) -> SpriteId {
        self.nodes.insert(SpriteNode::new(None))
    }

    /// Destroy a detached node and its whole subtree; returns how many nodes went away
    pub fn destroy(&mut self, id: SpriteId) -> TreeResult<usize> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }

        let subtree = self.subtree(id);
        if let Some(batched) = subtree.iter().find(|&&node| self.batch(node).is_some()) {
            return Err(TreeError::Batched(*batched));
        }

        for node in &subtree {
            self.nodes.remove(*node);
        }
        log::trace!("Destroyed {} nodes under {:?}", subtree.len(), id);
        Ok(subtree.len())
    }

    /// Whether the handle refers to a live node
    pub fn contains(&self, id: SpriteId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -- Topology --

    /// Attach `child` under `parent` at z-order `z`
    ///
    /// Fails with [`TreeError::Batched`] when `parent` is a batch root or a
    /// batch member; use [`BatchNode::add_child_to`](crate::batch::BatchNode::add_child_to)
    /// for those.
    pub fn attach(&mut self, parent: SpriteId, child: SpriteId, z: i32) -> TreeResult<()> {
        let target = self.node(parent)?;
        if target.batch_root || target.batch.is_some() {
            return Err(TreeError::Batched(parent));
        }
        self.link(parent, child, z)
    }

    /// Attach `child` under `parent` and tag it
    pub fn attach_with_tag(&mut self, parent: SpriteId, child: SpriteId, z: i32, tag: i32) -> TreeResult<()> {
        self.attach(parent, child, z)?;
        self.node_mut(child)?.tag = Some(tag);
        Ok(())
    }

    /// Attach under a batch root or member; only the batch module calls this
    pub(crate) fn attach_batched(&mut self, parent: SpriteId, child: SpriteId, z: i32, tag: Option<i32>) -> TreeResult<()> {
        self.link(parent, child, z)?;
        if tag.is_some() {
            self.node_mut(child)?.tag = tag;
        }
        Ok(())
    }

    fn link(&mut self, parent: SpriteId, child: SpriteId, z: i32) -> TreeResult<()> {
        self.node(parent)?;
        let node = self.node(child)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if node.batch.is_some() {
            return Err(TreeError::Batched(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        let arrival = self.stamp();
        let node = self.node_mut(child)?;
        node.parent = Some(parent);
        node.z_order = z;
        node.arrival = arrival;
        self.insert_sorted(parent, child)
    }

    /// Detach `child` from its parent; returns the former parent
    pub fn detach(&mut self, child: SpriteId) -> TreeResult<SpriteId> {
        let node = self.node(child)?;
        if node.batch.is_some() {
            return Err(TreeError::Batched(child));
        }
        let parent = node.parent.ok_or(TreeError::NotAttached(child))?;

        self.node_mut(parent)?.children.retain(|&sibling| sibling != child);
        self.node_mut(child)?.parent = None;
        Ok(parent)
    }

    /// Change the z-order of a node, moving it behind any siblings with equal z
    ///
    /// Batched nodes are accepted; the owning batch must then be resynchronised
    /// with [`BatchNode::rebuild_index_in_order`](crate::batch::BatchNode::rebuild_index_in_order)
    /// before its next insertion, or the change made through
    /// [`BatchNode::reorder_child`](crate::batch::BatchNode::reorder_child).
    /// Insertions into a batch that has not been resynchronised may land out of
    /// order until the rebuild.
    pub fn set_z_order(&mut self, id: SpriteId, z: i32) -> TreeResult<()> {
        let arrival = self.stamp();
        let node = self.node_mut(id)?;
        node.z_order = z;
        node.arrival = arrival;

        if let Some(parent) = node.parent {
            self.node_mut(parent)?.children.retain(|&sibling| sibling != id);
            self.insert_sorted(parent, id)?;
        }
        Ok(())
    }

    /// Set or clear the tag of a node
    pub fn set_tag(&mut self, id: SpriteId, tag: Option<i32>) -> TreeResult<()> {
        self.node_mut(id)?.tag = tag;
        Ok(())
    }

    /// Parent of a node
    pub fn parent(&self, id: SpriteId) -> Option<SpriteId> {
        self.nodes.get(id)?.parent
    }

    /// Children of a node in draw order among siblings
    pub fn children(&self, id: SpriteId) -> &[SpriteId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Z-order of a node relative to its siblings
    pub fn z_order(&self, id: SpriteId) -> Option<i32> {
        self.nodes.get(id).map(|node| node.z_order)
    }

    /// Tag of a node
    pub fn tag(&self, id: SpriteId) -> Option<i32> {
        self.nodes.get(id)?.tag
    }

    /// First child of `parent` carrying `tag`
    pub fn child_by_tag(&self, parent: SpriteId, tag: i32) -> Option<SpriteId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.tag(child) == Some(tag))
    }

    /// Whether `ancestor` is a proper ancestor of `node`
    pub fn is_ancestor(&self, ancestor: SpriteId, node: SpriteId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `id` and all of its descendants, parents before children
    pub fn subtree(&self, id: SpriteId) -> Vec<SpriteId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // -- Batch bookkeeping (read-only outside the batch module) --

    /// Atlas index assigned by the owning batch
    pub fn atlas_index(&self, id: SpriteId) -> Option<usize> {
        self.nodes.get(id)?.atlas_index
    }

    /// Root of the batch the node belongs to
    pub fn batch(&self, id: SpriteId) -> Option<SpriteId> {
        self.nodes.get(id)?.batch
    }

    /// Whether the node's quad changed since its batch last wrote it
    pub fn is_dirty(&self, id: SpriteId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.dirty)
    }

    /// Flag the node's quad for rewriting on the next batch update
    pub fn mark_dirty(&mut self, id: SpriteId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.dirty = true;
        }
    }

    pub(crate) fn set_membership(&mut self, id: SpriteId, batch: Option<SpriteId>, atlas_index: Option<usize>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.batch = batch;
            node.atlas_index = atlas_index;
        }
    }

    pub(crate) fn set_batch_root(&mut self, id: SpriteId, batch_root: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.batch_root = batch_root;
        }
    }

    pub(crate) fn set_atlas_index(&mut self, id: SpriteId, atlas_index: usize) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.atlas_index = Some(atlas_index);
        }
    }

    pub(crate) fn take_dirty(&mut self, id: SpriteId) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|node| std::mem::take(&mut node.dirty))
    }

    // -- Content --

    /// Content of a node, if it has any
    pub fn content(&self, id: SpriteId) -> Option<&dyn AtlasRenderable> {
        self.nodes.get(id)?.content.as_deref()
    }

    /// Mutable content of a node; marks the node dirty
    pub fn content_mut(&mut self, id: SpriteId) -> Option<&mut (dyn AtlasRenderable + 'static)> {
        let node = self.nodes.get_mut(id)?;
        node.dirty = true;
        node.content.as_deref_mut()
    }

    /// Content downcast to a concrete type
    pub fn content_as<T: AtlasRenderable>(&self, id: SpriteId) -> Option<&T> {
        self.content(id)?.as_any().downcast_ref()
    }

    /// Mutable content downcast to a concrete type; marks the node dirty
    pub fn content_as_mut<T: AtlasRenderable>(&mut self, id: SpriteId) -> Option<&mut T> {
        self.content_mut(id)?.as_any_mut().downcast_mut()
    }

    /// Texture the node's content samples from
    pub fn texture_id(&self, id: SpriteId) -> Option<TextureId> {
        self.content(id).map(|content| content.texture_id())
    }

    /// Current quad of the node's content
    pub fn quad(&self, id: SpriteId) -> Option<Quad> {
        self.content(id).map(|content| content.quad())
    }

    /// Cancel transient state on `id` and every descendant
    pub fn cleanup(&mut self, id: SpriteId) {
        for node in self.subtree(id) {
            if let Some(content) = self.nodes.get_mut(node).and_then(|node| node.content.as_deref_mut()) {
                content.cleanup();
            }
        }
    }

    // -- Internals --

    pub(crate) fn node(&self, id: SpriteId) -> TreeResult<&SpriteNode> {
        self.nodes.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: SpriteId) -> TreeResult<&mut SpriteNode> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownNode(id))
    }

    fn stamp(&mut self) -> u64 {
        self.next_arrival += 1;
        self.next_arrival
    }

    /// Insert `child` into `parent`'s children after every sibling that sorts before it
    fn insert_sorted(&mut self, parent: SpriteId, child: SpriteId) -> TreeResult<()> {
        let key = {
            let node = self.node(child)?;
            (node.z_order, node.arrival)
        };
        let position = {
            let siblings = &self.node(parent)?.children;
            siblings.partition_point(|&sibling| {
                self.nodes
                    .get(sibling)
                    .is_some_and(|node| (node.z_order, node.arrival) <= key)
            })
        };
        self.node_mut(parent)?.children.insert(position, child);
        Ok(())
    }
}
