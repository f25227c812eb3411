//! Arena-backed layout tree.
//!
//! Elements live in an [`indextree::Arena`]; containers own their children
//! through the arena and each child keeps a non-owning parent handle. Nodes
//! are inserted detached and then attached with [`LayoutTree::add_child`].

use indextree::Arena;
use tracing::trace;

use crate::error::{KeyboardError, Result};
use crate::models::{Bounds, Element, ElementId, KeyData, Point};

pub use indextree::NodeId;

/// Tree of keyboard, sections, rows and keys.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    arena: Arena<Element>,
}

impl LayoutTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Adds a detached element and returns its handle.
    pub fn insert(&mut self, element: Element) -> NodeId {
        self.arena.new_node(element)
    }

    /// Number of elements in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.count()
    }

    /// Returns `true` if the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Element behind a handle.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.arena
            .get(node)
            .filter(|n| !n.is_removed())
            .map(indextree::Node::get)
    }

    /// Mutable element behind a handle.
    ///
    /// Topology can't be changed through this reference; only the element's
    /// own data.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.arena
            .get_mut(node)
            .filter(|n| !n.is_removed())
            .map(indextree::Node::get_mut)
    }

    /// Element behind a handle, or `InvalidHandle`.
    pub fn element(&self, node: NodeId) -> Result<&Element> {
        self.get(node).ok_or(KeyboardError::InvalidHandle)
    }

    /// Appends `child` to `container`'s children and sets its parent.
    ///
    /// # Errors
    ///
    /// - `DuplicateChild` if `child` already has a parent
    /// - `NotAContainer` if `container` is a key
    /// - `CyclicInsertion` if `child` is `container` or one of its ancestors
    ///
    /// Nothing is changed when an error is returned.
    pub fn add_child(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        let parent = self.element(container)?;
        let parent_id = parent.id;
        if !parent.is_container() {
            return Err(KeyboardError::NotAContainer { element: parent_id });
        }

        let child_id = self.element(child)?.id;
        if self.arena[child].parent().is_some() {
            return Err(KeyboardError::DuplicateChild { child: child_id });
        }
        if container.ancestors(&self.arena).any(|n| n == child) {
            return Err(KeyboardError::CyclicInsertion { child: child_id });
        }

        container
            .checked_append(child, &mut self.arena)
            .map_err(|_| KeyboardError::CyclicInsertion { child: child_id })?;
        trace!(parent = %parent_id, child = %child_id, "attached element");
        Ok(())
    }

    /// Parent handle, `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(indextree::Node::parent)
    }

    /// Direct children in insertion order. Empty for a handle that isn't
    /// part of this tree.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(node)
            .map(|_| node)
            .into_iter()
            .flat_map(move |n| n.children(&self.arena))
    }

    /// Number of ancestors above the node (0 for a root).
    pub fn depth(&self, node: NodeId) -> Result<usize> {
        self.element(node)?;
        Ok(node.ancestors(&self.arena).skip(1).count())
    }

    /// Depth-first search in insertion order; the root itself is checked first.
    ///
    /// Returns the first element carrying `id`.
    #[must_use]
    pub fn find_by_id(&self, root: NodeId, id: ElementId) -> Option<NodeId> {
        self.descendants(root).find(|n| self.arena[*n].get().id == id)
    }

    /// First key under `root` with the given keycode, in traversal order.
    #[must_use]
    pub fn find_by_keycode(&self, root: NodeId, keycode: u32) -> Option<NodeId> {
        self.keys(root)
            .find(|(_, key)| key.keycode == keycode)
            .map(|(node, _)| node)
    }

    /// All keys under `root` in traversal order.
    pub fn keys(&self, root: NodeId) -> impl Iterator<Item = (NodeId, &KeyData)> + '_ {
        self.descendants(root)
            .filter_map(|n| self.arena[n].get().as_key().map(|key| (n, key)))
    }

    fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        // Handles from another arena yield nothing instead of panicking.
        self.get(root)
            .map(|_| root)
            .into_iter()
            .flat_map(move |r| r.descendants(&self.arena))
    }

    /// Extent of the element in its own coordinate space.
    ///
    /// A key covers `(0, 0, width, height)`. A container covers the union of
    /// its children as placed in its space, or nothing at its origin when it
    /// has no children.
    pub fn local_extent(&self, node: NodeId) -> Result<Bounds> {
        let element = self.element(node)?;
        if !element.is_container() {
            return Ok(element.bounds.local());
        }
        let mut extent: Option<Bounds> = None;
        for child in node.children(&self.arena) {
            let placed = self.effective_bounds(child)?;
            extent = Some(extent.map_or(placed, |e| e.union(&placed)));
        }
        Ok(extent.unwrap_or_else(|| Bounds::empty_at(0.0, 0.0)))
    }

    /// Bounds of the element in its parent's space, after rotation.
    ///
    /// The local extent is rotated about the element's origin and moved to
    /// the element's position. An empty container yields a zero-area box at
    /// its position.
    pub fn effective_bounds(&self, node: NodeId) -> Result<Bounds> {
        let element = self.element(node)?;
        let origin = element.bounds.origin();
        Ok(self
            .local_extent(node)?
            .rotated(element.angle)
            .translated(origin.x, origin.y))
    }

    /// Converts a point from the parent's space into the element's space.
    pub fn to_local(&self, node: NodeId, point: Point) -> Result<Point> {
        let element = self.element(node)?;
        Ok(point
            .translate(-element.bounds.x, -element.bounds.y)
            .rotate(element.angle.inverse()))
    }

    /// Tests a point given in the parent's space against the element.
    ///
    /// Keys with an outline are tested against the rounded polygon; other
    /// elements against their local extent.
    pub fn hit_test(&self, node: NodeId, point: Point) -> Result<bool> {
        let local = self.to_local(node, point)?;
        let element = self.element(node)?;
        if let Some(outline) = element.as_key().and_then(|key| key.outline.as_deref()) {
            return Ok(outline.contains(local));
        }
        Ok(self.local_extent(node)?.contains(local))
    }

    /// Finds the first key, in traversal order, under a point given in the
    /// space of `root`'s parent.
    pub fn find_key_at(&self, root: NodeId, point: Point) -> Result<Option<NodeId>> {
        let element = self.element(root)?;
        if !element.is_container() {
            return Ok(self.hit_test(root, point)?.then_some(root));
        }
        let local = self.to_local(root, point)?;
        for child in root.children(&self.arena) {
            if let Some(found) = self.find_key_at(child, local)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
