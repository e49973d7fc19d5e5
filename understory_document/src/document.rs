// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, queries, and mutation recording.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect};

use crate::mutation::{MutationRecord, ObserveInit};
use crate::types::{Element, Namespace, NodeFlags, NodeId, is_svg_shape};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An element tree with attributes and geometry.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: Option<NodeId>,
    observer: Option<(NodeId, ObserveInit)>,
    records: Vec<MutationRecord>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("observing", &self.observer.is_some())
            .field("pending_records", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Document::hit_test_point`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider nodes marked [`NodeFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider nodes marked [`NodeFlags::PICKABLE`].
    pub pickable_only: bool,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tag: String,
    namespace: Namespace,
    bounds: Rect,
    transform: Affine,
    z_index: i32,
    flags: NodeFlags,
    attributes: Vec<(String, String)>,
    text: String,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            tag: element.tag,
            namespace: element.namespace,
            bounds: element.bounds,
            transform: element.transform,
            z_index: element.z_index,
            flags: element.flags,
            attributes: element.attributes,
            text: element.text,
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
            observer: None,
            records: Vec::new(),
        }
    }

    /// The document root: the first parentless node inserted (if still alive).
    pub fn root(&self) -> Option<NodeId> {
        self.root.filter(|r| self.is_alive(*r))
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// Inserting under a stale parent produces a detached node.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slots are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slots are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        match parent {
            Some(p) if self.is_alive(p) => {
                self.link_parent(id, p);
                self.record_child_list(p, alloc::vec![id], Vec::new());
            }
            Some(_) => {}
            None => {
                if self.root().is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    /// Remove a node (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        let parent = self.node(id).parent;
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
            self.record_child_list(parent, Vec::new(), alloc::vec![id]);
        }
        self.free_subtree(id);
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Tag name of `id`.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| n.tag.as_str())
    }

    /// Whether `id` is an SVG shape element.
    pub fn is_svg_shape(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| is_svg_shape(n.namespace, &n.tag))
    }

    /// First child of `id` with the given tag.
    pub fn child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.tag(*c) == Some(tag))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Attribute value of `id`.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node_opt(id)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute. Always recorded, even if the value is unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        match node.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => node
                .attributes
                .push((String::from(name), String::from(value))),
        }
        self.record_attribute(id, name);
    }

    /// Remove an attribute, returning its previous value. Only recorded if it existed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node_opt_mut(id)?;
        let pos = node.attributes.iter().position(|(n, _)| n == name)?;
        let (_, old) = node.attributes.remove(pos);
        self.record_attribute(id, name);
        Some(old)
    }

    /// Text content of `id`.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| n.text.as_str())
    }

    /// Replace the text content of `id`. Recorded as a child-list change on `id`.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.text.clear();
        node.text.push_str(text);
        self.record_child_list(id, Vec::new(), Vec::new());
    }

    /// Update local bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.bounds = bounds;
        }
    }

    /// Update flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// Flags of `id`.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// World-space bounding box of `id` (conservative under rotation/shear).
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        Some(transform_rect_bbox(self.world_transform(id), node.bounds))
    }

    /// Hit test a world-space point. Returns the topmost matching node.
    ///
    /// Nodes are ranked by z-index, then by depth (descendants above their
    /// ancestors), then by slot order. Honors [`QueryFilter`].
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best: Option<(NodeId, (i32, usize))> = None;
        for (idx, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot.as_ref() else {
                continue;
            };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slots are 32-bit."
            )]
            let id = NodeId::new(idx as u32, node.generation);
            if filter.visible_only && !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            if filter.pickable_only && !node.flags.contains(NodeFlags::PICKABLE) {
                continue;
            }
            let world = transform_rect_bbox(self.world_transform(id), node.bounds);
            if !world.contains(pt) {
                continue;
            }
            let rank = (node.z_index, self.depth(id));
            match best {
                Some((_, best_rank)) if rank < best_rank => {}
                _ => best = Some((id, rank)),
            }
        }
        best.map(|(node, _)| Hit {
            node,
            path: self.path_to_root(node),
        })
    }

    /// Start recording mutations at or below `target` (see [`ObserveInit::subtree`]).
    ///
    /// Replaces any previous observation.
    pub fn observe(&mut self, target: NodeId, init: ObserveInit) {
        if self.is_alive(target) {
            self.observer = Some((target, init));
        }
    }

    /// Stop recording and drop pending records.
    pub fn disconnect(&mut self) {
        self.observer = None;
        self.records.clear();
    }

    /// Whether mutations are currently recorded.
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Take all pending mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        core::mem::take(&mut self.records)
    }

    /// Number of pending mutation records.
    pub fn pending_records(&self) -> usize {
        self.records.len()
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            let parent = self.node(id).parent;
            match parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    fn world_transform(&self, id: NodeId) -> Affine {
        self.path_to_root(id)
            .iter()
            .fold(Affine::IDENTITY, |acc, n| acc * self.node(*n).transform)
    }

    fn observes(&self, target: NodeId) -> Option<&ObserveInit> {
        let (observed, init) = self.observer.as_ref()?;
        let covered = if init.subtree {
            self.is_inclusive_ancestor(*observed, target)
        } else {
            *observed == target
        };
        covered.then_some(init)
    }

    fn record_attribute(&mut self, target: NodeId, name: &str) {
        if self.observes(target).is_some_and(|i| i.wants_attribute(name)) {
            self.records.push(MutationRecord::attribute(target, name));
        }
    }

    fn record_child_list(&mut self, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        if self.observes(target).is_some_and(|i| i.child_list) {
            self.records
                .push(MutationRecord::child_list(target, added, removed));
        }
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in world space.
fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}
