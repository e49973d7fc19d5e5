// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Document.
//!
//! ## Feature
//!
//! Enable with `document_adapter` (on by default).
//!
//! ## Notes
//!
//! - Attributes map one-to-one onto [`AttrKey::name`].
//! - Hit testing only considers visible, pickable nodes. [`DocumentOverlay`]
//!   inserts its element without [`NodeFlags::PICKABLE`], so the tooltip never
//!   hides the content underneath it from the next probe.
//! - The document reports mutations, so an installed [`Tooltip`](crate::Tooltip)
//!   always runs in [`WatchStrategy::Observe`](crate::watch::WatchStrategy::Observe).
//!   Wrap the document if polling is wanted instead.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_document::{
    Document, Element, MutationKind, NodeFlags, NodeId, ObserveInit, QueryFilter,
};
use unicode_width::UnicodeWidthStr;

use crate::overlay::{Frame, Overlay};
use crate::types::{AttrKey, AttributeStore, ContentKind, TooltipContent, TooltipTree, TreeMutation};

/// Attribute on the overlay element naming its content kind, `"text"` or `"html"`.
pub const CONTENT_KIND_ATTRIBUTE: &str = "data-content-kind";

impl AttributeStore for Document {
    type Node = NodeId;

    fn get_raw(&self, node: NodeId, key: AttrKey) -> Option<&str> {
        self.attribute(node, key.name())
    }

    fn set_raw(&mut self, node: NodeId, key: AttrKey, value: &str) {
        self.set_attribute(node, key.name(), value);
    }

    fn clear_raw(&mut self, node: NodeId, key: AttrKey) {
        self.remove_attribute(node, key.name());
    }
}

impl TooltipTree for Document {
    fn root(&self) -> Option<NodeId> {
        Self::root(self)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).to_vec()
    }

    fn is_svg_shape(&self, node: NodeId) -> bool {
        Self::is_svg_shape(self, node)
    }

    fn nested_title(&self, node: NodeId) -> Option<NodeId> {
        self.child_by_tag(node, "title")
    }

    fn text_of(&self, node: NodeId) -> Option<&str> {
        self.text(node)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        Self::set_text(self, node, text);
    }

    fn node_at(&self, point: Point) -> Option<NodeId> {
        let filter = QueryFilter {
            visible_only: true,
            pickable_only: true,
        };
        self.hit_test_point(point, filter).map(|hit| hit.node)
    }

    fn observation_supported(&self) -> bool {
        true
    }

    fn observe(&mut self, root: NodeId, key: AttrKey) {
        let init = ObserveInit {
            attributes: true,
            attribute_filter: Some(alloc::vec![String::from(key.name())]),
            child_list: true,
            subtree: true,
        };
        Self::observe(self, root, init);
    }

    fn disconnect(&mut self) {
        Self::disconnect(self);
    }

    fn take_mutations(&mut self) -> Vec<TreeMutation<NodeId>> {
        self.take_records()
            .into_iter()
            .filter_map(|record| match record.kind {
                MutationKind::Attributes => {
                    let key = AttrKey::from_name(record.attribute_name.as_deref()?)?;
                    Some(TreeMutation::Attribute {
                        target: record.target,
                        key,
                    })
                }
                MutationKind::ChildList => Some(TreeMutation::Subtree {
                    target: record.target,
                    added: record.added,
                }),
            })
            .collect()
    }
}

/// An overlay that lives as a `div` under the document root.
///
/// Text is measured in terminal-style cells: every line is as wide as its
/// Unicode display width times [`DocumentOverlay::char_width`]. HTML content is
/// measured with its tags stripped. Bounds are written in world coordinates, so
/// the document root is expected to carry an identity transform.
#[derive(Clone, Debug)]
pub struct DocumentOverlay {
    node: Option<NodeId>,
    created: usize,
    /// Width of one display cell.
    pub char_width: f64,
    /// Height of one line.
    pub line_height: f64,
    /// Padding on every side.
    pub padding: f64,
}

impl Default for DocumentOverlay {
    fn default() -> Self {
        Self::new(7.0, 16.0, 4.0)
    }
}

impl DocumentOverlay {
    /// Create an overlay with the given text metrics.
    pub fn new(char_width: f64, line_height: f64, padding: f64) -> Self {
        Self {
            node: None,
            created: 0,
            char_width,
            line_height,
            padding,
        }
    }

    /// The live overlay element.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// How many overlay elements have been created so far.
    pub fn created_count(&self) -> usize {
        self.created
    }

    fn write(&self, doc: &mut Document, node: NodeId, content: &TooltipContent, frame: &Frame<'_>) {
        doc.set_text(node, content.value().unwrap_or_default());
        doc.set_bounds(node, frame.bounds);
        doc.set_attribute(node, "class", frame.class);
        doc.set_attribute(node, CONTENT_KIND_ATTRIBUTE, kind_name(content.kind()));
    }
}

impl Overlay<Document> for DocumentOverlay {
    fn measure(&mut self, _doc: &Document, content: &TooltipContent) -> Size {
        let (cells, lines) = match content {
            TooltipContent::None => (0, 0),
            TooltipContent::Text(text) => text_extent(text),
            TooltipContent::Html(html) => text_extent(&strip_tags(html)),
        };
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tooltip text is far below 2^52 cells."
        )]
        let (cells, lines) = (cells as f64, lines as f64);
        Size::new(
            cells * self.char_width + 2.0 * self.padding,
            lines * self.line_height + 2.0 * self.padding,
        )
    }

    fn viewport(&self, doc: &Document) -> Rect {
        doc.root()
            .and_then(|root| doc.world_bounds(root))
            .unwrap_or(Rect::ZERO)
    }

    fn create(&mut self, doc: &mut Document, content: &TooltipContent, frame: &Frame<'_>) {
        if let Some(old) = self.node.take() {
            doc.remove(old);
        }
        let Some(root) = doc.root() else {
            return;
        };
        let node = doc.insert(
            Some(root),
            Element::html("div")
                .with_z_index(i32::MAX)
                .with_flags(NodeFlags::VISIBLE),
        );
        self.write(doc, node, content, frame);
        self.node = Some(node);
        self.created += 1;
    }

    fn update(&mut self, doc: &mut Document, content: &TooltipContent, frame: &Frame<'_>) {
        if let Some(node) = self.node {
            self.write(doc, node, content, frame);
        }
    }

    fn hide(&mut self, doc: &mut Document) {
        if let Some(node) = self.node {
            doc.set_flags(node, NodeFlags::empty());
        }
    }

    fn destroy(&mut self, doc: &mut Document) {
        if let Some(node) = self.node.take() {
            doc.remove(node);
        }
    }
}

fn kind_name(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Html => "html",
        ContentKind::Text | ContentKind::None => "text",
    }
}

// (widest line in display cells, line count)
fn text_extent(text: &str) -> (usize, usize) {
    text.lines()
        .fold((0, 0), |(w, n), line| (w.max(line.width()), n + 1))
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
