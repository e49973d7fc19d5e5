// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, namespaces, and element descriptors.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, Rect};

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers
/// to a live node. Every accessor treats a stale id as absent, and every mutator ignores it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (rendered, and considered by visible-only queries).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Markup namespace of an element.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Namespace {
    /// Plain HTML element.
    #[default]
    Html,
    /// SVG element.
    Svg,
}

/// SVG element names that draw geometry and may carry a `<title>` child.
const SVG_SHAPES: &[&str] = &[
    "circle", "ellipse", "g", "image", "line", "path", "polygon", "polyline", "rect", "text",
    "use",
];

/// Descriptor for a node at insert time.
///
/// Geometry is local: `bounds` are expressed in the parent's space after
/// `transform` is applied, mirroring how a layout pass hands results over.
#[derive(Clone, Debug)]
pub struct Element {
    /// Tag name, lower case (`"div"`, `"rect"`, `"title"`).
    pub tag: String,
    /// Markup namespace.
    pub namespace: Namespace,
    /// Local (untransformed) bounds.
    pub bounds: Rect,
    /// Local transform relative to parent space (scroll offsets, translations).
    pub transform: Affine,
    /// Z-order; higher is on top during hit testing.
    pub z_index: i32,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
    /// Initial attributes as `(name, value)` pairs.
    pub attributes: Vec<(String, String)>,
    /// Initial text content.
    pub text: String,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            namespace: Namespace::Html,
            bounds: Rect::ZERO,
            transform: Affine::IDENTITY,
            z_index: 0,
            flags: NodeFlags::default(),
            attributes: Vec::new(),
            text: String::new(),
        }
    }
}

impl Element {
    /// An HTML element with the given tag.
    pub fn html(tag: &str) -> Self {
        Self {
            tag: String::from(tag),
            ..Default::default()
        }
    }

    /// An SVG element with the given tag.
    pub fn svg(tag: &str) -> Self {
        Self {
            tag: String::from(tag),
            namespace: Namespace::Svg,
            ..Default::default()
        }
    }

    /// Set local bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Set the z-index.
    #[must_use]
    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Set flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Add an attribute, replacing an earlier one of the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.retain(|(n, _)| n != name);
        self.attributes.push((String::from(name), String::from(value)));
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = String::from(text);
        self
    }

    /// Whether this element is an SVG shape (may own a nested `<title>`).
    pub fn is_svg_shape(&self) -> bool {
        is_svg_shape(self.namespace, &self.tag)
    }
}

pub(crate) fn is_svg_shape(namespace: Namespace, tag: &str) -> bool {
    namespace == Namespace::Svg && SVG_SHAPES.contains(&tag)
}
