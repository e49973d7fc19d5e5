// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Document: a small in-memory element tree for UI hosts.
//!
//! The document models the parts of a markup tree that interaction code cares about:
//!
//! - A hierarchy of elements with generational [`NodeId`] handles.
//! - Named string attributes and text content per element.
//! - HTML/SVG [`Namespace`]s, so SVG shapes with nested `<title>` children can be recognised.
//! - Local bounds, transforms, z-order, and [`NodeFlags`] for point hit testing.
//! - A mutation log gated by [`Document::observe`]/[`Document::disconnect`], recording
//!   attribute and child-list changes below an observed node.
//!
//! It is not a layout engine or a renderer: upstream code writes the geometry,
//! and downstream code reads hits and records.
//!
//! ## API overview
//!
//! - [`Document`]: container managing nodes, attributes, and mutation records.
//! - [`Element`]: insert-time descriptor (tag, namespace, geometry, attributes, text).
//! - [`NodeFlags`]: visibility and picking controls. Nodes without
//!   [`NodeFlags::PICKABLE`] never intercept hit tests, which is how overlays stay
//!   out of the way of the content underneath them.
//! - [`QueryFilter`]: restricts hit-test results (visible/pickable).
//! - [`ObserveInit`] / [`MutationRecord`]: observation options and recorded changes.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_document::{Document, Element, QueryFilter};
//! use kurbo::{Point, Rect};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::html("html").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let button = doc.insert(
//!     Some(root),
//!     Element::html("button")
//!         .with_bounds(Rect::new(10.0, 10.0, 90.0, 40.0))
//!         .with_attribute("title", "Save the file"),
//! );
//!
//! let filter = QueryFilter { visible_only: true, pickable_only: true };
//! let hit = doc.hit_test_point(Point::new(20.0, 20.0), filter).unwrap();
//! assert_eq!(hit.node, button);
//! assert_eq!(doc.attribute(button, "title"), Some("Save the file"));
//! ```
//!
//! ## Observing mutations
//!
//! ```
//! use understory_document::{Document, Element, MutationKind, ObserveInit};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::html("html"));
//! let div = doc.insert(Some(root), Element::html("div"));
//!
//! doc.observe(root, ObserveInit {
//!     attributes: true,
//!     attribute_filter: Some(vec!["title".into()]),
//!     child_list: true,
//!     subtree: true,
//! });
//! doc.set_attribute(div, "title", "Hello");
//! let records = doc.take_records();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].kind, MutationKind::Attributes);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod mutation;
mod types;

pub use document::{Document, Hit, QueryFilter};
pub use mutation::{MutationKind, MutationRecord, ObserveInit};
pub use types::{Element, Namespace, NodeFlags, NodeId};
