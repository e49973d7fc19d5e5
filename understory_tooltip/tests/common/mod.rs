// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for tooltip integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use core::time::Duration;

use kurbo::{Point, Rect, Size};
use understory_document::{Document, Element, NodeId};
use understory_tooltip::overlay::{Frame, Overlay};
use understory_tooltip::{AttrKey, AttributeStore, TooltipContent, TooltipTree};

pub(crate) fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// An 800×600 body with one titled `div` at (100, 100)–(300, 200).
pub(crate) fn page() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.insert(
        None,
        Element::html("body").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)),
    );
    let div = doc.insert(
        Some(body),
        Element::html("div")
            .with_bounds(Rect::new(100.0, 100.0, 300.0, 200.0))
            .with_attribute("title", "Hi"),
    );
    (doc, body, div)
}

pub(crate) const IN_DIV: Point = Point::new(150.0, 150.0);
pub(crate) const ON_BODY: Point = Point::new(50.0, 50.0);

/// The overlay as last rendered.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Live {
    pub(crate) content: TooltipContent,
    pub(crate) bounds: Rect,
    pub(crate) class: String,
    pub(crate) visible: bool,
}

/// Overlay that records what the engine asked of it.
#[derive(Clone, Debug)]
pub(crate) struct Recorder {
    pub(crate) size: Size,
    pub(crate) viewport: Rect,
    pub(crate) live: Option<Live>,
    pub(crate) created: usize,
    pub(crate) updated: usize,
    pub(crate) destroyed: usize,
}

impl Default for Recorder {
    fn default() -> Self {
        Self {
            size: Size::new(80.0, 20.0),
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            live: None,
            created: 0,
            updated: 0,
            destroyed: 0,
        }
    }
}

impl Recorder {
    pub(crate) fn text(&self) -> Option<&str> {
        self.live.as_ref().and_then(|l| l.content.value())
    }
}

impl<T: TooltipTree + ?Sized> Overlay<T> for Recorder {
    fn measure(&mut self, _tree: &T, _content: &TooltipContent) -> Size {
        self.size
    }

    fn viewport(&self, _tree: &T) -> Rect {
        self.viewport
    }

    fn create(&mut self, _tree: &mut T, content: &TooltipContent, frame: &Frame<'_>) {
        assert!(self.live.is_none(), "overlay created while another is live");
        self.live = Some(Live {
            content: content.clone(),
            bounds: frame.bounds,
            class: frame.class.to_owned(),
            visible: true,
        });
        self.created += 1;
    }

    fn update(&mut self, _tree: &mut T, content: &TooltipContent, frame: &Frame<'_>) {
        let live = self.live.as_mut().expect("update without a live overlay");
        live.content = content.clone();
        live.bounds = frame.bounds;
        self.updated += 1;
    }

    fn hide(&mut self, _tree: &mut T) {
        if let Some(live) = self.live.as_mut() {
            live.visible = false;
        }
    }

    fn destroy(&mut self, _tree: &mut T) {
        assert!(self.live.take().is_some(), "destroy without a live overlay");
        self.destroyed += 1;
    }
}

/// A document that cannot report mutations, forcing the polling strategy.
#[derive(Debug)]
pub(crate) struct Polled(pub(crate) Document);

impl AttributeStore for Polled {
    type Node = NodeId;

    fn get_raw(&self, node: NodeId, key: AttrKey) -> Option<&str> {
        self.0.get_raw(node, key)
    }

    fn set_raw(&mut self, node: NodeId, key: AttrKey, value: &str) {
        self.0.set_raw(node, key, value);
    }

    fn clear_raw(&mut self, node: NodeId, key: AttrKey) {
        self.0.clear_raw(node, key);
    }
}

impl TooltipTree for Polled {
    fn root(&self) -> Option<NodeId> {
        self.0.root()
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.0.parent_of(node)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.0.children_of(node)
    }

    fn is_svg_shape(&self, node: NodeId) -> bool {
        self.0.is_svg_shape(node)
    }

    fn nested_title(&self, node: NodeId) -> Option<NodeId> {
        self.0.nested_title(node)
    }

    fn text_of(&self, node: NodeId) -> Option<&str> {
        self.0.text_of(node)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.0.set_text(node, text);
    }

    fn node_at(&self, point: Point) -> Option<NodeId> {
        self.0.node_at(point)
    }
}
