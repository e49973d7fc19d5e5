// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: attribute keys, the tree the engine reads, tooltip content, and overrides.
//!
//! ## Overview
//!
//! The engine never owns the document. It reaches it through two traits:
//!
//! - [`AttributeStore`]: raw get/set/clear of the tooltip attributes named by [`AttrKey`].
//! - [`TooltipTree`]: ancestry, SVG title lookup, hit testing, and (optionally)
//!   mutation observation.
//!
//! Both are implemented for `understory_document::Document` when the
//! `document_adapter` feature is enabled.

use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use kurbo::Point;

/// Tooltip attributes the engine reads and writes on a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttrKey {
    /// Native tooltip source text (`title`).
    RawTitle,
    /// Processed plain-text content (`data-tooltip-text`).
    ProcessedText,
    /// Processed HTML content (`data-tooltip-html`).
    ProcessedHtml,
    /// Per-node format override, `"text"` or `"html"` (`data-tooltip-format`).
    Format,
    /// Per-node display delay override in milliseconds (`data-tooltip-delay`).
    Delay,
}

impl AttrKey {
    /// All keys, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::RawTitle,
        Self::ProcessedText,
        Self::ProcessedHtml,
        Self::Format,
        Self::Delay,
    ];

    /// Attribute name used in markup.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RawTitle => "title",
            Self::ProcessedText => "data-tooltip-text",
            Self::ProcessedHtml => "data-tooltip-html",
            Self::Format => "data-tooltip-format",
            Self::Delay => "data-tooltip-delay",
        }
    }

    /// Key for an attribute name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Raw access to tooltip attributes on a node.
///
/// Implementations perform no validation and have no side effects beyond the
/// node. Stale or unknown nodes read as absent and ignore writes.
pub trait AttributeStore {
    /// Node handle.
    type Node: Copy + Eq + core::fmt::Debug;
    /// Read an attribute.
    fn get_raw(&self, node: Self::Node, key: AttrKey) -> Option<&str>;
    /// Write an attribute.
    fn set_raw(&mut self, node: Self::Node, key: AttrKey, value: &str);
    /// Remove an attribute.
    fn clear_raw(&mut self, node: Self::Node, key: AttrKey);
}

/// A mutation reported by a [`TooltipTree`] in observation mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeMutation<N> {
    /// The watched attribute changed on `target`.
    Attribute {
        /// Node whose attribute changed.
        target: N,
        /// Which attribute.
        key: AttrKey,
    },
    /// Children of `target` were inserted/removed or its text was replaced.
    Subtree {
        /// Node whose children or text changed.
        target: N,
        /// Inserted nodes (roots of inserted subtrees).
        added: Vec<N>,
    },
}

/// The document as seen by the tooltip engine.
pub trait TooltipTree: AttributeStore {
    /// Default root used when installation does not name one.
    fn root(&self) -> Option<Self::Node>;

    /// Parent of `node`, `None` for the tree root or a stale node.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Children of `node` in document order.
    fn children_of(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Whether `node` is an SVG shape element.
    fn is_svg_shape(&self, node: Self::Node) -> bool;

    /// Nested SVG `<title>` child of `node`, if any.
    fn nested_title(&self, node: Self::Node) -> Option<Self::Node>;

    /// Text content of `node`.
    fn text_of(&self, node: Self::Node) -> Option<&str>;

    /// Replace the text content of `node`.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Topmost node under a point, ignoring tooltip overlays.
    fn node_at(&self, point: Point) -> Option<Self::Node>;

    /// Whether the tree can report mutations.
    ///
    /// When `false`, the engine falls back to polling.
    fn observation_supported(&self) -> bool {
        false
    }

    /// Start reporting changes of `key` and child-list changes at or below `root`.
    fn observe(&mut self, _root: Self::Node, _key: AttrKey) {}

    /// Stop reporting and drop unreported changes.
    fn disconnect(&mut self) {}

    /// Drain reported changes.
    fn take_mutations(&mut self) -> Vec<TreeMutation<Self::Node>> {
        Vec::new()
    }
}

/// Kind of [`TooltipContent`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ContentKind {
    /// Plain text.
    Text,
    /// HTML markup.
    Html,
    /// No tooltip.
    None,
}

/// Tooltip content derived from a node's processed attributes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TooltipContent {
    /// No tooltip.
    #[default]
    None,
    /// Plain text.
    Text(String),
    /// HTML markup.
    Html(String),
}

impl TooltipContent {
    /// Content of `node`: processed text wins over processed HTML, and empty values are absent.
    pub fn of<S: AttributeStore + ?Sized>(store: &S, node: Option<S::Node>) -> Self {
        let Some(node) = node else {
            return Self::None;
        };
        if let Some(text) = non_empty(store.get_raw(node, AttrKey::ProcessedText)) {
            return Self::Text(String::from(text));
        }
        if let Some(html) = non_empty(store.get_raw(node, AttrKey::ProcessedHtml)) {
            return Self::Html(String::from(html));
        }
        Self::None
    }

    /// Kind of this content.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::None => ContentKind::None,
            Self::Text(_) => ContentKind::Text,
            Self::Html(_) => ContentKind::Html,
        }
    }

    /// Content string, `None` for [`TooltipContent::None`].
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Text(v) | Self::Html(v) => Some(v),
        }
    }

    /// Whether there is nothing to show.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// How a raw title is interpreted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TooltipFormat {
    /// Plain text (default).
    #[default]
    Text,
    /// HTML markup, stored verbatim.
    Html,
}

/// Error parsing a [`TooltipFormat`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown tooltip format `{0}`, expected `text` or `html`")]
pub struct ParseFormatError(String);

impl FromStr for TooltipFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            v if v.eq_ignore_ascii_case("text") => Ok(Self::Text),
            v if v.eq_ignore_ascii_case("html") => Ok(Self::Html),
            other => Err(ParseFormatError(String::from(other))),
        }
    }
}

/// A per-node display delay override in milliseconds.
///
/// Zero and negative values mean "show immediately".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DelayOverride(pub i64);

/// Error parsing a [`DelayOverride`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid tooltip delay `{0}`, expected whole milliseconds")]
pub struct ParseDelayError(String);

impl FromStr for DelayOverride {
    type Err = ParseDelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseDelayError(String::from(s.trim())))
    }
}

pub(crate) fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}
