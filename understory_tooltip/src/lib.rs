// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tooltip: debounced, mutation-aware tooltips for UI trees.
//!
//! ## Overview
//!
//! This crate decides which node owns the tooltip under the pointer, what it
//! says, when it appears, and where it goes. It does not draw anything: an
//! [`Overlay`](crate::overlay::Overlay) implementation turns those decisions
//! into an element or a quad.
//!
//! ## Inputs
//!
//! The engine reads and writes the document through [`TooltipTree`](crate::types::TooltipTree),
//! an [`AttributeStore`](crate::types::AttributeStore) that also knows ancestry,
//! SVG `<title>` children, and point hit testing. Pointer, focus, press, and key
//! events are forwarded by the host, together with the current time as a
//! [`Duration`](core::time::Duration) since an arbitrary epoch.
//!
//! ## Titles
//!
//! Native `title` attributes are migrated into `data-tooltip-text` (or
//! `data-tooltip-html`) the first time they are seen, so the host never shows
//! its own tooltip. Optional processors on [`TooltipConfig`](crate::config::TooltipConfig)
//! rewrite the raw title on the way. A `data-tooltip-format="html"` override on
//! the node or an ancestor stores the title as HTML verbatim.
//!
//! ## Timing
//!
//! When the owner changes, the old overlay is destroyed and a show is armed for
//! the display delay (500 ms by default, per-node `data-tooltip-delay`
//! overrides). Non-positive delays show immediately. Timers fire from
//! [`Tooltip::advance`]; [`Tooltip::next_deadline`] says when to call it next.
//!
//! ## Staying in sync
//!
//! Content can change under a still pointer. Trees that report mutations are
//! observed: new titles are migrated right away and one coalesced re-probe
//! follows each batch. Other trees are polled at a fixed interval. See
//! [`watch`](crate::watch).
//!
//! ## Minimal usage
//!
//! ```
//! # #[cfg(feature = "document_adapter")]
//! # {
//! use core::time::Duration;
//! use kurbo::{Point, Rect};
//! use understory_document::{Document, Element};
//! use understory_tooltip::adapters::document::DocumentOverlay;
//! use understory_tooltip::{Tooltip, TooltipOptions};
//!
//! let mut doc = Document::new();
//! let root = doc.insert(None, Element::html("body").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)));
//! let div = doc.insert(
//!     Some(root),
//!     Element::html("div")
//!         .with_bounds(Rect::new(100.0, 100.0, 300.0, 200.0))
//!         .with_attribute("title", "Hi"),
//! );
//!
//! let mut overlay = DocumentOverlay::default();
//! let mut tooltip = Tooltip::new(TooltipOptions::default());
//! tooltip.install(&mut doc, None, Duration::ZERO);
//!
//! // The title was migrated at install time.
//! assert_eq!(doc.attribute(div, "title"), None);
//! assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("Hi"));
//!
//! tooltip.pointer_move(&mut doc, &mut overlay, Point::new(150.0, 150.0), Duration::ZERO);
//! assert_eq!(tooltip.state().target(), Some(div));
//! assert!(overlay.node().is_none(), "nothing before the delay");
//!
//! tooltip.advance(&mut doc, &mut overlay, Duration::from_millis(500));
//! let bounds = tooltip.state().overlay().unwrap().bounds;
//! assert_eq!((bounds.x0, bounds.y0), (165.0, 165.0));
//! # }
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to dependencies.
//! - `document_adapter` (default): [`TooltipTree`](crate::types::TooltipTree) for
//!   `understory_document::Document` and an in-document overlay.
//! - `serde`: (de)serialize [`TooltipOptions`].
//! - `libm`: `no_std` float support for geometry.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod overlay;
pub mod placement;
pub mod resolve;
pub mod state;
pub mod title;
pub mod types;
pub mod watch;

mod tooltip;

pub use config::{TooltipConfig, TooltipOptions};
pub use tooltip::Tooltip;
pub use types::{AttrKey, AttributeStore, TooltipContent, TooltipTree};
