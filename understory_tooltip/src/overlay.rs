// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay collaborator: whatever draws the tooltip box.
//!
//! The engine decides when an overlay exists, what it shows, and where it goes
//! (see [`placement::place`](crate::placement::place)). The overlay only turns
//! those decisions into pixels or elements. At most one overlay exists at a
//! time: the engine always calls [`Overlay::destroy`] before the next
//! [`Overlay::create`].

use kurbo::{Point, Rect, Size};

use crate::types::{TooltipContent, TooltipTree};

/// Geometry and styling hook for one overlay instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame<'a> {
    /// Placed bounds in viewport coordinates.
    pub bounds: Rect,
    /// Class the overlay element should carry.
    pub class: &'a str,
}

/// Renders the tooltip box.
pub trait Overlay<T: TooltipTree + ?Sized> {
    /// Size the overlay would need for `content`.
    fn measure(&mut self, tree: &T, content: &TooltipContent) -> Size;

    /// Area the overlay must stay inside.
    fn viewport(&self, tree: &T) -> Rect;

    /// Create a visible overlay showing `content`.
    fn create(&mut self, tree: &mut T, content: &TooltipContent, frame: &Frame<'_>);

    /// Re-render the live overlay in place.
    fn update(&mut self, tree: &mut T, content: &TooltipContent, frame: &Frame<'_>);

    /// Hide the live overlay without destroying it.
    ///
    /// A hidden overlay keeps its content and layout and may still be updated
    /// in place. It is only ever removed through [`Overlay::destroy`].
    fn hide(&mut self, tree: &mut T);

    /// Destroy the live overlay.
    fn destroy(&mut self, tree: &mut T);
}

/// Engine-side record of the live overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayState {
    /// Pointer position the overlay was placed against.
    pub anchor: Point,
    /// Placed bounds.
    pub bounds: Rect,
    /// Whether it is currently visible.
    pub visible: bool,
}
