// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay placement relative to the pointer.

use kurbo::{Point, Rect, Size, Vec2};

/// Place a box of `size` near `pointer`.
///
/// The preferred origin is `pointer + offset` (below-right for positive
/// offsets). On an axis where the box would overflow the far viewport edge it
/// flips to the other side of the pointer, and it is finally clamped so it
/// never starts before the viewport origin. Boxes larger than the viewport are
/// pinned to the viewport origin.
pub fn place(pointer: Point, offset: Vec2, size: Size, viewport: Rect) -> Rect {
    let x = place_axis(
        pointer.x,
        offset.x,
        size.width,
        viewport.x0,
        viewport.x1,
    );
    let y = place_axis(
        pointer.y,
        offset.y,
        size.height,
        viewport.y0,
        viewport.y1,
    );
    Rect::from_origin_size(Point::new(x, y), size)
}

fn place_axis(pointer: f64, offset: f64, extent: f64, min: f64, max: f64) -> f64 {
    let mut start = pointer + offset;
    if start + extent > max {
        start = pointer - offset - extent;
    }
    start.min(max - extent).max(min)
}
