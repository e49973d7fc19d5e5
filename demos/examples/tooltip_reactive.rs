// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content that changes under a still pointer.
//!
//! A status badge rewrites its own title every second while the pointer rests
//! on it. The document reports the change, the engine migrates the new title
//! right away, and one coalesced re-probe re-renders the live overlay in place.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=trace cargo run -p understory_demos --example tooltip_reactive`

use std::time::Duration;

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_document::{Document, Element};
use understory_tooltip::adapters::document::DocumentOverlay;
use understory_tooltip::{Tooltip, TooltipOptions};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let body = doc.insert(
        None,
        Element::html("body").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)),
    );
    let badge = doc.insert(
        Some(body),
        Element::html("span")
            .with_bounds(Rect::new(10.0, 10.0, 60.0, 30.0))
            .with_attribute("title", "Connecting"),
    );

    let mut tooltip = Tooltip::new(TooltipOptions::default());
    let mut overlay = DocumentOverlay::default();
    tooltip.install(&mut doc, None, Duration::ZERO);
    tooltip.pointer_move(&mut doc, &mut overlay, Point::new(20.0, 20.0), Duration::ZERO);

    let statuses = ["Connected", "Syncing 3 files", "Up to date"];
    let mut now = Duration::ZERO;
    for (second, status) in (1_u64..).zip(statuses) {
        let tick = Duration::from_secs(second);
        // Drive timers up to the next status change.
        while let Some(deadline) = tooltip.next_deadline().filter(|d| *d < tick) {
            now = deadline;
            tooltip.advance(&mut doc, &mut overlay, now);
            tooltip.handle_mutations(&mut doc, now);
        }
        let shown = overlay.node().and_then(|n| doc.text(n).map(str::to_owned));
        println!("{:>5} ms  {:?}", now.as_millis(), shown);

        now = tick;
        doc.set_attribute(badge, "title", status);
        tooltip.handle_mutations(&mut doc, now);
    }
    while let Some(deadline) = tooltip.next_deadline() {
        now = deadline;
        tooltip.advance(&mut doc, &mut overlay, now);
        tooltip.handle_mutations(&mut doc, now);
    }
    let shown = overlay.node().and_then(|n| doc.text(n).map(str::to_owned));
    println!("{:>5} ms  {:?}", now.as_millis(), shown);
    println!("overlays created: {}", overlay.created_count());
}
