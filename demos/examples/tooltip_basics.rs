// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip basics.
//!
//! This example installs the engine on a small document, hovers a titled
//! button, and steps time until the tooltip shows. Near the viewport edge the
//! overlay flips to the other side of the pointer.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=debug cargo run -p understory_demos --example tooltip_basics`

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
        Element::html("body").with_bounds(Rect::new(0.0, 0.0, 640.0, 480.0)),
    );
    let save = doc.insert(
        Some(body),
        Element::html("button")
            .with_bounds(Rect::new(20.0, 20.0, 120.0, 50.0))
            .with_attribute("title", "Save the current file"),
    );
    let corner = doc.insert(
        Some(body),
        Element::html("button")
            .with_bounds(Rect::new(560.0, 440.0, 640.0, 480.0))
            .with_attribute("title", "Settings")
            .with_attribute("data-tooltip-delay", "0"),
    );

    // Options as a host might load them from a settings file.
    let options: TooltipOptions =
        serde_json::from_str(r#"{ "displayDelayMs": 400, "frameClass": "hint" }"#)
            .expect("valid options");
    let mut tooltip = Tooltip::new(options);
    let mut overlay = DocumentOverlay::default();
    tooltip.install(&mut doc, None, Duration::ZERO);
    println!("installed with {:?}", tooltip.strategy());
    println!("save title migrated: {:?}", doc.attribute(save, "data-tooltip-text"));

    tooltip.pointer_move(&mut doc, &mut overlay, Point::new(40.0, 30.0), Duration::ZERO);
    println!("target after move: {:?}", tooltip.state().target());
    while let Some(deadline) = tooltip.next_deadline() {
        tooltip.advance(&mut doc, &mut overlay, deadline);
        tooltip.handle_mutations(&mut doc, deadline);
    }
    if let (Some(node), Some(state)) = (overlay.node(), tooltip.state().overlay()) {
        println!(
            "shown {:?} at {:?} with class {:?}",
            doc.text(node),
            state.bounds,
            doc.attribute(node, "class")
        );
    }

    // The corner button shows immediately and flips up-left to stay in view.
    tooltip.pointer_move(&mut doc, &mut overlay, Point::new(630.0, 470.0), Duration::from_secs(1));
    println!(
        "corner target {:?} shown at {:?}",
        tooltip.state().target() == Some(corner),
        tooltip.state().overlay().map(|o| o.bounds)
    );

    tooltip.uninstall(&mut doc, &mut overlay);
    println!("uninstalled; overlay element left: {:?}", overlay.node());
}
