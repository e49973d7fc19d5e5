// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior against a document that reports mutations.

mod common;

use kurbo::{Point, Rect};
use understory_document::{Document, Element, NodeId};
use understory_tooltip::adapters::document::DocumentOverlay;
use understory_tooltip::watch::WatchStrategy;
use understory_tooltip::{AttrKey, Tooltip, TooltipContent, TooltipOptions, TooltipTree};

use common::{IN_DIV, ON_BODY, Recorder, ms, page};

fn installed(options: TooltipOptions) -> (Document, NodeId, NodeId, Tooltip<NodeId>, Recorder) {
    let (mut doc, body, div) = page();
    let mut tip = Tooltip::new(options);
    tip.install(&mut doc, None, ms(0));
    (doc, body, div, tip, Recorder::default())
}

#[test]
fn install_migrates_titles_and_observes() {
    let (doc, body, div, tip, _) = installed(TooltipOptions::default());
    assert_eq!(tip.strategy(), Some(WatchStrategy::Observe));
    assert_eq!(tip.root(), Some(body));
    assert_eq!(doc.attribute(div, "title"), None, "native title removed");
    assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("Hi"));
    assert!(doc.is_observing());
    assert_eq!(tip.next_deadline(), None, "nothing armed at rest");
}

#[test]
fn install_twice_is_a_no_op() {
    let (mut doc, body, _, mut tip, _) = installed(TooltipOptions::default());
    tip.install(&mut doc, Some(body), ms(10));
    assert!(tip.is_installed());
    assert_eq!(tip.root(), Some(body));
    assert_eq!(doc.pending_records(), 0, "no second scan was recorded");
}

#[test]
fn events_before_install_are_ignored() {
    let (mut doc, _, _) = page();
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(tip.advance(&mut doc, &mut ov, ms(1_000)), 0);
    assert_eq!(tip.state().target(), None);
    assert_eq!(tip.strategy(), None);
    assert_eq!(ov.created, 0);
}

// With the default 500 ms delay nothing shows early and exactly one overlay shows after.
#[test]
fn shows_after_display_delay() {
    let (mut doc, _, div, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(tip.state().target(), Some(div));
    assert_eq!(tip.state().content(), &TooltipContent::Text("Hi".into()));
    assert_eq!(tip.next_deadline(), Some(ms(500)));

    tip.advance(&mut doc, &mut ov, ms(499));
    assert_eq!(ov.created, 0, "no overlay before the delay");

    tip.advance(&mut doc, &mut ov, ms(500));
    assert_eq!(ov.created, 1);
    assert_eq!(ov.text(), Some("Hi"));
    assert!(tip.state().pending_show().is_none());

    tip.advance(&mut doc, &mut ov, ms(2_000));
    assert_eq!(ov.created, 1, "exactly one overlay");
}

// Moving within the target keeps the single timer and shows at the latest position.
#[test]
fn show_uses_latest_pointer() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    let armed = tip.state().pending_show();
    tip.pointer_move(&mut doc, &mut ov, Point::new(200.0, 120.0), ms(300));
    assert_eq!(tip.state().pending_show(), armed, "same target keeps its timer");
    tip.advance(&mut doc, &mut ov, ms(500));
    let live = ov.live.as_ref().unwrap();
    assert_eq!(live.bounds, Rect::new(215.0, 135.0, 295.0, 155.0));
    assert_eq!(live.class, "tooltip");
}

#[test]
fn zero_delay_override_shows_immediately() {
    let (mut doc, _, div) = page();
    doc.set_attribute(div, "data-tooltip-delay", "0");
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions::default());
    tip.install(&mut doc, None, ms(0));

    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(ov.created, 1, "shown within the probe");
    assert!(tip.state().pending_show().is_none());
    assert_eq!(tip.next_deadline(), None);
}

#[test]
fn delay_override_is_inherited() {
    let (mut doc, body, div) = page();
    doc.set_attribute(body, "data-tooltip-delay", "-5");
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions::default());
    tip.install(&mut doc, None, ms(0));
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(ov.created, 1, "negative delays show immediately");

    // The closest carrier decides, and an unparseable one means the configured delay.
    doc.set_attribute(div, "data-tooltip-delay", "soon");
    tip.pointer_move(&mut doc, &mut ov, ON_BODY, ms(10));
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(20));
    assert_eq!(tip.next_deadline(), Some(ms(520)));
}

// Leaving every tooltip owner destroys the overlay and leaves no timer behind.
#[test]
fn moving_to_nothing_destroys() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.advance(&mut doc, &mut ov, ms(500));
    assert!(tip.state().overlay().is_some());

    tip.pointer_move(&mut doc, &mut ov, ON_BODY, ms(600));
    assert_eq!(tip.state().target(), None, "the root is never a target");
    assert!(tip.state().overlay().is_none());
    assert_eq!(ov.destroyed, 1);
    assert!(tip.state().pending_show().is_none());
    assert_eq!(tip.next_deadline(), None);
}

#[test]
fn leaving_before_delay_cancels_show() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.pointer_leave(&mut doc, &mut ov, Point::new(-1.0, 150.0), ms(100));
    assert!(!tip.state().pointer_inside());
    tip.advance(&mut doc, &mut ov, ms(1_000));
    assert_eq!(ov.created, 0);
}

// A title change under a still pointer is re-rendered in place after the coalescing window.
#[test]
fn title_mutation_updates_in_place() {
    let (mut doc, _, div, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.advance(&mut doc, &mut ov, ms(500));

    doc.set_attribute(div, "title", "Bye");
    assert_eq!(tip.handle_mutations(&mut doc, ms(600)), 1);
    assert_eq!(doc.attribute(div, "title"), None);
    assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("Bye"));
    assert_eq!(ov.text(), Some("Hi"), "not before the re-probe");
    assert_eq!(tip.next_deadline(), Some(ms(850)));

    tip.advance(&mut doc, &mut ov, ms(850));
    assert_eq!(ov.text(), Some("Bye"));
    assert_eq!(ov.created, 1, "updated, not recreated");
    assert_eq!(ov.updated, 1);
    assert_eq!(doc.pending_records(), 0, "migration writes are not reported back");
}

// Several batches inside the window collapse into one re-probe.
#[test]
fn batches_coalesce() {
    let (mut doc, _, div, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.advance(&mut doc, &mut ov, ms(500));

    doc.set_attribute(div, "title", "One");
    tip.handle_mutations(&mut doc, ms(600));
    doc.set_attribute(div, "title", "Two");
    tip.handle_mutations(&mut doc, ms(700));
    assert_eq!(tip.advance(&mut doc, &mut ov, ms(850)), 0, "first window was cancelled");
    assert_eq!(tip.advance(&mut doc, &mut ov, ms(950)), 1);
    assert_eq!(ov.text(), Some("Two"));
    assert_eq!(ov.updated, 1);
}

#[test]
fn inserted_subtrees_are_migrated() {
    let (mut doc, body, _, mut tip, _) = installed(TooltipOptions::default());
    let list = doc.insert(Some(body), Element::html("ul"));
    let item = doc.insert(Some(list), Element::html("li").with_attribute("title", "Item"));
    assert_eq!(tip.handle_mutations(&mut doc, ms(0)), 2);
    assert_eq!(doc.attribute(item, "data-tooltip-text"), Some("Item"));
}

// A batch at the threshold rescans the whole root, reaching titles no record names.
#[test]
fn large_batch_rescans() {
    fn run(threshold: usize) -> (Document, NodeId, Vec<NodeId>) {
        let (mut doc, body, div, mut tip, _) = installed(TooltipOptions {
            rescan_threshold: Some(threshold),
            ..Default::default()
        });
        // Written while delivery is off, so only a rescan can see it.
        doc.disconnect();
        doc.set_attribute(div, "title", "quiet");
        TooltipTree::observe(&mut doc, body, AttrKey::RawTitle);

        let spans: Vec<NodeId> = (0..2)
            .map(|i| {
                doc.insert(
                    Some(body),
                    Element::html("span").with_attribute("title", &format!("s{i}")),
                )
            })
            .collect();
        assert_eq!(tip.handle_mutations(&mut doc, ms(0)), 2);
        (doc, div, spans)
    }

    let (doc, div, spans) = run(2);
    assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("quiet"));
    assert_eq!(doc.attribute(div, "title"), None);
    for (i, span) in spans.iter().enumerate() {
        assert_eq!(
            doc.attribute(*span, "data-tooltip-text"),
            Some(format!("s{i}").as_str())
        );
    }

    // Below the threshold only the reported nodes are touched.
    let (doc, div, spans) = run(1_000);
    assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("Hi"));
    assert_eq!(doc.attribute(div, "title"), Some("quiet"));
    assert_eq!(doc.attribute(spans[1], "data-tooltip-text"), Some("s1"));
}

#[test]
fn press_and_key_hide() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.press(&mut doc, &mut ov);
    tip.advance(&mut doc, &mut ov, ms(500));
    assert_eq!(ov.created, 0, "press cancels the pending show");

    // Re-entering arms a fresh show; a key press then hides the live overlay.
    tip.pointer_move(&mut doc, &mut ov, ON_BODY, ms(600));
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(700));
    tip.advance(&mut doc, &mut ov, ms(1_200));
    assert_eq!(ov.created, 1);
    tip.key_down(&mut doc, &mut ov);
    assert!(!ov.live.as_ref().unwrap().visible);
    assert!(!tip.state().overlay().unwrap().visible);
}

#[test]
fn focus_and_blur() {
    let (mut doc, _, div, mut tip, mut ov) = installed(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    tip.focus(&mut doc, &mut ov, div, Point::new(110.0, 190.0), ms(0));
    assert_eq!(tip.state().target(), Some(div));
    let live = ov.live.as_ref().unwrap();
    assert_eq!((live.bounds.x0, live.bounds.y0), (125.0, 205.0));

    tip.blur(&mut doc, &mut ov, ms(10));
    assert_eq!(tip.state().target(), None);
    assert!(ov.live.is_none());
}

#[test]
fn uninstall_cleans_up() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions::default());
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    tip.advance(&mut doc, &mut ov, ms(500));
    tip.uninstall(&mut doc, &mut ov);

    assert!(!tip.is_installed());
    assert!(ov.live.is_none(), "overlay destroyed");
    assert_eq!(tip.next_deadline(), None);
    assert!(!doc.is_observing());
    assert_eq!(tip.state().target(), None);

    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(600));
    assert_eq!(tip.state().target(), None, "ignored once uninstalled");
}

// The overlay class comes from configuration.
#[test]
fn frame_class_is_configurable() {
    let (mut doc, _, _, mut tip, mut ov) = installed(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    tip.configure(TooltipOptions {
        display_delay_ms: Some(0),
        frame_class: Some("hint".into()),
        ..Default::default()
    });
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(ov.live.as_ref().unwrap().class, "hint");
}

// A host that resolves hits itself can probe directly, and hide without destroying.
#[test]
fn direct_probe_and_hide() {
    let (mut doc, body, div, mut tip, mut ov) = installed(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    tip.probe(&mut doc, &mut ov, Some(body), ON_BODY, ms(0));
    assert_eq!(tip.state().target(), None, "the root alone owns nothing");

    tip.probe(&mut doc, &mut ov, Some(div), Point::new(0.0, 0.0), ms(0));
    assert_eq!(tip.state().target(), Some(div));
    tip.hide(&mut doc, &mut ov);
    assert_eq!(ov.destroyed, 0);
    assert!(!ov.live.as_ref().unwrap().visible);
}

fn svg_page() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.insert(
        None,
        Element::html("body").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)),
    );
    let svg = doc.insert(
        Some(body),
        Element::svg("svg").with_bounds(Rect::new(0.0, 0.0, 400.0, 400.0)),
    );
    let rect = doc.insert(
        Some(svg),
        Element::svg("rect").with_bounds(Rect::new(10.0, 10.0, 60.0, 60.0)),
    );
    let title = doc.insert(Some(rect), Element::svg("title").with_text("A"));
    (doc, rect, title)
}

// Editing a shape's `<title>` text is promoted again and re-rendered in place.
#[test]
fn svg_title_edit_updates_in_place() {
    let (mut doc, rect, title) = svg_page();
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions::default());
    tip.install(&mut doc, None, ms(0));
    assert_eq!(doc.text(title), Some(""), "promoted at install");

    tip.pointer_move(&mut doc, &mut ov, Point::new(20.0, 20.0), ms(0));
    tip.advance(&mut doc, &mut ov, ms(500));
    assert_eq!(tip.state().target(), Some(rect));
    assert_eq!(ov.text(), Some("A"));

    doc.set_text(title, "B");
    assert_eq!(tip.handle_mutations(&mut doc, ms(600)), 1);
    assert_eq!(doc.attribute(rect, "data-tooltip-text"), Some("B"));
    assert_eq!(doc.text(title), Some(""));

    tip.advance(&mut doc, &mut ov, ms(850));
    assert_eq!(ov.text(), Some("B"));
    assert_eq!(ov.created, 1, "updated, not recreated");
    assert_eq!(ov.updated, 1);
}

// An `aside` at (400, 100)-(600, 300) holding one titled link.
fn with_aside(doc: &mut Document, body: NodeId) -> (NodeId, NodeId) {
    let aside = doc.insert(
        Some(body),
        Element::html("aside").with_bounds(Rect::new(400.0, 100.0, 600.0, 300.0)),
    );
    let link = doc.insert(
        Some(aside),
        Element::html("a")
            .with_bounds(Rect::new(420.0, 120.0, 500.0, 160.0))
            .with_attribute("title", "in"),
    );
    (aside, link)
}

// Installed on a subtree, hits and focus outside it resolve to nothing.
#[test]
fn subtree_root_ignores_outside_nodes() {
    let (mut doc, body, div) = page();
    let (aside, link) = with_aside(&mut doc, body);
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    tip.install(&mut doc, Some(aside), ms(0));
    assert_eq!(tip.root(), Some(aside));
    assert_eq!(doc.attribute(link, "data-tooltip-text"), Some("in"));
    assert_eq!(doc.attribute(div, "title"), Some("Hi"), "outside the scan");

    tip.pointer_move(&mut doc, &mut ov, Point::new(450.0, 140.0), ms(0));
    assert_eq!(tip.state().target(), Some(link));
    assert_eq!(ov.created, 1);

    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(10));
    assert_eq!(tip.state().target(), None);
    assert_eq!(ov.destroyed, 1);
    assert_eq!(doc.attribute(div, "title"), Some("Hi"));

    tip.focus(&mut doc, &mut ov, div, Point::new(110.0, 190.0), ms(20));
    assert_eq!(tip.state().target(), None, "focus outside the root is ignored");
    assert_eq!(ov.created, 1);
    assert_eq!(doc.attribute(div, "title"), Some("Hi"));

    // Changes outside the observed subtree are not reported.
    doc.insert(Some(body), Element::html("p").with_attribute("title", "later"));
    assert_eq!(tip.handle_mutations(&mut doc, ms(30)), 0);
}

// Installing on another root moves the scan and the observation there.
#[test]
fn reinstall_moves_to_new_root() {
    let (mut doc, body, div) = page();
    let (aside, _) = with_aside(&mut doc, body);
    let mut ov = Recorder::default();
    let mut tip = Tooltip::new(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    tip.install(&mut doc, Some(aside), ms(0));
    assert_eq!(doc.attribute(div, "title"), Some("Hi"));

    tip.install(&mut doc, Some(body), ms(10));
    assert_eq!(tip.root(), Some(body));
    assert!(doc.is_observing());
    assert_eq!(doc.attribute(div, "title"), None, "new root scanned");
    assert_eq!(doc.attribute(div, "data-tooltip-text"), Some("Hi"));

    let p = doc.insert(Some(body), Element::html("p").with_attribute("title", "later"));
    assert_eq!(tip.handle_mutations(&mut doc, ms(20)), 1);
    assert_eq!(doc.attribute(p, "data-tooltip-text"), Some("later"));

    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(30));
    assert_eq!(tip.state().target(), Some(div));
}

// The tree root never owns a tooltip, so its title is never migrated.
#[test]
fn root_title_is_left_alone() {
    let (mut doc, body, _) = page();
    doc.set_attribute(body, "title", "Page");
    let mut tip = Tooltip::new(TooltipOptions::default());
    tip.install(&mut doc, None, ms(0));
    assert_eq!(doc.attribute(body, "title"), Some("Page"));
    assert_eq!(doc.attribute(body, "data-tooltip-text"), None);

    doc.set_attribute(body, "title", "Again");
    assert_eq!(tip.handle_mutations(&mut doc, ms(10)), 1);
    assert_eq!(doc.attribute(body, "title"), Some("Again"));
    assert_eq!(doc.attribute(body, "data-tooltip-text"), None);
}

// An overlay living in the observed document reports its own insertion; once
// drained, the follow-up re-probe settles without touching the overlay.
#[test]
fn in_tree_overlay_records_are_drained() {
    let (mut doc, _, div, mut tip, _) = installed(TooltipOptions {
        display_delay_ms: Some(0),
        ..Default::default()
    });
    let mut ov = DocumentOverlay::default();
    tip.pointer_move(&mut doc, &mut ov, IN_DIV, ms(0));
    assert_eq!(ov.created_count(), 1);
    assert!(doc.pending_records() > 0, "overlay insertion is observed");

    assert!(tip.handle_mutations(&mut doc, ms(0)) > 0);
    assert_eq!(doc.pending_records(), 0);
    assert_eq!(tip.advance(&mut doc, &mut ov, ms(250)), 1);
    assert_eq!(tip.state().target(), Some(div));
    assert_eq!(ov.created_count(), 1, "re-probe found nothing new");
    assert_eq!(doc.pending_records(), 0);
}
