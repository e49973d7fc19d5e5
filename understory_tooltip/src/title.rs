// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Title processing: migrate native titles into processed tooltip attributes.
//!
//! A node's `title` is removed as soon as it is seen, so the host never shows
//! its own native tooltip on top of ours. SVG shapes keep their tooltip in a
//! nested `<title>` child instead; that text is promoted once and the child is
//! emptied.

use alloc::string::String;

use tracing::trace;

use crate::config::TooltipConfig;
use crate::resolve::nearest_override;
use crate::types::{AttrKey, TooltipFormat, TooltipTree, non_empty};

/// Process `node`, returning whether anything was written.
///
/// Idempotent: once the raw title has been migrated, calling again performs no
/// writes until a new title appears.
pub fn process<T: TooltipTree + ?Sized>(
    tree: &mut T,
    config: &TooltipConfig<T::Node>,
    node: T::Node,
) -> bool {
    let promoted = promote_nested_title(tree, node);
    let Some(raw) = non_empty(tree.get_raw(node, AttrKey::RawTitle)).map(String::from) else {
        return promoted;
    };

    tree.clear_raw(node, AttrKey::RawTitle);
    tree.clear_raw(node, AttrKey::ProcessedText);
    tree.clear_raw(node, AttrKey::ProcessedHtml);

    let format = nearest_override(tree, node, AttrKey::Format)
        .and_then(|v| v.parse::<TooltipFormat>().ok())
        .unwrap_or_default();

    match format {
        TooltipFormat::Html => tree.set_raw(node, AttrKey::ProcessedHtml, &raw),
        TooltipFormat::Text => {
            if let Some(to_html) = &config.title_to_html_processor {
                tree.set_raw(node, AttrKey::ProcessedHtml, &to_html(&raw, node));
            } else if let Some(to_text) = &config.title_processor {
                tree.set_raw(node, AttrKey::ProcessedText, &to_text(&raw, node));
            } else {
                tree.set_raw(node, AttrKey::ProcessedText, &raw);
            }
        }
    }
    trace!(?node, ?format, "title migrated");
    true
}

/// Process `node` unless it is the parentless tree root, which never owns a tooltip.
pub(crate) fn process_owner<T: TooltipTree + ?Sized>(
    tree: &mut T,
    config: &TooltipConfig<T::Node>,
    node: T::Node,
) -> bool {
    tree.parent_of(node).is_some() && process(tree, config, node)
}

/// Process `node` and every descendant.
///
/// The parentless tree root is skipped, matching [`resolve`](crate::resolve::resolve),
/// which never treats it as a target. Returns the number of nodes that were written.
pub fn process_subtree<T: TooltipTree + ?Sized>(
    tree: &mut T,
    config: &TooltipConfig<T::Node>,
    node: T::Node,
) -> usize {
    let mut written = 0;
    let mut stack = alloc::vec![node];
    while let Some(n) = stack.pop() {
        if process_owner(tree, config, n) {
            written += 1;
        }
        stack.extend(tree.children_of(n));
    }
    written
}

fn promote_nested_title<T: TooltipTree + ?Sized>(tree: &mut T, node: T::Node) -> bool {
    if non_empty(tree.get_raw(node, AttrKey::RawTitle)).is_some() || !tree.is_svg_shape(node) {
        return false;
    }
    let Some(title) = tree.nested_title(node) else {
        return false;
    };
    let Some(text) = non_empty(tree.text_of(title)).map(String::from) else {
        return false;
    };
    tree.set_raw(node, AttrKey::RawTitle, &text);
    tree.set_text(title, "");
    true
}
