// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target resolution: find the node that owns the tooltip for a hit.

use crate::config::TooltipConfig;
use crate::title;
use crate::types::{AttrKey, DelayOverride, TooltipTree, non_empty};

/// Whether resolution may migrate titles on the way up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResolveMode {
    /// Titles are processed lazily while walking (polling or no watcher).
    Eager,
    /// Titles are processed by the mutation watcher; probes never write.
    Reactive,
}

/// Walk from `hit` towards the root and return the closest node with processed
/// tooltip content.
///
/// The tree root itself is never a target. In [`ResolveMode::Eager`] each
/// visited node is run through [`title::process`] before it is tested, and the
/// walk stops at the first match so ancestors above it are left untouched.
pub fn resolve<T: TooltipTree + ?Sized>(
    tree: &mut T,
    config: &TooltipConfig<T::Node>,
    mode: ResolveMode,
    hit: T::Node,
) -> Option<T::Node> {
    let mut node = hit;
    loop {
        let parent = tree.parent_of(node)?;
        if mode == ResolveMode::Eager {
            title::process(tree, config, node);
        }
        if has_metadata(tree, node) {
            return Some(node);
        }
        node = parent;
    }
}

/// Whether `node` carries processed text or HTML.
pub fn has_metadata<T: TooltipTree + ?Sized>(tree: &T, node: T::Node) -> bool {
    non_empty(tree.get_raw(node, AttrKey::ProcessedText)).is_some()
        || non_empty(tree.get_raw(node, AttrKey::ProcessedHtml)).is_some()
}

/// Value of `key` on `node` or its closest ancestor carrying it.
pub fn nearest_override<T: TooltipTree + ?Sized>(
    tree: &T,
    node: T::Node,
    key: AttrKey,
) -> Option<&str> {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if let Some(v) = non_empty(tree.get_raw(n, key)) {
            return Some(v);
        }
        cur = tree.parent_of(n);
    }
    None
}

/// Display delay for `target` in milliseconds.
///
/// The closest delay override decides; an unparseable one falls back to the
/// configured delay.
pub fn display_delay<T: TooltipTree + ?Sized>(
    tree: &T,
    config: &TooltipConfig<T::Node>,
    target: T::Node,
) -> i64 {
    nearest_override(tree, target, AttrKey::Delay)
        .and_then(|v| v.parse::<DelayOverride>().ok())
        .map_or(config.display_delay_ms, |d| d.0)
}

/// Whether `node` is `root` or lies below it.
pub fn is_within<T: TooltipTree + ?Sized>(tree: &T, root: T::Node, node: T::Node) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == root {
            return true;
        }
        cur = tree.parent_of(n);
    }
    false
}
