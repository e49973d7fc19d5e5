// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping the tooltip in sync with content that changes under a still pointer.
//!
//! Two strategies exist and one is picked at install time:
//!
//! - [`WatchStrategy::Observe`]: the tree reports mutations. Titles are migrated
//!   as soon as they appear, and a single coalesced re-probe follows each batch.
//! - [`WatchStrategy::Poll`]: the tree cannot report mutations, so a fixed
//!   interval re-probes the last pointer position and titles are migrated
//!   lazily during resolution.
//!
//! When neither is possible (no observation, polling disabled) the tooltip only
//! updates on pointer events.
//!
//! Observation is pull-based: records accumulate in the tree until the host
//! calls [`Tooltip::handle_mutations`](crate::Tooltip::handle_mutations). That
//! includes the records an in-tree overlay produces when it is created, updated
//! or destroyed, so the host drains after overlay work as well as after its own
//! edits.

use alloc::vec::Vec;
use core::time::Duration;

use tracing::{debug, trace};
use understory_timing::{TimerId, TimerQueue};

use crate::config::TooltipConfig;
use crate::resolve::ResolveMode;
use crate::state::Task;
use crate::title;
use crate::types::{AttrKey, TooltipTree, TreeMutation};

/// Which reactive strategy is active.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WatchStrategy {
    /// Mutation observation with a coalesced re-probe.
    Observe,
    /// Fixed-interval re-probing.
    Poll,
    /// Pointer events only.
    Inert,
}

#[derive(Clone, Debug)]
pub(crate) enum Watcher {
    Observe(Observer),
    Poll(Poller),
    Inert,
}

impl Watcher {
    pub(crate) fn select<T: TooltipTree + ?Sized>(
        tree: &T,
        config: &TooltipConfig<T::Node>,
    ) -> Self {
        if tree.observation_supported() {
            Self::Observe(Observer::default())
        } else if config.polling_interval().is_some() {
            Self::Poll(Poller::default())
        } else {
            Self::Inert
        }
    }

    pub(crate) fn strategy(&self) -> WatchStrategy {
        match self {
            Self::Observe(_) => WatchStrategy::Observe,
            Self::Poll(_) => WatchStrategy::Poll,
            Self::Inert => WatchStrategy::Inert,
        }
    }

    pub(crate) fn mode(&self) -> ResolveMode {
        match self {
            Self::Observe(_) => ResolveMode::Reactive,
            Self::Poll(_) | Self::Inert => ResolveMode::Eager,
        }
    }

    pub(crate) fn start<T: TooltipTree + ?Sized>(
        &mut self,
        tree: &mut T,
        config: &TooltipConfig<T::Node>,
        root: Option<T::Node>,
        timers: &mut TimerQueue<Task>,
        now: Duration,
    ) {
        match self {
            Self::Observe(_) => {
                if let Some(root) = root {
                    let written = title::process_subtree(tree, config, root);
                    debug!(written, "initial title scan");
                    tree.observe(root, AttrKey::RawTitle);
                }
            }
            Self::Poll(p) => p.arm(config, timers, now),
            Self::Inert => {}
        }
    }

    pub(crate) fn stop<T: TooltipTree + ?Sized>(
        &mut self,
        tree: &mut T,
        timers: &mut TimerQueue<Task>,
    ) {
        match self {
            Self::Observe(o) => {
                if let Some(id) = o.reprobe.take() {
                    timers.cancel(id);
                }
                tree.disconnect();
            }
            Self::Poll(p) => {
                if let Some(id) = p.tick.take() {
                    timers.cancel(id);
                }
            }
            Self::Inert => {}
        }
    }
}

/// Mutation-driven strategy state.
#[derive(Clone, Debug, Default)]
pub(crate) struct Observer {
    // Set for the duration of a handling pass; a nested delivery is ignored.
    suspended: bool,
    pub(crate) reprobe: Option<TimerId>,
}

impl Observer {
    /// Handle one batch of mutations and arm the coalesced re-probe.
    ///
    /// Delivery is disconnected for the duration of the pass so the title
    /// writes made here are never reported back. Returns the number of records
    /// handled.
    pub(crate) fn handle<T: TooltipTree + ?Sized>(
        &mut self,
        tree: &mut T,
        config: &TooltipConfig<T::Node>,
        root: T::Node,
        timers: &mut TimerQueue<Task>,
        now: Duration,
    ) -> usize {
        if self.suspended {
            return 0;
        }
        let records = tree.take_mutations();
        if records.is_empty() {
            return 0;
        }

        self.suspended = true;
        tree.disconnect();
        if records.len() >= config.rescan_threshold {
            let written = title::process_subtree(tree, config, root);
            debug!(
                records = records.len(),
                written, "large mutation batch, rescanned root"
            );
        } else {
            for record in &records {
                apply(tree, config, record);
            }
        }
        tree.observe(root, AttrKey::RawTitle);
        self.suspended = false;

        if let Some(id) = self.reprobe.take() {
            timers.cancel(id);
        }
        self.reprobe = Some(timers.schedule(now + config.coalesce_delay(), Task::Reprobe));
        trace!(records = records.len(), "mutation batch handled");
        records.len()
    }
}

fn apply<T: TooltipTree + ?Sized>(
    tree: &mut T,
    config: &TooltipConfig<T::Node>,
    record: &TreeMutation<T::Node>,
) {
    match record {
        TreeMutation::Attribute { target, .. } => {
            title::process_owner(tree, config, *target);
        }
        TreeMutation::Subtree { target, added } => {
            // A replaced `<title>` text shows up on the title node; its shape is the parent.
            let mut touched: Vec<T::Node> = Vec::with_capacity(2);
            touched.push(*target);
            touched.extend(tree.parent_of(*target));
            for node in touched {
                title::process_owner(tree, config, node);
            }
            for node in added {
                title::process_subtree(tree, config, *node);
            }
        }
    }
}

/// Polling strategy state.
#[derive(Clone, Debug, Default)]
pub(crate) struct Poller {
    pub(crate) tick: Option<TimerId>,
}

impl Poller {
    /// Arm the next tick from the current configuration. Disabled polling leaves it unarmed.
    pub(crate) fn arm<N>(
        &mut self,
        config: &TooltipConfig<N>,
        timers: &mut TimerQueue<Task>,
        now: Duration,
    ) {
        if let Some(id) = self.tick.take() {
            timers.cancel(id);
        }
        if let Some(interval) = config.polling_interval() {
            self.tick = Some(timers.schedule(now + interval, Task::Poll));
        }
    }
}
