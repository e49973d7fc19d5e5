// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The installed tooltip engine: event entry points, timers, and lifecycle.

use core::fmt::Debug;
use core::time::Duration;

use kurbo::Point;
use tracing::{info, trace};
use understory_timing::TimerQueue;

use crate::config::TooltipConfig;
use crate::overlay::Overlay;
use crate::resolve::is_within;
use crate::state::{Cx, Task, TrackedState};
use crate::types::TooltipTree;
use crate::watch::{WatchStrategy, Watcher};

/// A tooltip engine bound to one tree root.
///
/// The engine does not own the tree or the overlay; every entry point borrows
/// them for the duration of the call. Time is supplied by the host as a
/// [`Duration`] since an arbitrary epoch, and deferred work runs when the host
/// calls [`Tooltip::advance`] (see [`Tooltip::next_deadline`]).
///
/// Events received before [`Tooltip::install`] are ignored.
///
/// Under [`WatchStrategy::Observe`] the engine never pulls mutations on its own:
/// the host calls [`Tooltip::handle_mutations`] whenever the tree may have
/// changed. An overlay that lives inside the observed tree (such as the
/// document adapter's) produces records of its own on every create, update or
/// destroy, so a host that stops draining them lets the record log grow.
pub struct Tooltip<N> {
    config: TooltipConfig<N>,
    state: TrackedState<N>,
    timers: TimerQueue<Task>,
    watcher: Watcher,
    root: Option<N>,
    focus: Option<N>,
    installed: bool,
}

impl<N: Debug> Debug for Tooltip<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tooltip")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pending_timers", &self.timers.len())
            .field("strategy", &self.watcher.strategy())
            .field("root", &self.root)
            .field("focus", &self.focus)
            .field("installed", &self.installed)
            .finish()
    }
}

impl<N: Copy + Eq + Debug> Tooltip<N> {
    /// Create an engine with `config` (options are merged over defaults).
    pub fn new(config: impl Into<TooltipConfig<N>>) -> Self {
        Self {
            config: config.into(),
            state: TrackedState::default(),
            timers: TimerQueue::new(),
            watcher: Watcher::Inert,
            root: None,
            focus: None,
            installed: false,
        }
    }

    /// Wire the engine to `root` (the tree root when `None`) and start watching.
    ///
    /// Installing again on the same root is a no-op; installing on another root
    /// moves the watcher there and keeps tracked state.
    pub fn install<T>(&mut self, tree: &mut T, root: Option<N>, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
    {
        let root = root.or_else(|| tree.root());
        if self.installed && self.root == root {
            return;
        }
        if self.installed {
            self.watcher.stop(tree, &mut self.timers);
        }
        self.root = root;
        self.watcher = Watcher::select(&*tree, &self.config);
        self.watcher
            .start(tree, &self.config, root, &mut self.timers, now);
        self.installed = true;
        info!(?root, strategy = ?self.watcher.strategy(), "tooltips installed");
    }

    /// Tear down: cancel all timers, destroy the overlay, stop watching, forget state.
    pub fn uninstall<T, O>(&mut self, tree: &mut T, overlay: &mut O)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.step(tree, overlay, Duration::ZERO, |cx, st| cx.destroy(st));
        self.watcher.stop(tree, &mut self.timers);
        self.watcher = Watcher::Inert;
        self.timers.clear();
        self.state = TrackedState::default();
        self.focus = None;
        self.root = None;
        self.installed = false;
        info!("tooltips uninstalled");
    }

    /// Replace the configuration. Tracked state and the watcher strategy are kept.
    pub fn configure(&mut self, config: impl Into<TooltipConfig<N>>) {
        self.config = config.into();
    }

    /// Current configuration.
    pub fn config(&self) -> &TooltipConfig<N> {
        &self.config
    }

    /// Tracked state.
    pub fn state(&self) -> &TrackedState<N> {
        &self.state
    }

    /// Active watcher strategy, `None` before installation.
    pub fn strategy(&self) -> Option<WatchStrategy> {
        self.installed.then(|| self.watcher.strategy())
    }

    /// Whether the engine is installed.
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Installed root.
    pub fn root(&self) -> Option<N> {
        self.root
    }

    /// When [`Tooltip::advance`] next has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// The pointer moved to `pointer`.
    pub fn pointer_move<T, O>(&mut self, tree: &mut T, overlay: &mut O, pointer: Point, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.focus = None;
        self.state.pointer_inside = true;
        let hit = self.hit_at(&*tree, pointer);
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, hit, pointer));
    }

    /// The pointer left the root at `pointer`.
    pub fn pointer_leave<T, O>(&mut self, tree: &mut T, overlay: &mut O, pointer: Point, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.focus = None;
        self.state.pointer_inside = false;
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, None, pointer));
    }

    /// Keyboard focus moved to `node`; `anchor` stands in for the pointer.
    pub fn focus<T, O>(&mut self, tree: &mut T, overlay: &mut O, node: N, anchor: Point, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        let hit = self.within_root(&*tree, node).then_some(node);
        self.focus = hit;
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, hit, anchor));
    }

    /// Keyboard focus left the tree.
    pub fn blur<T, O>(&mut self, tree: &mut T, overlay: &mut O, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed || self.focus.take().is_none() {
            return;
        }
        let anchor = self.state.pointer.unwrap_or(Point::ZERO);
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, None, anchor));
    }

    /// A pointer button was pressed: drop any pending show and hide the overlay.
    pub fn press<T, O>(&mut self, tree: &mut T, overlay: &mut O)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        self.dismiss(tree, overlay);
    }

    /// A key was pressed: drop any pending show and hide the overlay.
    pub fn key_down<T, O>(&mut self, tree: &mut T, overlay: &mut O)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        self.dismiss(tree, overlay);
    }

    /// Hide a live overlay without destroying it.
    pub fn hide<T, O>(&mut self, tree: &mut T, overlay: &mut O)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.step(tree, overlay, Duration::ZERO, |cx, st| cx.hide(st));
    }

    /// Probe `hit` at `pointer` directly, bypassing hit testing.
    pub fn probe<T, O>(
        &mut self,
        tree: &mut T,
        overlay: &mut O,
        hit: Option<N>,
        pointer: Point,
        now: Duration,
    ) where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, hit, pointer));
    }

    /// Handle mutations reported by the tree since the last call.
    ///
    /// Only meaningful in [`WatchStrategy::Observe`]; returns the number of
    /// records handled. Call it after every batch of tree changes, including
    /// those made by an overlay living in the observed tree.
    pub fn handle_mutations<T>(&mut self, tree: &mut T, now: Duration) -> usize
    where
        T: TooltipTree<Node = N> + ?Sized,
    {
        let (true, Some(root), Watcher::Observe(observer)) =
            (self.installed, self.root, &mut self.watcher)
        else {
            return 0;
        };
        observer.handle(tree, &self.config, root, &mut self.timers, now)
    }

    /// Run every timer due at `now`. Returns the number of timers fired.
    pub fn advance<T, O>(&mut self, tree: &mut T, overlay: &mut O, now: Duration) -> usize
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return 0;
        }
        let mut fired = 0;
        while let Some((id, task)) = self.timers.pop_due(now) {
            fired += 1;
            match task {
                Task::Show => {
                    if self.state.pending_show == Some(id) {
                        self.step(tree, overlay, now, |cx, st| cx.show(st));
                    }
                }
                Task::Reprobe => {
                    if let Watcher::Observe(o) = &mut self.watcher {
                        o.reprobe = None;
                    }
                    self.reprobe(tree, overlay, now);
                }
                Task::Poll => {
                    if let Watcher::Poll(p) = &mut self.watcher {
                        p.tick = None;
                        p.arm(&self.config, &mut self.timers, now);
                    }
                    trace!("poll tick");
                    self.reprobe(tree, overlay, now);
                }
            }
        }
        fired
    }

    fn dismiss<T, O>(&mut self, tree: &mut T, overlay: &mut O)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        if !self.installed {
            return;
        }
        self.step(tree, overlay, Duration::ZERO, |cx, st| {
            cx.cancel_show(st);
            cx.hide(st);
        });
    }

    // Re-probe with the most recent input: focused node, pointer hit, or nothing once the pointer left.
    fn reprobe<T, O>(&mut self, tree: &mut T, overlay: &mut O, now: Duration)
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        let Some(pointer) = self.state.pointer else {
            return;
        };
        let hit = match self.focus {
            Some(node) => Some(node),
            None if self.state.pointer_inside => self.hit_at(&*tree, pointer),
            None => None,
        };
        trace!(?pointer, ?hit, "re-probe");
        self.step(tree, overlay, now, |cx, st| cx.on_probe(st, hit, pointer));
    }

    fn hit_at<T>(&self, tree: &T, pointer: Point) -> Option<N>
    where
        T: TooltipTree<Node = N> + ?Sized,
    {
        let hit = tree.node_at(pointer)?;
        self.within_root(tree, hit).then_some(hit)
    }

    fn within_root<T>(&self, tree: &T, node: N) -> bool
    where
        T: TooltipTree<Node = N> + ?Sized,
    {
        self.root.is_none_or(|root| is_within(tree, root, node))
    }

    fn step<T, O, R>(
        &mut self,
        tree: &mut T,
        overlay: &mut O,
        now: Duration,
        f: impl FnOnce(&mut Cx<'_, T, O>, &mut TrackedState<N>) -> R,
    ) -> R
    where
        T: TooltipTree<Node = N> + ?Sized,
        O: Overlay<T> + ?Sized,
    {
        let mut cx = Cx {
            tree,
            overlay,
            config: &self.config,
            timers: &mut self.timers,
            mode: self.watcher.mode(),
            now,
        };
        f(&mut cx, &mut self.state)
    }
}
