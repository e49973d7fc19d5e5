// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked tooltip state and the probe state machine.
//!
//! ## Transitions
//!
//! Every probe resolves a target and compares it with the tracked one:
//!
//! - Target changed (by identity): snapshot the new content, cancel the pending
//!   show, destroy the overlay, then show immediately (non-positive delay) or arm
//!   a single show timer.
//! - Target unchanged (including "no target" twice): recompute the content and,
//!   if it differs from the snapshot, re-render a live overlay in place.
//!
//! The show timer is not bound to the target it was armed for; when it fires it
//! shows whatever target, content, and pointer position are current.

use core::time::Duration;

use kurbo::Point;
use tracing::debug;
use understory_timing::{TimerId, TimerQueue};

use crate::config::TooltipConfig;
use crate::overlay::{Frame, Overlay, OverlayState};
use crate::placement::place;
use crate::resolve::{ResolveMode, display_delay, resolve};
use crate::types::{TooltipContent, TooltipTree};

/// Deferred work owned by a [`Tooltip`](crate::Tooltip).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Task {
    /// Show the current target.
    Show,
    /// Re-probe after a mutation batch.
    Reprobe,
    /// Polling tick.
    Poll,
}

/// Everything the engine remembers between events.
///
/// `content` is a snapshot of the target's content taken when it was last
/// computed, not a live view.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedState<N> {
    pub(crate) target: Option<N>,
    pub(crate) content: TooltipContent,
    pub(crate) pointer: Option<Point>,
    pub(crate) pointer_inside: bool,
    pub(crate) pending_show: Option<TimerId>,
    pub(crate) overlay: Option<OverlayState>,
}

impl<N> Default for TrackedState<N> {
    fn default() -> Self {
        Self {
            target: None,
            content: TooltipContent::None,
            pointer: None,
            pointer_inside: false,
            pending_show: None,
            overlay: None,
        }
    }
}

impl<N: Copy> TrackedState<N> {
    /// Current tooltip owner.
    pub fn target(&self) -> Option<N> {
        self.target
    }

    /// Cached content of the current target.
    pub fn content(&self) -> &TooltipContent {
        &self.content
    }

    /// Last recorded pointer position.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether the pointer is inside the installed root.
    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Pending show timer.
    pub fn pending_show(&self) -> Option<TimerId> {
        self.pending_show
    }

    /// Live overlay, visible or hidden.
    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }
}

/// Borrowed collaborators for one state machine step.
pub(crate) struct Cx<'a, T: TooltipTree + ?Sized, O: ?Sized> {
    pub(crate) tree: &'a mut T,
    pub(crate) overlay: &'a mut O,
    pub(crate) config: &'a TooltipConfig<T::Node>,
    pub(crate) timers: &'a mut TimerQueue<Task>,
    pub(crate) mode: ResolveMode,
    pub(crate) now: Duration,
}

impl<T, O> Cx<'_, T, O>
where
    T: TooltipTree + ?Sized,
    O: Overlay<T> + ?Sized,
{
    /// Run one probe for `hit` at `pointer`.
    pub(crate) fn on_probe(
        &mut self,
        state: &mut TrackedState<T::Node>,
        hit: Option<T::Node>,
        pointer: Point,
    ) {
        let target = hit.and_then(|h| resolve(self.tree, self.config, self.mode, h));
        state.pointer = Some(pointer);

        if target != state.target {
            debug!(from = ?state.target, to = ?target, "tooltip target changed");
            state.target = target;
            state.content = TooltipContent::of(&*self.tree, target);
            self.cancel_show(state);
            self.destroy(state);

            let Some(target) = target else {
                return;
            };
            let delay_ms = display_delay(&*self.tree, self.config, target);
            if delay_ms <= 0 {
                self.show(state);
            } else {
                #[allow(
                    clippy::cast_sign_loss,
                    reason = "delay_ms is strictly positive on this branch."
                )]
                let deadline = self.now + Duration::from_millis(delay_ms as u64);
                state.pending_show = Some(self.timers.schedule(deadline, Task::Show));
                debug!(?target, delay_ms, "tooltip show armed");
            }
        } else {
            let actual = TooltipContent::of(&*self.tree, state.target);
            if actual != state.content {
                state.content = actual;
                self.refresh(state);
            }
        }
    }

    /// Show the current target at the last pointer position.
    pub(crate) fn show(&mut self, state: &mut TrackedState<T::Node>) {
        state.pending_show = None;
        let (Some(target), Some(pointer)) = (state.target, state.pointer) else {
            return;
        };
        if state.content.is_none() {
            return;
        }
        self.destroy(state);
        let size = self.overlay.measure(self.tree, &state.content);
        let viewport = self.overlay.viewport(self.tree);
        let bounds = place(pointer, self.config.offset(), size, viewport);
        let frame = Frame {
            bounds,
            class: &self.config.frame_class,
        };
        self.overlay.create(self.tree, &state.content, &frame);
        state.overlay = Some(OverlayState {
            anchor: pointer,
            bounds,
            visible: true,
        });
        debug!(?target, ?bounds, "tooltip shown");
    }

    /// Mark a live overlay hidden.
    pub(crate) fn hide(&mut self, state: &mut TrackedState<T::Node>) {
        if let Some(ov) = state.overlay.as_mut().filter(|ov| ov.visible) {
            self.overlay.hide(self.tree);
            ov.visible = false;
        }
    }

    pub(crate) fn cancel_show(&mut self, state: &mut TrackedState<T::Node>) {
        if let Some(id) = state.pending_show.take() {
            self.timers.cancel(id);
        }
    }

    pub(crate) fn destroy(&mut self, state: &mut TrackedState<T::Node>) {
        if state.overlay.take().is_some() {
            self.overlay.destroy(self.tree);
        }
    }

    // Content changed under the same target: re-render in place, keeping the anchor.
    fn refresh(&mut self, state: &mut TrackedState<T::Node>) {
        if state.content.is_none() {
            self.destroy(state);
            return;
        }
        let Some(ov) = state.overlay.as_mut() else {
            return;
        };
        let size = self.overlay.measure(self.tree, &state.content);
        let viewport = self.overlay.viewport(self.tree);
        ov.bounds = place(ov.anchor, self.config.offset(), size, viewport);
        let frame = Frame {
            bounds: ov.bounds,
            class: &self.config.frame_class,
        };
        self.overlay.update(self.tree, &state.content, &frame);
        debug!(target = ?state.target, "tooltip content refreshed");
    }
}
