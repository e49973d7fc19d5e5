// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic, cancellable one-shot timers for UI runtimes.
//!
//! ## Overview
//!
//! UI code frequently needs deferred work: a hover delay before a tooltip shows,
//! a short coalescing window after a burst of changes, a fixed polling interval.
//! This crate does not own a clock or a thread.
//! Instead, the host tells the queue what time it is, and the queue hands back
//! whichever entries are due, in deadline order.
//!
//! Time is expressed as a [`Duration`] since an arbitrary, host-chosen epoch
//! (for example the instant the application started, or a frame counter
//! converted to milliseconds). Only differences and ordering matter.
//!
//! ## Semantics
//!
//! - [`TimerQueue::schedule`] returns a [`TimerId`] that stays unique for the
//!   lifetime of the queue, even after the entry fires or is cancelled.
//! - [`TimerQueue::cancel`] removes a pending entry and returns its payload.
//!   Cancelling a fired or unknown id is a no-op.
//! - [`TimerQueue::pop_due`] yields entries whose deadline is `<= now`.
//!   Earlier deadlines come first; equal deadlines fire in scheduling order.
//!
//! Repeating timers are expressed by re-scheduling from the handler, which keeps
//! the interval under the control of whatever state is current when it fires.
//!
//! ## Minimal example
//!
//! ```
//! use core::time::Duration;
//! use understory_timing::TimerQueue;
//!
//! let mut q = TimerQueue::new();
//! let show = q.schedule(Duration::from_millis(500), "show");
//! let _poll = q.schedule(Duration::from_millis(250), "poll");
//!
//! // Nothing is due yet.
//! assert!(q.pop_due(Duration::from_millis(100)).is_none());
//!
//! // The earlier deadline fires first.
//! let (_, first) = q.pop_due(Duration::from_millis(600)).unwrap();
//! assert_eq!(first, "poll");
//!
//! // Cancelled entries never fire.
//! assert_eq!(q.cancel(show), Some("show"));
//! assert!(q.pop_due(Duration::from_millis(600)).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::time::Duration;

/// Handle of a scheduled timer.
///
/// Ids are never reused within a queue, so a stale handle cannot cancel a
/// newer entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    deadline: Duration,
    payload: T,
}

/// A deadline-ordered queue of one-shot timers carrying payloads of type `T`.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    // Sorted by (deadline, id); ids increase monotonically so ties keep scheduling order.
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let at = self
            .entries
            .partition_point(|e| (e.deadline, e.id) <= (deadline, id));
        self.entries.insert(
            at,
            Entry {
                id,
                deadline,
                payload,
            },
        );
        id
    }

    /// Cancel a pending timer, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos).payload)
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Deadline of `id`, if it is still pending.
    pub fn deadline_of(&self, id: TimerId) -> Option<Duration> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.deadline)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Remove and return the earliest entry whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        match self.entries.first() {
            Some(e) if e.deadline <= now => {
                let e = self.entries.remove(0);
                Some((e.id, e.payload))
            }
            _ => None,
        }
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all pending timers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate pending `(id, deadline, payload)` in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (TimerId, Duration, &T)> + '_ {
        self.entries.iter().map(|e| (e.id, e.deadline, &e.payload))
    }
}
