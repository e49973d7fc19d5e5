// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation records and observation options.
//!
//! A [`Document`](crate::Document) only records mutations while it is observed
//! (see [`Document::observe`](crate::Document::observe)). Disconnecting drops
//! any records that were not taken yet, so writes performed while disconnected
//! are never delivered.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::NodeId;

/// What an observer wants to hear about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserveInit {
    /// Record attribute changes.
    pub attributes: bool,
    /// Restrict attribute records to these names. `None` records every attribute.
    pub attribute_filter: Option<Vec<String>>,
    /// Record child insertions/removals and text replacement.
    pub child_list: bool,
    /// Extend observation from the observed node to all its descendants.
    pub subtree: bool,
}

impl ObserveInit {
    pub(crate) fn wants_attribute(&self, name: &str) -> bool {
        self.attributes
            && self
                .attribute_filter
                .as_ref()
                .is_none_or(|f| f.iter().any(|n| n == name))
    }
}

/// Kind of a recorded mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// An attribute was set or removed.
    Attributes,
    /// Children were inserted or removed, or text content was replaced.
    ChildList,
}

/// One recorded mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRecord {
    /// Kind of mutation.
    pub kind: MutationKind,
    /// Node whose attributes or children changed.
    pub target: NodeId,
    /// Attribute name for [`MutationKind::Attributes`].
    pub attribute_name: Option<String>,
    /// Inserted children.
    pub added: Vec<NodeId>,
    /// Removed children (stale by the time the record is read).
    pub removed: Vec<NodeId>,
}

impl MutationRecord {
    pub(crate) fn attribute(target: NodeId, name: &str) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            attribute_name: Some(String::from(name)),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub(crate) fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            attribute_name: None,
            added,
            removed,
        }
    }
}
