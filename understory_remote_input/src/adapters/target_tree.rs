// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small retained target hierarchy that records what it receives.
//!
//! ## Notes
//!
//! [`TargetTree`] is enough to drive the engine without an existing UI tree:
//! headless tests, demos, or a host that only needs "which node got what".
//! Delivered events are queued and drained by the host after each tick.

use alloc::vec::Vec;

use kurbo::Point;

use crate::targets::{ParentLookup, PointerTargets};
use crate::types::{Capabilities, EventKind, PointerEvent, SourceId};

/// Identifier for a node in a [`TargetTree`].
///
/// Slot index plus generation. Removing a node frees its slot; reusing the
/// slot bumps the generation, so stale ids never alias a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetId(u32, u32);

impl TargetId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// An event recorded by [`TargetTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Delivered {
    /// What happened.
    pub kind: EventKind,
    /// Source that produced it.
    pub source: SourceId,
    /// Target that received it.
    pub target: TargetId,
    /// Screen position at delivery.
    pub position: Point,
    /// Click count at delivery.
    pub click_count: u32,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<TargetId>,
    children: Vec<TargetId>,
    capabilities: Capabilities,
}

/// Generational arena of targets with parent links and capabilities.
#[derive(Clone, Default)]
pub struct TargetTree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    events: Vec<Delivered>,
}

impl core::fmt::Debug for TargetTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("TargetTree")
            .field("nodes", &live)
            .field("free_list", &self.free_list.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl TargetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root).
    ///
    /// A stale `parent` inserts a root.
    pub fn insert(&mut self, parent: Option<TargetId>, capabilities: Capabilities) -> TargetId {
        let parent = parent.filter(|p| self.is_alive(*p));
        let node = |generation| Node {
            generation,
            parent,
            children: Vec::new(),
            capabilities,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            self.nodes.push(Some(node(1)));
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "TargetId uses 32-bit slot indices."
        )]
        let id = TargetId(idx as u32, generation);
        if let Some(p) = parent
            && let Some(n) = self.node_mut(p)
        {
            n.children.push(id);
        }
        id
    }

    /// Remove a node and its subtree. Stale ids are ignored.
    pub fn remove(&mut self, id: TargetId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let parent = node.parent;
        let children = node.children.clone();
        if let Some(p) = parent
            && let Some(pn) = self.node_mut(p)
        {
            pn.children.retain(|c| *c != id);
        }
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: TargetId) -> bool {
        self.node(id).is_some()
    }

    /// Parent of a live node.
    pub fn parent(&self, id: TargetId) -> Option<TargetId> {
        self.node(id)?.parent
    }

    /// Children of a live node, in insertion order.
    pub fn children(&self, id: TargetId) -> &[TargetId] {
        match self.node(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Replace a node's capabilities.
    pub fn set_capabilities(&mut self, id: TargetId, capabilities: Capabilities) {
        if let Some(n) = self.node_mut(id) {
            n.capabilities = capabilities;
        }
    }

    /// Events delivered since the last drain, in delivery order.
    pub fn events(&self) -> &[Delivered] {
        &self.events
    }

    /// Take the delivered events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Delivered> + '_ {
        self.events.drain(..)
    }

    fn node(&self, id: TargetId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: TargetId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }
}

impl ParentLookup<TargetId> for TargetTree {
    fn parent_of(&self, target: &TargetId) -> Option<TargetId> {
        self.parent(*target)
    }
}

impl PointerTargets<TargetId> for TargetTree {
    fn capabilities(&self, target: &TargetId) -> Capabilities {
        self.node(*target)
            .map_or(Capabilities::empty(), |n| n.capabilities)
    }

    fn deliver(&mut self, target: TargetId, event: &PointerEvent<'_, TargetId>) {
        self.events.push(Delivered {
            kind: event.kind,
            source: event.source,
            target,
            position: event.state.position(),
            click_count: event.state.click_count(),
        });
    }
}
