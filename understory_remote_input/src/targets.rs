// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target hierarchy: how the engine walks ancestors and hands events to handlers.
//!
//! ## Model
//!
//! Targets are small copyable handles (node ids, entity ids) arranged in a
//! parent chain. Each target advertises the [`Capabilities`] it can handle.
//! The engine never stores references into the host's tree; it only calls
//! [`ParentLookup::parent_of`], [`PointerTargets::capabilities`], and
//! [`PointerTargets::deliver`].
//!
//! ## Delivery helpers
//!
//! - [`execute`](PointerTargets::execute): deliver to exactly one target, if it
//!   has the event's capability.
//! - [`execute_hierarchy`](PointerTargets::execute_hierarchy): deliver to the
//!   first target on the ancestry (starting at the target itself) that has the
//!   capability.
//! - [`common_ancestor`](PointerTargets::common_ancestor): nearest target that
//!   is an ancestor-or-self of both inputs, used by hover transitions.

use crate::types::{Capabilities, PointerEvent};

/// Look up the parent of a target.
pub trait ParentLookup<T> {
    /// Returns the parent of `target`, or `None` if it is a root.
    fn parent_of(&self, target: &T) -> Option<T>;
}

/// A parent provider where every target is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<T> ParentLookup<T> for NoParent {
    #[inline]
    fn parent_of(&self, _target: &T) -> Option<T> {
        None
    }
}

/// Iterator over a target and its ancestors, nearest first.
///
/// Created by [`ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, T, P: ?Sized> {
    lookup: &'a P,
    next: Option<T>,
}

impl<T: Copy, P: ParentLookup<T> + ?Sized> Iterator for Ancestors<'_, T, P> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next?;
        self.next = self.lookup.parent_of(&current);
        Some(current)
    }
}

/// Walk from `start` (inclusive) up to its root.
pub fn ancestors<T, P: ParentLookup<T> + ?Sized>(lookup: &P, start: Option<T>) -> Ancestors<'_, T, P> {
    Ancestors {
        lookup,
        next: start,
    }
}

/// Host-side view of the targets the engine dispatches to.
pub trait PointerTargets<T: Copy + Eq>: ParentLookup<T> {
    /// Handler capabilities of `target`.
    fn capabilities(&self, target: &T) -> Capabilities;

    /// Receive an event. Only called for targets that have the event's capability.
    fn deliver(&mut self, target: T, event: &PointerEvent<'_, T>);

    /// First target on the ancestry of `start` (inclusive) with `capability`.
    fn find_handler(&self, start: Option<T>, capability: Capabilities) -> Option<T> {
        ancestors(self, start).find(|t| self.capabilities(t).contains(capability))
    }

    /// Deliver `event` to `target` if it can handle it. Returns whether it was delivered.
    fn execute(&mut self, target: Option<T>, event: &PointerEvent<'_, T>) -> bool {
        match target {
            Some(t) if self.capabilities(&t).contains(event.kind.capability()) => {
                self.deliver(t, event);
                true
            }
            _ => false,
        }
    }

    /// Deliver `event` to the nearest capable target on the ancestry of `start`.
    ///
    /// Returns the target that handled it.
    fn execute_hierarchy(&mut self, start: Option<T>, event: &PointerEvent<'_, T>) -> Option<T> {
        let handler = self.find_handler(start, event.kind.capability())?;
        self.deliver(handler, event);
        Some(handler)
    }

    /// Nearest target that is an ancestor-or-self of both `a` and `b`.
    fn common_ancestor(&self, a: Option<T>, b: Option<T>) -> Option<T> {
        ancestors(self, a).find(|x| ancestors(self, b).any(|y| y == *x))
    }
}
