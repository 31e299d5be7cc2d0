// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Result ordering across surfaces.
//!
//! ## Precedence
//!
//! [`compare`] ranks two [`HitCandidate`]s; `Less` means the left candidate is
//! in front. Each rule is consulted only when every previous rule tied:
//!
//! 1. Different surfaces only:
//!    - both event cameras known and at different depths: higher camera depth first;
//!    - higher surface sort priority first;
//!    - higher surface render priority first.
//! 2. Smaller resolved sorting layer first.
//! 3. Higher sorting order first.
//! 4. Same root surface only: higher paint depth first.
//! 5. Smaller ray distance first.
//! 6. Smaller insertion index first.
//!
//! Floats compare with IEEE total ordering, so NaN input cannot make the
//! comparator inconsistent with itself.
//!
//! ## Winner selection
//!
//! Rules 1 and 4 are conditional, so a set mixing several roots can contain
//! preference cycles. [`first`] therefore selects with a single linear scan in
//! buffer order instead of sorting; for any set where the order is total this
//! is exactly the head of the sorted list.

use core::cmp::Ordering;

use crate::types::HitCandidate;

/// Compare two candidates; `Less` means `a` is in front of `b`.
pub fn compare<T>(a: &HitCandidate<T>, b: &HitCandidate<T>) -> Ordering {
    if a.surface != b.surface {
        if let (Some(da), Some(db)) = (a.camera_depth, b.camera_depth)
            && da != db
        {
            return db.total_cmp(&da);
        }
        if a.sort_priority != b.sort_priority {
            return b.sort_priority.cmp(&a.sort_priority);
        }
        if a.render_priority != b.render_priority {
            return b.render_priority.cmp(&a.render_priority);
        }
    }

    if a.sorting_layer != b.sorting_layer {
        return a.sorting_layer.cmp(&b.sorting_layer);
    }

    if a.sorting_order != b.sorting_order {
        return b.sorting_order.cmp(&a.sorting_order);
    }

    if a.depth != b.depth && a.root_surface == b.root_surface {
        return b.depth.cmp(&a.depth);
    }

    match a.distance.total_cmp(&b.distance) {
        Ordering::Equal => a.index.cmp(&b.index),
        ord => ord,
    }
}

/// Return the winning candidate, if any.
///
/// Ties keep the earlier candidate in buffer order.
pub fn first<T>(candidates: &[HitCandidate<T>]) -> Option<&HitCandidate<T>> {
    let mut best: Option<&HitCandidate<T>> = None;
    for c in candidates {
        match best {
            Some(b) if compare(c, b) != Ordering::Less => {}
            _ => best = Some(c),
        }
    }
    best
}
