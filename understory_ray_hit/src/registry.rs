// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface registry: the set of currently registered surface hit testers.
//!
//! The registry is a plain context object. Whoever drives the ticks owns it
//! (typically a dispatch engine), so independent engines never share surfaces.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::camera::Camera;
use crate::ordering;
use crate::surface::{Occluder, RayQuery, SurfaceHitTester};
use crate::types::{HitCandidate, SurfaceId};

/// Registered surfaces, keyed by [`SurfaceId`].
pub struct SurfaceRegistry<T> {
    surfaces: Vec<Box<dyn SurfaceHitTester<T>>>,
    generation: u64,
}

impl<T> core::fmt::Debug for SurfaceRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let ids: Vec<SurfaceId> = self.surfaces.iter().map(|s| s.id()).collect();
        f.debug_struct("SurfaceRegistry")
            .field("surfaces", &ids)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T> Default for SurfaceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SurfaceRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            generation: 0,
        }
    }

    /// Register a surface.
    ///
    /// Returns `false` (and drops `surface`) if a surface with the same id is
    /// already registered.
    pub fn register<S: SurfaceHitTester<T> + 'static>(&mut self, surface: S) -> bool {
        let id = surface.id();
        if self.contains(id) {
            return false;
        }
        self.surfaces.push(Box::new(surface));
        self.generation += 1;
        tracing::debug!(surface = ?id, count = self.surfaces.len(), "surface registered");
        true
    }

    /// Remove a surface, returning it if it was registered.
    pub fn unregister(&mut self, id: SurfaceId) -> Option<Box<dyn SurfaceHitTester<T>>> {
        let pos = self.surfaces.iter().position(|s| s.id() == id)?;
        let surface = self.surfaces.remove(pos);
        self.generation += 1;
        tracing::debug!(surface = ?id, count = self.surfaces.len(), "surface unregistered");
        Some(surface)
    }

    /// Whether a surface with this id is registered.
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.iter().any(|s| s.id() == id)
    }

    /// Look up a surface.
    pub fn get(&self, id: SurfaceId) -> Option<&dyn SurfaceHitTester<T>> {
        self.surfaces.iter().find(|s| s.id() == id).map(|s| &**s)
    }

    /// Look up a surface mutably.
    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut (dyn SurfaceHitTester<T> + 'static)> {
        self.surfaces.iter_mut().find(|s| s.id() == id).map(|s| &mut **s)
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surface is registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Counter bumped on every successful register or unregister.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterate registered surfaces.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SurfaceHitTester<T>> {
        self.surfaces.iter().map(|s| &**s)
    }

    /// Event camera of a registered surface, falling back to `main`.
    pub fn event_camera<'a>(&'a self, id: SurfaceId, main: Option<&'a Camera>) -> Option<&'a Camera> {
        match self.get(id) {
            Some(s) => s.event_camera(main),
            None => main,
        }
    }

    /// Raycast every active, raycastable surface into `out`.
    ///
    /// `out` is appended to; callers clear it between sources.
    pub fn raycast_all(&self, query: &RayQuery<'_>, occluder: &dyn Occluder, out: &mut Vec<HitCandidate<T>>) {
        for surface in &self.surfaces {
            if surface.is_active() && surface.can_raycast() {
                surface.raycast(query, occluder, out);
            }
        }
    }

    /// Raycast every surface and return the winning candidate.
    ///
    /// `scratch` is cleared before and after use so it can be reused every tick.
    pub fn first_hit(
        &self,
        query: &RayQuery<'_>,
        occluder: &dyn Occluder,
        scratch: &mut Vec<HitCandidate<T>>,
    ) -> Option<HitCandidate<T>>
    where
        T: Clone,
    {
        scratch.clear();
        self.raycast_all(query, occluder, scratch);
        let first = ordering::first(scratch).cloned();
        scratch.clear();
        first
    }
}
