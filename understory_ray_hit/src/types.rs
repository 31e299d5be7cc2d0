// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: surface identifiers, rays, masks, element flags, and hit candidates.

use glam::Vec3;
use kurbo::Point;

/// Identifier of a registered hit-testable surface.
///
/// Surfaces are looked up by this id in the
/// [`SurfaceRegistry`](crate::registry::SurfaceRegistry), and every
/// [`HitCandidate`] records both the surface that produced it and that
/// surface's root (for nested surfaces sharing one paint order).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SurfaceId(pub u32);

/// A ray in world space.
///
/// The direction is normalized on construction. A zero direction stays zero
/// and never intersects anything.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// World-space origin.
    pub origin: Vec3,
    /// Unit direction (or zero for a degenerate ray).
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::ZERO,
        }
    }
}

bitflags::bitflags! {
    /// Layer filter for the auxiliary occlusion test.
    ///
    /// The meaning of each bit is up to the host's physics/geometry layer setup.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        /// The default layer.
        const DEFAULT = 1 << 0;
        /// Every layer.
        const ALL = u32::MAX;
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility and ray picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element has been drawn (has a paint depth) and can be considered at all.
        const VISIBLE        = 0b0000_0001;
        /// Element opts in to ray hit testing.
        const RAYCAST_TARGET = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::RAYCAST_TARGET
    }
}

/// One potential intersection of a ray with a surface element.
///
/// Candidates are produced fresh by each raycast and ranked with
/// [`ordering::compare`](crate::ordering::compare).
#[derive(Clone, Debug, PartialEq)]
pub struct HitCandidate<T> {
    /// Target handle of the element that was hit.
    pub target: T,
    /// World-space intersection point.
    pub world_position: Vec3,
    /// Reported world normal (occluder normal when occlusion clamped the ray, else the surface normal).
    pub world_normal: Vec3,
    /// Intersection projected through the surface's event camera.
    pub screen_position: Point,
    /// Distance along the ray.
    pub distance: f32,
    /// Surface-local paint depth; higher is drawn later.
    pub depth: i32,
    /// Surface that produced this candidate.
    pub surface: SurfaceId,
    /// Root surface of [`Self::surface`].
    pub root_surface: SurfaceId,
    /// Render depth of the surface's event camera, if it has one.
    pub camera_depth: Option<f32>,
    /// Surface sort priority; higher wins across surfaces.
    pub sort_priority: i32,
    /// Surface render priority; higher wins across surfaces.
    pub render_priority: i32,
    /// Resolved sorting layer order; smaller sorts first.
    pub sorting_layer: i32,
    /// Order within the sorting layer; higher wins.
    pub sorting_order: i32,
    /// Insertion index in the shared candidate buffer.
    pub index: usize,
}

impl<T> HitCandidate<T> {
    /// Build a candidate with neutral layering at the given position and distance.
    ///
    /// Mostly useful for hosts that produce candidates from their own pickers.
    pub fn new(target: T, surface: SurfaceId, world_position: Vec3, distance: f32) -> Self {
        Self {
            target,
            world_position,
            world_normal: Vec3::ZERO,
            screen_position: Point::ORIGIN,
            distance,
            depth: 0,
            surface,
            root_surface: surface,
            camera_depth: None,
            sort_priority: 0,
            render_priority: 0,
            sorting_layer: 0,
            sorting_order: 0,
            index: 0,
        }
    }
}
