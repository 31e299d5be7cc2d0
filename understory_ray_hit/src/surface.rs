// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface hit testers: the [`SurfaceHitTester`] contract and the [`QuadSurface`] implementation.
//!
//! ## Overview
//!
//! A surface is a hit-testable region (analogous to a UI canvas) holding a
//! set of elements. Given a [`RayQuery`], it appends the elements the ray hits
//! to a caller-owned buffer as [`HitCandidate`]s, already stamped with the
//! layering attributes that [`ordering::compare`](crate::ordering::compare)
//! needs to rank candidates from different surfaces.
//!
//! ## Occlusion
//!
//! When a query asks for it, the surface consults an [`Occluder`] for the
//! nearest opaque hit along the same ray. A nearer occluder clamps the
//! effective hit distance and its normal is reported on every candidate.

use alloc::vec::Vec;
use core::cmp::Reverse;

use glam::Vec3;
use kurbo::Point;

use crate::camera::Camera;
use crate::quad::Quad;
use crate::types::{ElementFlags, HitCandidate, LayerMask, Ray, SurfaceId};

/// Everything a surface needs to know about one source's ray for one tick.
#[derive(Copy, Clone, Debug)]
pub struct RayQuery<'a> {
    /// World-space ray.
    pub ray: Ray,
    /// Hits at or beyond this distance are discarded.
    pub max_distance: f32,
    /// Whether to run the auxiliary occlusion test.
    pub check_occlusion: bool,
    /// Layers considered by the occlusion test.
    pub occlusion_mask: LayerMask,
    /// Fallback camera for surfaces without their own.
    pub main_camera: Option<&'a Camera>,
}

/// Nearest opaque hit reported by an [`Occluder`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OcclusionHit {
    /// Distance along the ray.
    pub distance: f32,
    /// Surface normal of the occluder at the hit.
    pub normal: Vec3,
}

/// Opaque scene geometry that can block a ray before it reaches UI.
pub trait Occluder {
    /// Return the nearest opaque hit along `ray` within `max_distance` on the
    /// layers in `mask`, if any.
    fn first_opaque_hit(&self, ray: &Ray, max_distance: f32, mask: LayerMask)
    -> Option<OcclusionHit>;
}

/// An occluder with no geometry; nothing is ever blocked.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOcclusion;

impl Occluder for NoOcclusion {
    #[inline]
    fn first_opaque_hit(&self, _ray: &Ray, _max_distance: f32, _mask: LayerMask) -> Option<OcclusionHit> {
        None
    }
}

/// A registered, hit-testable surface.
pub trait SurfaceHitTester<T> {
    /// Identifier of this surface.
    fn id(&self) -> SurfaceId;

    /// Whether the surface is currently active.
    fn is_active(&self) -> bool {
        true
    }

    /// Whether the surface can currently be raycast.
    fn can_raycast(&self) -> bool {
        true
    }

    /// Camera used to project hits on this surface, falling back to `main`.
    fn event_camera<'a>(&'a self, main: Option<&'a Camera>) -> Option<&'a Camera>;

    /// Append the candidates hit by `query` to `out`.
    ///
    /// Implementations append in front-to-back paint order, set each
    /// candidate's `index` to its position in `out`, and keep no reference to
    /// the appended candidates.
    fn raycast(&self, query: &RayQuery<'_>, occluder: &dyn Occluder, out: &mut Vec<HitCandidate<T>>);
}

/// Cross-surface layering attributes stamped on every candidate of a surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceLayering {
    /// Higher sort priority wins across surfaces.
    pub sort_priority: i32,
    /// Higher render priority wins across surfaces.
    pub render_priority: i32,
    /// Resolved sorting layer order; smaller sorts first.
    pub sorting_layer: i32,
    /// Order within the sorting layer; higher wins.
    pub sorting_order: i32,
}

/// One hit-testable element of a [`QuadSurface`].
#[derive(Clone, Debug)]
pub struct SurfaceElement<T> {
    /// Target handle reported on hits.
    pub target: T,
    /// World-space bounds.
    pub quad: Quad,
    /// Paint depth within the surface; higher is drawn later.
    pub depth: i32,
    /// Visibility and ray picking flags.
    pub flags: ElementFlags,
}

impl<T> SurfaceElement<T> {
    /// Create a visible, raycastable element.
    pub fn new(target: T, quad: Quad, depth: i32) -> Self {
        Self {
            target,
            quad,
            depth,
            flags: ElementFlags::default(),
        }
    }
}

/// A surface made of planar rectangular elements.
pub struct QuadSurface<T> {
    id: SurfaceId,
    root: SurfaceId,
    enabled: bool,
    camera: Option<Camera>,
    forward: Vec3,
    layering: SurfaceLayering,
    ignore_reversed: bool,
    filter: Option<fn(&T, Point) -> bool>,
    elements: Vec<SurfaceElement<T>>,
}

impl<T> core::fmt::Debug for QuadSurface<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadSurface")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("enabled", &self.enabled)
            .field("layering", &self.layering)
            .field("elements", &self.elements.len())
            .finish_non_exhaustive()
    }
}

impl<T: Copy> QuadSurface<T> {
    /// Create an enabled, empty surface that is its own root and faces `-Z`.
    pub fn new(id: SurfaceId) -> Self {
        Self {
            id,
            root: id,
            enabled: true,
            camera: None,
            forward: Vec3::NEG_Z,
            layering: SurfaceLayering::default(),
            ignore_reversed: false,
            filter: None,
            elements: Vec::new(),
        }
    }

    /// Set the root surface; nested surfaces share their root's paint order.
    pub fn set_root(&mut self, root: SurfaceId) {
        self.root = root;
    }

    /// Enable or disable the surface.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the surface's own event camera (`None` falls back to the main camera).
    pub fn set_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    /// Set the surface's forward axis; hits report `-forward` as their normal.
    pub fn set_forward(&mut self, forward: Vec3) {
        self.forward = forward.normalize_or_zero();
    }

    /// Set the cross-surface layering attributes.
    pub fn set_layering(&mut self, layering: SurfaceLayering) {
        self.layering = layering;
    }

    /// Reject elements whose forward axis faces the ray's origin.
    pub fn set_ignore_reversed(&mut self, ignore: bool) {
        self.ignore_reversed = ignore;
    }

    /// Set an optional fine-grained predicate evaluated at the projected screen point.
    pub fn set_element_filter(&mut self, filter: Option<fn(&T, Point) -> bool>) {
        self.filter = filter;
    }

    /// Add an element, returning its position in [`Self::elements`].
    pub fn push(&mut self, element: SurfaceElement<T>) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[SurfaceElement<T>] {
        &self.elements
    }

    /// Mutable access to elements (e.g. to move them between ticks).
    pub fn elements_mut(&mut self) -> &mut [SurfaceElement<T>] {
        &mut self.elements
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Layering attributes.
    pub fn layering(&self) -> SurfaceLayering {
        self.layering
    }
}

impl<T: Copy> SurfaceHitTester<T> for QuadSurface<T> {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn is_active(&self) -> bool {
        self.enabled
    }

    fn can_raycast(&self) -> bool {
        !self.elements.is_empty()
    }

    fn event_camera<'a>(&'a self, main: Option<&'a Camera>) -> Option<&'a Camera> {
        self.camera.as_ref().or(main)
    }

    fn raycast(&self, query: &RayQuery<'_>, occluder: &dyn Occluder, out: &mut Vec<HitCandidate<T>>) {
        let Some(camera) = self.event_camera(query.main_camera) else {
            return;
        };
        let ray = query.ray;

        let mut hit_distance = query.max_distance;
        let mut normal = -self.forward;
        if query.check_occlusion
            && let Some(hit) = occluder.first_opaque_hit(&ray, hit_distance, query.occlusion_mask)
            && hit.distance < hit_distance
        {
            hit_distance = hit.distance;
            if hit.normal != Vec3::ZERO {
                normal = hit.normal;
            }
        }

        let start = out.len();
        for element in &self.elements {
            if !element.flags.contains(ElementFlags::VISIBLE | ElementFlags::RAYCAST_TARGET) {
                continue;
            }
            let Some((world_position, distance)) = element.quad.intersect(&ray) else {
                continue;
            };
            let screen_position = camera.world_to_screen(world_position);
            if let Some(filter) = self.filter
                && !filter(&element.target, screen_position)
            {
                continue;
            }
            if self.ignore_reversed && ray.direction.dot(element.quad.forward()) <= 0.0 {
                continue;
            }
            if distance >= hit_distance {
                continue;
            }
            out.push(HitCandidate {
                target: element.target,
                world_position,
                world_normal: normal,
                screen_position,
                distance,
                depth: element.depth,
                surface: self.id,
                root_surface: self.root,
                camera_depth: self.camera.as_ref().or(query.main_camera).map(|c| c.depth),
                sort_priority: self.layering.sort_priority,
                render_priority: self.layering.render_priority,
                sorting_layer: self.layering.sorting_layer,
                sorting_order: self.layering.sorting_order,
                index: out.len(),
            });
        }

        // Front-to-back paint order within this surface; emission order breaks depth ties.
        let appended = &mut out[start..];
        appended.sort_unstable_by_key(|c| (Reverse(c.depth), c.index));
        for (i, c) in appended.iter_mut().enumerate() {
            c.index = start + i;
        }
    }
}
