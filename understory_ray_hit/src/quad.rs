// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar quads and ray/quad intersection.

use glam::Vec3;
use kurbo::Rect;

use crate::types::Ray;

/// Rays closer than this to parallel with a quad's plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A planar rectangle in world space.
///
/// Corners are stored bottom-left, top-left, top-right, bottom-right.
/// The quad's forward axis is `up × right`, pointing away from a viewer that
/// sees the front face (the UI convention where elements face away from the
/// user).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    /// World corners: bottom-left, top-left, top-right, bottom-right.
    pub corners: [Vec3; 4],
}

impl Quad {
    /// Create a quad from its four world corners.
    pub const fn new(bottom_left: Vec3, top_left: Vec3, top_right: Vec3, bottom_right: Vec3) -> Self {
        Self {
            corners: [bottom_left, top_left, top_right, bottom_right],
        }
    }

    /// An axis-aligned quad in the plane `z`, facing viewers on the `+Z` side.
    ///
    /// `rect` is interpreted with y growing upward.
    pub fn from_rect(rect: Rect, z: f32) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "World geometry is single precision."
        )]
        let (x0, y0, x1, y1) = (rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32);
        Self::new(
            Vec3::new(x0, y0, z),
            Vec3::new(x0, y1, z),
            Vec3::new(x1, y1, z),
            Vec3::new(x1, y0, z),
        )
    }

    /// Unit forward axis (`up × right`), or zero for a degenerate quad.
    pub fn forward(&self) -> Vec3 {
        let [c0, c1, _, c3] = self.corners;
        (c1 - c0).cross(c3 - c0).normalize_or_zero()
    }

    /// Intersect `ray` with this quad.
    ///
    /// Returns the world hit position and the distance along the ray, or
    /// `None` when the ray is parallel to the plane, the plane is behind the
    /// origin, the quad is degenerate, or the point falls outside the edges.
    pub fn intersect(&self, ray: &Ray) -> Option<(Vec3, f32)> {
        let [c0, c1, c2, c3] = self.corners;
        let normal = (c1 - c0).cross(c2 - c0).try_normalize()?;
        let denom = normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let enter = normal.dot(c0 - ray.origin) / denom;
        if !enter.is_finite() || enter < 0.0 {
            return None;
        }
        let point = ray.point_at(enter);

        // Right of the left edge and above the bottom edge.
        let bottom_dot = (point - c0).dot(c3 - c0);
        let left_dot = (point - c0).dot(c1 - c0);
        if left_dot < 0.0 || bottom_dot < 0.0 {
            return None;
        }
        // Left of the right edge and below the top edge.
        let top_dot = (point - c2).dot(c1 - c2);
        let right_dot = (point - c2).dot(c3 - c2);
        if top_dot < 0.0 || right_dot < 0.0 {
            return None;
        }
        Some((point, enter))
    }
}
