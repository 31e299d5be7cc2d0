// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera projection used to turn world hits into screen positions.

use glam::{Mat4, Vec3};
use kurbo::{Point, Size};

/// A camera that can project world positions to screen space.
///
/// `depth` is the camera's render priority: when two candidates come from
/// surfaces seen through cameras of different depth, the deeper (higher)
/// camera renders on top and wins ranking.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Render priority across cameras; higher renders later (on top).
    pub depth: f32,
    /// Combined view and projection transform.
    pub view_projection: Mat4,
    /// Screen size in pixels.
    pub viewport: Size,
}

impl Camera {
    /// Create a camera with depth `0`.
    pub fn new(view_projection: Mat4, viewport: Size) -> Self {
        Self {
            depth: 0.0,
            view_projection,
            viewport,
        }
    }

    /// Return this camera with the given render depth.
    #[must_use]
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Project a world position to screen pixels.
    ///
    /// The origin is the top-left corner of the viewport and y grows downward.
    /// Points behind a perspective camera project through the divide like any
    /// other point; callers filter them by ray distance.
    pub fn world_to_screen(&self, world: Vec3) -> Point {
        let ndc = self.view_projection.project_point3(world);
        let x = (f64::from(ndc.x) + 1.0) * 0.5 * self.viewport.width;
        let y = (1.0 - f64::from(ndc.y)) * 0.5 * self.viewport.height;
        Point::new(x, y)
    }
}
