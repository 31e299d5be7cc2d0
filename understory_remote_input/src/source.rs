// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input sources: the [`InputSource`] contract and the [`RemoteSource`] implementation.
//!
//! A source is anything that produces a world-space pose and a select button:
//! a tracked controller, a gaze ray, a mouse ray cast from a 3D camera. The
//! engine reads a snapshot of each registered source once per tick and, after
//! dispatch, forces its [`ButtonDelta`] back to [`ButtonDelta::NO_CHANGE`].

use alloc::boxed::Box;

use glam::{Quat, Vec3};
use kurbo::Vec2;
use understory_ray_hit::types::{LayerMask, Ray};

use crate::types::{ButtonDelta, SourceId};

/// Default maximum ray length for a [`RemoteSource`].
pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;

/// World-space pose of a source. The pointing direction is the pose's `-Z` axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    /// World-space origin of the ray.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a pose.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` pointing along `direction`.
    ///
    /// A zero `direction` keeps the identity orientation.
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let rotation = match direction.try_normalize() {
            Some(dir) => Quat::from_rotation_arc(Vec3::NEG_Z, dir),
            None => Quat::IDENTITY,
        };
        Self { position, rotation }
    }

    /// Pointing direction (unit length).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The pointing ray.
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }
}

/// A registered producer of pointer input.
pub trait InputSource {
    /// Stable identity of the source.
    fn id(&self) -> SourceId;

    /// Current world-space pose.
    fn pose(&self) -> Pose;

    /// Whether select is currently held.
    fn select_down(&self) -> bool;

    /// Select transition since the last tick.
    fn select_delta(&self) -> ButtonDelta;

    /// Overwrite the pending select transition.
    ///
    /// The engine calls this with [`ButtonDelta::NO_CHANGE`] once per tick.
    fn set_select_delta(&mut self, delta: ButtonDelta);

    /// Whether hits should be tested against opaque scene geometry.
    fn check_occlusion(&self) -> bool {
        false
    }

    /// Layers considered when [`check_occlusion`](Self::check_occlusion) is set.
    fn occlusion_mask(&self) -> LayerMask {
        LayerMask::ALL
    }

    /// Maximum ray length.
    fn max_distance(&self) -> f32;

    /// Take the scroll accumulated since the last tick.
    fn take_scroll_delta(&mut self) -> Vec2 {
        Vec2::ZERO
    }
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn id(&self) -> SourceId {
        (**self).id()
    }
    fn pose(&self) -> Pose {
        (**self).pose()
    }
    fn select_down(&self) -> bool {
        (**self).select_down()
    }
    fn select_delta(&self) -> ButtonDelta {
        (**self).select_delta()
    }
    fn set_select_delta(&mut self, delta: ButtonDelta) {
        (**self).set_select_delta(delta);
    }
    fn check_occlusion(&self) -> bool {
        (**self).check_occlusion()
    }
    fn occlusion_mask(&self) -> LayerMask {
        (**self).occlusion_mask()
    }
    fn max_distance(&self) -> f32 {
        (**self).max_distance()
    }
    fn take_scroll_delta(&mut self) -> Vec2 {
        (**self).take_scroll_delta()
    }
}

/// A general-purpose source driven by the host each frame.
///
/// Button edges are accumulated into the delta, so a press and a release
/// between two ticks both reach dispatch.
#[derive(Clone, Debug)]
pub struct RemoteSource {
    id: SourceId,
    pose: Pose,
    max_distance: f32,
    check_occlusion: bool,
    occlusion_mask: LayerMask,
    select_down: bool,
    select_delta: ButtonDelta,
    scroll: Vec2,
}

impl RemoteSource {
    /// Create a source at the origin pointing along `-Z`, select up.
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            pose: Pose::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
            check_occlusion: false,
            occlusion_mask: LayerMask::ALL,
            select_down: false,
            select_delta: ButtonDelta::NO_CHANGE,
            scroll: Vec2::ZERO,
        }
    }

    /// Move the source.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Set the maximum ray length.
    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.max_distance = max_distance;
    }

    /// Enable or disable occlusion against opaque geometry on `mask`.
    pub fn set_occlusion(&mut self, check: bool, mask: LayerMask) {
        self.check_occlusion = check;
        self.occlusion_mask = mask;
    }

    /// Set the select button state, recording an edge only on change.
    pub fn set_select_down(&mut self, down: bool) {
        if self.select_down == down {
            return;
        }
        self.select_down = down;
        self.select_delta |= if down {
            ButtonDelta::PRESSED
        } else {
            ButtonDelta::RELEASED
        };
    }

    /// Flip the select button, returning the new state.
    pub fn toggle_select(&mut self) -> bool {
        self.set_select_down(!self.select_down);
        self.select_down
    }

    /// Accumulate scroll input until the next tick.
    pub fn add_scroll(&mut self, delta: Vec2) {
        self.scroll += delta;
    }
}

impl InputSource for RemoteSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn select_down(&self) -> bool {
        self.select_down
    }

    fn select_delta(&self) -> ButtonDelta {
        self.select_delta
    }

    fn set_select_delta(&mut self, delta: ButtonDelta) {
        self.select_delta = delta;
    }

    fn check_occlusion(&self) -> bool {
        self.check_occlusion
    }

    fn occlusion_mask(&self) -> LayerMask {
        self.occlusion_mask
    }

    fn max_distance(&self) -> f32 {
        self.max_distance
    }

    fn take_scroll_delta(&mut self) -> Vec2 {
        core::mem::take(&mut self.scroll)
    }
}
