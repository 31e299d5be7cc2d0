// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-source pointer state carried across ticks.

use alloc::vec::Vec;

use glam::Vec3;
use kurbo::{Point, Vec2};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::types::{HitCandidate, LayerMask, Ray};

use crate::source::{InputSource, Pose};
use crate::types::ButtonDelta;

/// Screen position used while no projection has happened yet this tick.
pub const OUT_OF_BOUNDS: Point = Point::new(f64::MIN, f64::MIN);

/// Where a source's ray ends, for drawing a laser or cursor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayEndpoint {
    /// World-space end point.
    pub point: Vec3,
    /// Normal at the end point, facing back towards the source when nothing was hit.
    pub normal: Vec3,
    /// Whether the ray ended on a UI hit.
    pub hit: bool,
}

/// Everything the engine remembers about one source between ticks.
///
/// Handlers receive a shared reference through
/// [`PointerEvent::state`](crate::types::PointerEvent::state); only the engine
/// mutates it.
#[derive(Clone, Debug)]
pub struct SourceEventState<T> {
    // Input snapshot.
    pub(crate) pose: Pose,
    pub(crate) select_down: bool,
    pub(crate) select_delta: ButtonDelta,
    pub(crate) check_occlusion: bool,
    pub(crate) occlusion_mask: LayerMask,
    pub(crate) max_distance: f32,

    // Screen-space kinematics.
    pub(crate) position: Point,
    pub(crate) delta: Vec2,
    pub(crate) press_position: Point,
    pub(crate) scroll_delta: Vec2,

    // Hits.
    pub(crate) current_raycast: Option<HitCandidate<T>>,
    pub(crate) press_raycast: Option<HitCandidate<T>>,
    pub(crate) last_raycast: Option<HitCandidate<T>>,
    /// Camera of the most recent tick that resolved one; used while the ray hits nothing.
    pub(crate) event_camera: Option<Camera>,

    // Targets.
    pub(crate) pointer_enter: Option<T>,
    pub(crate) hovered: Vec<T>,
    pub(crate) pointer_press: Option<T>,
    pub(crate) last_press: Option<T>,
    pub(crate) raw_pointer_press: Option<T>,
    pub(crate) pointer_drag: Option<T>,

    // Click and drag bookkeeping.
    pub(crate) eligible_for_click: bool,
    pub(crate) dragging: bool,
    pub(crate) click_count: u32,
    pub(crate) click_time: f64,
}

impl<T> Default for SourceEventState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SourceEventState<T> {
    /// Fresh state: nothing hovered, pressed, or dragged.
    pub fn new() -> Self {
        Self {
            pose: Pose::default(),
            select_down: false,
            select_delta: ButtonDelta::NO_CHANGE,
            check_occlusion: false,
            occlusion_mask: LayerMask::ALL,
            max_distance: 0.0,
            position: OUT_OF_BOUNDS,
            delta: Vec2::ZERO,
            press_position: Point::ZERO,
            scroll_delta: Vec2::ZERO,
            current_raycast: None,
            press_raycast: None,
            last_raycast: None,
            event_camera: None,
            pointer_enter: None,
            hovered: Vec::new(),
            pointer_press: None,
            last_press: None,
            raw_pointer_press: None,
            pointer_drag: None,
            eligible_for_click: false,
            dragging: false,
            click_count: 0,
            click_time: 0.0,
        }
    }

    /// Return every field to its default, keeping the hover list's allocation.
    pub fn reset(&mut self) {
        let mut hovered = core::mem::take(&mut self.hovered);
        hovered.clear();
        *self = Self {
            hovered,
            ..Self::new()
        };
    }

    /// Copy the source's inputs for this tick and take its pending scroll.
    pub(crate) fn sync_from<S: InputSource + ?Sized>(&mut self, source: &mut S) {
        self.pose = source.pose();
        self.select_down = source.select_down();
        self.select_delta = source.select_delta();
        self.check_occlusion = source.check_occlusion();
        self.occlusion_mask = source.occlusion_mask();
        self.max_distance = source.max_distance();
        self.scroll_delta = source.take_scroll_delta();
    }

    /// Inputs of a source that is going away: no ray length, nothing held.
    pub(crate) fn clear_inputs(&mut self) {
        self.pose = Pose::default();
        self.select_down = false;
        self.select_delta = ButtonDelta::NO_CHANGE;
        self.check_occlusion = false;
        self.max_distance = 0.0;
        self.scroll_delta = Vec2::ZERO;
        self.delta = Vec2::ZERO;
    }

    /// Set the press target, remembering the previous one when it changes.
    pub(crate) fn set_press(&mut self, press: Option<T>)
    where
        T: Copy + PartialEq,
    {
        if self.pointer_press == press {
            return;
        }
        self.last_press = self.pointer_press;
        self.pointer_press = press;
    }

    /// Snapshot of the source pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// The source's world-space ray.
    pub fn ray(&self) -> Ray {
        self.pose.ray()
    }

    /// Whether select was held at the last snapshot.
    pub fn select_down(&self) -> bool {
        self.select_down
    }

    /// Select transition being dispatched; empty outside of dispatch.
    pub fn select_delta(&self) -> ButtonDelta {
        self.select_delta
    }

    /// Maximum ray length at the last snapshot.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Screen position of the pointer on the event camera.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Screen movement since the previous tick.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Screen position at the last press.
    pub fn press_position(&self) -> Point {
        self.press_position
    }

    /// Scroll input for this tick.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    /// Whether the pointer moved on screen this tick.
    pub fn is_pointer_moving(&self) -> bool {
        self.delta.hypot2() > 0.0
    }

    /// Winning hit of this tick.
    pub fn current_raycast(&self) -> Option<&HitCandidate<T>> {
        self.current_raycast.as_ref()
    }

    /// Winning hit at the last press.
    pub fn press_raycast(&self) -> Option<&HitCandidate<T>> {
        self.press_raycast.as_ref()
    }

    /// Winning hit of the previous completed tick.
    pub fn last_raycast(&self) -> Option<&HitCandidate<T>> {
        self.last_raycast.as_ref()
    }

    /// Camera used to project this source's hits onto the screen.
    pub fn event_camera(&self) -> Option<&Camera> {
        self.event_camera.as_ref()
    }

    /// Target of the current hit, if any.
    pub fn hit_target(&self) -> Option<T>
    where
        T: Copy,
    {
        self.current_raycast.as_ref().map(|h| h.target)
    }

    /// Deepest hovered target.
    pub fn pointer_enter(&self) -> Option<T>
    where
        T: Copy,
    {
        self.pointer_enter
    }

    /// Every target that has received Enter without a matching Exit, deepest first.
    pub fn hovered(&self) -> &[T] {
        &self.hovered
    }

    /// Target that received the current press.
    pub fn pointer_press(&self) -> Option<T>
    where
        T: Copy,
    {
        self.pointer_press
    }

    /// Press target before the most recent change.
    pub fn last_press(&self) -> Option<T>
    where
        T: Copy,
    {
        self.last_press
    }

    /// Raw hit target at the current press, regardless of handlers.
    pub fn raw_pointer_press(&self) -> Option<T>
    where
        T: Copy,
    {
        self.raw_pointer_press
    }

    /// Drag handler chosen at the current press.
    pub fn pointer_drag(&self) -> Option<T>
    where
        T: Copy,
    {
        self.pointer_drag
    }

    /// Whether a release now would still count as a click.
    pub fn eligible_for_click(&self) -> bool {
        self.eligible_for_click
    }

    /// Whether a drag is in progress.
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Consecutive clicks on the same target within the click window.
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Time of the last press.
    pub fn click_time(&self) -> f64 {
        self.click_time
    }

    /// End of the source's ray: the last hit, or the full-length ray when nothing was hit.
    pub fn ray_endpoint(&self) -> RayEndpoint {
        if let Some(hit) = &self.last_raycast {
            return RayEndpoint {
                point: hit.world_position,
                normal: hit.world_normal,
                hit: true,
            };
        }
        let ray = self.ray();
        RayEndpoint {
            point: ray.point_at(self.max_distance),
            normal: -ray.direction,
            hit: false,
        }
    }
}
