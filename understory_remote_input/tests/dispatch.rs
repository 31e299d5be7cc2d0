// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end dispatch over a `TargetTree`.

use glam::{Mat4, Vec3};
use kurbo::{Rect, Size, Vec2};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::quad::Quad;
use understory_ray_hit::surface::{OcclusionHit, Occluder, QuadSurface, SurfaceElement};
use understory_ray_hit::types::{LayerMask, Ray, SurfaceId};
use understory_remote_input::adapters::target_tree::{TargetId, TargetTree};
use understory_remote_input::engine::DispatchEngine;
use understory_remote_input::source::{InputSource, Pose, RemoteSource};
use understory_remote_input::state::OUT_OF_BOUNDS;
use understory_remote_input::types::{ButtonDelta, Capabilities, EventKind, SourceId};

const HAND: SourceId = SourceId(1);

fn camera() -> Camera {
    Camera::new(
        Mat4::orthographic_rh(0.0, 100.0, 0.0, 100.0, -1000.0, 1000.0),
        Size::new(100.0, 100.0),
    )
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Quad {
    Quad::from_rect(Rect::new(x0, y0, x1, y1), 0.0)
}

/// A panel spanning `0..100` with elements placed by the caller.
struct Scene {
    engine: DispatchEngine<TargetId>,
    targets: TargetTree,
    surface: QuadSurface<TargetId>,
}

impl Scene {
    fn new() -> Self {
        let mut surface = QuadSurface::new(SurfaceId(1));
        surface.set_camera(Some(camera()));
        Self {
            engine: DispatchEngine::new(),
            targets: TargetTree::new(),
            surface,
        }
    }

    fn add(&mut self, parent: Option<TargetId>, caps: Capabilities, quad: Quad, depth: i32) -> TargetId {
        let id = self.targets.insert(parent, caps);
        self.surface.push(SurfaceElement::new(id, quad, depth));
        id
    }

    /// Register the surface and one source.
    fn start(&mut self) {
        let surface = core::mem::replace(&mut self.surface, QuadSurface::new(SurfaceId(0)));
        self.engine.surfaces_mut().register(surface);
        self.engine.register(RemoteSource::new(HAND));
    }

    fn aim(&mut self, x: f32, y: f32) {
        self.engine
            .source_mut(HAND)
            .unwrap()
            .set_pose(Pose::looking_along(Vec3::new(x, y, 10.0), Vec3::NEG_Z));
    }

    fn select(&mut self, down: bool) {
        self.engine.source_mut(HAND).unwrap().set_select_down(down);
    }

    fn tick(&mut self, now: f64) -> Vec<(EventKind, TargetId)> {
        self.engine.process(now, &mut self.targets);
        self.targets.drain_events().map(|e| (e.kind, e.target)).collect()
    }
}

fn only(events: &[(EventKind, TargetId)], kinds: &[EventKind]) -> Vec<(EventKind, TargetId)> {
    events.iter().copied().filter(|(k, _)| kinds.contains(k)).collect()
}

const BUTTON_KINDS: &[EventKind] = &[EventKind::Press, EventKind::Release, EventKind::Click];

/// Panel with two sibling buttons: `a` on the left, `b` on the right.
fn two_buttons() -> (Scene, TargetId, TargetId, TargetId) {
    let mut s = Scene::new();
    let panel = s.add(
        None,
        Capabilities::HOVER | Capabilities::SCROLL,
        rect(0.0, 0.0, 100.0, 100.0),
        0,
    );
    let caps = Capabilities::HOVER | Capabilities::BUTTON;
    let a = s.add(Some(panel), caps, rect(0.0, 0.0, 40.0, 100.0), 1);
    let b = s.add(Some(panel), caps, rect(60.0, 0.0, 100.0, 100.0), 1);
    s.start();
    (s, panel, a, b)
}

#[test]
fn press_release_clicks() {
    let (mut s, _, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.select(true);
    let first = s.tick(0.0);
    s.select(false);
    let second = s.tick(0.1);
    assert_eq!(only(&first, BUTTON_KINDS), [(EventKind::Press, a)]);
    assert_eq!(
        only(&second, BUTTON_KINDS),
        [(EventKind::Release, a), (EventKind::Click, a)]
    );
}

#[test]
fn release_elsewhere_is_not_a_click() {
    let (mut s, _, a, b) = two_buttons();
    s.aim(20.0, 50.0);
    s.select(true);
    s.tick(0.0);
    s.aim(80.0, 50.0);
    s.select(false);
    let events = s.tick(0.1);
    assert_eq!(only(&events, BUTTON_KINDS), [(EventKind::Release, a)]);
    assert!(!events.contains(&(EventKind::Click, b)));
}

#[test]
fn click_count_window() {
    let (mut s, _, _, _) = two_buttons();
    s.aim(20.0, 50.0);
    let click = |s: &mut Scene, at: f64| {
        s.select(true);
        s.tick(at);
        let count = s.engine.event_state(HAND).unwrap().click_count();
        s.select(false);
        s.tick(at + 0.05);
        count
    };
    assert_eq!(click(&mut s, 0.0), 1);
    assert_eq!(click(&mut s, 0.1), 2, "second press inside the window");
    assert_eq!(click(&mut s, 1.0), 1, "third press after the window");

    s.aim(80.0, 50.0);
    s.tick(1.1);
    assert_eq!(click(&mut s, 1.15), 1, "press on another target");
}

#[test]
fn button_delta_never_outlives_a_tick() {
    let (mut s, _, _, _) = two_buttons();
    s.aim(20.0, 50.0);
    for (t, down) in [(0.0, Some(true)), (0.1, None), (0.2, Some(false)), (0.3, None)] {
        if let Some(down) = down {
            s.select(down);
        }
        s.tick(t);
        let source = s.engine.source(HAND).unwrap();
        assert_eq!(source.select_delta(), ButtonDelta::NO_CHANGE, "t={t}");
        let state = s.engine.event_state(HAND).unwrap();
        assert_eq!(state.select_delta(), ButtonDelta::NO_CHANGE, "t={t}");
    }
}

#[test]
fn press_and_release_between_ticks_both_dispatch() {
    let (mut s, _, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.select(true);
    s.select(false);
    let events = s.tick(0.0);
    assert_eq!(
        only(&events, BUTTON_KINDS),
        [
            (EventKind::Press, a),
            (EventKind::Release, a),
            (EventKind::Click, a)
        ]
    );
}

#[test]
fn hover_moves_between_siblings() {
    let (mut s, panel, a, b) = two_buttons();
    s.aim(20.0, 50.0);
    let entered = s.tick(0.0);
    assert_eq!(entered, [(EventKind::Enter, a), (EventKind::Enter, panel)]);

    s.aim(80.0, 50.0);
    let moved = s.tick(0.1);
    assert_eq!(moved, [(EventKind::Exit, a), (EventKind::Enter, b)]);
    let hovered = s.engine.event_state(HAND).unwrap().hovered();
    assert!(hovered.contains(&panel) && hovered.contains(&b));
    assert!(!hovered.contains(&a));

    // Steady pointer: nothing new.
    assert!(s.tick(0.2).is_empty());
}

#[test]
fn hover_moving_to_ancestor_only_exits() {
    let (mut s, panel, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.tick(0.0);
    s.aim(50.0, 50.0);
    let events = s.tick(0.1);
    assert_eq!(events, [(EventKind::Exit, a)]);
    assert_eq!(s.engine.event_state(HAND).unwrap().pointer_enter(), Some(panel));
}

#[test]
fn leaving_every_surface_exits_all() {
    let (mut s, panel, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.tick(0.0);
    s.aim(500.0, 50.0);
    let events = s.tick(0.1);
    assert_eq!(events, [(EventKind::Exit, a), (EventKind::Exit, panel)]);
    let state = s.engine.event_state(HAND).unwrap();
    assert!(state.hovered().is_empty());
    assert_eq!(state.pointer_enter(), None);
    assert!(!state.ray_endpoint().hit);
}

#[test]
fn release_off_every_surface_still_releases() {
    let (mut s, panel, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.select(true);
    s.tick(0.0);
    s.aim(500.0, 50.0);
    s.select(false);
    let events = s.tick(0.1);
    assert_eq!(
        events,
        [
            (EventKind::Release, a),
            (EventKind::Exit, a),
            (EventKind::Exit, panel)
        ]
    );
    let state = s.engine.event_state(HAND).unwrap();
    assert_eq!(state.pointer_press(), None);
    assert!(state.hovered().is_empty());
}

#[test]
fn source_that_never_hit_dispatches_nothing() {
    let (mut s, _, _, _) = two_buttons();
    s.aim(500.0, 50.0);
    s.select(true);
    assert!(s.tick(0.0).is_empty());
    let state = s.engine.event_state(HAND).unwrap();
    assert!(state.event_camera().is_none());
    assert_eq!(state.pointer_press(), None);
}

#[test]
fn scroll_goes_to_nearest_scroll_handler() {
    let (mut s, panel, _, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.tick(0.0);
    s.engine
        .source_mut(HAND)
        .unwrap()
        .add_scroll(Vec2::new(0.0, -3.0));
    let events = s.tick(0.1);
    assert_eq!(events, [(EventKind::Scroll, panel)]);
    assert_eq!(s.engine.event_state(HAND).unwrap().scroll_delta(), Vec2::ZERO);
    assert!(s.tick(0.2).is_empty());
}

/// Panel with one wide draggable slider.
fn slider() -> (Scene, TargetId) {
    let mut s = Scene::new();
    let panel = s.add(None, Capabilities::empty(), rect(0.0, 0.0, 100.0, 100.0), 0);
    let slider = s.add(
        Some(panel),
        Capabilities::DRAGGABLE | Capabilities::PRESS | Capabilities::RELEASE,
        rect(0.0, 40.0, 100.0, 60.0),
        1,
    );
    s.start();
    (s, slider)
}

#[test]
fn drag_waits_for_threshold() {
    let (mut s, slider) = slider();
    s.aim(10.0, 50.0);
    s.select(true);
    let pressed = s.tick(0.0);
    assert_eq!(
        pressed,
        [
            (EventKind::Press, slider),
            (EventKind::InitializeDrag, slider)
        ]
    );

    // 10 px is below the default 14 px threshold.
    s.aim(20.0, 50.0);
    assert!(s.tick(0.1).is_empty());
    assert!(!s.engine.event_state(HAND).unwrap().dragging());

    s.aim(30.0, 50.0);
    let dragged = s.tick(0.2);
    assert_eq!(
        dragged,
        [(EventKind::BeginDrag, slider), (EventKind::Drag, slider)]
    );

    s.aim(35.0, 50.0);
    assert_eq!(s.tick(0.3), [(EventKind::Drag, slider)]);

    s.select(false);
    let released = s.tick(0.4);
    assert_eq!(
        released,
        [(EventKind::Release, slider), (EventKind::EndDrag, slider)]
    );
    assert!(!s.engine.event_state(HAND).unwrap().dragging());
}

#[test]
fn pointer_lock_suppresses_drag() {
    let (mut s, _) = slider();
    s.engine.set_pointer_locked(true);
    s.aim(10.0, 50.0);
    s.select(true);
    s.tick(0.0);
    s.aim(60.0, 50.0);
    assert!(s.tick(0.1).is_empty());
}

#[test]
fn drag_hands_off_from_pressed_child() {
    let mut s = Scene::new();
    let list = s.add(None, Capabilities::DRAGGABLE, rect(0.0, 0.0, 100.0, 100.0), 0);
    let item = s.add(Some(list), Capabilities::BUTTON, rect(0.0, 0.0, 100.0, 100.0), 1);
    s.start();

    s.aim(10.0, 50.0);
    s.select(true);
    assert_eq!(
        s.tick(0.0),
        [(EventKind::Press, item), (EventKind::InitializeDrag, list)]
    );

    s.aim(10.0, 80.0);
    assert_eq!(
        s.tick(0.1),
        [
            (EventKind::BeginDrag, list),
            (EventKind::Release, item),
            (EventKind::Drag, list)
        ]
    );
    let state = s.engine.event_state(HAND).unwrap();
    assert_eq!(state.pointer_press(), None);
    assert!(!state.eligible_for_click());

    s.select(false);
    assert_eq!(s.tick(0.2), [(EventKind::EndDrag, list)]);
}

#[test]
fn drop_lands_on_hover_target() {
    let mut s = Scene::new();
    let panel = s.add(None, Capabilities::empty(), rect(0.0, 0.0, 100.0, 100.0), 0);
    let card = s.add(Some(panel), Capabilities::DRAGGABLE, rect(0.0, 0.0, 40.0, 100.0), 1);
    let bin = s.add(Some(panel), Capabilities::DROP, rect(60.0, 0.0, 100.0, 100.0), 1);
    s.start();

    s.aim(20.0, 50.0);
    s.select(true);
    s.tick(0.0);
    s.aim(80.0, 50.0);
    s.tick(0.1);
    s.select(false);
    assert_eq!(
        s.tick(0.2),
        [(EventKind::Drop, bin), (EventKind::EndDrag, card)]
    );
}

#[test]
fn deregister_exits_then_releases() {
    let (mut s, panel, a, _) = two_buttons();
    s.aim(20.0, 50.0);
    s.select(true);
    s.tick(0.0);

    let source = s.engine.deregister(HAND, &mut s.targets);
    assert!(source.is_some());
    let events: Vec<_> = s.targets.drain_events().map(|e| (e.kind, e.target)).collect();
    assert_eq!(
        events,
        [
            (EventKind::Exit, a),
            (EventKind::Exit, panel),
            (EventKind::Release, a)
        ]
    );
    assert_eq!(s.engine.provider_count(), 0);

    let state = s.engine.event_state(HAND).unwrap();
    assert!(state.hovered().is_empty());
    assert_eq!(state.pointer_press(), None);
    assert_eq!(state.click_count(), 0);
}

#[test]
fn deregister_mid_drag_ends_it() {
    let (mut s, slider) = slider();
    s.aim(10.0, 50.0);
    s.select(true);
    s.tick(0.0);
    s.aim(50.0, 50.0);
    s.tick(0.1);
    s.engine.deregister(HAND, &mut s.targets);
    let kinds: Vec<_> = s.targets.drain_events().map(|e| (e.kind, e.target)).collect();
    assert_eq!(
        kinds,
        [(EventKind::Release, slider), (EventKind::EndDrag, slider)]
    );
}

#[test]
fn registration_is_idempotent() {
    let (mut s, _, _, _) = two_buttons();
    assert_eq!(s.engine.provider_count(), 1);
    assert!(!s.engine.register(RemoteSource::new(HAND)));
    assert_eq!(s.engine.provider_count(), 1);
    assert!(s.engine.register(RemoteSource::new(SourceId(2))));
    assert_eq!(s.engine.provider_count(), 2);
}

#[test]
fn no_surfaces_no_dispatch_no_state_change() {
    let mut engine: DispatchEngine<TargetId> = DispatchEngine::new();
    let mut targets = TargetTree::new();
    engine.register(RemoteSource::new(HAND));
    engine.source_mut(HAND).unwrap().set_select_down(true);
    engine.process(0.0, &mut targets);
    assert!(targets.events().is_empty());
    let state = engine.event_state(HAND).unwrap();
    assert_eq!(state.position(), OUT_OF_BOUNDS);
    assert!(!state.select_down());
    assert_eq!(state.click_count(), 0);
}

#[test]
fn sources_are_independent() {
    let (mut s, _, a, b) = two_buttons();
    let mut other = RemoteSource::new(SourceId(2));
    other.set_pose(Pose::looking_along(Vec3::new(80.0, 50.0, 10.0), Vec3::NEG_Z));
    s.engine.register(other);
    s.aim(20.0, 50.0);
    s.engine.process(0.0, &mut s.targets);
    let events: Vec<_> = s
        .targets
        .drain_events()
        .filter(|e| e.kind == EventKind::Enter)
        .map(|e| (e.source, e.target))
        .collect();
    assert!(events.contains(&(HAND, a)));
    assert!(events.contains(&(SourceId(2), b)));
    assert_eq!(events[0].0, HAND, "registration order");
}

struct Wall(f32);

impl Occluder for Wall {
    fn first_opaque_hit(&self, _ray: &Ray, max_distance: f32, _mask: LayerMask) -> Option<OcclusionHit> {
        (self.0 < max_distance).then_some(OcclusionHit {
            distance: self.0,
            normal: Vec3::Z,
        })
    }
}

#[test]
fn occluded_sources_hit_nothing() {
    let (mut s, _, _, _) = two_buttons();
    s.engine.set_occluder(Wall(5.0));
    s.engine
        .source_mut(HAND)
        .unwrap()
        .set_occlusion(true, LayerMask::ALL);
    s.aim(20.0, 50.0);
    assert!(s.tick(0.0).is_empty());

    // Without the check the wall is ignored.
    s.engine
        .source_mut(HAND)
        .unwrap()
        .set_occlusion(false, LayerMask::ALL);
    assert!(!s.tick(0.1).is_empty());
}

#[test]
fn press_elsewhere_clears_selection() {
    let (mut s, _, _, _) = two_buttons();
    let field = s.targets.insert(None, Capabilities::SELECT);
    s.engine.set_selected(Some(field));
    s.aim(20.0, 50.0);
    s.select(true);
    let events = s.tick(0.0);
    assert_eq!(events[0], (EventKind::Deselect, field));
    assert_eq!(s.engine.selected(), None);
}

#[test]
fn main_camera_is_used_when_surface_has_none() {
    let mut s = Scene::new();
    s.surface.set_camera(None);
    let a = s.add(None, Capabilities::HOVER, rect(0.0, 0.0, 100.0, 100.0), 0);
    s.start();
    s.aim(50.0, 50.0);
    assert!(s.tick(0.0).is_empty(), "no camera anywhere");

    s.engine.set_main_camera(Some(camera()));
    assert_eq!(s.tick(0.1), [(EventKind::Enter, a)]);
    let pos = s.engine.event_state(HAND).unwrap().position();
    assert!((pos.x - 50.0).abs() < 1e-3 && (pos.y - 50.0).abs() < 1e-3, "{pos:?}");
}
