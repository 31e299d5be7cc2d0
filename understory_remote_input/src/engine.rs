// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch engine: per-tick ray resolution and pointer event dispatch.
//!
//! ## Tick
//!
//! [`DispatchEngine::process`] does nothing while no surface is registered.
//! Otherwise, for each registered source in registration order:
//!
//! 0. Snapshot the source's pose, button, and scroll into its
//!    [`SourceEventState`].
//! 1. Raycast every active surface and keep the winning candidate.
//! 2. Resolve the event camera (main camera, else the winning surface's
//!    camera, else the camera this source last resolved). A source that
//!    never resolved one skips steps 3 to 6.
//!    Project the hit to screen space and update position and delta.
//! 3. Button: press, release, click, drop, and drag initialization.
//!    The button transition is cleared afterwards.
//! 4. Hover: enter and exit along the target hierarchy.
//! 5. Drag: threshold check, begin, ongoing drag.
//! 6. Scroll.
//! 7. Remember this tick's hit and clear the scroll.
//!
//! Finally the source's own [`ButtonDelta`] is forced back to
//! [`ButtonDelta::NO_CHANGE`], camera or not.
//!
//! ## Deregistration
//!
//! [`DispatchEngine::deregister`] gives the source one last pass with no ray:
//! every hovered target gets Exit, then a held press gets Release (and an
//! active drag EndDrag), then the state is reset.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use glam::Vec3;
use kurbo::{Point, Vec2};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::registry::SurfaceRegistry;
use understory_ray_hit::surface::{NoOcclusion, Occluder, RayQuery};
use understory_ray_hit::types::HitCandidate;

use crate::config::{ConfigError, EngineConfig};
use crate::source::{InputSource, RemoteSource};
use crate::state::{OUT_OF_BOUNDS, SourceEventState};
use crate::targets::PointerTargets;
use crate::types::{ButtonDelta, Capabilities, EventKind, PointerEvent, SourceId};

type States<T> = Vec<(SourceId, SourceEventState<T>)>;

/// Turns input source rays into pointer events on targets.
///
/// `T` is the host's target handle; `S` is the source type the engine owns.
/// Use `Box<dyn InputSource>` for `S` to mix source kinds.
pub struct DispatchEngine<T, S = RemoteSource> {
    config: EngineConfig,
    surfaces: SurfaceRegistry<T>,
    occluder: Box<dyn Occluder>,
    main_camera: Option<Camera>,
    sources: Vec<S>,
    states: States<T>,
    candidates: Vec<HitCandidate<T>>,
    selected: Option<T>,
    pointer_locked: bool,
}

impl<T: Debug, S: InputSource> Debug for DispatchEngine<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sources: Vec<SourceId> = self.sources.iter().map(InputSource::id).collect();
        f.debug_struct("DispatchEngine")
            .field("config", &self.config)
            .field("surfaces", &self.surfaces)
            .field("main_camera", &self.main_camera)
            .field("sources", &sources)
            .field("selected", &self.selected)
            .field("pointer_locked", &self.pointer_locked)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Eq + Debug, S: InputSource> Default for DispatchEngine<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Debug, S: InputSource> DispatchEngine<T, S> {
    /// Create an engine with the default configuration, no surfaces, and no sources.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            surfaces: SurfaceRegistry::new(),
            occluder: Box::new(NoOcclusion),
            main_camera: None,
            sources: Vec::new(),
            states: Vec::new(),
            candidates: Vec::new(),
            selected: None,
            pointer_locked: false,
        }
    }

    /// Create an engine with a validated configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration. Invalid values leave the current one in place.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Registered surfaces.
    pub fn surfaces(&self) -> &SurfaceRegistry<T> {
        &self.surfaces
    }

    /// Registered surfaces, for registering and updating them.
    pub fn surfaces_mut(&mut self) -> &mut SurfaceRegistry<T> {
        &mut self.surfaces
    }

    /// Set the opaque scene geometry consulted by occlusion checks.
    pub fn set_occluder<O: Occluder + 'static>(&mut self, occluder: O) {
        self.occluder = Box::new(occluder);
    }

    /// Set the main camera; it takes precedence over surface cameras for projection.
    pub fn set_main_camera(&mut self, camera: Option<Camera>) {
        self.main_camera = camera;
    }

    /// Main camera, if set.
    pub fn main_camera(&self) -> Option<&Camera> {
        self.main_camera.as_ref()
    }

    /// Suppress drag processing while the host's cursor is locked.
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
    }

    /// Whether drag processing is suppressed.
    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Currently selected target.
    pub fn selected(&self) -> Option<T> {
        self.selected
    }

    /// Set the selected target without dispatching.
    pub fn set_selected(&mut self, selected: Option<T>) {
        self.selected = selected;
    }

    /// Register a source. Returns `false` (and drops `source`) if its id is already registered.
    pub fn register(&mut self, source: S) -> bool {
        let id = source.id();
        if self.is_registered(id) {
            return false;
        }
        self.sources.push(source);
        state_slot(&mut self.states, id);
        tracing::debug!(source = ?id, count = self.sources.len(), "input source registered");
        true
    }

    /// Deregister a source, returning it if it was registered.
    ///
    /// Hovered targets receive Exit, then a held press receives Release (and
    /// an active drag EndDrag), before the source's state is reset.
    pub fn deregister<H: PointerTargets<T>>(&mut self, id: SourceId, targets: &mut H) -> Option<S> {
        let pos = self.sources.iter().position(|s| s.id() == id)?;
        let mut source = self.sources.remove(pos);

        let (mut tick, _, states) = self.split(0.0);
        let slot = state_slot(states, id);
        let state = &mut states[slot].1;
        state.clear_inputs();
        if state.pointer_press.is_some() || state.pointer_drag.is_some() {
            state.select_delta = ButtonDelta::RELEASED;
        }
        tick.teardown(id, state, targets);
        state.reset();

        source.set_select_delta(ButtonDelta::NO_CHANGE);
        tracing::debug!(source = ?id, count = self.sources.len(), "input source deregistered");
        Some(source)
    }

    /// Whether a source with this id is registered.
    pub fn is_registered(&self, id: SourceId) -> bool {
        self.sources.iter().any(|s| s.id() == id)
    }

    /// Number of registered sources.
    pub fn provider_count(&self) -> usize {
        self.sources.len()
    }

    /// Look up a registered source.
    pub fn source(&self, id: SourceId) -> Option<&S> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Look up a registered source mutably, e.g. to feed it this frame's input.
    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut S> {
        self.sources.iter_mut().find(|s| s.id() == id)
    }

    /// Registered sources in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &S> {
        self.sources.iter()
    }

    /// Event state of a source, if one exists.
    pub fn event_state(&self, id: SourceId) -> Option<&SourceEventState<T>> {
        self.states.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Event state of a source, created on first use.
    pub fn event_state_mut(&mut self, id: SourceId) -> &mut SourceEventState<T> {
        let slot = state_slot(&mut self.states, id);
        &mut self.states[slot].1
    }

    /// Run one tick at time `now` (seconds, monotonic) and dispatch to `targets`.
    pub fn process<H: PointerTargets<T>>(&mut self, now: f64, targets: &mut H) {
        if self.surfaces.is_empty() {
            tracing::trace!("no surfaces registered; tick skipped");
            return;
        }
        let (mut tick, sources, states) = self.split(now);
        for source in sources.iter_mut() {
            let id = source.id();
            let slot = state_slot(states, id);
            let state = &mut states[slot].1;
            state.sync_from(source);
            tick.run(id, state, targets);
            source.set_select_delta(ButtonDelta::NO_CHANGE);
        }
    }

    fn split(&mut self, now: f64) -> (Tick<'_, T>, &mut Vec<S>, &mut States<T>) {
        let Self {
            config,
            surfaces,
            occluder,
            main_camera,
            sources,
            states,
            candidates,
            selected,
            pointer_locked,
        } = self;
        let tick = Tick {
            config,
            surfaces,
            occluder: &**occluder,
            main_camera: main_camera.as_ref(),
            candidates,
            selected,
            pointer_locked: *pointer_locked,
            now,
        };
        (tick, sources, states)
    }
}

fn state_slot<T>(states: &mut States<T>, id: SourceId) -> usize {
    if let Some(i) = states.iter().position(|(sid, _)| *sid == id) {
        return i;
    }
    states.push((id, SourceEventState::new()));
    states.len() - 1
}

/// Engine state borrowed for one tick.
struct Tick<'a, T> {
    config: &'a EngineConfig,
    surfaces: &'a SurfaceRegistry<T>,
    occluder: &'a dyn Occluder,
    main_camera: Option<&'a Camera>,
    candidates: &'a mut Vec<HitCandidate<T>>,
    selected: &'a mut Option<T>,
    pointer_locked: bool,
    now: f64,
}

impl<'a, T: Copy + Eq + Debug> Tick<'a, T> {
    fn run<H: PointerTargets<T>>(&mut self, id: SourceId, state: &mut SourceEventState<T>, targets: &mut H) {
        let previous = state.position;
        self.resolve_hit(state);
        if let Some(camera) = self.event_camera(state) {
            state.event_camera = Some(*camera);
        }
        match state.event_camera {
            Some(camera) => {
                update_position(state, previous, &camera);
                self.process_button(id, state, targets);
                state.select_delta = ButtonDelta::NO_CHANGE;
                process_hover(id, state, targets);
                self.process_drag(id, state, targets);
                process_scroll(id, state, targets);
            }
            None => {
                tracing::trace!(source = ?id, "no event camera; dispatch skipped");
            }
        }
        finalize(state);
    }

    fn teardown<H: PointerTargets<T>>(
        &mut self,
        id: SourceId,
        state: &mut SourceEventState<T>,
        targets: &mut H,
    ) {
        state.position = OUT_OF_BOUNDS;
        state.current_raycast = None;
        process_hover(id, state, targets);
        self.process_button(id, state, targets);
        state.dragging = false;
        state.pointer_drag = None;
        finalize(state);
    }

    fn resolve_hit(&mut self, state: &mut SourceEventState<T>) {
        state.position = OUT_OF_BOUNDS;
        let query = RayQuery {
            ray: state.ray(),
            max_distance: state.max_distance,
            check_occlusion: state.check_occlusion,
            occlusion_mask: state.occlusion_mask,
            main_camera: self.main_camera,
        };
        state.current_raycast = self.surfaces.first_hit(&query, self.occluder, self.candidates);
    }

    fn event_camera(&self, state: &SourceEventState<T>) -> Option<&'a Camera> {
        let surfaces: &'a SurfaceRegistry<T> = self.surfaces;
        self.main_camera.or_else(|| {
            state
                .current_raycast
                .as_ref()
                .and_then(|hit| surfaces.event_camera(hit.surface, None))
        })
    }

    fn process_button<H: PointerTargets<T>>(
        &mut self,
        id: SourceId,
        state: &mut SourceEventState<T>,
        targets: &mut H,
    ) {
        let hover = state.hit_target();

        if state.select_delta.contains(ButtonDelta::PRESSED) {
            state.eligible_for_click = true;
            state.delta = Vec2::ZERO;
            state.dragging = false;
            state.press_position = state.position;
            state.press_raycast = state.current_raycast.clone();

            let select_handler = targets.find_handler(hover, Capabilities::SELECT);
            if select_handler != *self.selected
                && let Some(old) = self.selected.take()
            {
                targets.execute(Some(old), &PointerEvent::new(EventKind::Deselect, id, state));
            }

            let mut pressed =
                targets.execute_hierarchy(hover, &PointerEvent::new(EventKind::Press, id, state));
            if pressed.is_none() {
                pressed = targets.find_handler(hover, Capabilities::CLICK);
            }

            if pressed == state.last_press && self.now - state.click_time < self.config.click_speed {
                state.click_count += 1;
            } else {
                state.click_count = 1;
            }
            state.click_time = self.now;

            state.set_press(pressed);
            state.raw_pointer_press = hover;
            state.pointer_drag = targets.find_handler(hover, Capabilities::DRAG);
            targets.execute(
                state.pointer_drag,
                &PointerEvent::new(EventKind::InitializeDrag, id, state),
            );
            tracing::trace!(source = ?id, target = ?pressed, clicks = state.click_count, "press");
        }

        if state.select_delta.contains(ButtonDelta::RELEASED) {
            let pressed = state.pointer_press;
            targets.execute(pressed, &PointerEvent::new(EventKind::Release, id, state));

            let click_handler = targets.find_handler(hover, Capabilities::CLICK);
            let drag = state.pointer_drag;
            if pressed == click_handler && state.eligible_for_click {
                targets.execute(pressed, &PointerEvent::new(EventKind::Click, id, state));
            } else if state.dragging && drag.is_some() {
                targets.execute_hierarchy(hover, &PointerEvent::new(EventKind::Drop, id, state));
            }

            state.eligible_for_click = false;
            state.set_press(None);
            state.raw_pointer_press = None;

            if state.dragging && drag.is_some() {
                targets.execute(drag, &PointerEvent::new(EventKind::EndDrag, id, state));
                tracing::trace!(source = ?id, target = ?drag, "drag ended");
            }
            state.dragging = false;
            state.pointer_drag = None;
            tracing::trace!(source = ?id, target = ?pressed, "release");
        }
    }

    fn process_drag<H: PointerTargets<T>>(
        &mut self,
        id: SourceId,
        state: &mut SourceEventState<T>,
        targets: &mut H,
    ) {
        if !state.is_pointer_moving() || self.pointer_locked || state.pointer_drag.is_none() {
            return;
        }

        if !state.dragging {
            let threshold = self.config.drag_threshold();
            if (state.press_position - state.position).hypot2() >= threshold * threshold {
                targets.execute(
                    state.pointer_drag,
                    &PointerEvent::new(EventKind::BeginDrag, id, state),
                );
                state.dragging = true;
                tracing::trace!(source = ?id, target = ?state.pointer_drag, "drag began");
            }
        }

        if state.dragging {
            if state.pointer_press != state.pointer_drag {
                targets.execute(
                    state.pointer_press,
                    &PointerEvent::new(EventKind::Release, id, state),
                );
                state.eligible_for_click = false;
                state.set_press(None);
                state.raw_pointer_press = None;
            }
            targets.execute(
                state.pointer_drag,
                &PointerEvent::new(EventKind::Drag, id, state),
            );
        }
    }
}

fn update_position<T>(state: &mut SourceEventState<T>, previous: Point, camera: &Camera) {
    match &state.current_raycast {
        Some(hit) => {
            let screen = camera.world_to_screen(hit.world_position);
            state.delta = if previous == OUT_OF_BOUNDS {
                Vec2::ZERO
            } else {
                screen - previous
            };
            state.position = screen;
        }
        None => {
            state.position = camera.world_to_screen(Vec3::ZERO);
            state.delta = Vec2::ZERO;
        }
    }
}

fn process_hover<T: Copy + Eq, H: PointerTargets<T>>(
    id: SourceId,
    state: &mut SourceEventState<T>,
    targets: &mut H,
) {
    let current = state.hit_target();

    if current.is_none() || state.pointer_enter.is_none() {
        for &h in &state.hovered {
            targets.execute(Some(h), &PointerEvent::new(EventKind::Exit, id, state));
        }
        state.hovered.clear();
        if current.is_none() {
            state.pointer_enter = None;
            return;
        }
    }

    if state.pointer_enter == current {
        return;
    }

    let common = targets.common_ancestor(state.pointer_enter, current);

    let mut walk = state.pointer_enter;
    while let Some(t) = walk {
        if Some(t) == common {
            break;
        }
        targets.execute(Some(t), &PointerEvent::new(EventKind::Exit, id, state));
        if let Some(i) = state.hovered.iter().position(|h| *h == t) {
            state.hovered.remove(i);
        }
        walk = targets.parent_of(&t);
    }

    state.pointer_enter = current;
    let mut walk = current;
    while let Some(t) = walk {
        if Some(t) == common {
            break;
        }
        targets.execute(Some(t), &PointerEvent::new(EventKind::Enter, id, state));
        state.hovered.push(t);
        walk = targets.parent_of(&t);
    }
}

fn process_scroll<T: Copy + Eq, H: PointerTargets<T>>(
    id: SourceId,
    state: &SourceEventState<T>,
    targets: &mut H,
) {
    if state.scroll_delta.hypot2() > 0.0 {
        targets.execute_hierarchy(
            state.pointer_enter,
            &PointerEvent::new(EventKind::Scroll, id, state),
        );
    }
}

fn finalize<T: Clone>(state: &mut SourceEventState<T>) {
    state.last_raycast = state.current_raycast.clone();
    state.scroll_delta = Vec2::ZERO;
    state.select_delta = ButtonDelta::NO_CHANGE;
}
