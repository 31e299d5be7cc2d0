// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_remote_input --heading-base-level=0

//! Understory Remote Input: pointer events from 3D rays, deterministic and `no_std`.
//!
//! ## Overview
//!
//! Tracked controllers, gaze, and other "remote" pointers do not have a
//! screen position; they have a pose in the world. This crate turns such
//! poses into the familiar pointer event stream (enter, exit, press,
//! release, click, drag, drop, scroll) over UI laid out on 3D surfaces.
//!
//! Hit testing is done by `understory_ray_hit`; this crate owns everything
//! after it.
//!
//! - [`InputSource`](crate::source::InputSource): a pose plus a select
//!   button. [`RemoteSource`](crate::source::RemoteSource) is the stock one.
//! - [`PointerTargets`](crate::targets::PointerTargets): the host's target
//!   hierarchy, seen as parent links plus per-target
//!   [`Capabilities`](crate::types::Capabilities).
//! - [`SourceEventState`](crate::state::SourceEventState): what the engine
//!   remembers per source (hover list, press and drag targets, click count).
//! - [`DispatchEngine`](crate::engine::DispatchEngine): owns surfaces and
//!   sources; call [`process`](crate::engine::DispatchEngine::process) once per frame.
//! - [`TargetTree`](crate::adapters::target_tree::TargetTree): a ready-made
//!   target hierarchy that records deliveries.
//!
//! ## Semantics
//!
//! - Press goes to the nearest press handler at or above the hit; a release
//!   over the same click handler produces a click. Presses on one target
//!   within [`click_speed`](crate::config::EngineConfig::click_speed) count up.
//! - Hover follows the hierarchy: moving between siblings exits the old
//!   branch and enters the new one below their common ancestor; the ancestor
//!   stays hovered.
//! - A drag begins once the pointer has moved the scaled drag threshold away
//!   from the press position on screen.
//! - Button transitions live for exactly one tick.
//!
//! ## Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use kurbo::{Rect, Size};
//! use understory_ray_hit::camera::Camera;
//! use understory_ray_hit::quad::Quad;
//! use understory_ray_hit::surface::{QuadSurface, SurfaceElement};
//! use understory_ray_hit::types::SurfaceId;
//! use understory_remote_input::adapters::target_tree::TargetTree;
//! use understory_remote_input::engine::DispatchEngine;
//! use understory_remote_input::source::{Pose, RemoteSource};
//! use understory_remote_input::types::{Capabilities, EventKind, SourceId};
//!
//! let mut targets = TargetTree::new();
//! let button = targets.insert(None, Capabilities::BUTTON);
//!
//! let mut panel = QuadSurface::new(SurfaceId(1));
//! panel.set_camera(Some(Camera::new(
//!     Mat4::orthographic_rh(0.0, 100.0, 0.0, 100.0, -100.0, 100.0),
//!     Size::new(100.0, 100.0),
//! )));
//! panel.push(SurfaceElement::new(button, Quad::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0), 0));
//!
//! let mut engine: DispatchEngine<_> = DispatchEngine::new();
//! engine.surfaces_mut().register(panel);
//!
//! let hand = SourceId(0);
//! let mut source = RemoteSource::new(hand);
//! source.set_pose(Pose::looking_along(Vec3::new(50.0, 50.0, 10.0), Vec3::NEG_Z));
//! engine.register(source);
//!
//! for (t, down) in [(0.0, true), (0.1, false)] {
//!     engine.source_mut(hand).unwrap().set_select_down(down);
//!     engine.process(t, &mut targets);
//! }
//!
//! let kinds: Vec<EventKind> = targets.drain_events().map(|e| e.kind).collect();
//! assert_eq!(kinds, [EventKind::Press, EventKind::Release, EventKind::Click]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod engine;
pub mod source;
pub mod state;
pub mod targets;
pub mod types;

pub use config::{ConfigError, EngineConfig};
pub use engine::DispatchEngine;
pub use source::{InputSource, Pose, RemoteSource};
pub use state::SourceEventState;
pub use targets::{ParentLookup, PointerTargets};
pub use types::{ButtonDelta, Capabilities, EventKind, PointerEvent, SourceId};
