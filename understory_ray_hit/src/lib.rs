// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ray_hit --heading-base-level=0

//! Understory Ray Hit: deterministic 3D ray hit testing over registered UI surfaces.
//!
//! ## Overview
//!
//! This crate answers "what is this ray pointing at?" for UIs laid out on
//! planar surfaces in 3D (world-space canvases, XR panels, in-game screens).
//! It does not route events; feed its winning [`HitCandidate`] to a dispatcher
//! such as `understory_remote_input`.
//!
//! - [`SurfaceHitTester`](crate::surface::SurfaceHitTester): the surface contract.
//!   Given a [`RayQuery`](crate::surface::RayQuery) it appends candidates to a shared buffer.
//! - [`QuadSurface`](crate::surface::QuadSurface): a surface made of planar
//!   rectangles with paint depth, facing filter, optional per-element predicate,
//!   and occlusion against opaque scene geometry through an
//!   [`Occluder`](crate::surface::Occluder).
//! - [`SurfaceRegistry`](crate::registry::SurfaceRegistry): the set of registered surfaces.
//! - [`ordering`]: the layering-aware comparator that ranks candidates from
//!   different surfaces (camera depth, sort/render priority, sorting layer and
//!   order, paint depth, distance, insertion index).
//!
//! ## Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use kurbo::{Rect, Size};
//! use understory_ray_hit::camera::Camera;
//! use understory_ray_hit::quad::Quad;
//! use understory_ray_hit::registry::SurfaceRegistry;
//! use understory_ray_hit::surface::{NoOcclusion, QuadSurface, RayQuery, SurfaceElement};
//! use understory_ray_hit::types::{LayerMask, Ray, SurfaceId};
//!
//! let camera = Camera::new(
//!     Mat4::orthographic_rh(0.0, 100.0, 0.0, 100.0, -100.0, 100.0),
//!     Size::new(100.0, 100.0),
//! );
//!
//! // A panel with a background and a button drawn on top of it.
//! let mut panel = QuadSurface::new(SurfaceId(1));
//! panel.set_camera(Some(camera));
//! panel.push(SurfaceElement::new("background", Quad::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0), 0));
//! panel.push(SurfaceElement::new("button", Quad::from_rect(Rect::new(10.0, 10.0, 30.0, 20.0), 0.0), 1));
//!
//! let mut surfaces = SurfaceRegistry::new();
//! surfaces.register(panel);
//!
//! let query = RayQuery {
//!     ray: Ray::new(Vec3::new(15.0, 15.0, 10.0), Vec3::NEG_Z),
//!     max_distance: 100.0,
//!     check_occlusion: false,
//!     occlusion_mask: LayerMask::ALL,
//!     main_camera: None,
//! };
//! let mut scratch = Vec::new();
//! let hit = surfaces.first_hit(&query, &NoOcclusion, &mut scratch).unwrap();
//! assert_eq!(hit.target, "button");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod camera;
pub mod ordering;
pub mod quad;
pub mod registry;
pub mod surface;
pub mod types;

pub use registry::SurfaceRegistry;
pub use surface::{NoOcclusion, Occluder, QuadSurface, RayQuery, SurfaceHitTester};
pub use types::{HitCandidate, Ray, SurfaceId};
