// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote pointer basics.
//!
//! One world-space panel with two buttons, one tracked "hand" aiming at it.
//! The hand presses and releases on the first button, then double-clicks it.
//!
//! Run:
//! - `cargo run -p understory_demos --example remote_pointer_basics`

use glam::{Mat4, Vec3};
use kurbo::{Rect, Size};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::quad::Quad;
use understory_ray_hit::surface::{QuadSurface, SurfaceElement};
use understory_ray_hit::types::SurfaceId;
use understory_remote_input::adapters::target_tree::{TargetId, TargetTree};
use understory_remote_input::engine::DispatchEngine;
use understory_remote_input::source::{Pose, RemoteSource};
use understory_remote_input::types::{Capabilities, EventKind, SourceId};

fn main() {
    let mut targets = TargetTree::new();
    let panel = targets.insert(None, Capabilities::HOVER);
    let ok = targets.insert(Some(panel), Capabilities::HOVER | Capabilities::BUTTON);
    let cancel = targets.insert(Some(panel), Capabilities::HOVER | Capabilities::BUTTON);

    // A 2 m × 1 m panel at z = -3, rendered by a 200 × 100 px camera.
    let mut surface = QuadSurface::new(SurfaceId(1));
    surface.set_camera(Some(Camera::new(
        Mat4::orthographic_rh(-1.0, 1.0, -0.5, 0.5, -10.0, 10.0),
        Size::new(200.0, 100.0),
    )));
    let quad = |r: Rect| Quad::from_rect(r, -3.0);
    surface.push(SurfaceElement::new(panel, quad(Rect::new(-1.0, -0.5, 1.0, 0.5)), 0));
    surface.push(SurfaceElement::new(ok, quad(Rect::new(-0.8, -0.3, -0.2, 0.0)), 1));
    surface.push(SurfaceElement::new(cancel, quad(Rect::new(0.2, -0.3, 0.8, 0.0)), 1));

    let mut engine: DispatchEngine<TargetId> = DispatchEngine::new();
    engine.surfaces_mut().register(surface);

    let hand = SourceId(0);
    engine.register(RemoteSource::new(hand));

    let name = |t: TargetId| match t {
        t if t == panel => "panel",
        t if t == ok => "ok",
        t if t == cancel => "cancel",
        _ => "?",
    };

    // (time, aim point on the panel, select held)
    let script = [
        (0.00, Vec3::new(0.0, 0.3, -3.0), false),
        (0.10, Vec3::new(-0.5, -0.15, -3.0), false),
        (0.20, Vec3::new(-0.5, -0.15, -3.0), true),
        (0.30, Vec3::new(-0.5, -0.15, -3.0), false),
        (0.40, Vec3::new(-0.5, -0.15, -3.0), true),
        (0.45, Vec3::new(-0.5, -0.15, -3.0), false),
        (0.60, Vec3::new(0.5, -0.15, -3.0), false),
    ];

    let eye = Vec3::new(0.0, 0.0, 0.0);
    let mut clicks = Vec::new();
    for (t, aim, down) in script {
        let src = engine.source_mut(hand).unwrap();
        src.set_pose(Pose::looking_along(eye, aim - eye));
        src.set_select_down(down);
        engine.process(t, &mut targets);

        for e in targets.drain_events() {
            println!(
                "t={t:.2} {:>14} -> {:<6} at ({:.0}, {:.0}) clicks={}",
                format!("{:?}", e.kind),
                name(e.target),
                e.position.x,
                e.position.y,
                e.click_count
            );
            if e.kind == EventKind::Click {
                clicks.push((e.target, e.click_count));
            }
        }
    }

    let end = engine.event_state(hand).unwrap().ray_endpoint();
    println!("ray ends at {:?} (hit: {})", end.point, end.hit);

    assert_eq!(clicks, vec![(ok, 1), (ok, 2)]);
}
