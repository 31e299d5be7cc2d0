// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover transitions along a host-owned hierarchy.
//!
//! The host keeps its own node type and parent table and implements
//! `PointerTargets` directly. Moving between siblings exits the old branch
//! below the common ancestor and enters the new one; the ancestor stays hovered.
//!
//! Run:
//! - `cargo run -p understory_demos --example remote_hover`

use glam::{Mat4, Vec3};
use kurbo::{Rect, Size};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::quad::Quad;
use understory_ray_hit::surface::{QuadSurface, SurfaceElement};
use understory_ray_hit::types::SurfaceId;
use understory_remote_input::engine::DispatchEngine;
use understory_remote_input::source::{Pose, RemoteSource};
use understory_remote_input::targets::{ParentLookup, PointerTargets};
use understory_remote_input::types::{Capabilities, EventKind, PointerEvent, SourceId};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Node(u32);

/// 1 ─┬─ 2 ── 3
///    └─ 4
#[derive(Default)]
struct Ui {
    log: Vec<(EventKind, Node)>,
}

impl ParentLookup<Node> for Ui {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        match node.0 {
            3 => Some(Node(2)),
            2 | 4 => Some(Node(1)),
            _ => None,
        }
    }
}

impl PointerTargets<Node> for Ui {
    fn capabilities(&self, _node: &Node) -> Capabilities {
        Capabilities::HOVER
    }

    fn deliver(&mut self, target: Node, event: &PointerEvent<'_, Node>) {
        println!("  {:?} {:?}", event.kind, target);
        self.log.push((event.kind, target));
    }
}

fn main() {
    let mut surface = QuadSurface::new(SurfaceId(7));
    surface.set_camera(Some(Camera::new(
        Mat4::orthographic_rh(0.0, 30.0, 0.0, 10.0, -10.0, 10.0),
        Size::new(300.0, 100.0),
    )));
    let quad = |x0, x1| Quad::from_rect(Rect::new(x0, 0.0, x1, 10.0), 0.0);
    surface.push(SurfaceElement::new(Node(1), quad(0.0, 30.0), 0));
    surface.push(SurfaceElement::new(Node(2), quad(0.0, 15.0), 1));
    surface.push(SurfaceElement::new(Node(3), quad(2.0, 8.0), 2));
    surface.push(SurfaceElement::new(Node(4), quad(15.0, 30.0), 1));

    let mut engine: DispatchEngine<Node> = DispatchEngine::new();
    engine.surfaces_mut().register(surface);
    let gaze = SourceId(3);
    engine.register(RemoteSource::new(gaze));

    let mut ui = Ui::default();
    let mut look = |x: f32, t: f64, ui: &mut Ui| {
        println!("== look at x={x} ==");
        let src = engine.source_mut(gaze).unwrap();
        src.set_pose(Pose::looking_along(Vec3::new(x, 5.0, 5.0), Vec3::NEG_Z));
        engine.process(t, ui);
        core::mem::take(&mut ui.log)
    };

    let first = look(5.0, 0.0, &mut ui);
    let second = look(20.0, 0.1, &mut ui);
    let third = look(40.0, 0.2, &mut ui);

    assert_eq!(
        first,
        vec![
            (EventKind::Enter, Node(3)),
            (EventKind::Enter, Node(2)),
            (EventKind::Enter, Node(1))
        ]
    );
    assert_eq!(
        second,
        vec![
            (EventKind::Exit, Node(3)),
            (EventKind::Exit, Node(2)),
            (EventKind::Enter, Node(4))
        ]
    );
    assert_eq!(
        third,
        vec![(EventKind::Exit, Node(1)), (EventKind::Exit, Node(4))]
    );
}
