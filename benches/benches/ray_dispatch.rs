// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{Mat4, Vec3};
use kurbo::{Rect, Size};
use understory_ray_hit::camera::Camera;
use understory_ray_hit::ordering;
use understory_ray_hit::quad::Quad;
use understory_ray_hit::surface::{
    NoOcclusion, QuadSurface, RayQuery, SurfaceElement, SurfaceHitTester, SurfaceLayering,
};
use understory_ray_hit::types::{HitCandidate, LayerMask, Ray, SurfaceId};
use understory_remote_input::adapters::target_tree::{TargetId, TargetTree};
use understory_remote_input::engine::DispatchEngine;
use understory_remote_input::source::{Pose, RemoteSource};
use understory_remote_input::types::{Capabilities, SourceId};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

fn camera(extent: f32) -> Camera {
    Camera::new(
        Mat4::orthographic_rh(0.0, extent, 0.0, extent, -1000.0, 1000.0),
        Size::new(f64::from(extent), f64::from(extent)),
    )
}

/// An `n`×`n` grid of cells, each drawn over a full-size background.
fn grid_surface<T: Copy>(id: u32, n: usize, cell: f64, mut target: impl FnMut(usize) -> T) -> QuadSurface<T> {
    let extent = n as f64 * cell;
    let mut s = QuadSurface::new(SurfaceId(id));
    s.set_camera(Some(camera(extent as f32)));
    s.push(SurfaceElement::new(
        target(0),
        Quad::from_rect(Rect::new(0.0, 0.0, extent, extent), 0.0),
        0,
    ));
    for y in 0..n {
        for x in 0..n {
            let r = Rect::from_origin_size((x as f64 * cell, y as f64 * cell), (cell, cell));
            s.push(SurfaceElement::new(target(1 + y * n + x), Quad::from_rect(r, 0.0), 1));
        }
    }
    s
}

fn random_candidates(count: usize) -> Vec<HitCandidate<u32>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            let surface = (rng.next_u64() % 4) as u32;
            let mut c = HitCandidate::new(i as u32, SurfaceId(surface), Vec3::ZERO, rng.next_f32() * 100.0);
            c.sort_priority = (surface % 2) as i32;
            c.depth = (rng.next_u64() % 8) as i32;
            c.index = i;
            c
        })
        .collect()
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");
    for &n in &[8_usize, 64, 512] {
        let set = random_candidates(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("first_n{}", n), |b| {
            b.iter(|| black_box(ordering::first(black_box(&set)).map(|c| c.index)));
        });
    }
    group.finish();
}

fn bench_quad_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("quad_surface");
    for &n in &[8_usize, 32] {
        let surface = grid_surface(1, n, 10.0, |i| i as u32);
        let extent = n as f32 * 10.0;
        let mut rng = Rng::new(0xBADC_F00D_1234_5678);
        let rays: Vec<Ray> = (0..256)
            .map(|_| {
                let x = rng.next_f32() * extent;
                let y = rng.next_f32() * extent;
                Ray::new(Vec3::new(x, y, 50.0), Vec3::NEG_Z)
            })
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("raycast_grid_n{}", n), |b| {
            let mut out = Vec::new();
            let mut i = 0;
            b.iter(|| {
                let query = RayQuery {
                    ray: rays[i % rays.len()],
                    max_distance: 1000.0,
                    check_occlusion: false,
                    occlusion_mask: LayerMask::ALL,
                    main_camera: None,
                };
                i += 1;
                out.clear();
                surface.raycast(&query, &NoOcclusion, &mut out);
                black_box(out.len())
            });
        });
    }
    group.finish();
}

fn engine_scene(n: usize, sources: u32) -> (DispatchEngine<TargetId>, TargetTree) {
    let mut targets = TargetTree::new();
    let root = targets.insert(None, Capabilities::HOVER | Capabilities::SCROLL);
    let mut ids = vec![root];
    for _ in 0..n * n {
        ids.push(targets.insert(Some(root), Capabilities::all()));
    }
    let mut engine: DispatchEngine<TargetId> = DispatchEngine::new();
    for layer in 0..2 {
        let mut s = grid_surface(layer + 1, n, 10.0, |i| ids[i]);
        s.set_layering(SurfaceLayering {
            sort_priority: layer as i32,
            ..SurfaceLayering::default()
        });
        engine.surfaces_mut().register(s);
    }
    for id in 0..sources {
        engine.register(RemoteSource::new(SourceId(id)));
    }
    (engine, targets)
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    for &sources in &[1_u32, 4] {
        let n = 16;
        let extent = n as f32 * 10.0;
        group.throughput(Throughput::Elements(u64::from(sources)));
        group.bench_function(format!("tick_sweep_sources{}", sources), |b| {
            b.iter_batched(
                || engine_scene(n, sources),
                |(mut engine, mut targets)| {
                    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
                    for frame in 0..64 {
                        for id in 0..sources {
                            let src = engine.source_mut(SourceId(id)).unwrap();
                            let x = rng.next_f32() * extent;
                            let y = rng.next_f32() * extent;
                            src.set_pose(Pose::looking_along(Vec3::new(x, y, 50.0), Vec3::NEG_Z));
                            src.set_select_down(frame % 8 < 4);
                        }
                        engine.process(f64::from(frame) * 0.016, &mut targets);
                        targets.drain_events().for_each(|e| {
                            black_box(e);
                        });
                    }
                    black_box(engine.provider_count())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ordering, bench_quad_surface, bench_engine);
criterion_main!(benches);
