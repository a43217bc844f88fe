// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use understory_snap::{Polygon, Polyline, Raytracer, SnapIndex};

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
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn point(&mut self, extent: f64) -> Point {
        Point::new(self.next_f64() * extent, self.next_f64() * extent)
    }
}

/// Random walks: `count` polylines of `len` vertices, steps up to `step` long.
fn gen_polylines(seed: u64, count: usize, len: usize, extent: f64, step: f64) -> Vec<Polyline> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let mut at = rng.point(extent);
            Polyline::new((0..len).map(|_| {
                let here = at;
                at += Vec2::new(
                    (rng.next_f64() - 0.5) * 2.0 * step,
                    (rng.next_f64() - 0.5) * 2.0 * step,
                );
                here
            }))
        })
        .collect()
}

/// An `n`×`n` block of adjacent square parcels.
fn gen_parcels(n: usize, size: f64) -> Vec<Polygon> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * size;
            let y0 = y as f64 * size;
            out.push(Polygon::new([
                Point::new(x0, y0),
                Point::new(x0 + size, y0),
                Point::new(x0 + size, y0 + size),
                Point::new(x0, y0 + size),
            ]));
        }
    }
    out
}

fn build<G: understory_snap::Geometry>(geoms: &[G], cell: f64) -> SnapIndex<usize> {
    let mut idx = SnapIndex::new(Point::ZERO, cell).unwrap();
    for (key, g) in geoms.iter().enumerate() {
        idx.add_geometry(key, g);
    }
    idx
}

fn bench_raytracer(c: &mut Criterion) {
    let mut group = c.benchmark_group("raytracer");
    for &len in &[8.0_f64, 64.0, 512.0] {
        group.bench_function(format!("trace_len{}", len), |b| {
            b.iter(|| {
                let n = Raytracer::new(0.3, 0.7, 0.3 + len, 0.7 + len * 0.37).count();
                black_box(n);
            })
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[16usize, 32, 64] {
        let parcels = gen_parcels(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("parcels_n{}", n), |b| {
            b.iter_batched(
                || SnapIndex::<usize>::new(Point::ZERO, 10.0).unwrap(),
                |mut idx| {
                    for (key, g) in parcels.iter().enumerate() {
                        idx.add_geometry(key, g);
                    }
                    black_box(idx.coord_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let walks = gen_polylines(0x5eed, 256, 64, 4000.0, 40.0);
    group.bench_function("random_walks", |b| {
        b.iter_batched(
            || SnapIndex::<usize>::new(Point::ZERO, 25.0).unwrap(),
            |mut idx| {
                for (key, g) in walks.iter().enumerate() {
                    idx.add_geometry(key, g);
                }
                black_box(idx.grid().item_count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let parcels = gen_parcels(64, 10.0);
    let mut rng = Rng::new(7);
    let probes: Vec<Point> = (0..1024).map(|_| rng.point(640.0)).collect();
    for &cell in &[2.0_f64, 10.0, 50.0] {
        let idx = build(&parcels, cell);
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("snap_candidates_cell{}", cell), |b| {
            b.iter(|| {
                let found = probes
                    .iter()
                    .filter(|&&p| !idx.query_snap_candidates(&parcels, p, 1.5).is_empty())
                    .count();
                black_box(found);
            })
        });
    }
    let idx = build(&parcels, 10.0);
    group.bench_function("nearest_along_ray", |b| {
        b.iter(|| {
            let hits = probes
                .windows(2)
                .filter_map(|w| idx.find_nearest_along_ray(&parcels, w[0], w[1]))
                .count();
            black_box(hits);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_raytracer, bench_build, bench_query);
criterion_main!(benches);
