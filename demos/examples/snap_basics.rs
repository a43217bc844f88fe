// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snap basics.
//!
//! Index a few parcels and a road, snap a pointer to the nearest vertex or edge, then move a
//! vertex in place and snap again without rebuilding.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example snap_basics`

use kurbo::Point;
use understory_snap::{Geometry, MultiGeometry, Polygon, Polyline, SnapIndex, SnapKinds, VertexId};

#[derive(Clone, Debug)]
enum Feature {
    Road(Polyline),
    Parcels(MultiGeometry<Polygon>),
}

impl Geometry for Feature {
    fn part_count(&self) -> usize {
        match self {
            Self::Road(g) => g.part_count(),
            Self::Parcels(g) => g.part_count(),
        }
    }

    fn ring_count(&self, part: usize) -> usize {
        match self {
            Self::Road(g) => g.ring_count(part),
            Self::Parcels(g) => g.ring_count(part),
        }
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        match self {
            Self::Road(g) => g.vertex_count(part, ring),
            Self::Parcels(g) => g.vertex_count(part, ring),
        }
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        match self {
            Self::Road(g) => g.vertex(id),
            Self::Parcels(g) => g.vertex(id),
        }
    }

    fn is_closed(&self, part: usize, ring: usize) -> bool {
        match self {
            Self::Road(g) => g.is_closed(part, ring),
            Self::Parcels(g) => g.is_closed(part, ring),
        }
    }
}

fn main() {
    env_logger::init();

    let square = |x: f64, y: f64, s: f64| {
        Polygon::new([
            Point::new(x, y),
            Point::new(x + s, y),
            Point::new(x + s, y + s),
            Point::new(x, y + s),
        ])
    };
    let mut features = vec![
        Feature::Road(Polyline::new([
            Point::new(-40.0, -5.0),
            Point::new(35.0, -5.0),
            Point::new(80.0, 30.0),
        ])),
        Feature::Parcels(MultiGeometry::new([
            square(0.0, 0.0, 20.0),
            square(25.0, 0.0, 20.0).with_hole([
                Point::new(30.0, 5.0),
                Point::new(40.0, 5.0),
                Point::new(35.0, 12.0),
            ]),
        ])),
    ];

    let mut index = match SnapIndex::new(Point::ZERO, 8.0) {
        Ok(index) => index,
        Err(err) => {
            log::error!("cannot build snap index: {err}");
            return;
        }
    };
    for (key, feature) in features.iter().enumerate() {
        let stats = index.add_geometry(key, feature);
        println!("feature {key}: {stats:?}");
    }
    println!("{index:?}");

    for pointer in [
        Point::new(20.4, 19.7),
        Point::new(10.0, 0.6),
        Point::new(-20.0, -4.0),
        Point::new(60.0, 60.0),
    ] {
        let hit = index.query_snap_candidates(&features, pointer, 1.5);
        match (hit.point, hit.segment) {
            (Some(v), _) => println!(
                "{pointer:?}: vertex {:?} of feature {} at {:?}",
                v.item.idx.vertex, v.item.idx.geometry, v.location
            ),
            (None, Some(s)) => println!(
                "{pointer:?}: edge of feature {} at {:?}",
                s.item.from.geometry, s.location
            ),
            (None, None) => println!("{pointer:?}: nothing within tolerance"),
        }
    }

    // Edges only, e.g. while the user holds a modifier.
    let edge_only = index.query_snap_candidates_filtered(
        &features,
        Point::new(20.4, 19.7),
        1.5,
        SnapKinds::SEGMENT,
    );
    println!("edge-only snap: {:?}", edge_only.best());

    // Nudge the road's middle vertex; it stays in its cell, so the index is still valid.
    if let Feature::Road(road) = &mut features[0] {
        road.set_vertex(1, Point::new(36.0, -4.0));
    }
    let moved = index.query_snap_candidates(&features, Point::new(36.5, -4.5), 1.5);
    println!("after edit: {:?}", moved.best());
}
