// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Snap: index geometry, snap a pointer, and extend along a ray.

use kurbo::Point;
use understory_snap::{Polygon, Polyline, SnapIndex};

fn main() {
    let lines = vec![
        Polyline::new([Point::new(2.0, 2.0), Point::new(27.0, 2.0)]),
        Polyline::new([Point::new(20.0, -5.0), Point::new(20.0, 5.0)]),
    ];
    let mut idx = SnapIndex::new(Point::ZERO, 10.0).unwrap();
    for (key, line) in lines.iter().enumerate() {
        let stats = idx.add_geometry(key, line);
        println!("line {key}: {stats:?}");
    }

    // Snap a pointer
    let hit = idx.query_snap_candidates(&lines, Point::new(5.0, 2.4), 1.0);
    println!("vertex: {:?}", hit.point);
    println!("edge:   {:?}", hit.segment);

    // Extend (0,0) -> (10,0)
    let along = idx.find_nearest_along_ray(&lines, Point::ZERO, Point::new(10.0, 0.0));
    println!("along ray: {:?}", along);

    // Polygons snap to their closing edge too
    let rooms = vec![Polygon::new([
        Point::new(0.0, 0.0),
        Point::new(8.0, 0.0),
        Point::new(8.0, 6.0),
        Point::new(0.0, 6.0),
    ])];
    let mut room_idx = SnapIndex::new(Point::ZERO, 4.0).unwrap();
    room_idx.add_geometry(0, &rooms[0]);
    println!(
        "closing edge: {:?}",
        room_idx.query_snap_candidates(&rooms, Point::new(-0.3, 3.0), 0.5).best()
    );
}
