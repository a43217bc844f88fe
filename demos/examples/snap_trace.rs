// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray snapping.
//!
//! Extend a line from an anchor through the pointer until it meets existing geometry, and show
//! which grid cells the probe visits.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example snap_trace`

use kurbo::{Line, Point};
use understory_snap::{Raytracer, SnapIndex};

fn main() {
    env_logger::init();

    let walls = vec![
        Line::new((20.0, -5.0), (20.0, 5.0)),
        Line::new((32.0, -10.0), (28.0, 10.0)),
        Line::new((-12.0, 14.0), (-12.0, -14.0)),
    ];
    let cell = 10.0;
    let mut index = match SnapIndex::new(Point::ZERO, cell) {
        Ok(index) => index,
        Err(err) => {
            log::error!("cannot build snap index: {err}");
            return;
        }
    };
    for (key, wall) in walls.iter().enumerate() {
        index.add_geometry(key, wall);
    }

    let anchor = Point::ZERO;
    for pointer in [
        Point::new(10.0, 0.0),
        Point::new(14.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(-7.0, 1.0),
    ] {
        let probe_end = pointer + (pointer - anchor);
        let (x0, y0) = index.to_grid_space(anchor);
        let (x1, y1) = index.to_grid_space(probe_end);
        let cells: Vec<_> = Raytracer::new(x0, y0, x1, y1).collect();
        log::debug!("probe {anchor:?} -> {probe_end:?} visits {cells:?}");

        match index.find_nearest_along_ray(&walls, anchor, pointer) {
            Some(hit) => println!("{pointer:?}: extended to {hit:?}"),
            None => println!(
                "{pointer:?}: no wall in reach, stays at {:?}",
                index.find_nearest_along_ray_or_anchor(&walls, anchor, pointer)
            ),
        }
    }
}
