// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_snap --heading-base-level=0

//! Understory Snap: a grid-accelerated snapping index for interactive geometry editing.
//!
//! Given the geometries already on a canvas, a [`SnapIndex`] answers the two questions an
//! editor asks while the pointer moves:
//!
//! - Which vertex and which point on an edge are closest to this position, within a tolerance?
//!   See [`SnapIndex::query_snap_candidates`].
//! - Where does the line from an anchor through the pointer first meet existing geometry?
//!   See [`SnapIndex::find_nearest_along_ray`].
//!
//! The index buckets vertices and edges into a uniform grid of square cells anchored at a
//! world origin. Edges are registered in every cell they pass through, using a
//! [`Raytracer`] that walks the grid cell by cell. The grid grows in both directions on
//! demand, so negative coordinates need no special setup.
//!
//! The index never copies coordinates. Items hold [`CoordIdx`] handles (a host key plus a
//! [`VertexId`]) and every query takes a [`VertexSource`] used to read current positions.
//! Moving a vertex in place is therefore picked up by the next query. Moving it to a
//! different cell requires rebuilding the index, as do added or removed vertices.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_snap::{Polyline, SnapIndex};
//!
//! // Host geometries, keyed by position in the vector.
//! let geoms = vec![
//!     Polyline::new([Point::new(2.0, 2.0), Point::new(27.0, 2.0)]),
//!     Polyline::new([Point::new(20.0, -5.0), Point::new(20.0, 5.0)]),
//! ];
//!
//! let mut index = SnapIndex::new(Point::ZERO, 10.0).unwrap();
//! for (key, g) in geoms.iter().enumerate() {
//!     index.add_geometry(key, g);
//! }
//!
//! // Snap near the first line's interior.
//! let hit = index.query_snap_candidates(&geoms, Point::new(5.0, 2.5), 1.0);
//! assert!(hit.point.is_none());
//! assert_eq!(hit.segment.unwrap().location, Point::new(5.0, 2.0));
//!
//! // Extend the ray from (0, 0) through (10, 0) until it meets geometry.
//! let along = index.find_nearest_along_ray(&geoms, Point::ZERO, Point::new(10.0, 0.0));
//! assert_eq!(along, Some(Point::new(20.0, 0.0)));
//! ```
//!
//! ## Choosing a cell size
//!
//! Queries scan every cell overlapping the tolerance square, and edges are stored once per
//! cell they cross. A cell size close to the typical snapping tolerance keeps both costs small.
//!
//! ### Float semantics
//!
//! Non-finite vertices are skipped at ingestion and non-finite query positions match nothing.
//! Tolerance comparisons are strict: a candidate exactly `tolerance` away is not reported.

#![no_std]

extern crate alloc;

pub mod coord;
pub mod error;
pub mod grid;
pub mod index;
pub mod item;
pub mod raytracer;
pub mod types;

pub use coord::{
    CoordIdx, Geometry, MultiGeometry, Polygon, Polyline, VertexFn, VertexId, VertexSource,
};
pub use error::{Error, Result};
pub use grid::{CellBounds, Grid, GridCell, GridRow};
pub use index::{IngestStats, SnapIndex, SnapIndexConfig};
pub use item::{PointSnapItem, SegmentSnapItem, SnapItem, SnapKind};
pub use raytracer::Raytracer;
pub use types::{SnapCandidates, SnapKinds, SnapMatch};
