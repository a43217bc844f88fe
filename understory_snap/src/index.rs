// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `SnapIndex` API: ingestion, radius queries, and ray probes.

use alloc::vec::Vec;
use core::fmt::Debug;
use kurbo::{Line, Point, Rect, Vec2};

use crate::coord::{CoordIdx, Geometry, VertexId, VertexSource};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::item::{PointSnapItem, SegmentSnapItem, SnapItem};
use crate::raytracer::{Raytracer, floor_to_i64};
use crate::types::{SnapCandidates, SnapKinds, SnapMatch};

/// Construction parameters for a [`SnapIndex`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapIndexConfig {
    /// World position of the corner of cell `(0, 0)`.
    pub origin: Point,
    /// Side length of a cell in world units. Must be finite and positive.
    pub cell_size: f64,
}

impl Default for SnapIndexConfig {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            cell_size: 1.0,
        }
    }
}

/// What a call to [`SnapIndex::add_geometry`] registered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Vertex candidates added.
    pub points: usize,
    /// Edge candidates added (counted once per edge, not per cell).
    pub segments: usize,
    /// Cells touched by edges, summed over edges.
    pub cells_touched: usize,
}

/// Grid-accelerated snapping index over host geometries keyed by `K`.
///
/// The index stores vertex handles only; every distance, projection, and intersection is
/// computed from the coordinates the [`VertexSource`] reports at query time.
pub struct SnapIndex<K> {
    origin: Point,
    cell_size: f64,
    grid: Grid<K>,
    coords: Vec<CoordIdx<K>>,
}

impl<K> Debug for SnapIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapIndex")
            .field("origin", &self.origin)
            .field("cell_size", &self.cell_size)
            .field("coords", &self.coords.len())
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Debug> SnapIndex<K> {
    /// Create an empty index with the given grid origin and cell size.
    ///
    /// Fails if the cell size is not finite and positive, or the origin is not finite.
    pub fn new(origin: Point, cell_size: f64) -> Result<Self> {
        Self::with_config(SnapIndexConfig { origin, cell_size })
    }

    /// Create an empty index from a [`SnapIndexConfig`].
    pub fn with_config(config: SnapIndexConfig) -> Result<Self> {
        let SnapIndexConfig { origin, cell_size } = config;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidCellSize(cell_size));
        }
        if !origin.is_finite() {
            return Err(Error::InvalidOrigin {
                x: origin.x,
                y: origin.y,
            });
        }
        log::debug!("snap index created: origin {origin:?}, cell size {cell_size}");
        Ok(Self {
            origin,
            cell_size,
            grid: Grid::new(),
            coords: Vec::new(),
        })
    }

    /// Grid origin.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Cell side length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid<K> {
        &self.grid
    }

    /// Vertex handles indexed so far, in ingestion order.
    pub fn coords(&self) -> &[CoordIdx<K>] {
        &self.coords
    }

    /// Number of vertex handles indexed so far.
    pub fn coord_count(&self) -> usize {
        self.coords.len()
    }

    /// Map a world position into fractional grid space.
    pub fn to_grid_space(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.origin.x) / self.cell_size,
            (p.y - self.origin.y) / self.cell_size,
        )
    }

    /// Cell `(col, row)` containing a world position.
    pub fn cell_of(&self, p: Point) -> (i64, i64) {
        let (x, y) = self.to_grid_space(p);
        (floor_to_i64(x), floor_to_i64(y))
    }

    /// Register a vertex candidate located at `at` in the single cell that contains it.
    pub fn add_point(&mut self, idx: CoordIdx<K>, at: Point) {
        let (col, row) = self.cell_of(at);
        self.grid
            .cell_mut_or_insert(col, row)
            .push(PointSnapItem::new(idx).into());
    }

    /// Register an edge candidate in every cell the edge passes through.
    ///
    /// `p_from` and `p_to` are the current positions of `from` and `to`. Zero-length edges are
    /// skipped. Returns the number of cells the edge was added to.
    pub fn add_segment(
        &mut self,
        from: CoordIdx<K>,
        to: CoordIdx<K>,
        p_from: Point,
        p_to: Point,
    ) -> usize {
        if p_from == p_to {
            return 0;
        }
        let (x0, y0) = self.to_grid_space(p_from);
        let (x1, y1) = self.to_grid_space(p_to);
        let item: SnapItem<K> = SegmentSnapItem::new(from, to).into();
        let mut touched = 0;
        for (col, row) in Raytracer::new(x0, y0, x1, y1) {
            self.grid.cell_mut_or_insert(col, row).push(item);
            touched += 1;
        }
        touched
    }

    /// Index every vertex and edge of `geometry` under the host key `key`.
    ///
    /// Each vertex becomes a point candidate, except the closing duplicate of a closed ring.
    /// Each pair of consecutive vertices becomes an edge candidate, including the edge that
    /// closes a ring. Missing, non-finite, or zero-length pieces are skipped.
    pub fn add_geometry<G: Geometry + ?Sized>(&mut self, key: K, geometry: &G) -> IngestStats {
        let mut stats = IngestStats::default();
        for part in 0..geometry.part_count() {
            for ring in 0..geometry.ring_count(part) {
                let n = geometry.vertex_count(part, ring);
                let distinct = if n > 1 && geometry.is_closed(part, ring) {
                    n - 1
                } else {
                    n
                };
                let mut prev: Option<(CoordIdx<K>, Point)> = None;
                for vertex in 0..n {
                    let id = VertexId::new(part, ring, vertex);
                    let Some(at) = geometry.vertex(id).filter(|p| p.is_finite()) else {
                        prev = None;
                        continue;
                    };
                    let idx = CoordIdx::new(key, id);
                    if vertex < distinct {
                        self.coords.push(idx);
                        self.add_point(idx, at);
                        stats.points += 1;
                    }
                    if let Some((from, p_from)) = prev {
                        let touched = self.add_segment(from, idx, p_from, at);
                        if touched > 0 {
                            stats.segments += 1;
                            stats.cells_touched += touched;
                        }
                    }
                    prev = Some((idx, at));
                }
            }
        }
        log::debug!(
            "indexed geometry {key:?}: {} vertices, {} edges over {} cells",
            stats.points,
            stats.segments,
            stats.cells_touched
        );
        stats
    }

    /// Closest vertex and closest edge projection within `tolerance` of `pos`.
    ///
    /// Only cells overlapping the square `[pos - tolerance, pos + tolerance]` are scanned. A
    /// candidate qualifies only if its squared distance is strictly less than `tolerance²`.
    /// On ties the first candidate in scan order wins.
    pub fn query_snap_candidates<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        pos: Point,
        tolerance: f64,
    ) -> SnapCandidates<K> {
        self.query_snap_candidates_filtered(source, pos, tolerance, SnapKinds::all())
    }

    /// Like [`query_snap_candidates`](Self::query_snap_candidates), restricted to `kinds`.
    pub fn query_snap_candidates_filtered<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        pos: Point,
        tolerance: f64,
        kinds: SnapKinds,
    ) -> SnapCandidates<K> {
        let mut out = SnapCandidates::default();
        if kinds.is_empty() || !pos.is_finite() || tolerance.is_nan() || tolerance <= 0.0 {
            return out;
        }
        let reach = Vec2::new(tolerance, tolerance);
        let (col0, row0) = self.cell_of(pos - reach);
        let (col1, row1) = self.cell_of(pos + reach);

        let limit = tolerance * tolerance;
        let mut best_point = limit;
        let mut best_segment = limit;
        for cell in self.grid.cells_in_window(col0..=col1, row0..=row1) {
            for item in cell.items().iter().filter(|i| kinds.admits(i.kind())) {
                match item {
                    SnapItem::Vertex(vertex) => {
                        let Some(at) = vertex.point(source) else {
                            continue;
                        };
                        let d = (at - pos).hypot2();
                        if d < best_point {
                            best_point = d;
                            out.point = Some(SnapMatch {
                                item: *vertex,
                                location: at,
                                distance_squared: d,
                            });
                        }
                    }
                    SnapItem::Segment(segment) => {
                        let Some(at) = segment.project(source, pos) else {
                            continue;
                        };
                        let d = (at - pos).hypot2();
                        if d < best_segment {
                            best_segment = d;
                            out.segment = Some(SnapMatch {
                                item: *segment,
                                location: at,
                                distance_squared: d,
                            });
                        }
                    }
                }
            }
        }
        out
    }

    /// Nearest edge crossing along the line from `p` through `q`.
    ///
    /// Probes the segment from `p` to `2q - p` (twice as far as `q`), intersects it with every
    /// edge in the cells it passes, and returns the crossing closest to `q`. `None` when the
    /// probe crosses nothing, including when `p == q`.
    pub fn find_nearest_along_ray<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        p: Point,
        q: Point,
    ) -> Option<Point> {
        if !p.is_finite() || !q.is_finite() {
            return None;
        }
        let p2 = q + (q - p);
        // Cells outside the backed range are empty, so only trace the part of the probe
        // inside it, padded by a cell to absorb clipping round-off.
        let bounds = self.grid.bounds()?;
        let window = Rect::new(
            bounds.min_col as f64 - 1.0,
            bounds.min_row as f64 - 1.0,
            bounds.max_col as f64 + 2.0,
            bounds.max_row as f64 + 2.0,
        );
        let (x0, y0) = self.to_grid_space(p);
        let (x1, y1) = self.to_grid_space(p2);
        let traced = clip_to_rect(Line::new((x0, y0), (x1, y1)), window)?;

        let mut best: Option<(f64, Point)> = None;
        for (col, row) in Raytracer::new(traced.p0.x, traced.p0.y, traced.p1.x, traced.p1.y) {
            let Some(cell) = self.grid.cell(col, row) else {
                continue;
            };
            for item in cell.items() {
                if let SnapItem::Segment(segment) = item
                    && let Some(hit) = segment.intersect(source, p, p2)
                {
                    let d = (hit - q).hypot2();
                    if best.is_none_or(|(best_d, _)| d < best_d) {
                        best = Some((d, hit));
                    }
                }
            }
        }
        best.map(|(_, hit)| hit)
    }

    /// [`find_nearest_along_ray`](Self::find_nearest_along_ray), falling back to `p` when
    /// nothing is crossed.
    pub fn find_nearest_along_ray_or_anchor<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        p: Point,
        q: Point,
    ) -> Point {
        self.find_nearest_along_ray(source, p, q).unwrap_or(p)
    }

    /// Drop all indexed items, keeping origin and cell size.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.coords.clear();
    }
}

/// Liang-Barsky clip of `line` against `rect`. Unclipped ends are returned unchanged.
fn clip_to_rect(line: Line, rect: Rect) -> Option<Line> {
    let d = line.p1 - line.p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, line.p0.x - rect.x0),
        (d.x, rect.x1 - line.p0.x),
        (-d.y, line.p0.y - rect.y0),
        (d.y, rect.y1 - line.p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    let start = if t0 > 0.0 { line.p0 + d * t0 } else { line.p0 };
    let end = if t1 < 1.0 { line.p0 + d * t1 } else { line.p1 };
    Some(Line::new(start, end))
}
