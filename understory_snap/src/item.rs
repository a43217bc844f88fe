// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snap candidates stored in grid cells: vertices and edges.

use kurbo::{Line, Point};

use crate::coord::{CoordIdx, VertexSource};

/// Parametric slack used to keep intersections that land exactly on a segment end.
const INTERSECTION_SLACK: f64 = 1e-9;

/// Discriminant of a [`SnapItem`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapKind {
    /// A single vertex.
    Vertex,
    /// An edge between two consecutive vertices.
    Segment,
}

/// Vertex candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointSnapItem<K> {
    /// The vertex.
    pub idx: CoordIdx<K>,
}

impl<K: Copy> PointSnapItem<K> {
    /// Create a vertex candidate.
    pub const fn new(idx: CoordIdx<K>) -> Self {
        Self { idx }
    }

    /// Current position of the vertex.
    pub fn point<S: VertexSource<K> + ?Sized>(&self, source: &S) -> Option<Point> {
        self.idx.point(source)
    }

    /// Squared distance from the vertex to `q`, read from live geometry.
    pub fn squared_distance_to<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        q: Point,
    ) -> Option<f64> {
        Some((self.point(source)? - q).hypot2())
    }
}

/// Edge candidate, directed from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SegmentSnapItem<K> {
    /// Start vertex.
    pub from: CoordIdx<K>,
    /// End vertex.
    pub to: CoordIdx<K>,
}

impl<K: Copy> SegmentSnapItem<K> {
    /// Create an edge candidate.
    pub const fn new(from: CoordIdx<K>, to: CoordIdx<K>) -> Self {
        Self { from, to }
    }

    /// Current geometry of the edge.
    pub fn line<S: VertexSource<K> + ?Sized>(&self, source: &S) -> Option<Line> {
        Some(Line::new(self.from.point(source)?, self.to.point(source)?))
    }

    /// Foot of the perpendicular from `q` onto the edge.
    ///
    /// `None` if the foot falls outside the edge or the edge has zero length. Endpoints are
    /// snapped through their own [`PointSnapItem`]s instead.
    pub fn project<S: VertexSource<K> + ?Sized>(&self, source: &S, q: Point) -> Option<Point> {
        project_onto(self.line(source)?, q)
    }

    /// Intersection of the edge with the finite segment `p0 → p1`.
    ///
    /// `None` for parallel or zero-length inputs, and when the crossing lies outside either
    /// segment.
    pub fn intersect<S: VertexSource<K> + ?Sized>(
        &self,
        source: &S,
        p0: Point,
        p1: Point,
    ) -> Option<Point> {
        intersect_segments(self.line(source)?, Line::new(p0, p1))
    }
}

/// A candidate stored in a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapItem<K> {
    /// Vertex candidate.
    Vertex(PointSnapItem<K>),
    /// Edge candidate.
    Segment(SegmentSnapItem<K>),
}

impl<K> SnapItem<K> {
    /// Which kind of candidate this is.
    pub const fn kind(&self) -> SnapKind {
        match self {
            Self::Vertex(_) => SnapKind::Vertex,
            Self::Segment(_) => SnapKind::Segment,
        }
    }
}

impl<K> From<PointSnapItem<K>> for SnapItem<K> {
    fn from(item: PointSnapItem<K>) -> Self {
        Self::Vertex(item)
    }
}

impl<K> From<SegmentSnapItem<K>> for SnapItem<K> {
    fn from(item: SegmentSnapItem<K>) -> Self {
        Self::Segment(item)
    }
}

pub(crate) fn project_onto(line: Line, q: Point) -> Option<Point> {
    let d = line.p1 - line.p0;
    let len2 = d.hypot2();
    if len2 == 0.0 || len2.is_nan() {
        return None;
    }
    let t = (q - line.p0).dot(d) / len2;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(line.p0 + d * t)
}

pub(crate) fn intersect_segments(a: Line, b: Line) -> Option<Point> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let denom = r.cross(s);
    // Parallel (or degenerate) when |r × s| is negligible next to |r|·|s|.
    let scale = f64::EPSILON * f64::EPSILON * r.hypot2() * s.hypot2();
    if denom.is_nan() || denom * denom <= scale {
        return None;
    }
    let qp = b.p0 - a.p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    let range = -INTERSECTION_SLACK..=1.0 + INTERSECTION_SLACK;
    if !range.contains(&t) || !range.contains(&u) {
        return None;
    }
    Some(a.p0 + r * t)
}
