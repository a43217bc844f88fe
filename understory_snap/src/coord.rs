// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex handles and the geometry provider traits they resolve through.
//!
//! The index never copies coordinates. It stores [`CoordIdx`] handles (a host key plus a
//! [`VertexId`]) and asks a [`VertexSource`] for the current position whenever it needs one,
//! so edits the host makes to its geometry show up in later queries without re-indexing.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use kurbo::{Line, Point};

/// Position of a vertex inside a geometry: part, ring, and vertex index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    /// Part index (one per member of a multi-geometry).
    pub part: usize,
    /// Ring index within the part (exterior first, then holes).
    pub ring: usize,
    /// Vertex index within the ring.
    pub vertex: usize,
}

impl VertexId {
    /// Create a vertex id.
    pub const fn new(part: usize, ring: usize, vertex: usize) -> Self {
        Self { part, ring, vertex }
    }
}

/// Handle to one vertex of one host geometry.
///
/// `K` is whatever key the host uses to find its geometries again. Two handles are equal iff
/// they name the same geometry and the same vertex position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordIdx<K> {
    /// Host key of the geometry.
    pub geometry: K,
    /// Vertex position inside that geometry.
    pub vertex: VertexId,
}

impl<K: Copy> CoordIdx<K> {
    /// Create a handle.
    pub const fn new(geometry: K, vertex: VertexId) -> Self {
        Self { geometry, vertex }
    }

    /// Resolve the current coordinate of this vertex.
    ///
    /// Returns `None` when the source no longer knows the geometry or vertex.
    pub fn point<S: VertexSource<K> + ?Sized>(&self, source: &S) -> Option<Point> {
        source.resolve(self.geometry, self.vertex)
    }
}

/// Read access to a line or polygon geometry, as consumed by
/// [`SnapIndex::add_geometry`](crate::SnapIndex::add_geometry).
///
/// Out-of-range indices must yield zero counts or `None`, never panic.
pub trait Geometry {
    /// Number of parts.
    fn part_count(&self) -> usize;

    /// Number of rings in `part`.
    fn ring_count(&self, part: usize) -> usize;

    /// Number of stored vertices in a ring, including a closing duplicate if there is one.
    fn vertex_count(&self, part: usize, ring: usize) -> usize;

    /// Coordinate of a vertex.
    fn vertex(&self, id: VertexId) -> Option<Point>;

    /// Whether the ring is closed, i.e. its last vertex repeats its first.
    ///
    /// The closing duplicate is not indexed as a vertex of its own, but the edge leading into it is.
    fn is_closed(&self, part: usize, ring: usize) -> bool {
        let _ = (part, ring);
        false
    }
}

impl<G: Geometry + ?Sized> Geometry for &G {
    fn part_count(&self) -> usize {
        (**self).part_count()
    }

    fn ring_count(&self, part: usize) -> usize {
        (**self).ring_count(part)
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        (**self).vertex_count(part, ring)
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        (**self).vertex(id)
    }

    fn is_closed(&self, part: usize, ring: usize) -> bool {
        (**self).is_closed(part, ring)
    }
}

/// Host-side lookup used to resolve [`CoordIdx`] handles at query time.
pub trait VertexSource<K> {
    /// Current coordinate of `vertex` in the geometry keyed by `geometry`.
    fn resolve(&self, geometry: K, vertex: VertexId) -> Option<Point>;
}

impl<G: Geometry> VertexSource<usize> for [G] {
    fn resolve(&self, geometry: usize, vertex: VertexId) -> Option<Point> {
        self.get(geometry)?.vertex(vertex)
    }
}

impl<G: Geometry> VertexSource<usize> for Vec<G> {
    fn resolve(&self, geometry: usize, vertex: VertexId) -> Option<Point> {
        self.as_slice().resolve(geometry, vertex)
    }
}

impl<K: Ord, G: Geometry> VertexSource<K> for BTreeMap<K, G> {
    fn resolve(&self, geometry: K, vertex: VertexId) -> Option<Point> {
        self.get(&geometry)?.vertex(vertex)
    }
}

/// Adapts a closure into a [`VertexSource`].
///
/// ```
/// use kurbo::Point;
/// use understory_snap::{VertexFn, VertexId, VertexSource};
///
/// let source = VertexFn(|key: u32, v: VertexId| Some(Point::new(key as f64, v.vertex as f64)));
/// assert_eq!(source.resolve(3, VertexId::new(0, 0, 4)), Some(Point::new(3.0, 4.0)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct VertexFn<F>(pub F);

impl<K, F: Fn(K, VertexId) -> Option<Point>> VertexSource<K> for VertexFn<F> {
    fn resolve(&self, geometry: K, vertex: VertexId) -> Option<Point> {
        (self.0)(geometry, vertex)
    }
}

/// Open line string: one part, one ring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Create a line string from its vertices.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Vertices in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Move a vertex. Returns `false` if the index is out of range.
    pub fn set_vertex(&mut self, vertex: usize, at: Point) -> bool {
        match self.points.get_mut(vertex) {
            Some(p) => {
                *p = at;
                true
            }
            None => false,
        }
    }
}

impl Geometry for Polyline {
    fn part_count(&self) -> usize {
        1
    }

    fn ring_count(&self, part: usize) -> usize {
        usize::from(part == 0)
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        if part == 0 && ring == 0 {
            self.points.len()
        } else {
            0
        }
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        if id.part != 0 || id.ring != 0 {
            return None;
        }
        self.points.get(id.vertex).copied()
    }
}

/// Polygon with an exterior ring and optional holes. Every ring is stored closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a polygon from its exterior ring.
    ///
    /// The closing vertex is appended if the ring does not already end on its first vertex.
    pub fn new(exterior: impl IntoIterator<Item = Point>) -> Self {
        Self {
            rings: alloc::vec![close_ring(exterior)],
        }
    }

    /// Add a hole (interior ring).
    pub fn with_hole(mut self, hole: impl IntoIterator<Item = Point>) -> Self {
        self.rings.push(close_ring(hole));
        self
    }

    /// Rings, exterior first, each including its closing vertex.
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// Move a vertex. Moving the first or the closing vertex moves both.
    ///
    /// Returns `false` if the ring or vertex index is out of range.
    pub fn set_vertex(&mut self, ring: usize, vertex: usize, at: Point) -> bool {
        let Some(points) = self.rings.get_mut(ring) else {
            return false;
        };
        let n = points.len();
        if vertex >= n {
            return false;
        }
        points[vertex] = at;
        if n > 1 {
            if vertex == 0 {
                points[n - 1] = at;
            } else if vertex == n - 1 {
                points[0] = at;
            }
        }
        true
    }
}

fn close_ring(points: impl IntoIterator<Item = Point>) -> Vec<Point> {
    let mut ring: Vec<Point> = points.into_iter().collect();
    if ring.len() > 1 && ring.first() != ring.last() {
        let first = ring[0];
        ring.push(first);
    }
    ring
}

impl Geometry for Polygon {
    fn part_count(&self) -> usize {
        usize::from(!self.rings.is_empty())
    }

    fn ring_count(&self, part: usize) -> usize {
        if part == 0 { self.rings.len() } else { 0 }
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        if part != 0 {
            return 0;
        }
        self.rings.get(ring).map_or(0, Vec::len)
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        if id.part != 0 {
            return None;
        }
        self.rings.get(id.ring)?.get(id.vertex).copied()
    }

    fn is_closed(&self, part: usize, ring: usize) -> bool {
        part == 0 && self.rings.get(ring).is_some_and(|r| r.len() > 1)
    }
}

/// Several geometries presented as one, parts concatenated in member order.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiGeometry<G> {
    members: Vec<G>,
}

impl<G> Default for MultiGeometry<G> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<G: Geometry> MultiGeometry<G> {
    /// Create a multi-geometry from its members.
    pub fn new(members: impl IntoIterator<Item = G>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Members in order.
    pub fn members(&self) -> &[G] {
        &self.members
    }

    /// Mutable access to the members, for editing vertices in place.
    pub fn members_mut(&mut self) -> &mut [G] {
        &mut self.members
    }

    // Map a global part index to (member, local part).
    fn locate(&self, mut part: usize) -> Option<(&G, usize)> {
        for member in &self.members {
            let n = member.part_count();
            if part < n {
                return Some((member, part));
            }
            part -= n;
        }
        None
    }
}

impl<G: Geometry> Geometry for MultiGeometry<G> {
    fn part_count(&self) -> usize {
        self.members.iter().map(Geometry::part_count).sum()
    }

    fn ring_count(&self, part: usize) -> usize {
        self.locate(part).map_or(0, |(g, p)| g.ring_count(p))
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        self.locate(part).map_or(0, |(g, p)| g.vertex_count(p, ring))
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        let (g, p) = self.locate(id.part)?;
        g.vertex(VertexId::new(p, id.ring, id.vertex))
    }

    fn is_closed(&self, part: usize, ring: usize) -> bool {
        self.locate(part).is_some_and(|(g, p)| g.is_closed(p, ring))
    }
}

impl Geometry for Line {
    fn part_count(&self) -> usize {
        1
    }

    fn ring_count(&self, part: usize) -> usize {
        usize::from(part == 0)
    }

    fn vertex_count(&self, part: usize, ring: usize) -> usize {
        if part == 0 && ring == 0 { 2 } else { 0 }
    }

    fn vertex(&self, id: VertexId) -> Option<Point> {
        match (id.part, id.ring, id.vertex) {
            (0, 0, 0) => Some(self.p0),
            (0, 0, 1) => Some(self.p1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn square() -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn polygon_closes_rings_once() {
        let poly = Polygon::new(square());
        assert_eq!(poly.vertex_count(0, 0), 5);
        assert!(poly.is_closed(0, 0));

        let mut closed = square().to_vec();
        closed.push(Point::new(0.0, 0.0));
        let poly = Polygon::new(closed);
        assert_eq!(poly.vertex_count(0, 0), 5, "already closed ring gained a vertex");
    }

    #[test]
    fn polygon_moves_closing_vertex_with_first() {
        let mut poly = Polygon::new(square());
        assert!(poly.set_vertex(0, 0, Point::new(-1.0, -1.0)));
        assert_eq!(poly.vertex(VertexId::new(0, 0, 4)), Some(Point::new(-1.0, -1.0)));
        assert!(!poly.set_vertex(1, 0, Point::ZERO));
    }

    #[test]
    fn multi_geometry_concatenates_parts() {
        let a = Polyline::new([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let b = Polyline::new([Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(7.0, 5.0)]);
        let multi = MultiGeometry::new([a, b]);
        assert_eq!(multi.part_count(), 2);
        assert_eq!(multi.vertex_count(1, 0), 3);
        assert_eq!(multi.vertex(VertexId::new(1, 0, 2)), Some(Point::new(7.0, 5.0)));
        assert_eq!(multi.vertex(VertexId::new(2, 0, 0)), None);
        assert_eq!(multi.ring_count(7), 0);
    }

    #[test]
    fn coord_idx_reads_live_geometry() {
        let mut lines = vec![Polyline::new([Point::new(0.0, 0.0), Point::new(1.0, 1.0)])];
        let idx = CoordIdx::new(0_usize, VertexId::new(0, 0, 1));
        assert_eq!(idx.point(&lines), Some(Point::new(1.0, 1.0)));
        lines[0].set_vertex(1, Point::new(3.0, 4.0));
        assert_eq!(idx.point(&lines), Some(Point::new(3.0, 4.0)));

        let gone = CoordIdx::new(9_usize, VertexId::new(0, 0, 0));
        assert_eq!(gone.point(&lines), None);
    }

    #[test]
    fn map_source_resolves_by_key() {
        let mut map = BTreeMap::new();
        map.insert("road", Line::new((0.0, 0.0), (2.0, 0.0)));
        let idx = CoordIdx::new("road", VertexId::new(0, 0, 1));
        assert_eq!(idx.point(&map), Some(Point::new(2.0, 0.0)));
        assert_eq!(CoordIdx::new("river", VertexId::default()).point(&map), None);
    }

    #[test]
    fn handles_compare_by_geometry_and_position() {
        let a = CoordIdx::new(1_u32, VertexId::new(0, 1, 2));
        assert_eq!(a, CoordIdx::new(1_u32, VertexId::new(0, 1, 2)));
        assert_ne!(a, CoordIdx::new(2_u32, VertexId::new(0, 1, 2)));
        assert_ne!(a, CoordIdx::new(1_u32, VertexId::new(0, 1, 3)));
    }
}
