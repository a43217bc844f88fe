// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query filters and results.

use kurbo::Point;

use crate::item::{PointSnapItem, SegmentSnapItem, SnapKind};

bitflags::bitflags! {
    /// Which candidate kinds a radius query considers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SnapKinds: u8 {
        /// Consider vertices.
        const VERTEX  = 0b0000_0001;
        /// Consider projections onto edges.
        const SEGMENT = 0b0000_0010;
    }
}

impl Default for SnapKinds {
    fn default() -> Self {
        Self::all()
    }
}

impl SnapKinds {
    /// Whether candidates of `kind` pass this filter.
    pub fn admits(self, kind: SnapKind) -> bool {
        match kind {
            SnapKind::Vertex => self.contains(Self::VERTEX),
            SnapKind::Segment => self.contains(Self::SEGMENT),
        }
    }
}

/// A candidate that passed a query, with where it snaps to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapMatch<T> {
    /// The matched item.
    pub item: T,
    /// Snap location: the vertex itself, or the projection onto the edge.
    pub location: Point,
    /// Squared distance from the query position to `location`.
    pub distance_squared: f64,
}

/// Result of [`SnapIndex::query_snap_candidates`](crate::SnapIndex::query_snap_candidates).
///
/// The best vertex and the best edge projection are tracked independently; either, both, or
/// neither may be present.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapCandidates<K> {
    /// Closest vertex strictly within tolerance.
    pub point: Option<SnapMatch<PointSnapItem<K>>>,
    /// Closest edge projection strictly within tolerance.
    pub segment: Option<SnapMatch<SegmentSnapItem<K>>>,
}

impl<K> Default for SnapCandidates<K> {
    fn default() -> Self {
        Self {
            point: None,
            segment: None,
        }
    }
}

impl<K> SnapCandidates<K> {
    /// True if neither a vertex nor an edge was found.
    pub fn is_empty(&self) -> bool {
        self.point.is_none() && self.segment.is_none()
    }

    /// Where to snap: the vertex if one was found, otherwise the edge projection.
    pub fn best(&self) -> Option<Point> {
        self.point
            .as_ref()
            .map(|m| m.location)
            .or_else(|| self.segment.as_ref().map(|m| m.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{CoordIdx, VertexId};

    #[test]
    fn filter_admits_selected_kinds() {
        assert!(SnapKinds::default().admits(SnapKind::Vertex));
        assert!(SnapKinds::default().admits(SnapKind::Segment));
        assert!(!SnapKinds::VERTEX.admits(SnapKind::Segment));
        assert!(!SnapKinds::empty().admits(SnapKind::Vertex));
    }

    #[test]
    fn best_prefers_vertex() {
        let a = CoordIdx::new(0_u8, VertexId::new(0, 0, 0));
        let b = CoordIdx::new(0_u8, VertexId::new(0, 0, 1));
        let mut c = SnapCandidates::default();
        assert!(c.is_empty());
        assert_eq!(c.best(), None);

        c.segment = Some(SnapMatch {
            item: SegmentSnapItem::new(a, b),
            location: Point::new(1.0, 0.0),
            distance_squared: 0.25,
        });
        assert_eq!(c.best(), Some(Point::new(1.0, 0.0)));

        c.point = Some(SnapMatch {
            item: PointSnapItem::new(a),
            location: Point::new(0.0, 0.0),
            distance_squared: 0.81,
        });
        assert_eq!(c.best(), Some(Point::new(0.0, 0.0)));
    }
}
