// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse, bidirectionally growable grid of snap item buckets.
//!
//! Rows and columns are stored densely behind a start offset, so a cell lookup is two
//! subtractions and two deque indexings. Growing below the current minimum prepends, growing
//! above the maximum appends; existing buckets are never relocated into new storage slots and
//! the dense range never has gaps.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::RangeInclusive;

use crate::item::SnapItem;

/// One grid cell: the snap items registered in it, in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell<K> {
    items: Vec<SnapItem<K>>,
}

impl<K> Default for GridCell<K> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<K> GridCell<K> {
    /// Items in insertion order.
    pub fn items(&self) -> &[SnapItem<K>] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the cell holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item.
    pub fn push(&mut self, item: SnapItem<K>) {
        self.items.push(item);
    }
}

/// Inclusive cell-space bounds of the backed part of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellBounds {
    /// Smallest backed column.
    pub min_col: i64,
    /// Smallest backed row.
    pub min_row: i64,
    /// Largest backed column.
    pub max_col: i64,
    /// Largest backed row.
    pub max_row: i64,
}

// `at - start` for an address already known to lie in `start..`.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Offsets index allocated storage, so they fit in usize."
)]
fn offset(start: i64, at: i64) -> usize {
    debug_assert!(at >= start, "address {at} below dense range start {start}");
    at.abs_diff(start) as usize
}

// Clamp an inclusive address window to `start..start + len`. Returns dense offsets.
fn clamp_window(
    start: i64,
    len: usize,
    window: RangeInclusive<i64>,
) -> Option<RangeInclusive<usize>> {
    if len == 0 {
        return None;
    }
    let last = start.saturating_add(i64::try_from(len - 1).ok()?);
    let lo = (*window.start()).max(start);
    let hi = (*window.end()).min(last);
    (lo <= hi).then(|| offset(start, lo)..=offset(start, hi))
}

/// One row of the grid: a dense run of cells starting at column `cols_start`.
#[derive(Clone, PartialEq)]
pub struct GridRow<K> {
    cols_start: i64,
    cells: VecDeque<GridCell<K>>,
}

impl<K> Default for GridRow<K> {
    fn default() -> Self {
        Self {
            cols_start: 0,
            cells: VecDeque::new(),
        }
    }
}

impl<K> GridRow<K> {
    /// Cell at `col`, or `None` outside the backed range. Never allocates.
    pub fn cell(&self, col: i64) -> Option<&GridCell<K>> {
        let off = col.checked_sub(self.cols_start)?;
        self.cells.get(usize::try_from(off).ok()?)
    }

    /// Cell at `col`, growing the row so that it exists.
    ///
    /// Every column between the old range and `col` is backed by an empty cell.
    pub fn cell_mut_or_insert(&mut self, col: i64) -> &mut GridCell<K> {
        if self.cells.is_empty() {
            self.cols_start = col;
            self.cells.push_back(GridCell::default());
        } else if col < self.cols_start {
            let grow = offset(col, self.cols_start);
            self.cells.reserve(grow);
            for _ in 0..grow {
                self.cells.push_front(GridCell::default());
            }
            self.cols_start = col;
        } else {
            let off = offset(self.cols_start, col);
            if off >= self.cells.len() {
                self.cells.resize_with(off + 1, GridCell::default);
            }
        }
        let off = offset(self.cols_start, col);
        &mut self.cells[off]
    }

    /// Existing cells overlapping the inclusive column window, in ascending column order.
    pub fn cells_in(&self, cols: RangeInclusive<i64>) -> impl Iterator<Item = &GridCell<K>> + '_ {
        clamp_window(self.cols_start, self.cells.len(), cols)
            .map(|r| self.cells.range(r))
            .into_iter()
            .flatten()
    }

    /// Backed column range, if any.
    pub fn col_range(&self) -> Option<RangeInclusive<i64>> {
        let len = i64::try_from(self.cells.len()).ok()?;
        (len > 0).then(|| self.cols_start..=self.cols_start + (len - 1))
    }

    /// Number of backed cells (including empty ones).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the row backs no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K> Debug for GridRow<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridRow")
            .field("cols", &self.col_range())
            .field("items", &self.cells.iter().map(GridCell::len).sum::<usize>())
            .finish_non_exhaustive()
    }
}

/// The grid: a dense run of rows starting at row `rows_start`.
///
/// Addresses outside the backed range read as empty; inserting extends the range.
#[derive(Clone)]
pub struct Grid<K> {
    rows_start: i64,
    rows: VecDeque<GridRow<K>>,
}

impl<K> Default for Grid<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Grid<K> {
    /// Create an empty grid.
    pub const fn new() -> Self {
        Self {
            rows_start: 0,
            rows: VecDeque::new(),
        }
    }

    /// Cell at `(col, row)`, or `None` outside the backed range. Never allocates.
    pub fn cell(&self, col: i64, row: i64) -> Option<&GridCell<K>> {
        self.row(row)?.cell(col)
    }

    /// Row at `row`, or `None` outside the backed range.
    pub fn row(&self, row: i64) -> Option<&GridRow<K>> {
        let off = row.checked_sub(self.rows_start)?;
        self.rows.get(usize::try_from(off).ok()?)
    }

    /// Cell at `(col, row)`, growing rows and columns so that it exists.
    pub fn cell_mut_or_insert(&mut self, col: i64, row: i64) -> &mut GridCell<K> {
        if self.rows.is_empty() {
            self.rows_start = row;
            self.rows.push_back(GridRow::default());
            log::trace!("grid started at row {row}");
        } else if row < self.rows_start {
            let grow = offset(row, self.rows_start);
            self.rows.reserve(grow);
            for _ in 0..grow {
                self.rows.push_front(GridRow::default());
            }
            self.rows_start = row;
            log::trace!("grid grew {grow} rows down to {row}");
        } else {
            let off = offset(self.rows_start, row);
            if off >= self.rows.len() {
                let grow = off + 1 - self.rows.len();
                self.rows.resize_with(off + 1, GridRow::default);
                log::trace!("grid grew {grow} rows up to {row}");
            }
        }
        let off = offset(self.rows_start, row);
        self.rows[off].cell_mut_or_insert(col)
    }

    /// Existing cells in the inclusive window, rows ascending then columns ascending.
    ///
    /// The window is clamped to the backed range; addresses outside it contribute nothing.
    pub fn cells_in_window(
        &self,
        cols: RangeInclusive<i64>,
        rows: RangeInclusive<i64>,
    ) -> impl Iterator<Item = &GridCell<K>> + '_ {
        clamp_window(self.rows_start, self.rows.len(), rows)
            .map(|r| self.rows.range(r))
            .into_iter()
            .flatten()
            .flat_map(move |row| row.cells_in(cols.clone()))
    }

    /// Bounds of the backed cells, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<CellBounds> {
        let len = i64::try_from(self.rows.len()).ok()?;
        let mut cols = self.rows.iter().filter_map(GridRow::col_range);
        let first = cols.next()?;
        let (min_col, max_col) = cols.fold((*first.start(), *first.end()), |(lo, hi), r| {
            (lo.min(*r.start()), hi.max(*r.end()))
        });
        Some(CellBounds {
            min_col,
            min_row: self.rows_start,
            max_col,
            max_row: self.rows_start + (len - 1),
        })
    }

    /// Number of backed rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of backed cells, including empty gap fillers.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(GridRow::len).sum()
    }

    /// Total number of items across all cells.
    pub fn item_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .map(GridCell::len)
            .sum()
    }

    /// Drop every row and cell.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.rows_start = 0;
    }
}

impl<K> Debug for Grid<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("bounds", &self.bounds())
            .field("rows", &self.row_count())
            .field("cells", &self.cell_count())
            .field("items", &self.item_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{CoordIdx, VertexId};
    use crate::item::PointSnapItem;
    use alloc::vec::Vec;

    fn item(v: usize) -> SnapItem<u32> {
        PointSnapItem::new(CoordIdx::new(0, VertexId::new(0, 0, v))).into()
    }

    fn tag(cell: &GridCell<u32>) -> Vec<usize> {
        cell.items()
            .iter()
            .map(|i| match i {
                SnapItem::Vertex(p) => p.idx.vertex.vertex,
                SnapItem::Segment(_) => usize::MAX,
            })
            .collect()
    }

    #[test]
    fn lookups_outside_bounds_are_empty() {
        let mut grid: Grid<u32> = Grid::new();
        assert!(grid.cell(0, 0).is_none());
        assert!(grid.bounds().is_none());
        grid.cell_mut_or_insert(2, 3).push(item(1));
        assert!(grid.cell(2, 2).is_none());
        assert!(grid.cell(1, 3).is_none());
        assert!(grid.cell(i64::MIN, i64::MAX).is_none());
        assert_eq!(grid.cells_in_window(10..=20, 10..=20).count(), 0);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn grows_in_both_directions_without_losing_items() {
        let mut grid: Grid<u32> = Grid::new();
        grid.cell_mut_or_insert(0, 0).push(item(0));
        grid.cell_mut_or_insert(-3, -2).push(item(1));
        grid.cell_mut_or_insert(4, 5).push(item(2));
        grid.cell_mut_or_insert(0, 0).push(item(3));

        assert_eq!(tag(grid.cell(0, 0).unwrap()), [0, 3]);
        assert_eq!(tag(grid.cell(-3, -2).unwrap()), [1]);
        assert_eq!(tag(grid.cell(4, 5).unwrap()), [2]);

        // Skipped rows are backed (empty), so the row range is contiguous.
        assert_eq!(grid.row_count(), 8);
        assert!(grid.row(1).unwrap().is_empty());
        assert_eq!(
            grid.bounds(),
            Some(CellBounds {
                min_col: -3,
                min_row: -2,
                max_col: 4,
                max_row: 5
            })
        );
        assert_eq!(grid.item_count(), 4);
    }

    #[test]
    fn row_fills_column_gaps() {
        let mut row: GridRow<u32> = GridRow::default();
        row.cell_mut_or_insert(5).push(item(0));
        row.cell_mut_or_insert(2).push(item(1));
        row.cell_mut_or_insert(8).push(item(2));
        assert_eq!(row.col_range(), Some(2..=8));
        assert_eq!(row.len(), 7);
        assert!(row.cell(4).unwrap().is_empty());
        assert_eq!(tag(row.cell(5).unwrap()), [0]);
        assert!(row.cell(9).is_none());
    }

    #[test]
    fn window_is_clamped_and_ordered() {
        let mut grid: Grid<u32> = Grid::new();
        for (i, (c, r)) in [(1, 1), (0, 0), (2, 0), (1, 2), (-1, 1)].into_iter().enumerate() {
            grid.cell_mut_or_insert(c, r).push(item(i));
        }
        let seen: Vec<usize> = grid
            .cells_in_window(0..=100, -100..=1)
            .flat_map(tag)
            .collect();
        // Row 0: cols 0 and 2; row 1: col 1 (col -1 is outside the window).
        assert_eq!(seen, [1, 2, 0]);

        let again: Vec<usize> = grid
            .cells_in_window(0..=100, -100..=1)
            .flat_map(tag)
            .collect();
        assert_eq!(seen, again);
    }

    #[test]
    fn clear_resets() {
        let mut grid: Grid<u32> = Grid::new();
        grid.cell_mut_or_insert(7, -7).push(item(0));
        grid.clear();
        assert!(grid.cell(7, -7).is_none());
        assert_eq!(grid.item_count(), 0);
    }
}
