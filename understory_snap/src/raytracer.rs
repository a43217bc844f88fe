// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid traversal along a straight line (supercover DDA).

use core::iter::FusedIterator;

/// Floor a float to an `i64` cell index without relying on `std` float intrinsics.
///
/// Saturates at the `i64` range; NaN maps to 0.
#[inline]
pub(crate) fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Saturating float to integer cast is the intended cell mapping."
    )]
    let i = v as i64;
    if (i as f64) > v { i.saturating_sub(1) } else { i }
}

/// Lazily enumerates every grid cell a straight line passes through.
///
/// Endpoints are given in fractional grid space (cell `(c, r)` covers `[c, c+1) × [r, r+1)`).
/// Cells are yielded as `(col, row)` in travel order, starting with the cell containing the
/// start point and ending with the cell containing the end point.
///
/// Each step moves exactly one axis by one cell, so consecutive cells always share an edge.
/// When the line passes exactly through a grid corner, the axis stepping towards `+1` is
/// advanced first (the column when both or neither do), so the cell containing the corner
/// point is always yielded. In total `1 + |Δcol| + |Δrow|` cells are produced.
///
/// ```
/// use understory_snap::Raytracer;
///
/// let cells: Vec<_> = Raytracer::new(0.5, 0.5, 2.5, 1.5).collect();
/// assert_eq!(cells.first(), Some(&(0, 0)));
/// assert_eq!(cells.last(), Some(&(2, 1)));
/// assert_eq!(cells.len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Raytracer {
    col: i64,
    row: i64,
    col_step: i64,
    row_step: i64,
    cols_left: u64,
    rows_left: u64,
    // |Δx| and |Δy| of the traced line.
    dx: f64,
    dy: f64,
    // dx·dy·(t_next_col − t_next_row): positive means the next row boundary comes first.
    error: f64,
    // Corner ties step the row first when travelling towards -x, +y.
    row_first_on_tie: bool,
    remaining: u64,
}

impl Raytracer {
    /// Trace from `(x0, y0)` to `(x1, y1)`. Non-finite input yields no cells.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return Self {
                col: 0,
                row: 0,
                col_step: 0,
                row_step: 0,
                cols_left: 0,
                rows_left: 0,
                dx: 0.0,
                dy: 0.0,
                error: 0.0,
                row_first_on_tie: false,
                remaining: 0,
            };
        }

        let col = floor_to_i64(x0);
        let row = floor_to_i64(y0);
        let end_col = floor_to_i64(x1);
        let end_row = floor_to_i64(y1);

        // Distance from the start point to the first boundary crossed on each axis.
        let (col_step, dx, dist_x) = if x1 > x0 {
            (1, x1 - x0, (col as f64 + 1.0) - x0)
        } else {
            (-1, x0 - x1, x0 - col as f64)
        };
        let (row_step, dy, dist_y) = if y1 > y0 {
            (1, y1 - y0, (row as f64 + 1.0) - y0)
        } else {
            (-1, y0 - y1, y0 - row as f64)
        };

        let cols_left = col.abs_diff(end_col);
        let rows_left = row.abs_diff(end_row);

        Self {
            col,
            row,
            col_step,
            row_step,
            cols_left,
            rows_left,
            dx,
            dy,
            error: dist_x * dy - dist_y * dx,
            row_first_on_tie: col_step < 0 && row_step > 0,
            remaining: 1_u64
                .saturating_add(cols_left)
                .saturating_add(rows_left),
        }
    }

    /// Cell that the next call to `next` will yield, if any.
    pub fn peek(&self) -> Option<(i64, i64)> {
        (self.remaining > 0).then_some((self.col, self.row))
    }

    fn advance(&mut self) {
        // Step counters take precedence over the error term so the walk always lands on the
        // end cell, even when rounding disagrees with the floors taken in `new`.
        let step_col = if self.cols_left == 0 {
            false
        } else if self.rows_left == 0 {
            true
        } else {
            self.error < 0.0 || (self.error == 0.0 && !self.row_first_on_tie)
        };
        if step_col {
            self.col += self.col_step;
            self.cols_left -= 1;
            self.error += self.dy;
        } else {
            self.row += self.row_step;
            self.rows_left -= 1;
            self.error -= self.dx;
        }
    }
}

impl Iterator for Raytracer {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let cell = (self.col, self.row);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for Raytracer {}

impl FusedIterator for Raytracer {}
