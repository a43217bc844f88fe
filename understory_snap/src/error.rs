// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

/// Errors reported when building a [`SnapIndex`](crate::SnapIndex).
///
/// Everything after construction is infallible: lookups outside the grid are
/// empty and degenerate geometry yields `None`.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The cell size must be finite and strictly positive.
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f64),
    /// The grid origin must have finite coordinates.
    #[error("grid origin must be finite, got ({x}, {y})")]
    InvalidOrigin {
        /// Origin x.
        x: f64,
        /// Origin y.
        y: f64,
    },
}

/// Result alias for fallible snap index operations.
pub type Result<T> = core::result::Result<T, Error>;
