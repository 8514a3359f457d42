// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Size of a rectangular board.
use std::borrow::Borrow;

use crate::{
    board::Coordinate,
    ships::{Orientation, Placement},
};

/// Rectangular grid dimensions. Immutable once constructed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GridSize {
    /// Number of rows. This cooresponds to the `row` [`Coordinate`].
    rows: usize,
    /// Number of columns. This cooresponds to the `col` [`Coordinate`].
    cols: usize,
}

impl GridSize {
    /// Create a new [`GridSize`] with the specified number of rows and columns.
    /// Panics if `rows * cols` exceeds `usize::max_value()` or if `rows` or `cols` is 0.
    pub fn new(rows: usize, cols: usize) -> Self {
        match Self::try_new(rows, cols) {
            Some(size) => size,
            None => {
                if rows == 0 || cols == 0 {
                    panic!("GridSize must be nonzero, got {}x{}", rows, cols);
                } else {
                    panic!(
                        "GridSize too large: {} * {} > {}",
                        rows,
                        cols,
                        usize::max_value()
                    );
                }
            }
        }
    }

    /// Create a new [`GridSize`] with the specified number of rows and columns.
    /// Returns `None` if `rows * cols` exceeds `usize::max_value()` or if `rows` or
    /// `cols` is 0.
    pub fn try_new(rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            rows.checked_mul(cols).map(|_| Self { rows, cols })
        }
    }

    /// Get the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn total_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of lines a ship with the given orientation can lie on.
    pub fn line_count(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Horizontal => self.rows,
            Orientation::Vertical => self.cols,
        }
    }

    /// Length of each line a ship with the given orientation can lie on.
    pub fn line_len(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Horizontal => self.cols,
            Orientation::Vertical => self.rows,
        }
    }

    /// Returns true if the coordinate lies inside the grid.
    pub fn contains<B: Borrow<Coordinate>>(&self, coord: B) -> bool {
        let c = coord.borrow();
        c.row < self.rows && c.col < self.cols
    }

    /// Convert a coordinate to a linear index.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Convert a linear index back into a [`Coordinate`].
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        Coordinate::new(idx / self.cols, idx % self.cols)
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let cols = self.cols;
        (0..self.rows).map(move |row| (0..cols).map(move |col| Coordinate { row, col }))
    }

    /// Returns true if every cell of the placement is inside the grid.
    pub fn fits(&self, placement: &Placement) -> bool {
        let len = placement.ship.len();
        let head = placement.head;
        match placement.orientation() {
            Orientation::Horizontal => {
                head.row < self.rows && head.col.checked_add(len).map_or(false, |end| end <= self.cols)
            }
            Orientation::Vertical => {
                head.col < self.cols && head.row.checked_add(len).map_or(false, |end| end <= self.rows)
            }
        }
    }

    /// All in-bounds cells that touch the placement's footprint, including diagonally,
    /// excluding the footprint itself. Returned in row-major order. The placement is
    /// expected to fit.
    pub fn surrounding(&self, placement: &Placement) -> Vec<Coordinate> {
        let len = placement.ship.len();
        let head = placement.head;
        let (last_row, last_col) = match placement.orientation() {
            Orientation::Horizontal => (head.row, head.col + len - 1),
            Orientation::Vertical => (head.row + len - 1, head.col),
        };
        let top = head.row.saturating_sub(1);
        let left = head.col.saturating_sub(1);
        let bottom = (last_row + 1).min(self.rows - 1);
        let right = (last_col + 1).min(self.cols - 1);

        let mut cells = Vec::with_capacity(2 * len + 6);
        for row in top..=bottom {
            for col in left..=right {
                let inside = row >= head.row && row <= last_row && col >= head.col && col <= last_col;
                if !inside {
                    cells.push(Coordinate::new(row, col));
                }
            }
        }
        cells
    }
}

impl Default for GridSize {
    /// Construct the default grid size, a 10x10 board.
    fn default() -> Self {
        Self { rows: 10, cols: 10 }
    }
}
