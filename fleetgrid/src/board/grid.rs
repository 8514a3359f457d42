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

//! Cell occupancy storage backing [`BoardSetup`][crate::board::BoardSetup].

use std::{
    borrow::Borrow,
    ops::{Index, IndexMut},
};

use crate::board::{Coordinate, GridSize};

/// Occupancy grid. Each cell holds the ID of the ship covering it, if any.
#[derive(Debug, Clone)]
pub(super) struct Grid<I> {
    /// Dimensions of this board.
    pub(super) size: GridSize,
    /// Cells that make up this board, in row-major order.
    pub(super) cells: Box<[Option<I>]>,
}

impl<I> Grid<I> {
    pub(super) fn new(size: GridSize) -> Self {
        let cells = (0..size.total_size()).map(|_| None).collect();
        Self { size, cells }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get<B: Borrow<Coordinate>>(&self, coord: B) -> Option<&Option<I>> {
        self.size
            .try_linearize(coord.borrow())
            .and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut<B: Borrow<Coordinate>>(&mut self, coord: B) -> Option<&mut Option<I>> {
        self.size
            .try_linearize(coord.borrow())
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Reset every cell to empty.
    pub(super) fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
    }
}

impl<I, B: Borrow<Coordinate>> Index<B> for Grid<I> {
    type Output = Option<I>;

    fn index(&self, coord: B) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl<I, B: Borrow<Coordinate>> IndexMut<B> for Grid<I> {
    fn index_mut(&mut self, coord: B) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
