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

//! Types used for defining ships and where they sit on the grid.
use std::{collections::HashMap, fmt::Debug, hash::Hash};

use enumflags2::BitFlags;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::board::Coordinate;

/// Trait for types that can be used as a Ship's ID within a single player's board.
/// IDs are treated as disposable and cheaply cloneable. If you need a complex ID type
/// that isn't cheap to clone, you may want to wrap it in `Rc` or `Arc`.
///
/// Auto-implemented for any type which implements `Debug`,`Clone`, `Eq`, and `Hash`.
pub trait ShipId: Debug + Clone + Eq + Hash {}
impl<T: Debug + Clone + Eq + Hash> ShipId for T {}

/// Direction a ship extends in from its head cell.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// The ship extends along increasing column index.
    Horizontal = 0b01,
    /// The ship extends along increasing row index.
    Vertical = 0b10,
}

impl Orientation {
    /// Both orientations, in declaration order.
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// Get the other orientation.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// List the orientations contained in the given set, in declaration order.
    pub(crate) fn members(set: BitFlags<Orientation>) -> Vec<Orientation> {
        Self::ALL
            .iter()
            .copied()
            .filter(|&orientation| set.contains(orientation))
            .collect()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Horizontal
    }
}

impl Distribution<Orientation> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Orientation {
        if rng.gen() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// A linear ship with a fixed length and a current orientation. A ship carries no
/// position; see [`Placement`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ship {
    len: usize,
    orientation: Orientation,
}

impl Ship {
    /// Construct a horizontal ship with the specified length. Panics if len is 0.
    pub fn new(len: usize) -> Self {
        match Self::try_new(len) {
            Some(ship) => ship,
            None => panic!("ship length must be nonzero"),
        }
    }

    /// Construct a horizontal ship with the specified length. Returns `None` if len is 0.
    pub fn try_new(len: usize) -> Option<Self> {
        if len == 0 {
            None
        } else {
            Some(Self {
                len,
                orientation: Orientation::default(),
            })
        }
    }

    /// Builder-style setter for the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Get the length of this ship.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Get the current orientation of this ship.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Flip this ship between horizontal and vertical.
    pub fn rotate(&mut self) {
        self.orientation = self.orientation.rotated();
    }

    /// Get an iterator over the cells this ship covers when its head is at `head`.
    /// Does not check bounds.
    pub fn footprint(&self, head: Coordinate) -> impl Iterator<Item = Coordinate> {
        let orientation = self.orientation;
        (0..self.len).map(move |i| match orientation {
            Orientation::Horizontal => Coordinate::new(head.row, head.col + i),
            Orientation::Vertical => Coordinate::new(head.row + i, head.col),
        })
    }
}

/// A ship anchored at its head cell: the left-most cell for horizontal ships and the
/// top-most for vertical ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Placement {
    /// Ship being placed, including its orientation.
    pub ship: Ship,
    /// Head cell of the ship.
    pub head: Coordinate,
}

impl Placement {
    /// Construct a placement of `ship` at `head`.
    pub fn new(ship: Ship, head: Coordinate) -> Self {
        Self { ship, head }
    }

    /// Shorthand for the placement's orientation.
    pub fn orientation(&self) -> Orientation {
        self.ship.orientation()
    }

    /// Get an iterator over the cells this placement covers.
    pub fn footprint(&self) -> impl Iterator<Item = Coordinate> {
        self.ship.footprint(self.head)
    }

    /// Index of the grid line the ship lies on: its row if horizontal, its column if
    /// vertical.
    pub(crate) fn line(&self) -> usize {
        match self.orientation() {
            Orientation::Horizontal => self.head.row,
            Orientation::Vertical => self.head.col,
        }
    }

    /// Offset of the head along the ship's own line.
    pub(crate) fn offset(&self) -> usize {
        match self.orientation() {
            Orientation::Horizontal => self.head.col,
            Orientation::Vertical => self.head.row,
        }
    }
}

/// Mapping of ship IDs to where each ship sits. Within a valid set, footprints never
/// overlap.
pub type PlacementSet<I> = HashMap<I, Placement>;
