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

//! Implements the setup phase of the board: placing, moving and removing ships.
use std::{borrow::Borrow, hash::Hash};

use rand::Rng;

use crate::{
    board::{CannotPlaceReason, Coordinate, Grid, GridSize, PlaceError, RemoveError},
    generate::{GenerateError, Generator},
    ships::{Placement, PlacementSet, Ship, ShipId},
};

/// Grid placement model. Owns the occupancy grid and the placement set, and is the
/// single source of truth for whether a placement is legal.
#[derive(Debug, Clone)]
pub struct BoardSetup<I: ShipId> {
    /// Grid of cells occupied by ships.
    grid: Grid<I>,

    /// Where each placed ship currently sits.
    placements: PlacementSet<I>,
}

impl<I: ShipId> BoardSetup<I> {
    /// Begin setup by constructing an empty board with the given [`GridSize`].
    pub fn new(size: GridSize) -> Self {
        Self {
            grid: Grid::new(size),
            placements: PlacementSet::new(),
        }
    }

    /// Build a board by placing each entry of `placements` in turn. Fails with the first
    /// placement that is not legal.
    pub fn from_placements<'a, P>(
        size: GridSize,
        placements: P,
        require_gaps: bool,
    ) -> Result<Self, PlaceError<I>>
    where
        I: 'a,
        P: IntoIterator<Item = (&'a I, &'a Placement)>,
    {
        let mut board = Self::new(size);
        for (id, placement) in placements {
            board.place(id.clone(), *placement, require_gaps)?;
        }
        Ok(board)
    }

    /// Get the [`GridSize`] of this board.
    pub fn size(&self) -> &GridSize {
        &self.grid.size
    }

    /// Returns true if the placement lies entirely within the grid.
    pub fn fits_bounds(&self, placement: &Placement) -> bool {
        self.grid.size.fits(placement)
    }

    /// Returns true if every cell the placement would cover is empty or covered only by
    /// `ignore`.
    pub fn has_no_overlap(&self, placement: &Placement, ignore: Option<&I>) -> bool {
        placement
            .footprint()
            .all(|coord| self.free_or_ignored(&coord, ignore))
    }

    /// All in-bounds cells bordering the placement, diagonals included.
    pub fn surrounding_cells(&self, placement: &Placement) -> Vec<Coordinate> {
        self.grid.size.surrounding(placement)
    }

    /// Returns true if the placement fits, does not overlap any ship other than
    /// `ignore`, and, when `require_gaps` is set, does not touch any such ship.
    pub fn can_place(&self, placement: &Placement, ignore: Option<&I>, require_gaps: bool) -> bool {
        self.check_placement(placement, ignore, require_gaps).is_ok()
    }

    /// Like [`can_place`][Self::can_place], but reports the first rule broken.
    pub fn check_placement(
        &self,
        placement: &Placement,
        ignore: Option<&I>,
        require_gaps: bool,
    ) -> Result<(), CannotPlaceReason> {
        if !self.fits_bounds(placement) {
            Err(CannotPlaceReason::OutOfBounds)
        } else if !self.has_no_overlap(placement, ignore) {
            Err(CannotPlaceReason::AlreadyOccupied)
        } else if require_gaps
            && !self
                .surrounding_cells(placement)
                .iter()
                .all(|coord| self.free_or_ignored(coord, ignore))
        {
            Err(CannotPlaceReason::TooClose)
        } else {
            Ok(())
        }
    }

    /// Place the ship with the given ID. If the ship is already on the board it is
    /// moved: its own footprint does not count as a collision and is cleared on
    /// success. On error the board is left untouched.
    pub fn place(
        &mut self,
        id: I,
        placement: Placement,
        require_gaps: bool,
    ) -> Result<(), PlaceError<I>> {
        if let Err(reason) = self.check_placement(&placement, Some(&id), require_gaps) {
            return Err(PlaceError::new(reason, id, placement));
        }
        if let Some(old) = self.placements.remove(&id) {
            for coord in old.footprint() {
                self.grid[coord] = None;
            }
        }
        // Already ensured that every position is valid and free.
        for coord in placement.footprint() {
            self.grid[coord] = Some(id.clone());
        }
        self.placements.insert(id, placement);
        Ok(())
    }

    /// Take the ship with the given ID off the board, returning where it was.
    pub fn remove(&mut self, id: &I) -> Result<Placement, RemoveError<I>> {
        match self.placements.remove(id) {
            Some(placement) => {
                for coord in placement.footprint() {
                    // Only legal placements are stored, so indexing is fine.
                    self.grid[coord] = None;
                }
                Ok(placement)
            }
            None => Err(RemoveError::new(id.clone())),
        }
    }

    /// Remove every ship from the board.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.placements.clear();
    }

    /// Get the placement of the ship with the given ID, if it is on the board.
    pub fn get<Q>(&self, id: &Q) -> Option<&Placement>
    where
        I: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.placements.get(id)
    }

    /// Get the ID of the ship covering the given cell. Returns `None` if the cell is
    /// empty or out of bounds.
    pub fn cell(&self, coord: Coordinate) -> Option<&I> {
        self.grid.get(coord).and_then(|cell| cell.as_ref())
    }

    /// All placements currently on the board.
    pub fn placements(&self) -> &PlacementSet<I> {
        &self.placements
    }

    /// Consume the board, keeping only its placements.
    pub fn into_placements(self) -> PlacementSet<I> {
        self.placements
    }

    /// Get an iterator over the board. The iterator's item is another iterator that
    /// iterates over a single row.
    pub fn iter_rows<'a>(
        &'a self,
    ) -> impl 'a + Iterator<Item = impl 'a + Iterator<Item = Option<&'a I>>> {
        let grid = &self.grid;
        grid.size
            .iter_coordinates()
            .map(move |row| row.map(move |coord| grid[coord].as_ref()))
    }

    /// Randomly place `pending` ships around the ships already on the board and commit
    /// the result. Ships already on the board keep their positions. On error the board
    /// is left untouched.
    pub fn randomize_rest<R: Rng + ?Sized>(
        &mut self,
        pending: &[(I, Ship)],
        require_gaps: bool,
        rng: &mut R,
    ) -> Result<(), GenerateError<I>> {
        let placements = Generator::new(self.grid.size)
            .require_gaps(require_gaps)
            .generate(pending, &self.placements, rng)?;
        self.commit(placements);
        Ok(())
    }

    /// Randomly place `pending` together with every ship already on the board, which
    /// may all move. On error the board is left untouched.
    pub fn randomize_all<R: Rng + ?Sized>(
        &mut self,
        pending: &[(I, Ship)],
        require_gaps: bool,
        rng: &mut R,
    ) -> Result<(), GenerateError<I>> {
        let placements = Generator::new(self.grid.size)
            .require_gaps(require_gaps)
            .regenerate(pending, &self.placements, rng)?;
        self.commit(placements);
        Ok(())
    }

    /// Replace the board contents with a placement set the generator already checked.
    fn commit(&mut self, placements: PlacementSet<I>) {
        self.grid.clear();
        for (id, placement) in placements.iter() {
            for coord in placement.footprint() {
                self.grid[coord] = Some(id.clone());
            }
        }
        self.placements = placements;
    }

    fn free_or_ignored(&self, coord: &Coordinate, ignore: Option<&I>) -> bool {
        match self.grid.get(coord) {
            Some(Some(occupant)) => ignore.map_or(false, |ignore| occupant == ignore),
            Some(None) => true,
            None => false,
        }
    }
}
