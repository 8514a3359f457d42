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

//! Placement of linear Battleship fleets on rectangular grids.
//!
//! [`board`] holds the [`BoardSetup`], which checks and commits single placements:
//! bounds, overlap and, optionally, the rule that ships may not touch even
//! diagonally. [`generate`] fills a board at random with a backtracking search that
//! uses the free-space bookkeeping in [`gaps`] to only consider offsets where a ship
//! could still fit.
//!
//! ```
//! use fleetgrid::{generate_random_board, GridSize, PlacementSet, Ship};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let ships = [("carrier", Ship::new(5)), ("destroyer", Ship::new(2))];
//! let mut rng = StdRng::seed_from_u64(42);
//! let board =
//!     generate_random_board(GridSize::default(), &ships, &PlacementSet::new(), true, &mut rng)
//!         .unwrap();
//! assert_eq!(board.len(), 2);
//! ```

pub mod board;
pub mod gaps;
pub mod generate;
pub mod ships;

pub use crate::{
    board::{BoardSetup, CannotPlaceReason, Coordinate, GridSize, PlaceError, RemoveError},
    generate::{generate_random_board, GenerateError, Generator},
    ships::{Orientation, Placement, PlacementSet, Ship, ShipId},
};
