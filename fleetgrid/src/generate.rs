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

//! Random board generation.
//!
//! The generator runs a randomized depth-first search over the ships still to place,
//! longest first. For each ship it asks the [`Ledgers`] which lines, gaps and offsets
//! could still hold it, visits those candidates in shuffled order, and recurses on a
//! cloned board for the first one that is legal. A branch that cannot place every
//! remaining ship is dropped along with its clones and the next candidate is tried.
//! The search is exhaustive, so it only reports [`GenerateError::Infeasible`] when no
//! arrangement exists.
use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, Ordering},
};

use enumflags2::BitFlags;
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

use crate::{
    board::{BoardSetup, Coordinate, GridSize},
    gaps::{Gap, Ledgers},
    ships::{Orientation, Placement, PlacementSet, Ship, ShipId},
};

pub use self::errors::GenerateError;

mod errors;

/// Randomly place `ships_to_place` around `already_placed`, keeping the latter where
/// they are. Shorthand for a [`Generator`] with default orientations.
pub fn generate_random_board<I: ShipId, R: Rng + ?Sized>(
    size: GridSize,
    ships_to_place: &[(I, Ship)],
    already_placed: &PlacementSet<I>,
    require_gaps: bool,
    rng: &mut R,
) -> Result<PlacementSet<I>, GenerateError<I>> {
    Generator::new(size)
        .require_gaps(require_gaps)
        .generate(ships_to_place, already_placed, rng)
}

/// Configures and runs random board generation.
#[derive(Debug, Clone)]
pub struct Generator<'a> {
    /// Size of the board to fill.
    size: GridSize,

    /// Whether ships must not touch, diagonals included.
    require_gaps: bool,

    /// Orientations new ships may take.
    orientations: BitFlags<Orientation>,

    /// Checked before each ship; once set the search stops.
    interrupt: Option<&'a AtomicBool>,
}

/// Counters reported when a search ends.
#[derive(Debug, Default)]
struct SearchStats {
    /// Number of ships attempted, across all branches.
    nodes: usize,
    /// Number of committed candidates later abandoned.
    backtracks: usize,
}

impl<'a> Generator<'a> {
    /// A generator for the given size that requires gaps and allows both orientations.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            require_gaps: true,
            orientations: BitFlags::all(),
            interrupt: None,
        }
    }

    /// Set whether ships must be separated by at least one empty cell.
    pub fn require_gaps(mut self, require_gaps: bool) -> Self {
        self.require_gaps = require_gaps;
        self
    }

    /// Restrict the orientations newly placed ships may take. Ships already on the
    /// board keep theirs.
    pub fn orientations<B: Into<BitFlags<Orientation>>>(mut self, orientations: B) -> Self {
        self.orientations = orientations.into();
        self
    }

    /// Abort with [`GenerateError::Interrupted`] once `flag` becomes true.
    pub fn interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Place `ships_to_place` without moving any ship in `already_placed`. Ships that
    /// are in both are left where they are. If the same ID appears more than once in
    /// `ships_to_place`, only its first entry is used.
    pub fn generate<I: ShipId, R: Rng + ?Sized>(
        &self,
        ships_to_place: &[(I, Ship)],
        already_placed: &PlacementSet<I>,
        rng: &mut R,
    ) -> Result<PlacementSet<I>, GenerateError<I>> {
        let mut board = BoardSetup::new(self.size);
        for (id, placement) in ordered(already_placed) {
            board
                .place(id.clone(), *placement, self.require_gaps)
                .map_err(GenerateError::InvalidSeed)?;
        }
        let ledgers = Ledgers::seed(self.size, already_placed.values(), self.require_gaps);

        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(ships_to_place.len());
        for (id, ship) in ships_to_place {
            if !already_placed.contains_key(id) && seen.insert(id) {
                pending.push((id.clone(), *ship));
            }
        }
        // Longer ships are harder to fit late, so place them first. The sort is stable
        // so equal lengths keep the caller's order.
        pending.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()));

        debug!(
            rows = self.size.rows(),
            cols = self.size.cols(),
            seeded = already_placed.len(),
            pending = pending.len(),
            require_gaps = self.require_gaps,
            "generating board"
        );
        let mut stats = SearchStats::default();
        let result = self.search(&board, &ledgers, &pending, rng, &mut stats);
        match &result {
            Ok(Some(_)) => debug!(
                nodes = stats.nodes,
                backtracks = stats.backtracks,
                "board generated"
            ),
            Ok(None) => debug!(
                nodes = stats.nodes,
                backtracks = stats.backtracks,
                "no arrangement exists"
            ),
            Err(_) => debug!(nodes = stats.nodes, "generation interrupted"),
        }
        result?.ok_or(GenerateError::Infeasible)
    }

    /// Place `ships_to_place` and every ship in `already_placed` on an empty board.
    /// Ships already placed lose their positions and are searched like the rest. An
    /// ID in both takes its ship from `ships_to_place`.
    pub fn regenerate<I: ShipId, R: Rng + ?Sized>(
        &self,
        ships_to_place: &[(I, Ship)],
        already_placed: &PlacementSet<I>,
        rng: &mut R,
    ) -> Result<PlacementSet<I>, GenerateError<I>> {
        let fleet: Vec<(I, Ship)> = ships_to_place
            .iter()
            .cloned()
            .chain(
                ordered(already_placed)
                    .into_iter()
                    .map(|(id, placement)| (id.clone(), placement.ship)),
            )
            .collect();
        self.generate(&fleet, &PlacementSet::new(), rng)
    }

    /// Place `pending[0]` on `board` and recurse on the rest. Returns `Ok(None)` when
    /// no candidate leads to a full placement.
    fn search<I: ShipId, R: Rng + ?Sized>(
        &self,
        board: &BoardSetup<I>,
        ledgers: &Ledgers,
        pending: &[(I, Ship)],
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<Option<PlacementSet<I>>, GenerateError<I>> {
        let ((id, ship), rest) = match pending.split_first() {
            Some(next) => next,
            None => return Ok(Some(board.placements().clone())),
        };
        if self
            .interrupt
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
        {
            return Err(GenerateError::Interrupted);
        }
        stats.nodes += 1;
        let len = ship.len();

        let mut orientations = Orientation::members(self.orientations);
        orientations.shuffle(rng);
        for orientation in orientations {
            let ship = ship.with_orientation(orientation);
            let ledger = ledgers.get(orientation);

            let mut lines = ledger.candidate_lines(len);
            lines.shuffle(rng);
            for line in lines {
                let mut gaps: Vec<Gap> = ledger
                    .line(line)
                    .gaps()
                    .iter()
                    .filter(|gap| gap.size >= len)
                    .copied()
                    .collect();
                gaps.shuffle(rng);
                for gap in gaps {
                    let mut offsets: Vec<usize> = gap.offsets(len).collect();
                    offsets.shuffle(rng);
                    for offset in offsets {
                        let head = match orientation {
                            Orientation::Horizontal => Coordinate::new(line, offset),
                            Orientation::Vertical => Coordinate::new(offset, line),
                        };
                        let placement = Placement::new(ship, head);
                        // The ledger only drops cells that are certainly unusable, so
                        // every candidate still has to pass the board's own check.
                        let mut next_board = board.clone();
                        if let Err(err) =
                            next_board.place(id.clone(), placement, self.require_gaps)
                        {
                            trace!(%err, "candidate rejected");
                            continue;
                        }
                        let mut next_ledgers = ledgers.clone();
                        next_ledgers.carve(&placement, self.require_gaps);
                        trace!(
                            ship = ?id,
                            row = head.row,
                            col = head.col,
                            ?orientation,
                            remaining = rest.len(),
                            "placed"
                        );

                        if let Some(found) =
                            self.search(&next_board, &next_ledgers, rest, rng, stats)?
                        {
                            return Ok(Some(found));
                        }
                        stats.backtracks += 1;
                    }
                }
            }
        }
        Ok(None)
    }
}

/// Entries of `placements` in a fixed order: by head cell, then length, then
/// orientation, then the ID's debug text.
fn ordered<I: ShipId>(placements: &PlacementSet<I>) -> Vec<(&I, &Placement)> {
    let mut entries: Vec<_> = placements.iter().collect();
    entries.sort_by_cached_key(|(id, placement)| {
        (
            placement.head,
            placement.ship.len(),
            placement.orientation() as u8,
            format!("{:?}", id),
        )
    });
    entries
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::board::CannotPlaceReason;

    fn fleet(lens: &[usize]) -> Vec<(usize, Ship)> {
        lens.iter()
            .enumerate()
            .map(|(id, &len)| (id, Ship::new(len)))
            .collect()
    }

    /// Checks bounds, overlap and, if requested, adjacency of every pair of ships.
    fn valid(size: GridSize, set: &PlacementSet<usize>, require_gaps: bool) -> bool {
        let cells: Vec<(usize, Coordinate)> = set
            .iter()
            .flat_map(|(&id, p)| p.footprint().map(move |c| (id, c)))
            .collect();
        if !cells.iter().all(|(_, c)| size.contains(c)) {
            return false;
        }
        for (i, (a_id, a)) in cells.iter().enumerate() {
            for (b_id, b) in cells[i + 1..].iter() {
                if a == b {
                    return false;
                }
                let touching = a.row.max(b.row) - a.row.min(b.row) <= 1
                    && a.col.max(b.col) - a.col.min(b.col) <= 1;
                if require_gaps && a_id != b_id && touching {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn standard_fleet_with_gaps() {
        let size = GridSize::default();
        let mut rng = StdRng::seed_from_u64(7);
        let ships = fleet(&[5, 4, 3, 3, 2]);
        let set = generate_random_board(size, &ships, &PlacementSet::new(), true, &mut rng)
            .unwrap();
        assert_eq!(set.len(), 5);
        assert!(valid(size, &set, true));
        for (id, ship) in ships.iter() {
            assert_eq!(set[id].ship.len(), ship.len());
        }
    }

    #[test]
    fn same_seed_same_board() {
        let size = GridSize::default();
        let ships = fleet(&[5, 4, 3, 3, 2]);
        let a = generate_random_board(
            size,
            &ships,
            &PlacementSet::new(),
            true,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        let b = generate_random_board(
            size,
            &ships,
            &PlacementSet::new(),
            true,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn exact_fit_found() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = generate_random_board(
            GridSize::new(1, 5),
            &fleet(&[5]),
            &PlacementSet::new(),
            true,
            &mut rng,
        )
        .unwrap();
        assert_eq!(set[&0].head, Coordinate::new(0, 0));
        assert_eq!(set[&0].orientation(), Orientation::Horizontal);
    }

    #[test]
    fn too_long_is_infeasible() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_random_board(
            GridSize::new(1, 4),
            &fleet(&[5]),
            &PlacementSet::new(),
            true,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Infeasible));
    }

    #[test]
    fn gaps_rule_decides_feasibility() {
        let size = GridSize::new(3, 3);
        let ships = fleet(&[2, 2, 2]);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let err = generate_random_board(size, &ships, &PlacementSet::new(), true, &mut rng)
                .unwrap_err();
            assert!(matches!(err, GenerateError::Infeasible));

            let set = generate_random_board(size, &ships, &PlacementSet::new(), false, &mut rng)
                .unwrap();
            assert!(valid(size, &set, false));
        }
    }

    #[test]
    fn seeded_ship_stays_put() {
        let size = GridSize::default();
        let mut placed = PlacementSet::new();
        let fixed = Placement::new(
            Ship::new(4).with_orientation(Orientation::Vertical),
            Coordinate::new(3, 6),
        );
        placed.insert(0, fixed);
        let ships = fleet(&[4, 5, 3, 3, 2]);
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let set = generate_random_board(size, &ships, &placed, true, &mut rng).unwrap();
            assert_eq!(set.len(), 5);
            assert_eq!(set[&0], fixed);
            assert!(valid(size, &set, true));
        }
    }

    #[test]
    fn invalid_seed_reported() {
        let size = GridSize::new(3, 3);
        let mut placed = PlacementSet::new();
        placed.insert(0, Placement::new(Ship::new(4), Coordinate::new(0, 0)));
        let mut rng = StdRng::seed_from_u64(0);
        match generate_random_board(size, &fleet(&[1]), &placed, true, &mut rng) {
            Err(GenerateError::InvalidSeed(err)) => {
                assert_eq!(err.reason(), CannotPlaceReason::OutOfBounds)
            }
            other => panic!("expected invalid seed, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_ids_placed_once() {
        let size = GridSize::new(4, 4);
        let ships = vec![(0, Ship::new(2)), (0, Ship::new(3)), (1, Ship::new(1))];
        let mut rng = StdRng::seed_from_u64(5);
        let set = generate_random_board(size, &ships, &PlacementSet::new(), false, &mut rng)
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[&0].ship.len(), 2);
    }

    #[test]
    fn restricted_orientations() {
        let size = GridSize::new(6, 6);
        let mut rng = StdRng::seed_from_u64(21);
        let set = Generator::new(size)
            .orientations(Orientation::Vertical)
            .generate(&fleet(&[3, 3, 2]), &PlacementSet::new(), &mut rng)
            .unwrap();
        assert!(set
            .values()
            .all(|p| p.orientation() == Orientation::Vertical));

        let err = Generator::new(size)
            .orientations(BitFlags::empty())
            .generate(&fleet(&[1]), &PlacementSet::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenerateError::Infeasible));
    }

    #[test]
    fn interrupt_stops_search() {
        let flag = AtomicBool::new(true);
        let mut rng = StdRng::seed_from_u64(0);
        let err = Generator::new(GridSize::default())
            .interrupt(&flag)
            .generate(&fleet(&[2]), &PlacementSet::new(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GenerateError::Interrupted));
    }

    #[test]
    fn regenerate_moves_everything() {
        let size = GridSize::new(1, 5);
        let mut rng = StdRng::seed_from_u64(8);
        let set = Generator::new(size)
            .regenerate(&fleet(&[5]), &PlacementSet::new(), &mut rng)
            .unwrap();
        assert_eq!(set[&0].head, Coordinate::new(0, 0));
    }

    #[test]
    fn regenerate_replaces_placed_ships() {
        // In the middle row, ship 9 touches every row a length-4 ship fits in, so
        // it has to move for ship 0 to fit.
        let size = GridSize::new(3, 4);
        let mut placed = PlacementSet::new();
        placed.insert(9, Placement::new(Ship::new(1), Coordinate::new(1, 1)));
        let ships = [(0, Ship::new(4))];

        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_random_board(size, &ships, &placed, true, &mut rng).unwrap_err();
        assert!(matches!(err, GenerateError::Infeasible));

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let set = Generator::new(size)
                .regenerate(&ships, &placed, &mut rng)
                .unwrap();
            assert_eq!(set.len(), 2);
            assert_eq!(set[&9].ship.len(), 1);
            assert_ne!(set[&9].head.row, 1);
            assert_eq!(set[&0].ship.len(), 4);
            assert!(valid(size, &set, true));
        }
    }

    #[test]
    fn regenerate_prefers_listed_ship() {
        let size = GridSize::new(4, 4);
        let mut placed = PlacementSet::new();
        placed.insert(0, Placement::new(Ship::new(1), Coordinate::new(0, 0)));
        let mut rng = StdRng::seed_from_u64(2);
        let set = Generator::new(size)
            .regenerate(&fleet(&[3]), &placed, &mut rng)
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[&0].ship.len(), 3);
    }

    #[test]
    fn conflicting_seeds_report_same_ship() {
        let size = GridSize::new(4, 4);
        for _ in 0..20 {
            // Each map gets fresh hasher keys, so iteration order varies.
            let mut placed = PlacementSet::new();
            placed.insert(1, Placement::new(Ship::new(3), Coordinate::new(0, 0)));
            placed.insert(2, Placement::new(Ship::new(2), Coordinate::new(0, 1)));
            let mut rng = StdRng::seed_from_u64(0);
            match generate_random_board(size, &fleet(&[1]), &placed, true, &mut rng) {
                Err(GenerateError::InvalidSeed(err)) => {
                    assert_eq!(err.id(), &2);
                    assert_eq!(err.reason(), CannotPlaceReason::AlreadyOccupied);
                }
                other => panic!("expected invalid seed, got {:?}", other),
            }
        }
    }

    quickcheck! {
        fn random_fleets_are_valid(seed: u64, lens: Vec<u8>, require_gaps: bool) -> bool {
            let size = GridSize::new(8, 8);
            // Keep the fleet small enough that it always fits.
            let lens: Vec<usize> = lens.iter().take(4).map(|&l| (l % 4) as usize + 1).collect();
            let ships = fleet(&lens);
            let mut rng = StdRng::seed_from_u64(seed);
            match generate_random_board(size, &ships, &PlacementSet::new(), require_gaps, &mut rng) {
                Ok(set) => set.len() == ships.len() && valid(size, &set, require_gaps),
                Err(_) => false,
            }
        }

        fn ledger_conserves_cells(seed: u64) -> bool {
            let size = GridSize::default();
            let ships = fleet(&[5, 4, 3, 3, 2]);
            let mut rng = StdRng::seed_from_u64(seed);
            let set = match generate_random_board(size, &ships, &PlacementSet::new(), true, &mut rng) {
                Ok(set) => set,
                Err(_) => return false,
            };
            let occupied: usize = set.values().map(|p| p.ship.len()).sum();
            let ledgers = Ledgers::seed(size, set.values(), false);
            ledgers.rows().free_cells() + occupied == size.total_size()
                && ledgers.cols().free_cells() + occupied == size.total_size()
        }
    }
}
