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
use std::sync::Arc;

use crate::{
    board::GridSize,
    gaps::GapsInfo,
    ships::{Orientation, Placement},
};

/// Gaps for every line of one orientation: rows for [`Orientation::Horizontal`],
/// columns for [`Orientation::Vertical`].
///
/// Lines are shared copy-on-write, so cloning a ledger only copies the outer list and
/// a line is duplicated the first time a clone carves into it.
#[derive(Debug, Clone)]
pub struct Ledger {
    orientation: Orientation,
    lines: Vec<Arc<GapsInfo>>,
}

impl Ledger {
    /// A ledger for an empty grid.
    pub fn new(size: GridSize, orientation: Orientation) -> Self {
        let line = Arc::new(GapsInfo::new(size.line_len(orientation)));
        Self {
            orientation,
            lines: vec![line; size.line_count(orientation)],
        }
    }

    /// Orientation of the ships this ledger tracks room for.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gaps of the line at `index`. Panics if out of range.
    pub fn line(&self, index: usize) -> &GapsInfo {
        &self.lines[index]
    }

    /// Iterate the lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &GapsInfo> {
        self.lines.iter().map(|line| &**line)
    }

    /// Indexes of the lines whose largest gap can hold a ship of length `len`.
    pub fn candidate_lines(&self, len: usize) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.fits(len))
            .map(|(i, _)| i)
            .collect()
    }

    /// Total free cells across every line.
    pub fn free_cells(&self) -> usize {
        self.lines.iter().map(|line| line.free_cells()).sum()
    }

    /// Carve a placed ship out of this ledger.
    ///
    /// If the ship runs along this ledger's lines, its span is removed from its own
    /// line, widened by the margin on each end. Otherwise the ship crosses one line per
    /// cell of its length, plus the margin on each end, and the single cell at the
    /// ship's line is removed from each of them. The margin is one cell when gaps are
    /// required and zero otherwise. Cells that are already gone are skipped.
    pub fn carve(&mut self, placement: &Placement, require_gaps: bool) {
        let margin = if require_gaps { 1 } else { 0 };
        let len = placement.ship.len();
        let line = placement.line();
        let offset = placement.offset();
        if placement.orientation() == self.orientation {
            self.cut(line, offset, offset.saturating_sub(margin), offset + len - 1 + margin);
        } else {
            let first = offset.saturating_sub(margin);
            let last = (offset + len - 1 + margin).min(self.lines.len().saturating_sub(1));
            for crossed in first..=last {
                self.cut(crossed, line, line, line);
            }
        }
    }

    /// Remove `start..=end` from the gap of line `line` that holds `anchor`.
    fn cut(&mut self, line: usize, anchor: usize, start: usize, end: usize) {
        let info = match self.lines.get_mut(line) {
            Some(info) => info,
            None => return,
        };
        if let Some(gap_index) = info.find(anchor) {
            Arc::make_mut(info).split(gap_index, start, end);
        }
    }
}

/// The row and column ledgers of one board, always carved together.
#[derive(Debug, Clone)]
pub struct Ledgers {
    rows: Ledger,
    cols: Ledger,
}

impl Ledgers {
    /// Ledgers for an empty grid.
    pub fn new(size: GridSize) -> Self {
        Self {
            rows: Ledger::new(size, Orientation::Horizontal),
            cols: Ledger::new(size, Orientation::Vertical),
        }
    }

    /// Ledgers for a grid already holding `placements`.
    pub fn seed<'a, P>(size: GridSize, placements: P, require_gaps: bool) -> Self
    where
        P: IntoIterator<Item = &'a Placement>,
    {
        let mut ledgers = Self::new(size);
        for placement in placements {
            ledgers.carve(placement, require_gaps);
        }
        ledgers
    }

    /// Carve a placed ship out of both ledgers.
    pub fn carve(&mut self, placement: &Placement, require_gaps: bool) {
        self.rows.carve(placement, require_gaps);
        self.cols.carve(placement, require_gaps);
    }

    /// The ledger tracking room for ships of the given orientation.
    pub fn get(&self, orientation: Orientation) -> &Ledger {
        match orientation {
            Orientation::Horizontal => &self.rows,
            Orientation::Vertical => &self.cols,
        }
    }

    /// The ledger over rows.
    pub fn rows(&self) -> &Ledger {
        &self.rows
    }

    /// The ledger over columns.
    pub fn cols(&self) -> &Ledger {
        &self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board::Coordinate, gaps::Gap, ships::Ship};

    fn at(len: usize, row: usize, col: usize, orientation: Orientation) -> Placement {
        Placement::new(
            Ship::new(len).with_orientation(orientation),
            Coordinate::new(row, col),
        )
    }

    #[test]
    fn fresh_ledgers_span_lines() {
        let ledgers = Ledgers::new(GridSize::new(3, 5));
        assert_eq!(ledgers.rows().lines().count(), 3);
        assert_eq!(ledgers.cols().lines().count(), 5);
        assert_eq!(ledgers.rows().line(0).gaps(), &[Gap::new(0, 5)]);
        assert_eq!(ledgers.cols().line(0).gaps(), &[Gap::new(0, 3)]);
        assert_eq!(ledgers.rows().candidate_lines(5), vec![0, 1, 2]);
        assert!(ledgers.cols().candidate_lines(4).is_empty());
    }

    #[test]
    fn carve_with_gaps() {
        let mut ledgers = Ledgers::new(GridSize::new(5, 6));
        ledgers.carve(&at(3, 2, 1, Orientation::Horizontal), true);

        // Own row loses columns 0..=4.
        assert_eq!(ledgers.rows().line(2).gaps(), &[Gap::new(5, 1)]);
        assert_eq!(ledgers.rows().line(1).gaps(), &[Gap::new(0, 6)]);

        // Columns 0..=4 each lose row 2; column 5 is untouched.
        for col in 0..=4 {
            assert_eq!(
                ledgers.cols().line(col).gaps(),
                &[Gap::new(0, 2), Gap::new(3, 2)],
                "column {}",
                col
            );
        }
        assert_eq!(ledgers.cols().line(5).gaps(), &[Gap::new(0, 5)]);
    }

    #[test]
    fn carve_without_gaps() {
        let mut ledgers = Ledgers::new(GridSize::new(4, 4));
        ledgers.carve(&at(2, 1, 3, Orientation::Vertical), false);
        assert_eq!(ledgers.cols().line(3).gaps(), &[Gap::new(0, 1), Gap::new(3, 1)]);
        assert_eq!(ledgers.rows().line(1).gaps(), &[Gap::new(0, 3)]);
        assert_eq!(ledgers.rows().line(2).gaps(), &[Gap::new(0, 3)]);
        assert_eq!(ledgers.rows().line(0).gaps(), &[Gap::new(0, 4)]);
        assert_eq!(ledgers.rows().free_cells(), 14);
        assert_eq!(ledgers.cols().free_cells(), 14);
    }

    #[test]
    fn carve_at_edges_clamps() {
        let mut ledgers = Ledgers::new(GridSize::new(3, 3));
        ledgers.carve(&at(3, 0, 0, Orientation::Vertical), true);
        assert!(ledgers.cols().line(0).gaps().is_empty());
        assert_eq!(ledgers.cols().line(1).gaps(), &[Gap::new(0, 3)]);
        for row in 0..3 {
            assert_eq!(ledgers.rows().line(row).gaps(), &[Gap::new(1, 2)]);
        }
    }

    #[test]
    fn clones_do_not_share_mutations() {
        let base = Ledgers::new(GridSize::new(4, 4));
        let mut branch = base.clone();
        branch.carve(&at(4, 0, 0, Orientation::Horizontal), true);
        assert_eq!(base.rows().free_cells(), 16);
        assert_eq!(base.cols().free_cells(), 16);
        assert!(branch.rows().line(0).gaps().is_empty());
        assert_eq!(branch.rows().line(1).gaps(), &[Gap::new(0, 4)]);
    }

    #[test]
    fn seed_matches_sequential_carves() {
        let size = GridSize::new(6, 6);
        let ships = [
            at(3, 0, 0, Orientation::Horizontal),
            at(2, 2, 4, Orientation::Vertical),
        ];
        let seeded = Ledgers::seed(size, ships.iter(), true);
        let mut manual = Ledgers::new(size);
        for ship in ships.iter() {
            manual.carve(ship, true);
        }
        for (a, b) in seeded.rows().lines().zip(manual.rows().lines()) {
            assert_eq!(a, b);
        }
        for (a, b) in seeded.cols().lines().zip(manual.cols().lines()) {
            assert_eq!(a, b);
        }
    }
}
