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

//! Free-space bookkeeping used by the generator.
//!
//! Each grid line (a row or a column) keeps an ordered list of free intervals, called
//! gaps, plus a cached index of the largest one. Placing a ship carves cells out of the
//! gaps it touches, so the generator can list lines and offsets that may still hold a
//! ship of a given length without scanning the grid.

pub use self::ledger::{Ledger, Ledgers};

mod ledger;

/// A run of free cells along one line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Gap {
    /// Offset of the first free cell along the line.
    pub coord: usize,
    /// Number of free cells. Never zero for a gap stored in a [`GapsInfo`].
    pub size: usize,
}

impl Gap {
    /// Construct a gap of `size` cells starting at `coord`.
    pub fn new(coord: usize, size: usize) -> Self {
        Self { coord, size }
    }

    /// Offset one past the last cell of this gap.
    pub fn end(&self) -> usize {
        self.coord + self.size
    }

    /// Returns true if `offset` falls inside this gap.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.coord && offset < self.end()
    }

    /// Head offsets at which a ship of length `len` fits entirely inside this gap.
    pub fn offsets(&self, len: usize) -> std::ops::Range<usize> {
        if len == 0 || len > self.size {
            self.coord..self.coord
        } else {
            self.coord..self.end() - len + 1
        }
    }
}

/// The gaps of a single line, ordered by `coord`, with the largest one cached.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GapsInfo {
    gaps: Vec<Gap>,
    /// Index into `gaps` of the largest gap. Among equal sizes, the lowest index.
    largest: Option<usize>,
}

impl GapsInfo {
    /// A line of `len` cells that is entirely free.
    pub fn new(len: usize) -> Self {
        if len == 0 {
            Self {
                gaps: Vec::new(),
                largest: None,
            }
        } else {
            Self {
                gaps: vec![Gap::new(0, len)],
                largest: Some(0),
            }
        }
    }

    /// The gaps of this line in order.
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// The largest gap, if the line has any free cell.
    pub fn largest(&self) -> Option<&Gap> {
        self.largest.map(|i| &self.gaps[i])
    }

    /// Returns true if a ship of length `len` could fit somewhere on this line.
    pub fn fits(&self, len: usize) -> bool {
        self.largest().map_or(false, |gap| gap.size >= len)
    }

    /// Total free cells on this line.
    pub fn free_cells(&self) -> usize {
        self.gaps.iter().map(|gap| gap.size).sum()
    }

    /// Index of the gap that contains `offset`, if that cell is free.
    pub fn find(&self, offset: usize) -> Option<usize> {
        let idx = match self.gaps.binary_search_by(|gap| gap.coord.cmp(&offset)) {
            Ok(idx) => return Some(idx),
            Err(0) => return None,
            Err(idx) => idx - 1,
        };
        if self.gaps[idx].contains(offset) {
            Some(idx)
        } else {
            None
        }
    }

    /// Remove the cells `cut_start..=cut_end` from the gap at `gap_index`. The cut is
    /// clamped to that gap, which is replaced by whatever is left before and after the
    /// cut. Cuts that miss the gap entirely change nothing. Panics if `gap_index` is out
    /// of range.
    pub fn split(&mut self, gap_index: usize, cut_start: usize, cut_end: usize) {
        let gap = self.gaps[gap_index];
        if cut_start > cut_end || cut_end < gap.coord || cut_start >= gap.end() {
            return;
        }
        let lo = cut_start.max(gap.coord);
        let hi = cut_end.min(gap.end() - 1);

        let before = Gap::new(gap.coord, lo - gap.coord);
        let after = Gap::new(hi + 1, gap.end() - (hi + 1));
        let remainders: Vec<Gap> = [before, after]
            .iter()
            .copied()
            .filter(|rem| rem.size > 0)
            .collect();
        let inserted = remainders.len();
        self.gaps.splice(gap_index..=gap_index, remainders);

        self.largest = match self.largest {
            Some(largest) if largest == gap_index => self.find_largest(),
            Some(largest) if largest > gap_index => Some(largest + inserted - 1),
            other => other,
        };
    }

    /// Linear scan for the largest gap, keeping the first among equals.
    fn find_largest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, gap) in self.gaps.iter().enumerate() {
            match best {
                Some(b) if self.gaps[b].size >= gap.size => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_one_gap() {
        let info = GapsInfo::new(10);
        assert_eq!(info.gaps(), &[Gap::new(0, 10)]);
        assert_eq!(info.largest(), Some(&Gap::new(0, 10)));
        assert!(info.fits(10));
        assert!(!info.fits(11));
        assert!(GapsInfo::new(0).largest().is_none());
    }

    #[test]
    fn split_middle_leaves_two() {
        let mut info = GapsInfo::new(10);
        info.split(0, 3, 5);
        assert_eq!(info.gaps(), &[Gap::new(0, 3), Gap::new(6, 4)]);
        assert_eq!(info.largest(), Some(&Gap::new(6, 4)));
        assert_eq!(info.free_cells(), 7);
    }

    #[test]
    fn split_clamps_to_gap() {
        let mut info = GapsInfo::new(10);
        info.split(0, 4, 5);
        // The second gap starts at 6. A cut reaching back into the first is clamped.
        info.split(1, 3, 7);
        assert_eq!(info.gaps(), &[Gap::new(0, 4), Gap::new(8, 2)]);
        assert_eq!(info.largest(), Some(&Gap::new(0, 4)));
    }

    #[test]
    fn split_edges_drop_empty_remainders() {
        let mut info = GapsInfo::new(5);
        info.split(0, 0, 1);
        assert_eq!(info.gaps(), &[Gap::new(2, 3)]);
        info.split(0, 3, 9);
        assert_eq!(info.gaps(), &[Gap::new(2, 1)]);
        info.split(0, 0, 4);
        assert!(info.gaps().is_empty());
        assert!(info.largest().is_none());
        assert!(!info.fits(1));
    }

    #[test]
    fn split_outside_gap_is_noop() {
        let mut info = GapsInfo::new(10);
        info.split(0, 2, 2);
        let before = info.clone();
        info.split(1, 0, 1);
        assert_eq!(info, before);
    }

    #[test]
    fn largest_index_shifts_after_earlier_split() {
        let mut info = GapsInfo::new(20);
        info.split(0, 5, 5);
        assert_eq!(info.gaps(), &[Gap::new(0, 5), Gap::new(6, 14)]);
        assert_eq!(info.largest(), Some(&Gap::new(6, 14)));
        info.split(0, 2, 2);
        assert_eq!(
            info.gaps(),
            &[Gap::new(0, 2), Gap::new(3, 2), Gap::new(6, 14)]
        );
        assert_eq!(info.largest(), Some(&Gap::new(6, 14)));
    }

    #[test]
    fn ties_keep_first() {
        let mut info = GapsInfo::new(9);
        info.split(0, 4, 4);
        assert_eq!(info.largest(), Some(&Gap::new(0, 4)));
    }

    #[test]
    fn find_locates_containing_gap() {
        let mut info = GapsInfo::new(10);
        info.split(0, 3, 5);
        assert_eq!(info.find(0), Some(0));
        assert_eq!(info.find(2), Some(0));
        assert_eq!(info.find(4), None);
        assert_eq!(info.find(6), Some(1));
        assert_eq!(info.find(9), Some(1));
        assert_eq!(info.find(10), None);
    }

    #[test]
    fn offsets_within_gap() {
        let gap = Gap::new(3, 4);
        assert_eq!(gap.offsets(2), 3..6);
        assert_eq!(gap.offsets(4), 3..4);
        assert!(gap.offsets(5).is_empty());
    }
}
