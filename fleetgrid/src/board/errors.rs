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

//! Errors used by [`BoardSetup`][crate::board::BoardSetup].

use std::fmt::{self, Debug};

use thiserror::Error;

use crate::ships::Placement;

/// Reason why a ship could not be placed at a given position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// Part of the ship would hang off the grid.
    #[error("insufficient space for the ship at the specified position")]
    OutOfBounds,
    /// One or more of the cells is covered by another ship.
    #[error("the requested position was already occupied")]
    AlreadyOccupied,
    /// The ship would touch another ship while gaps are required.
    #[error("the requested position touches another ship")]
    TooClose,
}

/// Error caused when attempting to place a ship in an illegal position. The board is
/// left unmodified.
#[derive(Error)]
#[error("could not place ship {id:?}: {reason}")]
pub struct PlaceError<I: Debug> {
    #[source]
    reason: CannotPlaceReason,
    id: I,
    placement: Placement,
}

impl<I: Debug> Debug for PlaceError<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<I: Debug> PlaceError<I> {
    /// Construct a placement error from a reason, ID, and placement.
    pub(crate) fn new(reason: CannotPlaceReason, id: I, placement: Placement) -> Self {
        Self {
            reason,
            id,
            placement,
        }
    }

    /// Get the reason placement was aborted.
    pub fn reason(&self) -> CannotPlaceReason {
        self.reason
    }

    /// The id of the ship that was rejected.
    pub fn id(&self) -> &I {
        &self.id
    }

    /// Get the [`Placement`] that was attempted.
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Extract the ID and Placement from this error.
    pub fn into_inner(self) -> (I, Placement) {
        (self.id, self.placement)
    }
}

/// Error returned when removing a ship that is not on the grid.
#[derive(Error)]
#[error("ship {id:?} is not on the grid")]
pub struct RemoveError<I: Debug> {
    id: I,
}

impl<I: Debug> Debug for RemoveError<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<I: Debug> RemoveError<I> {
    pub(crate) fn new(id: I) -> Self {
        Self { id }
    }

    /// The id that was not found.
    pub fn id(&self) -> &I {
        &self.id
    }

    /// Extract the ID from this error.
    pub fn into_id(self) -> I {
        self.id
    }
}
