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
use std::fmt::Debug;

use thiserror::Error;

use crate::board::PlaceError;

/// Error returned when a board could not be generated. On any error, no placements
/// are returned.
#[derive(Debug, Error)]
pub enum GenerateError<I: Debug> {
    /// Every candidate was tried and no arrangement of the ships fits the grid.
    #[error("could not place ships: no arrangement fits the grid")]
    Infeasible,

    /// The interrupt flag was raised before the search finished.
    #[error("ship placement was interrupted")]
    Interrupted,

    /// One of the already placed ships is itself in an illegal position.
    #[error("already placed ship is invalid: {0}")]
    InvalidSeed(PlaceError<I>),
}
