// Copyright 2025 The Colloquy Authors
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

use colloquy_base::{ClientError, StoreError};
use thiserror::Error;

/// Errors specific to the timeline.
///
/// Duplicate events and rejected concurrent paginations are deliberately
/// not represented here: the former are silently skipped after the id
/// check, the latter surface as a benign
/// [`BackPaginationOutcome`](crate::BackPaginationOutcome) variant.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A fetch could not complete; nothing was merged.
    #[error("network request failed")]
    Network(#[from] ClientError),

    /// The room's event store detected conflicting content for a known
    /// event id; the merge step that hit it was aborted.
    #[error("timeline invariant violated")]
    InvariantViolation(#[from] StoreError),

    /// The timeline refers to a room the session doesn't know.
    #[error("room not found in session")]
    UnknownRoom,
}
