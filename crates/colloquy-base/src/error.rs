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

use thiserror::Error;

use crate::identifiers::OwnedEventId;

/// Errors reported by a [`FetchClient`](crate::FetchClient) implementation.
///
/// These cover everything that can keep a request from completing; the
/// distinction matters mostly for user-visible status messages, the engine
/// treats them all the same way (surface, don't mutate).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    #[error("the request timed out")]
    Timeout,

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    #[error("the server returned status {0}")]
    Status(u16),
}

/// Errors reported by a room's event store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// An event was received whose id is already known but whose content
    /// differs from the stored event.
    ///
    /// This is a programming-defect signal rather than an expected runtime
    /// condition: accepting the event could corrupt timeline ordering, so
    /// the merge step that hit it must be aborted.
    #[error("event {event_id} was re-received with different content")]
    EventContentMismatch {
        /// The id carried by both the stored and the conflicting event.
        event_id: OwnedEventId,
    },
}
