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

//! The base component of the colloquy chat-timeline engine.
//!
//! This crate contains the stateful data model — [`User`], [`Room`],
//! [`Session`] — along with the sync-update application logic that feeds a
//! room's pending buffer, and the [`FetchClient`] trait that network
//! implementations plug into. The vocabulary types ([`Event`], the
//! identifiers) live in `colloquy-common` and are re-exported here; the
//! ordered timeline view lives in the `colloquy-timeline` crate.

#![warn(missing_debug_implementations)]

pub mod client;
mod error;
pub mod room;
pub mod session;
pub mod sync;
pub mod user;

pub use colloquy_common::{
    event::{self, Event, MilliSecondsSinceUnixEpoch},
    identifiers::{self, OwnedEventId, OwnedRoomId, OwnedUserId},
};

pub use self::{
    client::{Direction, FetchClient, PageRequest, PageResponse, RequestConfig},
    error::{ClientError, StoreError},
    room::{Room, UnreadNotificationsCount},
    session::{Server, Session},
    sync::{JoinedRoomUpdate, SyncUpdate, TimelineUpdate},
    user::User,
};
