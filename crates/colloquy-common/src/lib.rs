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

//! Vocabulary types shared across the colloquy crates: identifiers and the
//! event data model.
//!
//! Keeping these in their own leaf crate lets the test-helper crate build
//! events without depending on the room and session machinery.

#![warn(missing_debug_implementations)]

pub mod event;
pub mod identifiers;

pub use self::{
    event::{Event, MilliSecondsSinceUnixEpoch},
    identifiers::{OwnedEventId, OwnedRoomId, OwnedUserId},
};
