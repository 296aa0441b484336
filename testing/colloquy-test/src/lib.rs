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

//! Test helpers for the colloquy crates.

use colloquy_common::{OwnedRoomId, OwnedUserId};
use once_cell::sync::Lazy;

pub mod event_factory;

/// A default room id for tests that only need one room.
pub static DEFAULT_TEST_ROOM_ID: Lazy<OwnedRoomId> =
    Lazy::new(|| OwnedRoomId::from("!DefaultRoomId:server.name"));

/// A well-known test user.
pub static ALICE: Lazy<OwnedUserId> = Lazy::new(|| OwnedUserId::from("@alice:server.name"));

/// A well-known test user.
pub static BOB: Lazy<OwnedUserId> = Lazy::new(|| OwnedUserId::from("@bob:other.server"));

/// A well-known test user.
pub static CAROL: Lazy<OwnedUserId> = Lazy::new(|| OwnedUserId::from("@carol:other.server"));
