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

//! Users and their display names.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value as JsonValue;

use crate::{
    identifiers::{OwnedRoomId, OwnedUserId},
    room::Room,
};

/// A user known to the session, shared across all rooms.
///
/// There is one `User` per distinct user id; the [`Session`] owns them. The
/// per-room display-name cache is filled lazily on first resolution of the
/// user in a room and invalidated whenever membership state changes the
/// computed name.
///
/// [`Session`]: crate::Session
#[derive(Debug)]
pub struct User {
    user_id: OwnedUserId,

    /// The global profile display name, independent of any room.
    pub displayname: Option<String>,

    /// Opaque per-user account data.
    pub account_data: BTreeMap<String, JsonValue>,

    room_display_names: HashMap<OwnedRoomId, String>,
}

impl User {
    /// Create a user with no profile data.
    pub fn new(user_id: OwnedUserId) -> Self {
        Self {
            user_id,
            displayname: None,
            account_data: BTreeMap::new(),
            room_display_names: HashMap::new(),
        }
    }

    /// The unique, stable id of this user.
    pub fn user_id(&self) -> &OwnedUserId {
        &self.user_id
    }

    /// The display name this user carries in the given room.
    ///
    /// Computed from the room's membership state (with ambiguity
    /// qualification), falling back to the global profile name and then the
    /// user id. The result is cached per room until membership state
    /// invalidates it.
    pub fn display_name_in(&mut self, room: &Room) -> String {
        if let Some(name) = self.room_display_names.get(room.room_id()) {
            return name.clone();
        }

        let name = room
            .member_display_name(&self.user_id)
            .or_else(|| self.displayname.clone())
            .unwrap_or_else(|| self.user_id.as_str().to_owned());
        self.room_display_names.insert(room.room_id().clone(), name.clone());
        name
    }

    /// Drop the cached display name for the given room.
    pub fn invalidate_room_display_name(&mut self, room_id: &OwnedRoomId) {
        self.room_display_names.remove(room_id);
    }
}
