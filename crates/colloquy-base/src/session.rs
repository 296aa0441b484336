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

//! User sessions.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    event::{event_type, Event},
    identifiers::{OwnedRoomId, OwnedUserId},
    room::Room,
    user::User,
};

/// A homeserver endpoint.
#[derive(Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// The host name of the server.
    pub hostname: String,
    /// The port the server listens on.
    pub port: u16,
}

impl Server {
    /// Create a server endpoint description.
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self { hostname: hostname.into(), port }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server").field("hostname", &self.hostname).field("port", &self.port).finish()
    }
}

/// A logged-in account and everything reachable through it.
///
/// The session exclusively owns all [`Room`]s and [`User`]s; every operation
/// that mutates them goes through `&mut Session`, which is what serializes
/// room mutation in the single-loop execution model — there is no ambient
/// state and no locking.
#[derive(Debug)]
pub struct Session {
    server: Server,
    user_id: OwnedUserId,
    access_token: String,

    /// Monotonically increasing counter for idempotent write requests.
    transaction_id: u64,

    rooms: HashMap<OwnedRoomId, Room>,
    users: HashMap<OwnedUserId, User>,

    /// The token to supply on the next sync request.
    pub next_batch: Option<String>,
}

impl Session {
    /// Create a session for a logged-in account.
    pub fn new(server: Server, user_id: OwnedUserId, access_token: impl Into<String>) -> Self {
        Self {
            server,
            user_id,
            access_token: access_token.into(),
            transaction_id: 0,
            rooms: HashMap::new(),
            users: HashMap::new(),
            next_batch: None,
        }
    }

    /// The homeserver this session talks to.
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// The id of the local account.
    pub fn user_id(&self) -> &OwnedUserId {
        &self.user_id
    }

    /// The auth token for this session.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The next transaction id for an idempotent write request.
    ///
    /// Monotonically increasing; a given id must never be reused for a
    /// different request.
    pub fn next_transaction_id(&mut self) -> u64 {
        let txn_id = self.transaction_id;
        self.transaction_id += 1;
        txn_id
    }

    /// Look up a room by id.
    pub fn room(&self, room_id: &OwnedRoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Look up a room by id, mutably.
    pub fn room_mut(&mut self, room_id: &OwnedRoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Look up a room by id, creating it on first reference.
    pub fn get_or_create_room(&mut self, room_id: &OwnedRoomId) -> &mut Room {
        self.rooms.entry(room_id.clone()).or_insert_with(|| Room::new(room_id.clone()))
    }

    /// All rooms known to this session.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Look up a user by id, creating it on first reference.
    pub fn get_or_create_user(&mut self, user_id: &OwnedUserId) -> &mut User {
        self.users.entry(user_id.clone()).or_insert_with(|| User::new(user_id.clone()))
    }

    /// Look up a user by id.
    pub fn user(&self, user_id: &OwnedUserId) -> Option<&User> {
        self.users.get(user_id)
    }

    /// The display name of a room, excluding the local account from the
    /// member-based fallback.
    pub fn room_display_name(&self, room_id: &OwnedRoomId) -> Option<String> {
        Some(self.rooms.get(room_id)?.display_name(&self.user_id))
    }

    /// Apply a state event to a room, creating the room on first reference.
    ///
    /// Membership changes invalidate every user's cached display name for
    /// that room: one member's rename can change another member's computed
    /// (disambiguated) name.
    pub fn apply_state_event(&mut self, room_id: &OwnedRoomId, event: Event) {
        let is_member_change = event.event_type == event_type::ROOM_MEMBER;

        self.get_or_create_room(room_id).update_state(event);

        if is_member_change {
            for user in self.users.values_mut() {
                user.invalidate_room_display_name(room_id);
            }
        }
    }

    /// The display name a user carries in a room, resolved through the
    /// session's per-user cache.
    pub fn user_display_name(&mut self, room_id: &OwnedRoomId, user_id: &OwnedUserId) -> String {
        let Some(room) = self.rooms.get(room_id) else {
            return user_id.as_str().to_owned();
        };
        // Split borrow: the user cache is mutated, the room is only read.
        let user =
            self.users.entry(user_id.clone()).or_insert_with(|| User::new(user_id.clone()));
        user.display_name_in(room)
    }
}
