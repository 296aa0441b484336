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

//! Applying sync updates to a session.
//!
//! The external sync loop decodes server pushes into [`SyncUpdate`]s; the
//! session applies them here. Timeline events land in the rooms' pending
//! buffers — materialized timelines are fed separately by the presentation
//! layer from the events this module hands back.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    error::StoreError,
    event::Event,
    identifiers::OwnedRoomId,
    room::UnreadNotificationsCount,
    session::Session,
};

/// A decoded sync response.
#[derive(Clone, Debug, Default)]
pub struct SyncUpdate {
    /// The token to pass on the next sync request.
    pub next_batch: String,
    /// Updates for the rooms the account has joined.
    pub rooms: BTreeMap<OwnedRoomId, JoinedRoomUpdate>,
}

/// The sync update for a single joined room.
#[derive(Clone, Debug, Default)]
pub struct JoinedRoomUpdate {
    /// New timeline events, in the order the server emitted them.
    pub timeline: TimelineUpdate,
    /// State deltas since the last sync.
    pub state: Vec<Event>,
    /// Ephemeral data, e.g. typing notifications, keyed by type.
    pub ephemeral: BTreeMap<String, JsonValue>,
    /// Room account data, keyed by type.
    pub account_data: BTreeMap<String, JsonValue>,
    /// Unread notification counters, when the server reported them.
    pub unread_notifications: Option<UnreadNotificationsCount>,
}

/// The timeline portion of a room's sync update.
#[derive(Clone, Debug, Default)]
pub struct TimelineUpdate {
    /// The pushed events, oldest first.
    pub events: Vec<Event>,
    /// Whether the server elided events between this batch and the
    /// previously synced history.
    pub limited: bool,
    /// The token to back-paginate from, valid for the position before
    /// `events`.
    pub prev_batch: Option<String>,
}

impl Session {
    /// Apply a decoded sync update.
    ///
    /// State deltas are applied before timeline events so membership is
    /// resolvable for the new events; timeline events that are themselves
    /// state events update room state too. Returns the newly pending events
    /// per room, in arrival order, so the presentation layer can run them
    /// through materialized timelines.
    ///
    /// A [`StoreError`] aborts the merge of the room that produced it;
    /// rooms already applied remain applied.
    pub fn apply_sync_update(
        &mut self,
        update: SyncUpdate,
    ) -> Result<BTreeMap<OwnedRoomId, Vec<Event>>, StoreError> {
        let mut new_events = BTreeMap::new();

        for (room_id, room_update) in update.rooms {
            for event in room_update.state {
                self.apply_state_event(&room_id, event);
            }

            let state_updates: Vec<Event> = room_update
                .timeline
                .events
                .iter()
                .filter(|event| event.is_state())
                .cloned()
                .collect();
            for event in state_updates {
                self.apply_state_event(&room_id, event);
            }

            let room = self.get_or_create_room(&room_id);

            let mut added = Vec::new();
            for event in room_update.timeline.events {
                if room.receive_event(event.clone())? {
                    added.push(event);
                } else {
                    debug!(room_id = %room_id, event_id = %event.event_id, "skipping known event");
                }
            }

            // The first prev_batch seen for a room anchors backward
            // pagination; afterwards the token is owned by the pagination
            // controller. A limited sync is the exception: the server elided
            // events between this batch and known history, and the new token
            // is the only way to reach the gap.
            if room_update.timeline.limited || room.prev_batch().is_none() {
                if room_update.timeline.limited {
                    debug!(room_id = %room_id, "limited sync, resetting the backward token");
                }
                room.set_prev_batch(room_update.timeline.prev_batch);
            }

            for (event_type, content) in room_update.ephemeral {
                room.set_ephemeral(event_type, content);
            }
            for (event_type, content) in room_update.account_data {
                room.set_account_data(event_type, content);
            }
            if let Some(counts) = room_update.unread_notifications {
                room.set_unread_notifications(counts);
            }

            if !added.is_empty() {
                new_events.insert(room_id, added);
            }
        }

        self.next_batch = Some(update.next_batch);
        Ok(new_events)
    }
}
