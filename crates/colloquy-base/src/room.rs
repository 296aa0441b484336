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

//! Room state and history.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    error::StoreError,
    event::{event_type, Event, MembershipState},
    identifiers::{OwnedEventId, OwnedRoomId, OwnedUserId},
};

/// The number of unread notifications in a room, as reported by the server
/// on sync updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnreadNotificationsCount {
    /// The number of unread notifications that also triggered a highlight.
    pub highlight_count: u64,
    /// The total number of unread notifications.
    pub notification_count: u64,
}

/// A single conversation and its associated state and history.
///
/// A `Room` owns the canonical store of every event it has seen, the
/// permanent timeline (event ids in `(origin_server_ts, event_id)` order,
/// with the backward pagination token attached), and the pending buffer of
/// events that arrived over sync but have not been merged into the permanent
/// timeline yet. Rooms are created on first sync reference and retained for
/// the lifetime of the session.
#[derive(Debug)]
pub struct Room {
    room_id: OwnedRoomId,

    /// Canonical event store; also the id-membership index the duplicate
    /// check relies on.
    events: HashMap<OwnedEventId, Event>,

    /// The permanent timeline, ordered by `(origin_server_ts, event_id)`.
    timeline: Vec<OwnedEventId>,

    /// The token to supply when requesting the page of history before the
    /// oldest materialized event.
    prev_batch: Option<String>,

    /// Events received over sync that are not part of the permanent
    /// timeline yet, in arrival order.
    pending: Vec<OwnedEventId>,

    /// The latest state event per `(event_type, state_key)`.
    state: HashMap<String, IndexMap<String, Event>>,

    ephemeral: BTreeMap<String, JsonValue>,
    account_data: BTreeMap<String, JsonValue>,
    unread_notifications: UnreadNotificationsCount,

    /// Whether a backward pagination request is currently in flight.
    paginating: bool,
}

impl Room {
    /// Create an empty room.
    pub fn new(room_id: OwnedRoomId) -> Self {
        Self {
            room_id,
            events: HashMap::new(),
            timeline: Vec::new(),
            prev_batch: None,
            pending: Vec::new(),
            state: HashMap::new(),
            ephemeral: BTreeMap::new(),
            account_data: BTreeMap::new(),
            unread_notifications: UnreadNotificationsCount::default(),
            paginating: false,
        }
    }

    /// The unique id of this room.
    pub fn room_id(&self) -> &OwnedRoomId {
        &self.room_id
    }

    /// Whether an event with the given id is already known to this room.
    pub fn contains_event(&self, event_id: &OwnedEventId) -> bool {
        self.events.contains_key(event_id)
    }

    /// Look up a stored event by id.
    pub fn event(&self, event_id: &OwnedEventId) -> Option<&Event> {
        self.events.get(event_id)
    }

    /// Record an event that arrived over live sync.
    ///
    /// The event lands in the pending buffer; it is merged into the
    /// permanent timeline the next time the buffer is flushed. Returns
    /// whether the event was newly added — re-receiving a known id with
    /// identical content is a no-op.
    pub fn receive_event(&mut self, event: Event) -> Result<bool, StoreError> {
        let event_id = event.event_id.clone();
        let added = self.store_event(event)?;
        if added {
            self.pending.push(event_id);
        }
        Ok(added)
    }

    /// Record an event fetched through backward pagination.
    ///
    /// Unlike [`receive_event`](Self::receive_event), the event goes
    /// straight into the permanent timeline at its sorted position. Returns
    /// whether the event was newly added.
    pub fn merge_paginated_event(&mut self, event: Event) -> Result<bool, StoreError> {
        let event_id = event.event_id.clone();
        let added = self.store_event(event)?;
        if added {
            self.timeline_insert(event_id);
        }
        Ok(added)
    }

    fn store_event(&mut self, event: Event) -> Result<bool, StoreError> {
        match self.events.get(&event.event_id) {
            Some(existing) if *existing == event => Ok(false),
            Some(_) => {
                Err(StoreError::EventContentMismatch { event_id: event.event_id.clone() })
            }
            None => {
                self.events.insert(event.event_id.clone(), event);
                Ok(true)
            }
        }
    }

    fn timeline_insert(&mut self, event_id: OwnedEventId) {
        let key = {
            let event = &self.events[&event_id];
            (event.origin_server_ts, event.event_id.clone())
        };
        let idx = self.timeline.partition_point(|id| {
            let event = &self.events[id];
            (event.origin_server_ts, event.event_id.as_str()) < (key.0, key.1.as_str())
        });
        self.timeline.insert(idx, event_id);
    }

    /// Merge the pending buffer into the permanent timeline and clear it.
    ///
    /// Returns the flushed events in `(origin_server_ts, event_id)` order,
    /// oldest first.
    pub fn flush_pending(&mut self) -> Vec<Event> {
        let mut flushed: Vec<Event> =
            self.pending.drain(..).map(|id| self.events[&id].clone()).collect();
        flushed.sort_by(|a, b| {
            (a.origin_server_ts, a.event_id.as_str())
                .cmp(&(b.origin_server_ts, b.event_id.as_str()))
        });
        for event in &flushed {
            self.timeline_insert(event.event_id.clone());
        }
        flushed
    }

    /// The events of the permanent timeline, oldest first.
    pub fn timeline_events(&self) -> impl Iterator<Item = &Event> {
        self.timeline.iter().map(|id| &self.events[id])
    }

    /// The events in the pending buffer, in arrival order.
    pub fn pending_events(&self) -> impl Iterator<Item = &Event> {
        self.pending.iter().map(|id| &self.events[id])
    }

    /// The backward pagination token, if any history remains to fetch.
    pub fn prev_batch(&self) -> Option<&str> {
        self.prev_batch.as_deref()
    }

    /// Replace the backward pagination token.
    pub fn set_prev_batch(&mut self, token: Option<String>) {
        self.prev_batch = token;
    }

    /// Whether a backward pagination request is currently in flight.
    pub fn is_paginating(&self) -> bool {
        self.paginating
    }

    /// Set or clear the pagination-in-flight flag.
    pub fn set_paginating(&mut self, paginating: bool) {
        self.paginating = paginating;
    }

    /// Store a state event, replacing any previous event for the same
    /// `(event_type, state_key)` pair.
    ///
    /// This is a flat overwrite without timestamp comparison: fetched state
    /// describes "state as of this point", not a timeline position. Returns
    /// the replaced event, if any. Non-state events are ignored.
    pub fn update_state(&mut self, event: Event) -> Option<Event> {
        let Some(state_key) = event.state_key.clone() else {
            warn!(
                event_id = %event.event_id, event_type = event.event_type,
                "ignoring state update without a state key"
            );
            return None;
        };

        self.state.entry(event.event_type.clone()).or_default().insert(state_key, event)
    }

    /// Look up the latest state event for the given type and state key.
    pub fn state_event(&self, event_type: &str, state_key: &str) -> Option<&Event> {
        self.state.get(event_type)?.get(state_key)
    }

    /// The current members of this room, from membership state.
    pub fn members(&self) -> impl Iterator<Item = (OwnedUserId, MembershipState)> + '_ {
        self.state.get(event_type::ROOM_MEMBER).into_iter().flat_map(|members| {
            members.values().filter_map(|event| {
                let content = event.as_member()?;
                Some((OwnedUserId::from(event.state_key.as_deref()?), content.membership))
            })
        })
    }

    /// Compute the display name a member carries in this room.
    ///
    /// When another joined member shares the same display name, the name is
    /// qualified with the user id to keep it unambiguous. Returns `None` if
    /// the user has no membership state in this room.
    pub fn member_display_name(&self, user_id: &OwnedUserId) -> Option<String> {
        let member = self.state_event(event_type::ROOM_MEMBER, user_id.as_str())?;
        let Some(name) = member.as_member().and_then(|content| content.displayname) else {
            return Some(user_id.as_str().to_owned());
        };

        let ambiguous = self
            .state
            .get(event_type::ROOM_MEMBER)
            .map(|members| {
                members.values().any(|event| {
                    event.state_key.as_deref() != Some(user_id.as_str())
                        && event.as_member().is_some_and(|content| {
                            content.membership == MembershipState::Join
                                && content.displayname.as_deref() == Some(name.as_str())
                        })
                })
            })
            .unwrap_or(false);

        if ambiguous {
            Some(format!("{name} ({user_id})"))
        } else {
            Some(name)
        }
    }

    /// Compute the display name of the room itself.
    ///
    /// Resolution order: the explicit room name, the canonical alias, a
    /// name derived from the other members, the room id.
    pub fn display_name(&self, own_user_id: &OwnedUserId) -> String {
        if let Some(name) = self
            .state_event(event_type::ROOM_NAME, "")
            .and_then(|event| event.as_room_name())
            .map(|content| content.name)
            .filter(|name| !name.is_empty())
        {
            return name;
        }

        if let Some(alias) = self
            .state_event(event_type::ROOM_CANONICAL_ALIAS, "")
            .and_then(|event| event.content.get("alias"))
            .and_then(JsonValue::as_str)
            .filter(|alias| !alias.is_empty())
        {
            return alias.to_owned();
        }

        let mut heroes: Vec<String> = self
            .members()
            .filter(|(user_id, membership)| {
                user_id != own_user_id
                    && matches!(membership, MembershipState::Join | MembershipState::Invite)
            })
            .map(|(user_id, _)| {
                self.member_display_name(&user_id).unwrap_or_else(|| user_id.as_str().to_owned())
            })
            .collect();
        heroes.sort();

        match heroes.len() {
            0 => "Empty Room".to_owned(),
            1..=3 => heroes.join(", "),
            n => format!("{} and {} others", heroes[..3].join(", "), n - 3),
        }
    }

    /// The unread notification counters last reported by the server.
    pub fn unread_notifications(&self) -> UnreadNotificationsCount {
        self.unread_notifications
    }

    /// Replace the unread notification counters.
    pub fn set_unread_notifications(&mut self, counts: UnreadNotificationsCount) {
        self.unread_notifications = counts;
    }

    /// Overwrite a piece of ephemeral data, e.g. typing notifications.
    pub fn set_ephemeral(&mut self, event_type: String, content: JsonValue) {
        self.ephemeral.insert(event_type, content);
    }

    /// Look up a piece of ephemeral data by type.
    pub fn ephemeral(&self, event_type: &str) -> Option<&JsonValue> {
        self.ephemeral.get(event_type)
    }

    /// Overwrite a piece of room account data.
    pub fn set_account_data(&mut self, event_type: String, content: JsonValue) {
        self.account_data.insert(event_type, content);
    }

    /// Look up a piece of room account data by type.
    pub fn account_data(&self, event_type: &str) -> Option<&JsonValue> {
        self.account_data.get(event_type)
    }
}
