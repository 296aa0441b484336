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

//! A factory for events, for testing purposes.

use std::sync::atomic::{AtomicU64, Ordering::SeqCst};

use colloquy_common::{
    event::event_type, Event, MilliSecondsSinceUnixEpoch, OwnedEventId, OwnedUserId,
};
use serde_json::{json, Value as JsonValue};

use crate::ALICE;

/// Creates events for test purposes, with sensible unique defaults for
/// everything a test does not care about.
///
/// Event ids and timestamps are allocated from per-factory counters, so
/// events built from the same factory never collide and are ordered in
/// creation order unless a test overrides them.
#[derive(Debug)]
pub struct EventFactory {
    sender: Option<OwnedUserId>,
    next_ts: AtomicU64,
    next_id: AtomicU64,
}

impl EventFactory {
    /// Create a factory with the default sender [`ALICE`].
    pub fn new() -> Self {
        Self { sender: None, next_ts: AtomicU64::new(1_700_000_000_000), next_id: AtomicU64::new(0) }
    }

    /// Set the default sender for events built by this factory.
    pub fn sender(mut self, sender: &OwnedUserId) -> Self {
        self.sender = Some(sender.clone());
        self
    }

    fn builder(&self, event_type: &str, content: JsonValue) -> EventBuilder {
        EventBuilder {
            event_type: event_type.to_owned(),
            content,
            state_key: None,
            sender: self.sender.clone().unwrap_or_else(|| ALICE.clone()),
            origin_server_ts: self.next_ts.fetch_add(1000, SeqCst),
            event_id: format!("$event_{}", self.next_id.fetch_add(1, SeqCst)),
        }
    }

    /// An `m.room.message` text event.
    pub fn text_msg(&self, body: impl Into<String>) -> EventBuilder {
        self.builder(
            event_type::ROOM_MESSAGE,
            json!({ "msgtype": "m.text", "body": body.into() }),
        )
    }

    /// An `m.room.member` join event for the given user, sent by that user.
    pub fn member(&self, user_id: &OwnedUserId) -> EventBuilder {
        let mut builder =
            self.builder(event_type::ROOM_MEMBER, json!({ "membership": "join" }));
        builder.sender = user_id.clone();
        builder.state_key = Some(user_id.as_str().to_owned());
        builder
    }

    /// An `m.room.name` state event.
    pub fn room_name(&self, name: impl Into<String>) -> EventBuilder {
        let mut builder =
            self.builder(event_type::ROOM_NAME, json!({ "name": name.into() }));
        builder.state_key = Some(String::new());
        builder
    }

    /// An event of an arbitrary type with the given content.
    pub fn event(&self, event_type: &str, content: JsonValue) -> EventBuilder {
        self.builder(event_type, content)
    }
}

impl Default for EventFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// An event under construction; see [`EventFactory`].
#[derive(Debug)]
pub struct EventBuilder {
    event_type: String,
    content: JsonValue,
    state_key: Option<String>,
    sender: OwnedUserId,
    origin_server_ts: u64,
    event_id: String,
}

impl EventBuilder {
    /// Override the sender of this event.
    pub fn sender(mut self, sender: &OwnedUserId) -> Self {
        self.sender = sender.clone();
        self
    }

    /// Override the event id of this event.
    pub fn event_id(mut self, event_id: &str) -> Self {
        self.event_id = event_id.to_owned();
        self
    }

    /// Override the origin-server timestamp of this event, in milliseconds.
    pub fn server_ts(mut self, ts: u64) -> Self {
        self.origin_server_ts = ts;
        self
    }

    /// Override the state key of this event.
    pub fn state_key(mut self, state_key: &str) -> Self {
        self.state_key = Some(state_key.to_owned());
        self
    }

    /// Set the membership of an `m.room.member` event.
    pub fn membership(mut self, membership: &str) -> Self {
        self.content["membership"] = membership.into();
        self
    }

    /// Set the display name of an `m.room.member` event.
    pub fn displayname(mut self, displayname: &str) -> Self {
        self.content["displayname"] = displayname.into();
        self
    }

    /// Build the event.
    pub fn into_event(self) -> Event {
        Event {
            event_id: OwnedEventId::from(self.event_id),
            sender: self.sender,
            origin_server_ts: MilliSecondsSinceUnixEpoch(self.origin_server_ts),
            event_type: self.event_type,
            state_key: self.state_key,
            content: self.content,
            unsigned: None,
        }
    }
}
