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

//! Room events.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identifiers::{OwnedEventId, OwnedUserId};

/// Well-known event type tags.
pub mod event_type {
    /// A text message in a room.
    pub const ROOM_MESSAGE: &str = "m.room.message";
    /// A membership change; the state key is the affected user id.
    pub const ROOM_MEMBER: &str = "m.room.member";
    /// The explicit, human-readable room name.
    pub const ROOM_NAME: &str = "m.room.name";
    /// The canonical alias of a room.
    pub const ROOM_CANONICAL_ALIAS: &str = "m.room.canonical_alias";
    /// The room topic.
    pub const ROOM_TOPIC: &str = "m.room.topic";
}

/// A timestamp in milliseconds since the UNIX epoch, as assigned by the
/// origin server of an event.
///
/// Only monotonic in aggregate; two events may carry the same timestamp, and
/// timestamps are not guaranteed to increase across federated servers. The
/// timeline breaks ties by event id.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MilliSecondsSinceUnixEpoch(pub u64);

/// An immutable, timestamped record in a room's history.
///
/// The content payload is kept opaque; its shape depends on
/// [`event_type`](Self::event_type) and is interpreted lazily through the
/// typed accessors. An unexpected content shape for a known type is not an
/// error: the accessors return `None` and rendering falls back to a
/// placeholder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The unique id of this event within its room.
    pub event_id: OwnedEventId,

    /// The user that sent this event.
    pub sender: OwnedUserId,

    /// The server-assigned timestamp of this event.
    pub origin_server_ts: MilliSecondsSinceUnixEpoch,

    /// The type of this event, e.g. `m.room.message`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// The state key, present iff this is a state event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,

    /// The opaque content payload.
    #[serde(default)]
    pub content: JsonValue,

    /// Additional metadata the server attached to the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsigned: Option<JsonValue>,
}

impl Event {
    /// Whether this is a state event.
    pub fn is_state(&self) -> bool {
        self.state_key.is_some()
    }

    /// Whether this event is ordered strictly before `other` in timeline
    /// order, i.e. by `(origin_server_ts, event_id)`.
    pub fn precedes(&self, other: &Event) -> bool {
        (self.origin_server_ts, &self.event_id) < (other.origin_server_ts, &other.event_id)
    }

    /// Interpret the content as a room message.
    pub fn as_message(&self) -> Option<MessageContent> {
        (self.event_type == event_type::ROOM_MESSAGE)
            .then(|| serde_json::from_value(self.content.clone()).ok())
            .flatten()
    }

    /// Interpret the content as a membership change.
    pub fn as_member(&self) -> Option<MemberContent> {
        (self.event_type == event_type::ROOM_MEMBER)
            .then(|| serde_json::from_value(self.content.clone()).ok())
            .flatten()
    }

    /// Interpret the content as a room-name change.
    pub fn as_room_name(&self) -> Option<RoomNameContent> {
        (self.event_type == event_type::ROOM_NAME)
            .then(|| serde_json::from_value(self.content.clone()).ok())
            .flatten()
    }
}

/// The content of an `m.room.message` event.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageContent {
    /// The kind of message, e.g. `m.text` or `m.emote`.
    #[serde(default = "default_msgtype")]
    pub msgtype: String,
    /// The plain-text body of the message.
    pub body: String,
}

fn default_msgtype() -> String {
    "m.text".to_owned()
}

/// The membership state carried by an `m.room.member` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    /// The user is invited to the room.
    Invite,
    /// The user has joined the room.
    Join,
    /// The user has knocked on the room.
    Knock,
    /// The user has left, or was never in, the room.
    Leave,
    /// The user is banned from the room.
    Ban,
}

/// The content of an `m.room.member` event.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemberContent {
    /// The new membership state of the affected user.
    pub membership: MembershipState,
    /// The display name the affected user carries in this room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
}

/// The content of an `m.room.name` event.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoomNameContent {
    /// The new room name; an empty string removes the name.
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Event, MembershipState};

    #[test]
    fn test_event_deserialization() {
        let event: Event = serde_json::from_value(json!({
            "event_id": "$ev0",
            "sender": "@alice:example.org",
            "origin_server_ts": 152037280000u64,
            "type": "m.room.member",
            "state_key": "@alice:example.org",
            "content": { "membership": "join", "displayname": "Alice" },
        }))
        .unwrap();

        assert!(event.is_state());
        let member = event.as_member().unwrap();
        assert_eq!(member.membership, MembershipState::Join);
        assert_eq!(member.displayname.as_deref(), Some("Alice"));
        assert!(event.as_message().is_none());
    }

    #[test]
    fn test_malformed_content_is_not_an_error() {
        let event: Event = serde_json::from_value(json!({
            "event_id": "$ev1",
            "sender": "@alice:example.org",
            "origin_server_ts": 152037280000u64,
            "type": "m.room.message",
            "content": { "surprise": true },
        }))
        .unwrap();

        assert!(event.as_message().is_none());
    }

    #[test]
    fn test_timeline_order_ties_break_by_event_id() {
        let a: Event = serde_json::from_value(json!({
            "event_id": "$a",
            "sender": "@alice:example.org",
            "origin_server_ts": 100,
            "type": "m.room.message",
            "content": { "msgtype": "m.text", "body": "a" },
        }))
        .unwrap();
        let mut b = a.clone();
        b.event_id = "$b".into();

        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));
        assert!(!a.precedes(&a));
    }
}
