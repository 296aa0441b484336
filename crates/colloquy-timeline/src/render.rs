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

//! Rendering events to display text.
//!
//! The core never inspects rendered output; this seam exists for the
//! presentation layer. Content that doesn't match the expected shape for
//! its type renders as a placeholder — a local degradation, never a merge
//! failure.

use colloquy_base::{
    event::{event_type, MembershipState},
    Event,
};

/// Renders an event's body into display text.
pub trait EventRenderer {
    /// Produce the display text for one event.
    fn render(&self, event: &Event) -> String;
}

/// A plain-text renderer without any markup handling.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextRenderer;

impl EventRenderer for PlainTextRenderer {
    fn render(&self, event: &Event) -> String {
        match event.event_type.as_str() {
            event_type::ROOM_MESSAGE => match event.as_message() {
                Some(message) if message.msgtype == "m.emote" => {
                    format!("* {} {}", event.sender, message.body)
                }
                Some(message) => message.body,
                None => placeholder(event),
            },
            event_type::ROOM_MEMBER => match event.as_member() {
                Some(member) => {
                    let name = member.displayname.unwrap_or_else(|| event.sender.to_string());
                    let verb = match member.membership {
                        MembershipState::Join => "joined the room",
                        MembershipState::Leave => "left the room",
                        MembershipState::Invite => "was invited to the room",
                        MembershipState::Knock => "knocked on the room",
                        MembershipState::Ban => "was banned from the room",
                    };
                    format!("{name} {verb}")
                }
                None => placeholder(event),
            },
            event_type::ROOM_NAME => match event.as_room_name() {
                Some(content) if !content.name.is_empty() => {
                    format!("changed the room name to \"{}\"", content.name)
                }
                Some(_) => "removed the room name".to_owned(),
                None => placeholder(event),
            },
            _ => placeholder(event),
        }
    }
}

fn placeholder(event: &Event) -> String {
    format!("[unsupported event: {}]", event.event_type)
}

#[cfg(test)]
mod tests {
    use colloquy_test::{event_factory::EventFactory, ALICE};
    use serde_json::json;

    use super::{EventRenderer, PlainTextRenderer};

    #[test]
    fn test_render_message_and_membership() {
        let f = EventFactory::new();
        let renderer = PlainTextRenderer;

        let msg = f.text_msg("hello world").sender(&ALICE).into_event();
        assert_eq!(renderer.render(&msg), "hello world");

        let member = f.member(&ALICE).displayname("Alice").into_event();
        assert_eq!(renderer.render(&member), "Alice joined the room");
    }

    #[test]
    fn test_malformed_content_renders_as_placeholder() {
        let f = EventFactory::new();
        let renderer = PlainTextRenderer;

        let malformed = f.event("m.room.message", json!({ "no": "body" })).into_event();
        assert_eq!(renderer.render(&malformed), "[unsupported event: m.room.message]");

        let unknown = f.event("m.face_paint", json!({})).into_event();
        assert_eq!(renderer.render(&unknown), "[unsupported event: m.face_paint]");
    }
}
