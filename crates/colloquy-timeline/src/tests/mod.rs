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

use colloquy_base::{Event, Room, Server, Session};
use colloquy_test::{ALICE, DEFAULT_TEST_ROOM_ID};

use crate::{Error, RoomTimeline, TimelineItemKind, VirtualTimelineItem};

mod live;
mod order;

/// A session with one room and its materialized timeline.
struct TestTimeline {
    session: Session,
    timeline: RoomTimeline,
}

impl TestTimeline {
    fn new() -> Self {
        let mut session =
            Session::new(Server::new("server.name", 443), ALICE.clone(), "test-token");
        let room = session.get_or_create_room(&DEFAULT_TEST_ROOM_ID);
        let timeline = RoomTimeline::materialize(room);
        Self { session, timeline }
    }

    fn room_mut(&mut self) -> &mut Room {
        self.session.room_mut(&DEFAULT_TEST_ROOM_ID).unwrap()
    }

    fn handle_live_event(&mut self, event: Event) -> Result<bool, Error> {
        let room = self.session.room_mut(&DEFAULT_TEST_ROOM_ID).unwrap();
        self.timeline.handle_live_event(room, event)
    }

    fn summary(&self) -> Vec<String> {
        summarize(&self.timeline)
    }
}

/// Render the timeline as one token per entry: `~sender` for a header,
/// the event id for an event.
fn summarize(timeline: &RoomTimeline) -> Vec<String> {
    timeline
        .items()
        .map(|item| match item.kind() {
            TimelineItemKind::Event(event) => event.event_id().to_string(),
            TimelineItemKind::Virtual(VirtualTimelineItem::SenderHeader { sender }) => {
                format!("~{sender}")
            }
        })
        .collect()
}

/// Assert the sender-header invariants over the whole view: a header before
/// every run, no adjacent headers, no header repeating the previous run's
/// sender, every event under a header naming its sender.
fn assert_header_invariants(timeline: &RoomTimeline) {
    let mut current_sender: Option<String> = None;
    let mut prev_was_header = false;

    for item in timeline.items() {
        match item.kind() {
            TimelineItemKind::Virtual(VirtualTimelineItem::SenderHeader { sender }) => {
                assert!(!prev_was_header, "two adjacent headers");
                if let Some(current) = &current_sender {
                    assert_ne!(current, sender.as_str(), "header repeats the run's sender");
                }
                current_sender = Some(sender.to_string());
                prev_was_header = true;
            }
            TimelineItemKind::Event(event) => {
                assert_eq!(
                    current_sender.as_deref(),
                    Some(event.sender().as_str()),
                    "event not under its sender's header"
                );
                prev_was_header = false;
            }
        }
    }

    assert!(!prev_was_header, "trailing header without a run");
}
