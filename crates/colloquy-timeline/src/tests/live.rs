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

//! Live-sync behavior: the pending buffer, duplicates, conflicts.

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use colloquy_base::{JoinedRoomUpdate, Room, StoreError, SyncUpdate, TimelineUpdate};
use colloquy_test::{event_factory::EventFactory, ALICE, BOB, DEFAULT_TEST_ROOM_ID};

use super::{summarize, TestTimeline};
use crate::{Error, RoomTimeline};

#[test]
fn test_materialize_drains_the_pending_buffer() {
    let f = EventFactory::new();
    let mut room = Room::new(DEFAULT_TEST_ROOM_ID.clone());

    // Events arrive over sync while the room is not displayed, newest
    // first.
    room.receive_event(f.text_msg("2").sender(&ALICE).event_id("$e2").server_ts(200).into_event())
        .unwrap();
    room.receive_event(f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event())
        .unwrap();
    assert_eq!(room.pending_events().count(), 2);

    let timeline = RoomTimeline::materialize(&mut room);
    assert_eq!(room.pending_events().count(), 0);
    assert_eq!(
        summarize(&timeline),
        [format!("~{}", *ALICE), "$e1".to_owned(), "$e2".to_owned()]
    );
}

#[test]
fn test_sync_delivered_events_reach_the_view() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    // The sync application stores pushed events in the pending buffer and
    // hands them back for materialized timelines.
    let update = SyncUpdate {
        next_batch: "s1".to_owned(),
        rooms: BTreeMap::from([(
            DEFAULT_TEST_ROOM_ID.clone(),
            JoinedRoomUpdate {
                timeline: TimelineUpdate {
                    events: vec![
                        f.text_msg("pushed").sender(&BOB).event_id("$pushed").into_event(),
                    ],
                    limited: false,
                    prev_batch: None,
                },
                ..Default::default()
            },
        )]),
    };
    let mut new_events = t.session.apply_sync_update(update).unwrap();

    for event in new_events.remove(&*DEFAULT_TEST_ROOM_ID).unwrap() {
        assert!(t.handle_live_event(event).unwrap());
    }

    assert_eq!(t.summary(), [format!("~{}", *BOB), "$pushed".to_owned()]);
    assert_eq!(t.room_mut().pending_events().count(), 0);
}

#[test]
fn test_buffered_events_are_folded_in_with_the_next_live_event() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    // An event sits in the pending buffer without having been forwarded.
    t.room_mut()
        .receive_event(f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event())
        .unwrap();

    assert!(t
        .handle_live_event(
            f.text_msg("2").sender(&ALICE).event_id("$e2").server_ts(200).into_event()
        )
        .unwrap());

    assert_eq!(
        t.summary(),
        [format!("~{}", *ALICE), "$e1".to_owned(), "$e2".to_owned()]
    );
}

#[test]
fn test_duplicate_live_event_is_ignored() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();
    let event = f.text_msg("hello").sender(&ALICE).into_event();

    assert!(t.handle_live_event(event.clone()).unwrap());
    let before = t.summary();

    assert!(!t.handle_live_event(event).unwrap());
    assert_eq!(t.summary(), before);
}

#[test]
fn test_conflicting_live_event_is_an_error() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    t.handle_live_event(f.text_msg("hello").sender(&ALICE).event_id("$dup").into_event())
        .unwrap();
    let result =
        t.handle_live_event(f.text_msg("goodbye").sender(&BOB).event_id("$dup").into_event());

    assert_matches!(
        result,
        Err(Error::InvariantViolation(StoreError::EventContentMismatch { event_id })) => {
            assert_eq!(event_id, "$dup");
        }
    );
}

#[test]
fn test_live_events_keep_the_permanent_timeline_in_sync() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    t.handle_live_event(f.text_msg("2").sender(&ALICE).event_id("$e2").server_ts(200).into_event())
        .unwrap();
    t.handle_live_event(f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event())
        .unwrap();

    // The room's permanent timeline reflects what is displayed; nothing
    // lingers in the pending buffer.
    let room = t.room_mut();
    assert_eq!(room.pending_events().count(), 0);
    let ids: Vec<&str> = room.timeline_events().map(|e| e.event_id.as_str()).collect();
    assert_eq!(ids, ["$e1", "$e2"]);
}
