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

//! A high-level view of a room's messages: events in chronological order,
//! grouped into runs by sender, each run preceded by a header naming its
//! sender.
//!
//! A [`RoomTimeline`] is materialized from a room's canonical event store
//! and kept current by feeding it live events as they arrive; older history
//! is pulled in on demand with [`RoomTimeline::paginate_backwards`].
//! Consumers address entries through stable [`ItemHandle`]s that survive
//! out-of-order insertions anywhere else in the view.

#![warn(missing_debug_implementations)]

use colloquy_base::{Event, OwnedRoomId, Room};
use tracing::debug;

mod error;
mod event_handler;
mod event_item;
mod item;
mod pagination;
mod render;
mod view;
mod virtual_item;

#[cfg(test)]
mod tests;

pub use self::{
    error::Error,
    event_item::EventTimelineItem,
    item::{TimelineItem, TimelineItemKind},
    pagination::BackPaginationOutcome,
    render::{EventRenderer, PlainTextRenderer},
    view::{ItemHandle, TimelineView},
    virtual_item::VirtualTimelineItem,
};

use self::event_handler::{insert_event, ScanDirection};

/// The materialized timeline of one room.
#[derive(Debug)]
pub struct RoomTimeline {
    room_id: OwnedRoomId,
    view: TimelineView,
}

impl RoomTimeline {
    /// Materialize the timeline from the room's current event store.
    ///
    /// Any events buffered while the room was not displayed are folded into
    /// the canonical timeline first, then every timeline event is placed in
    /// the view.
    pub fn materialize(room: &mut Room) -> Self {
        let buffered = room.flush_pending();
        if !buffered.is_empty() {
            debug!(count = buffered.len(), "folded buffered events into the timeline");
        }

        let mut view = TimelineView::new();
        for event in room.timeline_events() {
            insert_event(&mut view, event.clone(), ScanDirection::FromNewest);
        }

        Self { room_id: room.room_id().clone(), view }
    }

    /// The id of the room this timeline displays.
    pub fn room_id(&self) -> &OwnedRoomId {
        &self.room_id
    }

    /// The underlying view, for handle-based access.
    pub fn view(&self) -> &TimelineView {
        &self.view
    }

    /// The number of entries in the view, headers included.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the view has no entries.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Iterate over the entries oldest-first.
    pub fn items(&self) -> impl Iterator<Item = &TimelineItem> {
        self.view.iter()
    }

    /// The newest event entry of the view, if any.
    pub fn latest_event(&self) -> Option<&EventTimelineItem> {
        let mut cursor = self.view.last();
        while let Some(handle) = cursor {
            if let Some(event) = self.view.item(handle)?.as_event() {
                return Some(event);
            }
            cursor = self.view.prev(handle);
        }
        None
    }

    /// Handle one event arriving over live sync while the room is
    /// displayed.
    ///
    /// The event is recorded in the room's canonical store, then everything
    /// waiting in the pending buffer is folded into the permanent timeline
    /// and placed at its chronological position in the view. The buffer may
    /// already hold this event (a sync application stores pushed events
    /// before handing them to materialized timelines) as well as earlier
    /// events the presentation layer has not forwarded; all of them become
    /// visible here. Returns whether the event entered the view; `false`
    /// means it was already displayed.
    pub fn handle_live_event(&mut self, room: &mut Room, event: Event) -> Result<bool, Error> {
        debug_assert_eq!(room.room_id(), &self.room_id, "event fed to the wrong timeline");

        let event_id = event.event_id.clone();
        room.receive_event(event)?;

        let mut added = false;
        for pending in room.flush_pending() {
            if pending.event_id == event_id {
                added = true;
            }
            insert_event(&mut self.view, pending, ScanDirection::FromNewest);
        }

        if !added {
            debug!(event_id = %event_id, "skipping duplicate live event");
        }
        Ok(added)
    }
}
