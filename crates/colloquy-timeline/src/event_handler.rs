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

//! The insertion algorithm.
//!
//! Places exactly one new event at its chronological position in a
//! [`TimelineView`], maintaining the sender-header invariants: every
//! maximal run of consecutive same-sender events is preceded by exactly one
//! header naming that sender, and no two headers are adjacent.
//!
//! Callers are responsible for the duplicate check (by event id, against
//! the room's event store) before invoking this; given well-formed,
//! non-duplicate input the algorithm cannot fail.

use colloquy_base::{Event, OwnedUserId};

use crate::{
    event_item::EventTimelineItem,
    item::TimelineItemKind,
    view::{ItemHandle, TimelineView},
    virtual_item::VirtualTimelineItem,
};

/// Which end of the view the positional search starts from.
///
/// Appending a live event finds its anchor immediately when scanning from
/// the newest end; merging a fetched page of older history terminates
/// immediately when scanning from the oldest end. Both directions produce
/// the same final position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScanDirection {
    /// Scan backward from the newest entry.
    FromNewest,
    /// Scan forward from the oldest entry.
    FromOldest,
}

/// Insert `event` at its `(origin_server_ts, event_id)` position.
pub(crate) fn insert_event(
    view: &mut TimelineView,
    event: Event,
    direction: ScanDirection,
) -> ItemHandle {
    insert_event_by(view, event, direction, Event::precedes)
}

/// Insert `event` at the position determined by the given strict-less-than
/// comparator over events; headers are skipped during the search.
pub(crate) fn insert_event_by(
    view: &mut TimelineView,
    event: Event,
    direction: ScanDirection,
    precedes: impl Fn(&Event, &Event) -> bool,
) -> ItemHandle {
    let anchor = find_anchor(view, &event, direction, &precedes);
    let sender = event.sender.clone();
    let kind = TimelineItemKind::Event(EventTimelineItem::new(event));

    let handle = match anchor {
        Some(anchor) => {
            // If the entry after the anchor is a header for this sender,
            // hop over it so the event joins the run under that header.
            let position = match view.next(anchor) {
                Some(next) if is_header_for(view, next, &sender) => next,
                _ => anchor,
            };
            view.insert_after(position, kind)
        }
        None => match view.first() {
            // Same hop at the front: the event is older than everything
            // already shown, but the view starts with this sender's run.
            Some(first) if is_header_for(view, first, &sender) => view.insert_after(first, kind),
            _ => view.push_front(kind),
        },
    };

    maintain_headers(view, handle, &sender);
    handle
}

/// Find the last entry (in timeline order) that the comparator places
/// before `event`, skipping header markers. `None` means the event is older
/// than every displayed event, or the view is empty.
fn find_anchor(
    view: &TimelineView,
    event: &Event,
    direction: ScanDirection,
    precedes: &impl Fn(&Event, &Event) -> bool,
) -> Option<ItemHandle> {
    match direction {
        ScanDirection::FromNewest => {
            let mut cursor = view.last();
            while let Some(handle) = cursor {
                if let Some(entry) = view.item(handle).and_then(|item| item.as_event()) {
                    if precedes(entry.event(), event) {
                        return Some(handle);
                    }
                }
                cursor = view.prev(handle);
            }
            None
        }
        ScanDirection::FromOldest => {
            let mut anchor = None;
            let mut cursor = view.first();
            while let Some(handle) = cursor {
                if let Some(entry) = view.item(handle).and_then(|item| item.as_event()) {
                    if precedes(entry.event(), event) {
                        anchor = Some(handle);
                    } else {
                        break;
                    }
                }
                cursor = view.next(handle);
            }
            anchor
        }
    }
}

fn is_header_for(view: &TimelineView, handle: ItemHandle, sender: &OwnedUserId) -> bool {
    view.item(handle)
        .is_some_and(|item| item.is_sender_header() && item.effective_sender() == sender)
}

fn header(sender: OwnedUserId) -> TimelineItemKind {
    TimelineItemKind::Virtual(VirtualTimelineItem::SenderHeader { sender })
}

/// Restore the header invariants around a freshly inserted event.
fn maintain_headers(view: &mut TimelineView, handle: ItemHandle, sender: &OwnedUserId) {
    let Some(prev) = view.prev(handle) else {
        // The event opens the view; its run needs a header.
        view.insert_before(handle, header(sender.clone()));
        return;
    };

    let (prev_is_header, prev_sender_matches) = {
        let item = view.item(prev).expect("adjacent node exists");
        (item.is_sender_header(), item.effective_sender() == sender)
    };

    if prev_is_header {
        // Positioning only ever lands directly after a header when that
        // header names the event's own sender.
        debug_assert!(prev_sender_matches, "event inserted under a foreign header");
        return;
    }
    if prev_sender_matches {
        // The event extends the run of the entry before it.
        return;
    }

    // A new run starts at the event. If the entry currently following it is
    // an event, it belonged to the run of the entry before — that run is
    // being split and its tail needs a header of its own.
    if let Some(following) = view.next(handle) {
        let split_sender = view
            .item(following)
            .and_then(|item| item.as_event())
            .map(|entry| entry.sender().clone());
        if let Some(split_sender) = split_sender {
            view.insert_before(following, header(split_sender));
        }
    }
    view.insert_before(handle, header(sender.clone()));
}
