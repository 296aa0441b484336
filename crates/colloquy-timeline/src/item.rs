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

use std::ops::Deref;

use colloquy_base::OwnedUserId;

use super::{EventTimelineItem, VirtualTimelineItem};

/// The kind of a timeline entry: an event, or a virtual item that doesn't
/// correspond to an event.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineItemKind {
    /// An event.
    Event(EventTimelineItem),
    /// An item that doesn't correspond to an event, for example the header
    /// naming the sender of the following run of events.
    Virtual(VirtualTimelineItem),
}

/// A single entry in the timeline.
#[derive(Clone, Debug)]
pub struct TimelineItem {
    pub(crate) kind: TimelineItemKind,
    pub(crate) internal_id: u64,
}

impl TimelineItem {
    /// Get the [`TimelineItemKind`] of this item.
    pub fn kind(&self) -> &TimelineItemKind {
        &self.kind
    }

    /// Get the inner `EventTimelineItem`, if this is a
    /// [`TimelineItemKind::Event`].
    pub fn as_event(&self) -> Option<&EventTimelineItem> {
        match &self.kind {
            TimelineItemKind::Event(v) => Some(v),
            _ => None,
        }
    }

    /// Get the inner `VirtualTimelineItem`, if this is a
    /// [`TimelineItemKind::Virtual`].
    pub fn as_virtual(&self) -> Option<&VirtualTimelineItem> {
        match &self.kind {
            TimelineItemKind::Virtual(v) => Some(v),
            _ => None,
        }
    }

    /// Get a unique id for this item within its view.
    ///
    /// The id identifies the item on a best-effort basis: it is stable
    /// across later insertions elsewhere in the view, but a header that a
    /// reader perceives as "the same" may get a new id when a run is
    /// rebuilt around it.
    pub fn unique_id(&self) -> u64 {
        self.internal_id
    }

    pub(crate) fn is_sender_header(&self) -> bool {
        matches!(self.kind, TimelineItemKind::Virtual(VirtualTimelineItem::SenderHeader { .. }))
    }

    /// The sender a reader would attribute this entry to: an event's sender,
    /// or the sender named by a header.
    pub(crate) fn effective_sender(&self) -> &OwnedUserId {
        match &self.kind {
            TimelineItemKind::Event(event) => event.sender(),
            TimelineItemKind::Virtual(virt) => virt.sender(),
        }
    }
}

impl Deref for TimelineItem {
    type Target = TimelineItemKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl From<EventTimelineItem> for TimelineItemKind {
    fn from(item: EventTimelineItem) -> Self {
        Self::Event(item)
    }
}

impl From<VirtualTimelineItem> for TimelineItemKind {
    fn from(item: VirtualTimelineItem) -> Self {
        Self::Virtual(item)
    }
}
