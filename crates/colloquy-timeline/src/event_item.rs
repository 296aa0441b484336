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

use colloquy_base::{Event, MilliSecondsSinceUnixEpoch, OwnedEventId, OwnedUserId};

/// An event displayed in the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct EventTimelineItem {
    event: Event,
}

impl EventTimelineItem {
    pub(crate) fn new(event: Event) -> Self {
        Self { event }
    }

    /// The id of the underlying event.
    pub fn event_id(&self) -> &OwnedEventId {
        &self.event.event_id
    }

    /// The sender of the underlying event.
    pub fn sender(&self) -> &OwnedUserId {
        &self.event.sender
    }

    /// The origin-server timestamp of the underlying event.
    pub fn origin_server_ts(&self) -> MilliSecondsSinceUnixEpoch {
        self.event.origin_server_ts
    }

    /// The underlying event.
    pub fn event(&self) -> &Event {
        &self.event
    }
}
