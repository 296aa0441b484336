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

use colloquy_base::OwnedUserId;

/// An item in the timeline that's not an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VirtualTimelineItem {
    /// A marker naming the sender of the run of events that follows it.
    SenderHeader {
        /// The sender of the following run.
        sender: OwnedUserId,
    },
}

impl VirtualTimelineItem {
    /// The sender named by this header.
    pub fn sender(&self) -> &OwnedUserId {
        match self {
            Self::SenderHeader { sender } => sender,
        }
    }
}
