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

//! Back-pagination: fetching older history and merging it in.

use colloquy_base::{FetchClient, PageRequest, Session};
use tracing::{debug, instrument, warn};

use crate::{
    error::Error,
    event_handler::{insert_event, ScanDirection},
    RoomTimeline,
};

/// The result of one back-pagination call.
#[derive(Debug)]
pub enum BackPaginationOutcome {
    /// A page was fetched and merged.
    Fetched {
        /// How many fetched events were new to the timeline; re-fetched
        /// duplicates at page boundaries don't count.
        events_added: usize,
        /// Whether the start of the room's history was reached; further
        /// calls won't return more events.
        reached_start: bool,
    },
    /// Nothing was done because another pagination for this room is still
    /// in flight.
    AlreadyPaginating,
}

impl RoomTimeline {
    /// Fetch one page of history older than what the timeline has, and
    /// merge it in.
    ///
    /// At most one pagination per room may be in flight; a call made while
    /// one is surfaces as [`BackPaginationOutcome::AlreadyPaginating`]
    /// without touching anything. The fetched page becomes visible
    /// atomically with respect to the caller's loop: no merging starts
    /// before the full response is in.
    #[instrument(skip_all, fields(room_id = %self.room_id, limit))]
    pub async fn paginate_backwards(
        &mut self,
        session: &mut Session,
        client: &impl FetchClient,
        limit: u16,
    ) -> Result<BackPaginationOutcome, Error> {
        let server = session.server().clone();
        let access_token = session.access_token().to_owned();

        let request = {
            let room = session.room_mut(&self.room_id).ok_or(Error::UnknownRoom)?;
            if room.is_paginating() {
                debug!("pagination already in flight, rejecting");
                return Ok(BackPaginationOutcome::AlreadyPaginating);
            }
            room.set_paginating(true);

            let from = room.prev_batch().map(ToOwned::to_owned);
            PageRequest::backward(self.room_id.clone(), from, limit)
        };

        let response = match client.fetch_page(&server, &access_token, request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "history fetch failed");
                if let Some(room) = session.room_mut(&self.room_id) {
                    room.set_paginating(false);
                }
                return Err(error.into());
            }
        };

        // State first, so member names resolve for the events about to be
        // merged. Later entries of the same batch overwrite earlier ones.
        for event in response.state {
            session.apply_state_event(&self.room_id, event);
        }

        let room = session.room_mut(&self.room_id).ok_or(Error::UnknownRoom)?;
        let mut events_added = 0;
        for event in response.events {
            match room.merge_paginated_event(event.clone()) {
                Ok(true) => {
                    insert_event(&mut self.view, event, ScanDirection::FromOldest);
                    events_added += 1;
                }
                Ok(false) => {
                    debug!(event_id = %event.event_id, "skipping re-fetched event");
                }
                Err(error) => {
                    warn!(%error, "stopping history merge");
                    room.set_paginating(false);
                    return Err(error.into());
                }
            }
        }

        let reached_start = response.end.is_none();
        room.set_prev_batch(response.end);
        room.set_paginating(false);

        debug!(events_added, reached_start, "back-pagination finished");
        Ok(BackPaginationOutcome::Fetched { events_added, reached_start })
    }
}
