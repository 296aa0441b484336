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

//! The network collaborator interface.
//!
//! The engine never performs request/response exchanges itself; it talks to
//! a [`FetchClient`] that dispatches asynchronously and resolves with a
//! decoded payload or a [`ClientError`]. There is no cancellation of an
//! in-flight request — a timeout surfaces as [`ClientError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{
    error::ClientError,
    event::Event,
    identifiers::{OwnedEventId, OwnedRoomId},
    session::{Server, Session},
};

/// Configuration for requests a [`FetchClient`] performs.
#[derive(Clone, Copy, Debug)]
pub struct RequestConfig {
    /// How long to wait for a response before reporting
    /// [`ClientError::Timeout`].
    pub timeout: Duration,
    /// The default number of events to request per history page.
    pub page_limit: u16,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), page_limit: 20 }
    }
}

/// The direction to fetch history in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward older events.
    Backward,
    /// Toward newer events.
    Forward,
}

/// A request for one page of room history.
#[derive(Clone, Debug)]
pub struct PageRequest {
    /// The room to fetch history for.
    pub room_id: OwnedRoomId,
    /// The pagination token to fetch from; `None` means the live edge of
    /// the room's history.
    pub from: Option<String>,
    /// The direction to fetch in.
    pub direction: Direction,
    /// The maximum number of events to return.
    pub limit: u16,
}

impl PageRequest {
    /// A request for the page of history before `from`.
    pub fn backward(room_id: OwnedRoomId, from: Option<String>, limit: u16) -> Self {
        Self { room_id, from, direction: Direction::Backward, limit }
    }
}

/// One page of room history.
#[derive(Clone, Debug, Default)]
pub struct PageResponse {
    /// The fetched timeline events, oldest first, regardless of the fetch
    /// direction.
    pub events: Vec<Event>,
    /// State events describing room state as of the fetched point in
    /// history.
    pub state: Vec<Event>,
    /// The token to continue fetching from; `None` means the requested end
    /// of history was reached.
    pub end: Option<String>,
}

/// A client performing request/response exchanges with a homeserver.
///
/// Implementations own transport, authentication details beyond the access
/// token, and timeout handling. All methods are asynchronous and must not
/// block the calling task beyond awaiting the response.
#[async_trait]
pub trait FetchClient {
    /// Fetch one page of room history.
    async fn fetch_page(
        &self,
        server: &Server,
        access_token: &str,
        request: PageRequest,
    ) -> Result<PageResponse, ClientError>;

    /// Send an event into a room.
    ///
    /// `txn_id` comes from the session's monotone counter and makes retries
    /// of the same logical send idempotent on the server side. Resolves
    /// with the id the server assigned to the event.
    async fn send_event(
        &self,
        server: &Server,
        access_token: &str,
        room_id: &OwnedRoomId,
        event_type: &str,
        txn_id: u64,
        content: &JsonValue,
    ) -> Result<OwnedEventId, ClientError>;
}

impl Session {
    /// Send an event into a room through the given client, tagging it with
    /// the next transaction id of this session.
    pub async fn send_event(
        &mut self,
        client: &impl FetchClient,
        room_id: &OwnedRoomId,
        event_type: &str,
        content: JsonValue,
    ) -> Result<OwnedEventId, ClientError> {
        let txn_id = self.next_transaction_id();
        client
            .send_event(self.server(), self.access_token(), room_id, event_type, txn_id, &content)
            .await
    }
}
