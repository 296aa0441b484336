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

//! Owned identifier types.
//!
//! Identifiers are server-qualified strings (`$event`, `!room:server`,
//! `@user:server`). They are treated as opaque: ordering is plain string
//! ordering, which is all the timeline needs for deterministic tie-breaks.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! owned_identifier {
    ($(#[doc = $docs:literal])* $name:ident) => {
        $(#[doc = $docs])*
        #[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Box<str>);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(id: impl Into<Box<str>>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id.into())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

owned_identifier! {
    /// The unique id of an event within a room, e.g. `$arbitrary-opaque-id`.
    OwnedEventId
}

owned_identifier! {
    /// The unique id of a room, e.g. `!roomid:example.org`.
    OwnedRoomId
}

owned_identifier! {
    /// The unique, stable, server-qualified id of a user, e.g.
    /// `@alice:example.org`.
    OwnedUserId
}

impl OwnedUserId {
    /// The part of the user id before the `:` separator, without the `@`
    /// sigil.
    pub fn localpart(&self) -> &str {
        let id = self.as_str().strip_prefix('@').unwrap_or(self.as_str());
        id.split_once(':').map_or(id, |(local, _)| local)
    }

    /// The server name the user id is qualified with, if any.
    pub fn server_name(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(_, server)| server)
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedUserId;

    #[test]
    fn test_user_id_parts() {
        let user = OwnedUserId::from("@carl:example.com");
        assert_eq!(user.localpart(), "carl");
        assert_eq!(user.server_name(), Some("example.com"));

        let bare = OwnedUserId::from("carl");
        assert_eq!(bare.localpart(), "carl");
        assert_eq!(bare.server_name(), None);
    }

    #[test]
    fn test_identifier_ordering_is_string_ordering() {
        let a = OwnedUserId::from("@a:x");
        let b = OwnedUserId::from("@b:x");
        assert!(a < b);
        assert_eq!(a, "@a:x");
    }
}
