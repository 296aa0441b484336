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

//! The ordered timeline view.
//!
//! A sequence of [`TimelineItem`]s stored in an arena of doubly-linked
//! nodes. Positions are addressed by generational [`ItemHandle`]s rather
//! than indices or pointers: a handle held by a consumer stays valid across
//! arbitrary later insertions elsewhere in the view and across arena
//! reallocation, and goes stale only when its own entry is removed.
//!
//! The view enforces no ordering of its own; chronological placement and
//! the sender-header invariants are maintained by the insertion algorithm
//! in [`event_handler`](crate::event_handler).

use crate::item::{TimelineItem, TimelineItemKind};

/// A stable reference to one entry of a [`TimelineView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    item: TimelineItem,
    prev: Option<ItemHandle>,
    next: Option<ItemHandle>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: SlotEntry,
}

#[derive(Debug)]
enum SlotEntry {
    Occupied(Node),
    Free { next_free: Option<u32> },
}

/// The materialized view backing a displayed room.
#[derive(Debug, Default)]
pub struct TimelineView {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    head: Option<ItemHandle>,
    tail: Option<ItemHandle>,
    len: usize,
    next_internal_id: u64,
}

impl TimelineView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries in the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The handle of the first (oldest) entry.
    pub fn first(&self) -> Option<ItemHandle> {
        self.head
    }

    /// The handle of the last (newest) entry.
    pub fn last(&self) -> Option<ItemHandle> {
        self.tail
    }

    fn node(&self, handle: ItemHandle) -> Option<&Node> {
        let slot = self.slots.get(handle.index as usize)?;
        match &slot.entry {
            SlotEntry::Occupied(node) if slot.generation == handle.generation => Some(node),
            _ => None,
        }
    }

    fn node_mut(&mut self, handle: ItemHandle) -> Option<&mut Node> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        match &mut slot.entry {
            SlotEntry::Occupied(node) if slot.generation == handle.generation => Some(node),
            _ => None,
        }
    }

    /// The entry the handle refers to, or `None` if the handle is stale.
    pub fn item(&self, handle: ItemHandle) -> Option<&TimelineItem> {
        Some(&self.node(handle)?.item)
    }

    /// The handle of the entry after the given one, or `None` at the end
    /// of the view (or for a stale handle).
    pub fn next(&self, handle: ItemHandle) -> Option<ItemHandle> {
        self.node(handle)?.next
    }

    /// The handle of the entry before the given one, or `None` at the
    /// start of the view (or for a stale handle).
    pub fn prev(&self, handle: ItemHandle) -> Option<ItemHandle> {
        self.node(handle)?.prev
    }

    fn alloc(&mut self, kind: TimelineItemKind, prev: Option<ItemHandle>, next: Option<ItemHandle>) -> ItemHandle {
        let internal_id = self.next_internal_id;
        self.next_internal_id += 1;
        let node = Node { item: TimelineItem { kind, internal_id }, prev, next };

        let handle = match self.free_head {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let SlotEntry::Free { next_free } = slot.entry else {
                    unreachable!("free list points at an occupied slot");
                };
                self.free_head = next_free;
                slot.entry = SlotEntry::Occupied(node);
                ItemHandle { index, generation: slot.generation }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("timeline view exceeded {} entries", u32::MAX));
                self.slots.push(Slot { generation: 0, entry: SlotEntry::Occupied(node) });
                ItemHandle { index, generation: 0 }
            }
        };

        self.len += 1;
        handle
    }

    /// Insert a new entry before the given one, returning its handle.
    ///
    /// Existing handles remain valid. Panics if the handle is stale.
    pub fn insert_before(&mut self, handle: ItemHandle, kind: impl Into<TimelineItemKind>) -> ItemHandle {
        let prev = match self.node(handle) {
            Some(node) => node.prev,
            None => panic!("insert_before called with a stale handle"),
        };
        let new = self.alloc(kind.into(), prev, Some(handle));

        match prev {
            Some(prev) => {
                self.node_mut(prev).expect("linked node exists").next = Some(new);
            }
            None => self.head = Some(new),
        }
        self.node_mut(handle).expect("anchor node exists").prev = Some(new);
        new
    }

    /// Insert a new entry after the given one, returning its handle.
    ///
    /// Existing handles remain valid. Panics if the handle is stale.
    pub fn insert_after(&mut self, handle: ItemHandle, kind: impl Into<TimelineItemKind>) -> ItemHandle {
        let next = match self.node(handle) {
            Some(node) => node.next,
            None => panic!("insert_after called with a stale handle"),
        };
        let new = self.alloc(kind.into(), Some(handle), next);

        match next {
            Some(next) => {
                self.node_mut(next).expect("linked node exists").prev = Some(new);
            }
            None => self.tail = Some(new),
        }
        self.node_mut(handle).expect("anchor node exists").next = Some(new);
        new
    }

    /// Insert a new entry as the first of the view, returning its handle.
    pub fn push_front(&mut self, kind: impl Into<TimelineItemKind>) -> ItemHandle {
        match self.head {
            Some(head) => self.insert_before(head, kind),
            None => {
                let new = self.alloc(kind.into(), None, None);
                self.head = Some(new);
                self.tail = Some(new);
                new
            }
        }
    }

    /// Insert a new entry as the last of the view, returning its handle.
    pub fn push_back(&mut self, kind: impl Into<TimelineItemKind>) -> ItemHandle {
        match self.tail {
            Some(tail) => self.insert_after(tail, kind),
            None => self.push_front(kind),
        }
    }

    /// Remove the entry the handle refers to, returning its item.
    ///
    /// The handle (and only it) goes stale; all other handles remain
    /// valid. Returns `None` if the handle was already stale.
    pub fn remove(&mut self, handle: ItemHandle) -> Option<TimelineItem> {
        let (prev, next) = {
            let node = self.node(handle)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).expect("linked node exists").next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).expect("linked node exists").prev = prev,
            None => self.tail = prev,
        }

        let slot = &mut self.slots[handle.index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        let entry = std::mem::replace(&mut slot.entry, SlotEntry::Free { next_free: self.free_head });
        self.free_head = Some(handle.index);
        self.len -= 1;

        match entry {
            SlotEntry::Occupied(node) => Some(node.item),
            SlotEntry::Free { .. } => unreachable!("node() returned a handle to a free slot"),
        }
    }

    /// Iterate over the entries front-to-back (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &TimelineItem> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.next;
            Some(&node.item)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TimelineView;
    use crate::{EventTimelineItem, VirtualTimelineItem};
    use colloquy_test::{event_factory::EventFactory, ALICE, BOB};

    fn event_kind(f: &EventFactory, body: &str) -> crate::TimelineItemKind {
        crate::TimelineItemKind::Event(EventTimelineItem::new(f.text_msg(body).into_event()))
    }

    #[test]
    fn test_push_and_iterate() {
        let f = EventFactory::new();
        let mut view = TimelineView::new();
        assert!(view.is_empty());

        view.push_back(event_kind(&f, "b"));
        view.push_front(event_kind(&f, "a"));
        view.push_back(event_kind(&f, "c"));

        let bodies: Vec<String> = view
            .iter()
            .map(|item| item.as_event().unwrap().event().as_message().unwrap().body)
            .collect();
        assert_eq!(bodies, ["a", "b", "c"]);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_handles_survive_unrelated_insertions() {
        let f = EventFactory::new();
        let mut view = TimelineView::new();

        let b = view.push_back(event_kind(&f, "b"));
        // Insertions on both sides, enough to reallocate the arena.
        for i in 0..64 {
            view.push_front(event_kind(&f, &format!("front {i}")));
            view.push_back(event_kind(&f, &format!("back {i}")));
        }

        let item = view.item(b).unwrap();
        assert_eq!(item.as_event().unwrap().event().as_message().unwrap().body, "b");
    }

    #[test]
    fn test_removal_staleness_and_slot_reuse() {
        let f = EventFactory::new();
        let mut view = TimelineView::new();

        let a = view.push_back(event_kind(&f, "a"));
        let b = view.push_back(event_kind(&f, "b"));

        assert!(view.remove(a).is_some());
        assert!(view.item(a).is_none());
        assert!(view.remove(a).is_none());

        // The freed slot is reused, but the old handle stays stale.
        let c = view.push_back(event_kind(&f, "c"));
        assert!(view.item(a).is_none());
        assert!(view.item(c).is_some());

        assert_eq!(view.first(), Some(b));
        assert_eq!(view.next(b), Some(c));
        assert_eq!(view.prev(b), None);
    }

    #[test]
    fn test_insert_before_and_after_link_correctly() {
        let f = EventFactory::new();
        let mut view = TimelineView::new();

        let b = view.push_back(event_kind(&f, "b"));
        let a = view.insert_before(b, event_kind(&f, "a"));
        let c = view.insert_after(b, event_kind(&f, "c"));

        assert_eq!(view.first(), Some(a));
        assert_eq!(view.last(), Some(c));
        assert_eq!(view.next(a), Some(b));
        assert_eq!(view.prev(c), Some(b));
    }

    #[test]
    fn test_virtual_items_are_distinguished() {
        let mut view = TimelineView::new();
        let h = view.push_back(crate::TimelineItemKind::Virtual(
            VirtualTimelineItem::SenderHeader { sender: ALICE.clone() },
        ));

        let item = view.item(h).unwrap();
        assert!(item.as_event().is_none());
        assert_eq!(item.as_virtual().unwrap().sender(), &*ALICE);
        assert_ne!(item.as_virtual().unwrap().sender(), &*BOB);
    }
}
