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

//! Out-of-order arrival: the view's final shape depends only on the set of
//! events, never on the order they came in.

use colloquy_base::Event;
use colloquy_test::{event_factory::EventFactory, ALICE, BOB, CAROL};

use super::{assert_header_invariants, TestTimeline};

#[test]
fn test_late_event_splits_a_run() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    t.handle_live_event(f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event())
        .unwrap();
    t.handle_live_event(f.text_msg("2").sender(&ALICE).event_id("$e2").server_ts(200).into_event())
        .unwrap();
    // Arrives late, belongs between the two.
    t.handle_live_event(f.text_msg("3").sender(&BOB).event_id("$e3").server_ts(150).into_event())
        .unwrap();

    assert_eq!(
        t.summary(),
        [
            format!("~{}", *ALICE),
            "$e1".to_owned(),
            format!("~{}", *BOB),
            "$e3".to_owned(),
            format!("~{}", *ALICE),
            "$e2".to_owned(),
        ]
    );
    assert_header_invariants(&t.timeline);
}

#[test]
fn test_late_same_sender_event_joins_the_run() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    t.handle_live_event(f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event())
        .unwrap();
    t.handle_live_event(f.text_msg("2").sender(&ALICE).event_id("$e2").server_ts(300).into_event())
        .unwrap();
    t.handle_live_event(f.text_msg("3").sender(&ALICE).event_id("$e3").server_ts(200).into_event())
        .unwrap();

    // One run, one header.
    assert_eq!(
        t.summary(),
        [format!("~{}", *ALICE), "$e1".to_owned(), "$e3".to_owned(), "$e2".to_owned()]
    );
}

#[test]
fn test_identical_timestamps_tie_break_by_event_id() {
    let mut t = TestTimeline::new();
    let f = EventFactory::new();

    t.handle_live_event(f.text_msg("b").sender(&ALICE).event_id("$b").server_ts(100).into_event())
        .unwrap();
    t.handle_live_event(f.text_msg("a").sender(&ALICE).event_id("$a").server_ts(100).into_event())
        .unwrap();

    assert_eq!(t.summary(), [format!("~{}", *ALICE), "$a".to_owned(), "$b".to_owned()]);
}

#[test]
fn test_all_arrival_orders_converge() {
    let f = EventFactory::new();
    let events = [
        f.text_msg("1").sender(&ALICE).event_id("$e1").server_ts(100).into_event(),
        f.text_msg("2").sender(&BOB).event_id("$e2").server_ts(200).into_event(),
        f.text_msg("3").sender(&BOB).event_id("$e3").server_ts(300).into_event(),
        f.text_msg("4").sender(&CAROL).event_id("$e4").server_ts(400).into_event(),
    ];

    let reference = build(&events, &[0, 1, 2, 3]);

    for permutation in permutations(events.len()) {
        let t = build(&events, &permutation);
        assert_eq!(t.summary(), reference.summary(), "diverged for order {permutation:?}");
        assert_header_invariants(&t.timeline);
    }
}

fn build(events: &[Event], order: &[usize]) -> TestTimeline {
    let mut t = TestTimeline::new();
    for &i in order {
        t.handle_live_event(events[i].clone()).unwrap();
    }
    t
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn recurse(current: &mut Vec<usize>, remaining: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(current.clone());
            return;
        }
        for i in 0..remaining.len() {
            let picked = remaining.remove(i);
            current.push(picked);
            recurse(current, remaining, out);
            current.pop();
            remaining.insert(i, picked);
        }
    }

    let mut out = Vec::new();
    recurse(&mut Vec::new(), &mut (0..n).collect(), &mut out);
    out
}
