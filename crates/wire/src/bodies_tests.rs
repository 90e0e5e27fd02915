// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn tail_body_round_trips_through_json() {
    let body = TailBody { lines: vec![TailLine { text: "hi".to_string(), is_error: false }] };
    let json = serde_json::to_string(&body).unwrap();
    let decoded: TailBody = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, body);
}

#[test]
fn dispatch_result_defaults_to_no_waiter() {
    assert_eq!(DispatchResultBody::default(), DispatchResultBody { waiter_found: false, executed: false });
}

proptest::proptest! {
    #[test]
    fn tail_body_round_trips_for_arbitrary_lines(lines in proptest::collection::vec((".*", proptest::bool::ANY), 0..8)) {
        let body = TailBody {
            lines: lines.into_iter().map(|(text, is_error)| TailLine { text, is_error }).collect(),
        };
        let json = serde_json::to_string(&body).unwrap();
        let decoded: TailBody = serde_json::from_str(&json).unwrap();
        proptest::prop_assert_eq!(decoded, body);
    }
}
