use proptest::prelude::*;

use rc_core::MAX_CONNECTIONS;
use rc_core::dungeon::{RoomRecord, RoomRole};
use rc_save::{FormatError, decode_room, encode_room};

fn room_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}"
}

fn role() -> impl Strategy<Value = RoomRole> {
    prop_oneof![
        Just(RoomRole::Start),
        Just(RoomRole::Mid),
        Just(RoomRole::End),
    ]
}

fn record() -> impl Strategy<Value = RoomRecord> {
    (
        room_name(),
        role(),
        prop::collection::vec(room_name(), 0..=MAX_CONNECTIONS),
    )
        .prop_map(|(name, role, connections)| RoomRecord::new(name, role, connections))
}

proptest! {
    #[test]
    fn decode_inverts_encode(record in record()) {
        let text = encode_room(&record);
        prop_assert_eq!(decode_room(&text), Ok(record));
    }

    #[test]
    fn encoded_records_have_degree_plus_two_lines(record in record()) {
        let text = encode_room(&record);
        prop_assert!(text.ends_with('\n'));
        prop_assert_eq!(text.lines().count(), record.connections.len() + 2);
    }

    #[test]
    fn dropping_the_role_line_is_rejected(record in record()) {
        let text = encode_room(&record);
        let mut lines: Vec<&str> = text.lines().collect();
        lines.pop();
        let truncated = lines.join("\n");
        prop_assert!(decode_room(&truncated).is_err());
    }

    #[test]
    fn swapping_first_and_last_lines_is_rejected(record in record()) {
        let text = encode_room(&record);
        let mut lines: Vec<&str> = text.lines().collect();
        let last = lines.len() - 1;
        lines.swap(0, last);
        let result = decode_room(&lines.join("\n"));
        let rejected_on_line_one = matches!(result, Err(FormatError::BadLabel { line: 1, .. }));
        prop_assert!(rejected_on_line_one);
    }
}
