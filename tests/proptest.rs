//! Property-based tests for tgchat.
//!
//! These tests generate random exports and text payloads and check the
//! invariants that must hold for every decoded conversation.

use proptest::prelude::*;
use serde_json::{Value, json};

use tgchat::prelude::*;

/// A generated fragment: `None` for a bare string, `Some(kind)` for an entity.
fn arb_fragment() -> impl Strategy<Value = (Option<String>, String)> {
    (
        prop::option::of(prop::sample::select(vec![
            "bold".to_string(),
            "italic".to_string(),
            "link".to_string(),
            "code".to_string(),
            "phone".to_string(),
            "plain".to_string(),
            "strikethrough".to_string(),
            "spoiler".to_string(),
        ])),
        prop::sample::select(vec![
            "Hello".to_string(),
            " ".to_string(),
            "https://example.com".to_string(),
            "Привет мир".to_string(),
            "🎉".to_string(),
            "a \"quoted\" {brace}".to_string(),
            "line\nbreak".to_string(),
            String::new(),
        ]),
    )
}

fn fragment_json((kind, text): &(Option<String>, String)) -> Value {
    match kind {
        Some(kind) => json!({"type": kind, "text": text}),
        None => json!(text),
    }
}

/// A generated record: (sender index, is service, fragments)
fn arb_record() -> impl Strategy<Value = (usize, bool, Vec<(Option<String>, String)>)> {
    (0usize..4, prop::bool::weighted(0.2), prop::collection::vec(arb_fragment(), 0..5))
}

const SENDERS: [(&str, &str); 4] = [
    ("Bob", "user42"),
    ("Alice", "user7"),
    ("Иван", "user8"),
    ("User 🎉", "user9"),
];

fn build_export(records: &[(usize, bool, Vec<(Option<String>, String)>)]) -> String {
    let messages: Vec<Value> = records
        .iter()
        .enumerate()
        .map(|(i, (sender, service, fragments))| {
            let (name, id) = SENDERS[*sender];
            let kind = if *service { "service" } else { "message" };
            let text: Vec<Value> = fragments.iter().map(fragment_json).collect();
            json!({
                "id": i + 1,
                "type": kind,
                "date": "2024-01-15T10:30:00",
                "from": name,
                "from_id": id,
                "text": text,
            })
        })
        .collect();

    json!({"name": "Bob", "type": "personal_chat", "id": 42, "messages": messages}).to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Decoding any JSON value as text never panics.
    #[test]
    fn text_decode_never_panics(s in "\\PC*") {
        let _ = MessageText::decode(&s);
        let _ = MessageText::decode(&json!(s).to_string());
    }

    /// Fragments, when present, concatenate to the flattened text.
    #[test]
    fn fragments_concatenate_to_text(fragments in prop::collection::vec(arb_fragment(), 0..8)) {
        let raw = Value::Array(fragments.iter().map(fragment_json).collect()).to_string();
        let text = MessageText::decode(&raw);

        let expected: String = fragments.iter().map(|(_, t)| t.as_str()).collect();
        prop_assert_eq!(text.as_str(), expected.as_str());
        prop_assert_eq!(text.fragments().len(), fragments.len());

        let joined: String = text.fragments().iter().map(|f| f.text.as_str()).collect();
        prop_assert_eq!(joined, expected);
    }

    /// Bare strings become plain fragments, entities keep their kind.
    #[test]
    fn fragment_kinds_follow_input(fragments in prop::collection::vec(arb_fragment(), 1..8)) {
        let raw = Value::Array(fragments.iter().map(fragment_json).collect()).to_string();
        let text = MessageText::decode(&raw);

        for (decoded, (kind, _)) in text.fragments().iter().zip(&fragments) {
            let expected = kind.as_deref().unwrap_or("plain");
            prop_assert_eq!(decoded.kind.as_str(), expected);
        }
    }

    /// Kept messages are the non-service records, in document order.
    #[test]
    fn service_events_removed_order_preserved(records in prop::collection::vec(arb_record(), 0..30)) {
        let conv = parse_conversation(build_export(&records).as_bytes()).unwrap();

        let expected: Vec<i64> = records
            .iter()
            .enumerate()
            .filter(|(_, (_, service, _))| !service)
            .map(|(i, _)| i as i64 + 1)
            .collect();
        let ids: Vec<i64> = conv.messages().iter().map(Message::id).collect();

        prop_assert_eq!(ids, expected);
        prop_assert!(conv.messages().iter().all(|m| !m.is_service()));
    }

    /// The first person is the sender of the first non-partner message.
    #[test]
    fn first_person_matches_first_other_sender(records in prop::collection::vec(arb_record(), 0..30)) {
        let conv = parse_conversation(build_export(&records).as_bytes()).unwrap();

        let expected = records
            .iter()
            .filter(|(sender, service, _)| !service && *sender != 0)
            .map(|(sender, _, _)| SENDERS[*sender])
            .next();

        match expected {
            Some((name, id)) => {
                prop_assert_eq!(conv.first_person_id(), id);
                prop_assert_eq!(conv.first_person_name(), name);
            }
            None => {
                prop_assert_eq!(conv.first_person_id(), "");
                prop_assert_eq!(conv.first_person_name(), "");
            }
        }
        prop_assert_eq!(conv.partner_id(), "user42");
    }

    /// Decoding the same bytes twice gives equal conversations.
    #[test]
    fn decoding_is_deterministic(records in prop::collection::vec(arb_record(), 0..20)) {
        let export = build_export(&records);
        let first = parse_conversation(export.as_bytes()).unwrap();
        let second = parse_conversation(export.as_bytes()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Export dates are parsed for any valid calendar time.
    #[test]
    fn export_dates_parse(
        year in 2000i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let date = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}");
        let parsed = tgchat::message::parse_export_date(&date).unwrap();
        prop_assert_eq!(parsed.format("%Y-%m-%dT%H:%M:%S").to_string(), date);
    }
}
