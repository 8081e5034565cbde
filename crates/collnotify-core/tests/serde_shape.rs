#![cfg(feature = "serde")]

use collnotify_core::{
    BatchChangeEvent, MutationAction, MutationRecord, SuspendConfig, SuspensionMode,
};

#[test]
fn modes_use_snake_case_names() {
    let json = serde_json::to_string(&SuspensionMode::MixedConsolidate).unwrap();
    assert_eq!(json, "\"mixed_consolidate\"");
    let mode: SuspensionMode = serde_json::from_str("\"mixed_bash\"").unwrap();
    assert_eq!(mode, SuspensionMode::MixedBash);
}

#[test]
fn event_json_shape() {
    let event = BatchChangeEvent::from_records(
        MutationAction::Add,
        vec![MutationRecord::add("p", 0), MutationRecord::new("q", None, MutationAction::Add)],
    );
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["action"], "add");
    assert_eq!(value["items"], serde_json::json!(["p", "q"]));
    assert_eq!(value["indices"], serde_json::json!([0, null]));
}

#[test]
fn config_fills_missing_fields() {
    let config: SuspendConfig = serde_json::from_str(r#"{ "max_nesting": 4 }"#).unwrap();
    assert_eq!(config, SuspendConfig::default().with_max_nesting(4));
}

#[test]
fn event_survives_json() {
    let event = BatchChangeEvent::mixed_sequence(vec![
        MutationRecord::add(1, 0),
        MutationRecord::new(2, None, MutationAction::Remove),
    ]);
    let json = serde_json::to_string(&event).unwrap();
    let back: BatchChangeEvent<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn reset_without_actions_field_loads() {
    let event: BatchChangeEvent<u8> =
        serde_json::from_str(r#"{ "action": "reset", "items": [], "indices": [] }"#).unwrap();
    assert_eq!(event, BatchChangeEvent::reset());
}

#[test]
fn malformed_events_are_rejected() {
    let cases = [
        // items and indices differ in length
        r#"{ "action": "add", "items": [1, 2], "indices": [0], "actions": [] }"#,
        // per-item actions on a homogeneous event
        r#"{ "action": "remove", "items": [1], "indices": [0], "actions": ["add"] }"#,
        // mixed sequence missing an action
        r#"{ "action": "mixed_sequence", "items": [1, 2], "indices": [0, 1], "actions": ["add"] }"#,
        // reset with items
        r#"{ "action": "reset", "items": [1], "indices": [null], "actions": [] }"#,
    ];
    for json in cases {
        let err = serde_json::from_str::<BatchChangeEvent<u8>>(json).unwrap_err();
        assert!(
            err.to_string().contains("malformed change event"),
            "{json}: {err}"
        );
    }
}
