use std::fs;

use context_assembly::{ContextAssembler, ContextPayload, Section};
use tempfile::tempdir;

#[test]
fn golden_payload_serialization() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("story.md"), "# Story 1.2\n").unwrap();

    let mut assembler = ContextAssembler::new(dir.path()).unwrap();
    assembler.add_focal_document("story.md", true).unwrap();
    assembler.add_virtual("[git-diff]", "+ fn new() {}", Section::PriorArtifacts);
    let payload = assembler.build();

    let story_key = fs::canonicalize(dir.path().join("story.md"))
        .unwrap()
        .to_string_lossy()
        .into_owned();

    let json = serde_json::to_value(&payload).unwrap();
    let expected = serde_json::json!([
        { "key": "[git-diff]", "content": "+ fn new() {}" },
        { "key": story_key, "content": "# Story 1.2\n" }
    ]);
    assert_eq!(json, expected);

    let text = serde_json::to_string(&payload).unwrap();
    let key_pos = text.find("\"key\"").unwrap();
    let content_pos = text.find("\"content\"").unwrap();
    assert!(key_pos < content_pos, "key must precede content");

    let back: ContextPayload = serde_json::from_str(&text).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn fingerprint_is_sensitive_to_order_and_boundaries() {
    let a: ContextPayload = serde_json::from_str(
        r#"[{"key":"a","content":"bc"},{"key":"d","content":"e"}]"#,
    )
    .unwrap();
    let b: ContextPayload = serde_json::from_str(
        r#"[{"key":"d","content":"e"},{"key":"a","content":"bc"}]"#,
    )
    .unwrap();
    let c: ContextPayload = serde_json::from_str(
        r#"[{"key":"ab","content":"c"},{"key":"d","content":"e"}]"#,
    )
    .unwrap();

    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert!(a.fingerprint().as_str().starts_with("sha256:"));
    assert_eq!(a.fingerprint().as_str().len(), "sha256:".len() + 64);
}

#[test]
fn payload_accessors() {
    let payload: ContextPayload = serde_json::from_str(
        r#"[{"key":"one","content":"12345678"},{"key":"two","content":"x"}]"#,
    )
    .unwrap();

    assert_eq!(payload.len(), 2);
    assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["one", "two"]);
    assert_eq!(payload.get("two"), Some("x"));
    assert_eq!(payload.get("three"), None);
    assert_eq!(payload.estimated_tokens(), 3);
    assert_eq!(payload.clone().into_entries().len(), 2);
}
