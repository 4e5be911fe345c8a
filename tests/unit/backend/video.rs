use super::*;

#[test]
fn default_registry_holds_one_disabled_entry() {
    let registry = default_registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].name, "Pika Labs");
    assert_eq!(registry[0].url, "https://api.pika.art/generate");
    assert!(!registry[0].enabled);
}

#[test]
fn disabled_entry_fails_without_network() {
    // Port 9 (discard) would hang or refuse if a request were made.
    let backend =
        RegisteredVideoBackend::new(VideoBackendEntry::disabled("off", "http://127.0.0.1:9/")).unwrap();
    assert_eq!(backend.id(), "off");
    let err = backend.attempt("a dancing robot").unwrap_err();
    assert!(matches!(err, BackendError::Disabled { ref name } if name == "off"));
}

#[test]
fn entry_deserializes_with_defaults() {
    let entry: VideoBackendEntry =
        serde_json::from_str(r#"{ "name": "x", "url": "http://example.invalid" }"#).unwrap();
    assert!(!entry.enabled);
    assert_eq!(entry.timeout_secs, 120);
}
