use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_documented_backends() {
    let cfg = DreamConfig::default();
    assert_eq!(cfg.hosted.url, DEFAULT_HOSTED_URL);
    assert_eq!(cfg.free.url, DEFAULT_FREE_URL);
    assert_eq!(cfg.free.timeout(), Duration::from_secs(10));
    assert_eq!(cfg.free.min_body_bytes, 1000);
    assert_eq!(cfg.hosted.guidance_scale, 7.5);
    assert_eq!(cfg.hosted.num_inference_steps, 25);
    assert_eq!(cfg.image, Canvas::square_512());
    assert_eq!(cfg.video.timing.frame_count(), 72);
    assert!(!cfg.has_hosted_credential());
    cfg.validate().unwrap();
}

#[test]
fn token_presence_switches_hosted_backend_on() {
    let cfg = DreamConfig::from_lookup(lookup_from(&[(ENV_HOSTED_TOKEN, "hf_abc")])).unwrap();
    assert!(cfg.has_hosted_credential());
    assert_eq!(
        cfg.hosted.credential().unwrap().expose_secret(),
        "hf_abc"
    );
}

#[test]
fn blank_token_counts_as_absent() {
    let cfg = DreamConfig::from_lookup(lookup_from(&[(ENV_HOSTED_TOKEN, "   ")])).unwrap();
    assert!(!cfg.has_hosted_credential());
}

#[test]
fn debug_output_never_contains_the_token() {
    let cfg = DreamConfig::from_lookup(lookup_from(&[(ENV_HOSTED_TOKEN, "hf_secret_value")]))
        .unwrap();
    assert!(!format!("{cfg:?}").contains("hf_secret_value"));
}

#[test]
fn env_overrides_are_applied() {
    let cfg = DreamConfig::from_lookup(lookup_from(&[
        (ENV_OUTPUT_ROOT, "/srv/media"),
        (ENV_FREE_URL, "http://127.0.0.1:9/prompt/"),
        (ENV_FREE_TIMEOUT, "3"),
        (ENV_HOSTED_TIMEOUT, "45"),
    ]))
    .unwrap();
    assert_eq!(cfg.output_root, PathBuf::from("/srv/media"));
    assert_eq!(cfg.free.url, "http://127.0.0.1:9/prompt/");
    assert_eq!(cfg.free.timeout_secs, 3);
    assert_eq!(cfg.hosted.timeout_secs, 45);
}

#[test]
fn malformed_timeout_is_a_validation_error() {
    let err = DreamConfig::from_lookup(lookup_from(&[(ENV_FREE_TIMEOUT, "soon")])).unwrap_err();
    assert!(matches!(err, DreamError::Validation(_)));
}

#[test]
fn odd_video_dimensions_are_rejected() {
    let mut cfg = DreamConfig::default();
    cfg.video.canvas = Canvas::new(511, 512).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn json_config_fills_missing_fields_with_defaults() {
    let cfg: DreamConfig = serde_json::from_str(
        r#"{ "output_root": "out", "hosted": { "token": "t0k" }, "video": { "chunk_size": 8 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.output_root, PathBuf::from("out"));
    assert!(cfg.has_hosted_credential());
    assert_eq!(cfg.hosted.url, DEFAULT_HOSTED_URL);
    assert_eq!(cfg.video.chunk_size, 8);
    assert_eq!(cfg.video.timing.fps, 24);
}

#[test]
fn default_video_registry_is_disabled_pika() {
    let cfg = DreamConfig::default();
    assert_eq!(cfg.video.backends.len(), 1);
    assert_eq!(cfg.video.backends[0].name, "Pika Labs");
    assert!(!cfg.video.backends[0].enabled);

    let cfg: DreamConfig = serde_json::from_str(
        r#"{ "video": { "backends": [ { "name": "local", "url": "http://127.0.0.1:1/gen", "enabled": true } ] } }"#,
    )
    .unwrap();
    assert_eq!(cfg.video.backends[0].timeout_secs, 120);
    assert!(cfg.video.backends[0].enabled);
}
