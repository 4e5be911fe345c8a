use super::*;

#[test]
fn prompt_is_trimmed() {
    let req = GenerationRequest::new("  neon koi pond \n", None).unwrap();
    assert_eq!(req.prompt(), "neon koi pond");
    assert_eq!(req.filename_hint(), None);
}

#[test]
fn empty_and_whitespace_prompts_are_rejected() {
    for prompt in ["", "   ", "\t\n"] {
        let err = GenerationRequest::new(prompt, None).unwrap_err();
        assert!(matches!(err, DreamError::Validation(_)), "{prompt:?}");
    }
}

#[test]
fn filename_hint_accepts_simple_stems() {
    let req = GenerationRequest::new("x", Some("my_dream-01")).unwrap();
    assert_eq!(req.filename_hint(), Some("my_dream-01"));
}

#[test]
fn filename_hint_rejects_path_tricks() {
    for hint in ["../escape", "a/b", "a\\b", "dream.png", "", "spaces here"] {
        assert!(
            GenerationRequest::new("x", Some(hint)).is_err(),
            "hint {hint:?} should be rejected"
        );
    }
}

#[test]
fn filename_hint_length_is_bounded() {
    let long = "a".repeat(MAX_FILENAME_HINT_LEN + 1);
    assert!(GenerationRequest::new("x", Some(&long)).is_err());
    let ok = "a".repeat(MAX_FILENAME_HINT_LEN);
    assert!(GenerationRequest::new("x", Some(&ok)).is_ok());
}
