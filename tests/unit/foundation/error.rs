use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DreamError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DreamError::synthesis("x")
            .to_string()
            .contains("synthesis error:")
    );
    assert!(
        DreamError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk full");
    let err = DreamError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk full"));
}
