use super::*;

#[test]
fn random_ids_are_short_lowercase_hex() {
    let ids = RandomIdSource;
    let id = ids.next_hex8();
    assert_eq!(id.len(), 8);
    assert!(
        id.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
}

#[test]
fn random_ids_do_not_repeat() {
    let ids = RandomIdSource;
    let a = ids.next_hex8();
    let b = ids.next_hex8();
    assert_ne!(a, b);
}

#[test]
fn sequence_ids_count_up() {
    let ids = SequenceIdSource::starting_at(0xfe);
    assert_eq!(ids.next_hex8(), "000000fe");
    assert_eq!(ids.next_hex8(), "000000ff");
    assert_eq!(ids.next_hex8(), "00000100");
}
