use hessian::{decode_to_value, Deserializer, Error, Value};
use rstest::rstest;

#[rstest]
#[case(&[0x90], 0)]
#[case(&[0x80], -16)]
#[case(&[0xBF], 47)]
#[case(&[0xC8, 0x00], 0)]
#[case(&[0xC0, 0x00], -2048)]
#[case(&[0xCF, 0xFF], 2047)]
#[case(&[0xD4, 0x00, 0x00], 0)]
#[case(&[0xD0, 0x00, 0x00], -262_144)]
#[case(&[0xD7, 0xFF, 0xFF], 262_143)]
#[case(&[0x49, 0x80, 0x00, 0x00, 0x00], i32::MIN)]
#[case(&[0x49, 0x7F, 0xFF, 0xFF, 0xFF], i32::MAX)]
fn test_int_boundaries(#[case] data: &[u8], #[case] expected: i32) {
    let mut ds = Deserializer::new(data);
    assert_eq!(ds.read_int().unwrap(), expected);
}

#[rstest]
#[case(&[0xE0], 0)]
#[case(&[0xD8], -8)]
#[case(&[0xEF], 15)]
#[case(&[0xF8, 0x00], 0)]
#[case(&[0xF0, 0x00], -2048)]
#[case(&[0xFF, 0xFF], 2047)]
#[case(&[0x3C, 0x00, 0x00], 0)]
#[case(&[0x38, 0x00, 0x00], -262_144)]
#[case(&[0x3F, 0xFF, 0xFF], 262_143)]
#[case(&[0x59, 0x80, 0x00, 0x00, 0x00], i32::MIN as i64)]
#[case(&[0x59, 0x7F, 0xFF, 0xFF, 0xFF], i32::MAX as i64)]
#[case(&[0x4C, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], i64::MIN)]
#[case(&[0x4C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], i64::MAX)]
fn test_long_boundaries(#[case] data: &[u8], #[case] expected: i64) {
    let mut ds = Deserializer::new(data);
    assert_eq!(ds.read_long().unwrap(), expected);
}

#[rstest]
#[case(&[0x5B], 0.0)]
#[case(&[0x5C], 1.0)]
#[case(&[0x5D, 0x80], -128.0)]
#[case(&[0x5D, 0x7F], 127.0)]
#[case(&[0x5E, 0x80, 0x00], -32_768.0)]
#[case(&[0x5E, 0x7F, 0xFF], 32_767.0)]
fn test_compact_double_tiers(#[case] data: &[u8], #[case] expected: f64) {
    let mut ds = Deserializer::new(data);
    assert_eq!(ds.read_double().unwrap(), expected);
}

#[rstest]
fn test_float_and_full_doubles() {
    let mut data = vec![0x5F];
    data.extend_from_slice(&12.5f32.to_be_bytes());
    let mut ds = Deserializer::new(data.as_slice());
    assert_eq!(ds.read_double().unwrap(), 12.5);

    let mut data = vec![0x44];
    data.extend_from_slice(&12.25f64.to_be_bytes());
    let mut ds = Deserializer::new(data.as_slice());
    assert_eq!(ds.read_double().unwrap(), 12.25);

    let mut data = vec![0x44];
    data.extend_from_slice(&0.1f64.to_be_bytes());
    let mut ds = Deserializer::new(data.as_slice());
    assert_eq!(ds.read_double().unwrap(), 0.1);
}

#[rstest]
fn test_booleans_and_null() {
    assert_eq!(decode_to_value(&[0x54]).unwrap(), Value::Bool(true));
    assert_eq!(decode_to_value(&[0x46]).unwrap(), Value::Bool(false));
    assert_eq!(decode_to_value(&[0x4E]).unwrap(), Value::Null);
}

#[rstest]
fn test_dates() {
    // 2:51:31 May 8, 1998 UTC, the classic Hessian example.
    let millis: i64 = 894_621_091_000;
    let mut data = vec![0x4A];
    data.extend_from_slice(&millis.to_be_bytes());
    let mut ds = Deserializer::new(data.as_slice());
    assert_eq!(ds.read_date().unwrap(), millis);

    // Same instant at minute resolution.
    let minutes = (millis / 60_000) as i32;
    let mut data = vec![0x4B];
    data.extend_from_slice(&minutes.to_be_bytes());
    let mut ds = Deserializer::new(data.as_slice());
    assert_eq!(ds.read_date().unwrap(), minutes as i64 * 60_000);
}

#[rstest]
fn test_typed_accessors_reject_foreign_tags() {
    // An integer tag is not a string.
    let err = Deserializer::new([0x90].as_slice()).read_string().unwrap_err();
    match err {
        Error::UnexpectedTag { tag, expected } => {
            assert_eq!(tag, 0x90);
            assert_eq!(expected, "string");
        }
        other => panic!("expected UnexpectedTag, got {other:?}"),
    }

    // A string tag is not an integer.
    let err = Deserializer::new([0x05].as_slice()).read_int().unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedTag { tag: 0x05, expected: "int" }
    ));

    assert!(Deserializer::new([0x54].as_slice()).read_double().is_err());
    assert!(Deserializer::new([0x5B].as_slice()).read_bool().is_err());
    assert!(Deserializer::new([0x90].as_slice()).read_date().is_err());
}

// Every possible tag byte, fed alone, must either decode to a value or fail
// with one of the named error conditions.
#[rstest]
fn test_every_tag_byte_is_accounted_for() {
    for tag in 0u8..=0xFF {
        match decode_to_value(&[tag]) {
            Ok(_) => {}
            Err(
                Error::EndOfStream
                | Error::UnsupportedTag(_)
                | Error::InvalidReference { .. }
                | Error::InvalidClassRef { .. },
            ) => {}
            Err(other) => panic!("tag {tag:#04X} produced unexpected error {other:?}"),
        }
    }
}

#[rstest]
fn test_unsupported_tags_are_fatal() {
    for tag in [0x45u8, 0x47, 0x50, 0x5A] {
        assert!(matches!(
            decode_to_value(&[tag]),
            Err(Error::UnsupportedTag(t)) if t == tag
        ));
    }
}

#[rstest]
fn test_reserved_tag_is_skipped() {
    // 0x40 is consumed and decoding continues with the next tag.
    assert_eq!(decode_to_value(&[0x40, 0x90]).unwrap(), Value::Int(0));
}
