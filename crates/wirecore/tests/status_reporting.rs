#![allow(missing_docs)]
use wirecore::{DecodeError, Status, StatusCode, set_status, varint};

/// Decodes consecutive varints, stopping at the first failure.
fn decode_all(mut input: &[u8], status: &mut Status) -> Vec<u64> {
    let mut values = Vec::new();
    while !input.is_empty() {
        match varint::decode(input) {
            Ok(decoded) => {
                values.push(decoded.value);
                input = &input[decoded.len..];
            }
            Err(err) => {
                *status = Status::from(err);
                break;
            }
        }
    }
    values
}

#[test]
fn clean_stream_leaves_status_ok() {
    let mut status = Status::new();
    let values = decode_all(&[0x96, 0x01, 0x00, 0x7f], &mut status);
    assert_eq!(values, [150, 0, 127]);
    assert!(status.is_ok());
    assert_eq!(status.to_string(), "code: 0, no msg");
}

#[test]
fn truncated_stream_reports_eof() {
    let mut status = Status::new();
    let values = decode_all(&[0x01, 0x80, 0x80], &mut status);
    assert_eq!(values, [1]);
    assert_eq!(status.code(), StatusCode::Eof);
    assert_eq!(
        status.to_string(),
        "code: 1, msg: varint truncated after 2 bytes"
    );
}

#[test]
fn unterminated_stream_reports_error() {
    let mut status = Status::new();
    let values = decode_all(&[0xff; 12], &mut status);
    assert!(values.is_empty());
    assert_eq!(status.code(), StatusCode::Error);
    assert_eq!(status.message(), Some(&b"unterminated varint"[..]));
}

#[test]
fn statuses_propagate_by_copy() {
    let mut inner = Status::new();
    set_status!(inner, StatusCode::Error, "field {} has wire type {}", 3, 7);

    let mut outer = Status::new();
    outer.copy_from(&inner);
    inner.clear();

    assert!(inner.is_ok());
    assert_eq!(outer.to_string(), "code: 2, msg: field 3 has wire type 7");
}

#[test]
fn status_from_any_error() {
    let err = DecodeError::Truncated { available: 0 };
    let status = Status::from_error(StatusCode::Error, &err);
    assert_eq!(status.code(), StatusCode::Error);

    let mut out = Vec::new();
    status.write_to(&mut out).unwrap();
    assert_eq!(out, b"code: 2, msg: varint truncated after 0 bytes\n");
}
