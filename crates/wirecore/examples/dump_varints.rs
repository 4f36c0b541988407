//! Walks a protobuf-style message and prints each field.
//!
//! Every field starts with a varint tag holding the field number and wire
//! type. Varint payloads are decoded and printed, fixed-width payloads are
//! read little-endian, and length-delimited payloads are cut out of the
//! loaded file as zero-copy substrings. Optional `number=type` arguments
//! declare field types; a field whose wire type its declared type does not
//! accept stops the walk, as does malformed input. Failures are reported
//! through a `Status`.
//!
//! Run with
//!
//! ```bash
//! cargo run -p wirecore --example dump_varints -- message.bin 1=int32 2=string
//! ```
//!
//! Without a file argument a small built-in message is used.

use std::{collections::BTreeMap, env, process::ExitCode};

use wirecore::{
    ByteString, FieldType, Status, StatusCode, WireType, set_status,
    varint::{self, zigzag_decode_64},
};

/// Field 1 = varint 150, field 2 = "testing", field 3 = sint32 -2,
/// field 4 = fixed32 1.
const SAMPLE: &[u8] = &[
    0x08, 0x96, 0x01, 0x12, 0x07, b't', b'e', b's', b't', b'i', b'n', b'g', 0x18, 0x03, 0x25, 0x01,
    0x00, 0x00, 0x00,
];

fn parse_declaration(arg: &str) -> Option<(u64, FieldType)> {
    let (number, name) = arg.split_once('=')?;
    let number = number.parse().ok()?;
    let field_type = FieldType::ALL
        .into_iter()
        .find(|t| t.to_string() == name)?;
    Some((number, field_type))
}

/// Reads a varint at `*pos`, advancing past it.
fn read_varint(input: &ByteString, pos: &mut usize, status: &mut Status) -> Option<u64> {
    match varint::decode(&input.as_bytes()[*pos..]) {
        Ok(decoded) => {
            *pos += decoded.len;
            Some(decoded.value)
        }
        Err(err) => {
            *status = Status::from(err);
            None
        }
    }
}

/// Cuts `len` bytes at `*pos` out of `input`, advancing past them.
fn take(input: &ByteString, pos: &mut usize, len: u64, status: &mut Status) -> Option<ByteString> {
    let available = input.len() - *pos;
    match usize::try_from(len) {
        Ok(len) if len <= available => {
            let bytes = input.substr(*pos, len);
            *pos += len;
            Some(bytes)
        }
        _ => {
            set_status!(
                status,
                StatusCode::Eof,
                "payload of {len} bytes at offset {pos} overruns the input"
            );
            None
        }
    }
}

fn fixed(bytes: &[u8]) -> u64 {
    let mut le = [0u8; 8];
    le[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(le)
}

fn dump(input: &ByteString, declared: &BTreeMap<u64, FieldType>, status: &mut Status) {
    let mut pos = 0;
    while pos < input.len() {
        let Some(tag) = read_varint(input, &mut pos, status) else {
            return;
        };
        let number = tag >> 3;
        #[allow(clippy::cast_possible_truncation)]
        let Some(wire_type) = WireType::from_u8((tag & 0x7) as u8) else {
            set_status!(status, StatusCode::Error, "field {number} has wire type {}", tag & 0x7);
            return;
        };
        let field_type = declared.get(&number).copied();
        if let Some(field_type) = field_type {
            if !field_type.info().accepts(wire_type) {
                set_status!(
                    status,
                    StatusCode::Error,
                    "field {number} is declared {field_type} but encoded as {wire_type}"
                );
                return;
            }
        }

        let label = field_type.map_or_else(|| wire_type.to_string(), |t| t.to_string());
        match wire_type {
            WireType::Varint => {
                let Some(value) = read_varint(input, &mut pos, status) else {
                    return;
                };
                match field_type {
                    Some(FieldType::Sint32 | FieldType::Sint64) => {
                        println!("{number} {label}: {}", zigzag_decode_64(value));
                    }
                    _ => println!("{number} {label}: {value}"),
                }
            }
            WireType::Fixed64 | WireType::Fixed32 => {
                let width = if wire_type == WireType::Fixed64 { 8 } else { 4 };
                let Some(bytes) = take(input, &mut pos, width, status) else {
                    return;
                };
                println!("{number} {label}: {}", fixed(bytes.as_bytes()));
            }
            WireType::Delimited => {
                let Some(len) = read_varint(input, &mut pos, status) else {
                    return;
                };
                let Some(bytes) = take(input, &mut pos, len, status) else {
                    return;
                };
                println!("{number} {label}: {bytes:?}");
            }
            WireType::StartGroup | WireType::EndGroup => println!("{number} {label}"),
        }
    }
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1).peekable();
    let input = match args.next_if(|arg| !arg.contains('=')) {
        Some(path) => match ByteString::read_file(&path) {
            Ok(input) => input,
            Err(err) => {
                Status::from_error(StatusCode::Error, &err).print();
                return ExitCode::FAILURE;
            }
        },
        None => ByteString::from_static(SAMPLE),
    };

    let mut declared = BTreeMap::new();
    for arg in args {
        let Some((number, field_type)) = parse_declaration(&arg) else {
            eprintln!("expected <number>=<type>, got {arg:?}");
            return ExitCode::FAILURE;
        };
        declared.insert(number, field_type);
    }
    if declared.is_empty() && input.as_bytes() == SAMPLE {
        declared.extend([
            (1, FieldType::Int32),
            (2, FieldType::String),
            (3, FieldType::Sint32),
            (4, FieldType::Fixed32),
        ]);
    }

    let mut status = Status::new();
    dump(&input, &declared, &mut status);
    if status.is_ok() {
        ExitCode::SUCCESS
    } else {
        status.print();
        ExitCode::FAILURE
    }
}
