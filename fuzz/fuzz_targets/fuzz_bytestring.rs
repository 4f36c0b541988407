#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wirecore::ByteString;

#[derive(Debug, Arbitrary)]
enum Op {
    Write(Vec<u8>),
    Append(Vec<u8>),
    Substr { slot: u8, start: u16, len: u16 },
    Clone { slot: u8 },
    Drop { slot: u8 },
    Recycle,
    Format(u32, String),
}

/// Applies `ops` to a working string while keeping a plain `Vec` model of
/// its contents, plus a pool of aliases and clones that must stay intact.
fn run(ops: Vec<Op>) {
    let mut s = ByteString::new();
    let mut model: Option<Vec<u8>> = None;
    let mut held: Vec<(ByteString, Vec<u8>)> = Vec::new();

    for op in ops {
        // The working string must be unique before it can be mutated.
        let mutates = matches!(
            op,
            Op::Write(_) | Op::Append(_) | Op::Recycle | Op::Format(..)
        );
        if mutates && s.ref_count() > 1 {
            s.recycle();
            model = None;
        }

        match op {
            Op::Write(bytes) => {
                s.recycle();
                s.extend_from_slice(&bytes);
                model = Some(bytes);
            }
            Op::Append(bytes) => {
                s.extend_from_slice(&bytes);
                model.get_or_insert_with(Vec::new).extend_from_slice(&bytes);
            }
            Op::Substr { slot, start, len } => {
                let Some(content) = &model else { continue };
                let start = usize::from(start) % (content.len() + 1);
                let len = usize::from(len) % (content.len() - start + 1);
                let alias = s.substr(start, len);
                held.push((alias, content[start..start + len].to_vec()));
                let slot = usize::from(slot) % held.len();
                let (nested, expected) = &held[slot];
                if !expected.is_empty() {
                    let again = nested.substr(0, expected.len() / 2);
                    let expected = expected[..expected.len() / 2].to_vec();
                    held.push((again, expected));
                }
            }
            Op::Clone { slot } => {
                if held.is_empty() {
                    if let Some(content) = &model {
                        held.push((s.clone(), content.clone()));
                    }
                    continue;
                }
                let (c, expected) = &held[usize::from(slot) % held.len()];
                held.push((c.clone(), expected.clone()));
            }
            Op::Drop { slot } => {
                if !held.is_empty() {
                    held.swap_remove(usize::from(slot) % held.len());
                }
            }
            Op::Recycle => {
                s.recycle();
                model = None;
            }
            Op::Format(n, text) => {
                s.recycle();
                let len = s.write_fmt_at(0, format_args!("{n}:{text}"));
                let rendered = format!("{n}:{text}").into_bytes();
                assert_eq!(len, rendered.len());
                model = Some(rendered);
            }
        }

        match &model {
            Some(content) => assert_eq!(s.as_bytes(), content.as_slice()),
            None => assert!(s.is_write_only()),
        }
        assert!(s.capacity() >= s.len());
        for (h, expected) in &held {
            assert_eq!(h.as_bytes(), expected.as_slice());
        }
    }
}

fuzz_target!(|ops: Vec<Op>| run(ops));
