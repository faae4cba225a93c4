// Canonical JSON: sorted keys, ", " and ": " separators, ASCII-only strings.
// Hashes computed over this encoding must be stable across processes, so
// nothing here may depend on map iteration order or locale.
use crate::error::Result;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Formatter producing `{"a": 1, "b": [1, 2]}` with non-ASCII escaped as `\uXXXX`
///
/// Floats keep serde_json's shortest form. Values that need an exponent come
/// out as `1e16` where a Python-style dumper writes `1e+16`; block
/// timestamps stay in plain decimal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Encode `data` canonically.
///
/// The value is first lifted into a [`serde_json::Value`], whose object maps
/// are ordered by key, so struct field declaration order never leaks into
/// the output.
pub fn to_canonical_json<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(data)?;
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
