//! Canonical serialization of PDF objects.
//!
//! Output follows the syntax the parser reads back: names with `#xx`
//! escapes where needed, literal strings with backslash escapes and octal
//! for non-printable bytes, streams with a corrected direct /Length.

use crate::object::{Object, ObjectRef};

/// Serialize one object into `out`.
pub fn serialize_object(object: &Object, out: &mut Vec<u8>) {
    match object {
        Object::Null => out.extend_from_slice(b"null"),
        Object::Boolean(true) => out.extend_from_slice(b"true"),
        Object::Boolean(false) => out.extend_from_slice(b"false"),
        Object::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(r) => out.extend_from_slice(format_real(*r).as_bytes()),
        Object::String(bytes) => serialize_literal_string(bytes, out),
        Object::Name(name) => serialize_name(name, out),
        Object::Reference(ObjectRef { id, gen }) => {
            out.extend_from_slice(format!("{} {} R", id, gen).as_bytes());
        },
        Object::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                serialize_object(item, out);
            }
            out.push(b']');
        },
        Object::Dictionary(dict) => {
            out.extend_from_slice(b"<< ");
            for (key, value) in dict {
                serialize_name(key, out);
                out.push(b' ');
                serialize_object(value, out);
                out.push(b' ');
            }
            out.extend_from_slice(b">>");
        },
        Object::Stream { dict, data } => {
            // /Length must be direct and must match the payload we emit.
            let mut dict = dict.clone();
            dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
            serialize_object(&Object::Dictionary(dict), out);
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\nendstream");
        },
    }
}

/// Serialize an indirect object: `N G obj ... endobj`.
pub fn serialize_indirect_object(id: u32, gen: u16, object: &Object) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("{} {} obj\n", id, gen).as_bytes());
    serialize_object(object, &mut out);
    out.extend_from_slice(b"\nendobj\n");
    out
}

/// Format a real with enough precision to round-trip, without trailing
/// zeros and with a locale-independent dot separator.
fn format_real(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let mut text = format!("{:.6}", value);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    text
}

fn serialize_name(name: &str, out: &mut Vec<u8>) {
    out.push(b'/');
    for &byte in name.as_bytes() {
        let needs_escape = byte < b'!'
            || byte > b'~'
            || matches!(byte, b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%');
        if needs_escape {
            out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        } else {
            out.push(byte);
        }
    }
}

fn serialize_literal_string(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x20..=0x7E => out.push(byte),
            other => out.extend_from_slice(format!("\\{:03o}", other).as_bytes()),
        }
    }
    out.push(b')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dict;

    fn roundtrip(object: &Object) -> Object {
        let mut bytes = Vec::new();
        serialize_object(object, &mut bytes);
        crate::parser::parse_object(&bytes).unwrap().1
    }

    #[test]
    fn test_primitives() {
        let mut out = Vec::new();
        serialize_object(&Object::Integer(42), &mut out);
        assert_eq!(out, b"42");

        out.clear();
        serialize_object(&Object::Real(1.5), &mut out);
        assert_eq!(out, b"1.5");

        out.clear();
        serialize_object(&Object::Real(3.0), &mut out);
        assert_eq!(out, b"3");

        out.clear();
        serialize_object(&Object::Null, &mut out);
        assert_eq!(out, b"null");
    }

    #[test]
    fn test_string_escaping_round_trips() {
        let original = Object::String(b"a(b)c\\d\nbinary:\x01\xff".to_vec());
        assert_eq!(roundtrip(&original), original);
    }

    #[test]
    fn test_name_escaping_round_trips() {
        let original = Object::Name("Name With Spaces#and/hash".to_string());
        assert_eq!(roundtrip(&original), original);
    }

    #[test]
    fn test_array_and_dict() {
        let mut dict = Dict::new();
        dict.insert("Kids".to_string(), Object::Array(vec![
            Object::Reference(ObjectRef::new(3, 0)),
        ]));
        dict.insert("Count".to_string(), Object::Integer(1));
        let original = Object::Dictionary(dict);
        assert_eq!(roundtrip(&original), original);
    }

    #[test]
    fn test_stream_length_corrected() {
        let mut dict = Dict::new();
        dict.insert("Length".to_string(), Object::Reference(ObjectRef::new(9, 0)));
        let stream = Object::Stream {
            dict,
            data: bytes::Bytes::from_static(b"12345"),
        };
        let mut out = Vec::new();
        serialize_object(&stream, &mut out);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Length 5"));
        assert!(text.contains("stream\n12345\nendstream"));
    }

    #[test]
    fn test_indirect_object_shape() {
        let bytes = serialize_indirect_object(7, 0, &Object::Boolean(true));
        assert_eq!(bytes, b"7 0 obj\ntrue\nendobj\n");
    }
}
