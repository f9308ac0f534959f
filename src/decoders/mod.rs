//! Stream filter decoding.
//!
//! Only the filters a redaction pass actually meets on content and xref
//! streams are implemented: FlateDecode (with the PNG predictors used by
//! cross-reference streams) and ASCIIHexDecode. Anything else is an
//! `UnsupportedFilter` error rather than a silent pass-through; handing the
//! content parser still-encoded bytes would make every downstream decision
//! wrong.

mod flate;
mod predictor;

use crate::error::{Error, Result};

pub use predictor::apply_predictor;

/// Decode parameters for filters that take a DecodeParms dictionary.
#[derive(Debug, Clone, Copy)]
pub struct DecodeParams {
    /// Predictor algorithm (1 = none, 2 = TIFF, 10..15 = PNG)
    pub predictor: i64,
    /// Samples per row
    pub columns: usize,
    /// Color components per sample
    pub colors: usize,
    /// Bits per color component
    pub bits_per_component: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            columns: 1,
            colors: 1,
            bits_per_component: 8,
        }
    }
}

/// Run `data` through a filter chain in order.
///
/// # Errors
///
/// Returns `UnsupportedFilter` for filters outside the supported set and
/// `Decode` when a filter rejects its input.
pub fn decode_stream(
    data: &[u8],
    filters: &[String],
    params: Option<&DecodeParams>,
) -> Result<Vec<u8>> {
    let mut current = data.to_vec();
    for filter in filters {
        current = match filter.as_str() {
            "FlateDecode" | "Fl" => {
                let inflated = flate::decode(&current)?;
                match params {
                    Some(p) if p.predictor > 1 => apply_predictor(&inflated, p)?,
                    _ => inflated,
                }
            },
            "ASCIIHexDecode" | "AHx" => decode_ascii_hex(&current)?,
            other => return Err(Error::UnsupportedFilter(other.to_string())),
        };
    }
    Ok(current)
}

/// Decode an ASCIIHexDecode stream.
///
/// Whitespace is ignored; `>` terminates the data; an odd trailing digit is
/// padded with zero per the spec.
fn decode_ascii_hex(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2);
    let mut high: Option<u8> = None;

    for &byte in data {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C => continue,
            b'>' => break,
            other => {
                return Err(Error::Decode(format!(
                    "invalid character 0x{:02x} in ASCIIHex stream",
                    other
                )))
            },
        };
        match high.take() {
            Some(h) => out.push((h << 4) | digit),
            None => high = Some(digit),
        }
    }

    if let Some(h) = high {
        out.push(h << 4);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_hex_basic() {
        assert_eq!(decode_ascii_hex(b"48656C6C6F>").unwrap(), b"Hello");
    }

    #[test]
    fn test_ascii_hex_whitespace_and_odd_digit() {
        assert_eq!(decode_ascii_hex(b"48 65 6C\n6C 7>").unwrap(), b"Hell\x70");
    }

    #[test]
    fn test_ascii_hex_rejects_garbage() {
        assert!(decode_ascii_hex(b"48ZZ>").is_err());
    }

    #[test]
    fn test_decode_stream_chain() {
        let filters = vec!["ASCIIHexDecode".to_string()];
        assert_eq!(decode_stream(b"414243>", &filters, None).unwrap(), b"ABC");
    }

    #[test]
    fn test_decode_stream_unknown_filter() {
        let filters = vec!["DCTDecode".to_string()];
        match decode_stream(b"", &filters, None) {
            Err(Error::UnsupportedFilter(name)) => assert_eq!(name, "DCTDecode"),
            _ => panic!("expected UnsupportedFilter"),
        }
    }

    #[test]
    fn test_flate_round_trip() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"q 0 0 0 rg BT ET Q").unwrap();
        let compressed = encoder.finish().unwrap();

        let filters = vec!["FlateDecode".to_string()];
        let decoded = decode_stream(&compressed, &filters, None).unwrap();
        assert_eq!(decoded, b"q 0 0 0 rg BT ET Q");
    }
}
