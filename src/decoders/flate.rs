//! FlateDecode (zlib/deflate) decompression.

use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Inflate a FlateDecode stream.
///
/// Tries zlib first (the spec-mandated wrapper), then raw deflate as a
/// fallback for generators that omit the two-byte header.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut decoder = ZlibDecoder::new(data);
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(zlib_err) => {
            out.clear();
            let mut raw = flate2::read::DeflateDecoder::new(data);
            raw.read_to_end(&mut out)
                .map_err(|_| Error::Decode(format!("FlateDecode failed: {}", zlib_err)))?;
            log::warn!("FlateDecode stream missing zlib header, decoded as raw deflate");
            Ok(out)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_zlib_stream() {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"BT (hi) Tj ET").unwrap();
        let data = enc.finish().unwrap();
        assert_eq!(decode(&data).unwrap(), b"BT (hi) Tj ET");
    }

    #[test]
    fn test_headerless_deflate_stream() {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"0 0 612 792 re f").unwrap();
        let data = enc.finish().unwrap();
        assert_eq!(decode(&data).unwrap(), b"0 0 612 792 re f");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode(b"\xff\xfe\xfd not deflate").is_err());
    }
}
