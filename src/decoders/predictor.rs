//! PNG/TIFF predictor reversal for FlateDecode streams.
//!
//! Cross-reference streams are almost always written with the PNG Up
//! predictor, so this cannot be skipped even in a trimmed filter set.

use crate::decoders::DecodeParams;
use crate::error::{Error, Result};

/// Reverse the predictor applied to `data`.
///
/// Predictor 1 returns the input unchanged, 2 is TIFF horizontal
/// differencing, and 10..=15 are the per-row PNG filters.
pub fn apply_predictor(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => apply_tiff(data, params),
        10..=15 => apply_png(data, params),
        other => Err(Error::Decode(format!("unknown predictor {}", other))),
    }
}

fn bytes_per_pixel(params: &DecodeParams) -> usize {
    ((params.colors * params.bits_per_component) + 7) / 8
}

fn row_length(params: &DecodeParams) -> usize {
    ((params.columns * params.colors * params.bits_per_component) + 7) / 8
}

fn apply_tiff(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    if params.bits_per_component != 8 {
        return Err(Error::Decode(
            "TIFF predictor only supported for 8 bits per component".to_string(),
        ));
    }
    let row_len = row_length(params);
    let bpp = bytes_per_pixel(params);
    let mut out = data.to_vec();
    for row in out.chunks_mut(row_len) {
        for i in bpp..row.len() {
            row[i] = row[i].wrapping_add(row[i - bpp]);
        }
    }
    Ok(out)
}

fn apply_png(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    let row_len = row_length(params);
    let bpp = bytes_per_pixel(params);
    // Each PNG row is prefixed with one filter-type byte.
    let stride = row_len + 1;
    if stride == 1 || data.len() % stride != 0 {
        return Err(Error::Decode(format!(
            "PNG predictor: data length {} is not a multiple of row stride {}",
            data.len(),
            stride
        )));
    }

    let rows = data.len() / stride;
    let mut out = Vec::with_capacity(rows * row_len);
    let mut prev_row = vec![0u8; row_len];

    for r in 0..rows {
        let filter_type = data[r * stride];
        let row_in = &data[r * stride + 1..(r + 1) * stride];
        let mut row = row_in.to_vec();

        match filter_type {
            0 => {},
            // Sub
            1 => {
                for i in bpp..row_len {
                    row[i] = row[i].wrapping_add(row[i - bpp]);
                }
            },
            // Up
            2 => {
                for i in 0..row_len {
                    row[i] = row[i].wrapping_add(prev_row[i]);
                }
            },
            // Average
            3 => {
                for i in 0..row_len {
                    let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                    let up = prev_row[i] as u16;
                    row[i] = row[i].wrapping_add(((left + up) / 2) as u8);
                }
            },
            // Paeth
            4 => {
                for i in 0..row_len {
                    let left = if i >= bpp { row[i - bpp] as i16 } else { 0 };
                    let up = prev_row[i] as i16;
                    let up_left = if i >= bpp { prev_row[i - bpp] as i16 } else { 0 };
                    row[i] = row[i].wrapping_add(paeth(left, up, up_left));
                }
            },
            other => {
                return Err(Error::Decode(format!("invalid PNG filter type {}", other)));
            },
        }

        out.extend_from_slice(&row);
        prev_row = row;
    }
    Ok(out)
}

fn paeth(a: i16, b: i16, c: i16) -> u8 {
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();
    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(columns: usize) -> DecodeParams {
        DecodeParams {
            predictor: 12,
            columns,
            colors: 1,
            bits_per_component: 8,
        }
    }

    #[test]
    fn test_png_none_filter() {
        // Two rows of 3 bytes, filter type 0.
        let data = [0, 1, 2, 3, 0, 4, 5, 6];
        let out = apply_predictor(&data, &params(3)).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_png_up_filter() {
        // Row 1: [1,2,3]; row 2 stored as deltas against row 1.
        let data = [0, 1, 2, 3, 2, 1, 1, 1];
        let out = apply_predictor(&data, &params(3)).unwrap();
        assert_eq!(out, vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn test_png_sub_filter() {
        let data = [1, 5, 1, 1];
        let out = apply_predictor(&data, &params(3)).unwrap();
        assert_eq!(out, vec![5, 6, 7]);
    }

    #[test]
    fn test_bad_stride_is_error() {
        let data = [0, 1, 2];
        assert!(apply_predictor(&data, &params(3)).is_err());
    }

    #[test]
    fn test_identity_predictor() {
        let p = DecodeParams::default();
        assert_eq!(apply_predictor(&[9, 8, 7], &p).unwrap(), vec![9, 8, 7]);
    }
}
