//! Binary encoding of embedding vectors for the relational copy.
//!
//! Vectors are packed as little-endian IEEE-754 `f32` values, four bytes per
//! element, with no length prefix. The dimension is stored out-of-band in the
//! `embedding_dimensions` column. Non-finite values are encoded bit-for-bit.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{RagStoreError, Result};

/// Width of one encoded element in bytes.
pub const F32_WIDTH: usize = std::mem::size_of::<f32>();

/// Encode a vector into `4 * vector.len()` bytes.
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(vector.len() * F32_WIDTH);
    for &value in vector {
        buf.put_f32_le(value);
    }
    buf.to_vec()
}

/// Decode bytes produced by [`encode_vector`].
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % F32_WIDTH != 0 {
        return Err(RagStoreError::codec(format!(
            "encoded vector length {} is not a multiple of {F32_WIDTH}",
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let mut out = Vec::with_capacity(bytes.len() / F32_WIDTH);
    while buf.has_remaining() {
        out.push(buf.get_f32_le());
    }
    Ok(out)
}

/// Decode bytes and check them against the stored dimension.
pub fn decode_vector_with_dimension(bytes: &[u8], dimension: usize) -> Result<Vec<f32>> {
    let expected_len = dimension
        .checked_mul(F32_WIDTH)
        .ok_or_else(|| RagStoreError::codec(format!("dimension {dimension} overflows")))?;

    if bytes.len() != expected_len {
        return Err(RagStoreError::codec(format!(
            "invalid embedding byte length: expected {expected_len}, got {}",
            bytes.len()
        )));
    }

    decode_vector(bytes)
}
