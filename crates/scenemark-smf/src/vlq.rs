//! Variable-length quantities.
//!
//! Seven value bits per byte, most-significant group first. Every byte except
//! the last has its high bit set. The container limits a quantity to four
//! encoded bytes, so the largest representable value is `0x0FFF_FFFF`.

use crate::{Error, Result};
use bytes::BufMut;

/// Largest value that fits in four encoded bytes.
pub const MAX_VALUE: u64 = 0x0FFF_FFFF;

/// Maximum number of bytes in one encoded quantity.
pub const MAX_BYTES: usize = 4;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u64 = 0x7F;

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: u64) -> Result<usize> {
    if value > MAX_VALUE {
        return Err(Error::ValueTooLarge(value));
    }
    let mut len = 1;
    let mut rest = value >> 7;
    while rest > 0 {
        len += 1;
        rest >>= 7;
    }
    Ok(len)
}

/// Encode `value` into a new byte vector.
pub fn encode(value: u64) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(MAX_BYTES);
    write(&mut out, value)?;
    Ok(out)
}

/// Append the encoding of `value` to `buf`, returning the number of bytes written.
pub fn write<B: BufMut>(buf: &mut B, value: u64) -> Result<usize> {
    let len = encoded_len(value)?;
    for i in (0..len).rev() {
        let group = ((value >> (7 * i)) & GROUP_MASK) as u8;
        if i == 0 {
            buf.put_u8(group);
        } else {
            buf.put_u8(group | CONTINUATION);
        }
    }
    Ok(len)
}

/// Decode one quantity starting at `offset`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    for consumed in 0..MAX_BYTES {
        let pos = offset + consumed;
        let byte = *bytes.get(pos).ok_or(Error::TruncatedInput { offset: pos })?;
        value = (value << 7) | (byte as u64 & GROUP_MASK);
        if byte & CONTINUATION == 0 {
            return Ok((value, consumed + 1));
        }
    }
    Err(Error::malformed(format!(
        "variable-length quantity at offset {} exceeds {} bytes",
        offset, MAX_BYTES
    )))
}
