//! Byte utilities for key ordering.

use bytes::{Bytes, BytesMut};

/// Computes the lexicographic successor of a byte sequence.
///
/// Returns the smallest byte sequence that is strictly greater than the
/// input. Returns `None` if no such sequence exists (i.e., input is empty or
/// all `0xFF` bytes).
///
/// This is the resume key for batched scans: a caller that saw `k` as the
/// last visited key continues an interrupted scan from `next_key(k)`.
///
/// # Algorithm
///
/// Starting from the rightmost byte:
/// - If it's less than `0xFF`, increment it and return
/// - If it's `0xFF`, remove it and try to increment the previous byte
/// - If all bytes are `0xFF` (or input is empty), return `None`
///
/// # Examples
///
/// - `[0x61]` ("a") → `Some([0x62])` ("b")
/// - `[0x61, 0xFF]` → `Some([0x62])`
/// - `[0xFF]` → `None`
/// - `[]` → `None`
pub fn next_key(data: &[u8]) -> Option<Bytes> {
    if data.is_empty() {
        return None;
    }

    let mut result = BytesMut::from(data);

    // Work backwards, looking for a byte we can increment
    while let Some(last) = result.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(result.freeze());
        }
        // Last byte is 0xFF, truncate it and try the previous byte
        result.truncate(result.len() - 1);
    }

    // All bytes were 0xFF, no valid successor exists
    None
}
