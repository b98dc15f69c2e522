//! Low-level bit utilities for words held in the low bits of a `u64`.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of the word.

/// Width of every TDCpix word in bits.
pub const WORD_BITS: u32 = 48;

/// Largest value representable in a TDCpix word.
pub const WORD_MAX: u64 = mask(WORD_BITS);

/// Returns a mask with the low `width` bits set (max 64).
pub const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Reads `width` bits of `word` starting at bit `lsb`.
pub fn extract_bits(word: u64, lsb: u32, width: u32) -> u64 {
    (word >> lsb) & mask(width)
}

/// Clears `width` bits of `word` at `lsb` and ORs `value` into them.
///
/// `value` must already fit in `width` bits; callers validate before inserting.
pub fn insert_bits(word: u64, lsb: u32, width: u32, value: u64) -> u64 {
    debug_assert!(value <= mask(width));
    let field_mask = mask(width) << lsb;
    (word & !field_mask) | ((value << lsb) & field_mask)
}

/// True if exactly one bit of `value` is set.
pub fn is_one_hot(value: u64) -> bool {
    value.count_ones() == 1
}

/// Mask with only bit `position` set. `position` must be below 64.
pub fn one_hot(position: u8) -> u64 {
    debug_assert!(position < 64, "bit position out of range");
    1u64 << position
}

/// Position of the single set bit, or `None` if `value` is not one-hot.
pub fn one_hot_position(value: u64) -> Option<u8> {
    if is_one_hot(value) {
        Some(value.trailing_zeros() as u8)
    } else {
        None
    }
}
