//! Definition of the bit fields used to build a [crate::schema::Schema].

use crate::{
    bits::{is_one_hot, mask},
    errors::{DecodeError, EncodeError},
};

/// A single named bit range inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name used as the key in [crate::schema::FieldValues].
    pub name: &'static str,
    /// Position of the least significant bit of the field.
    pub lsb: u32,
    /// Number of bits.
    pub width: u32,
    /// Which values the field may hold.
    pub rule: FieldRule,
}

/// Constraint on the value stored in a [Field].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Any value in `0..=max`.
    Range { max: u64 },
    /// Always this value. May be omitted when serializing.
    Constant(u64),
    /// Exactly one bit set.
    OneHot,
    /// Zero, or exactly one bit set.
    OneHotOrZero,
}

impl Field {
    /// Builds a field from the inclusive `msb..=lsb` notation of the hardware tables.
    ///
    /// `msb` must not be below `lsb`.
    pub const fn bits(name: &'static str, msb: u32, lsb: u32, rule: FieldRule) -> Self {
        debug_assert!(msb >= lsb, "field msb below lsb");
        Field {
            name,
            lsb,
            width: msb - lsb + 1,
            rule,
        }
    }

    /// Field that accepts every value its width can hold.
    pub const fn full(name: &'static str, msb: u32, lsb: u32) -> Self {
        debug_assert!(msb >= lsb, "field msb below lsb");
        Self::bits(name, msb, lsb, FieldRule::Range { max: mask(msb - lsb + 1) })
    }

    /// Position of the most significant bit.
    pub fn msb(&self) -> u32 {
        self.lsb.saturating_add(self.width.saturating_sub(1))
    }

    /// Mask of this field's bits in word position.
    pub fn word_mask(&self) -> u64 {
        mask(self.width) << self.lsb
    }

    pub(crate) fn check(&self, value: u64) -> Result<(), Violation> {
        if value > mask(self.width) {
            return Err(Violation::OutOfRange { max: mask(self.width) });
        }

        match self.rule {
            FieldRule::Range { max } if value > max => Err(Violation::OutOfRange { max }),
            FieldRule::Constant(expected) if value != expected => {
                Err(Violation::ConstantMismatch { expected })
            }
            FieldRule::OneHot if !is_one_hot(value) => Err(Violation::NotOneHot),
            FieldRule::OneHotOrZero if value != 0 && !is_one_hot(value) => {
                Err(Violation::NotOneHot)
            }
            _ => Ok(()),
        }
    }
}

/// Rule violation found by [Field::check], turned into an encode or decode error by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    OutOfRange { max: u64 },
    ConstantMismatch { expected: u64 },
    NotOneHot,
}

impl Violation {
    pub(crate) fn into_encode(self, field: &Field, value: u64) -> EncodeError {
        match self {
            Violation::OutOfRange { max } => EncodeError::FieldOutOfRange {
                field: field.name,
                value,
                max,
            },
            Violation::ConstantMismatch { expected } => EncodeError::ConstantMismatch {
                field: field.name,
                expected,
                actual: value,
            },
            Violation::NotOneHot => EncodeError::NotOneHot {
                field: field.name,
                value,
            },
        }
    }

    pub(crate) fn into_decode(self, field: &Field, value: u64) -> DecodeError {
        match self {
            Violation::OutOfRange { max } => DecodeError::FieldOutOfRange {
                field: field.name,
                value,
                max,
            },
            Violation::ConstantMismatch { expected } => DecodeError::ConstantMismatch {
                field: field.name,
                expected,
                actual: value,
            },
            Violation::NotOneHot => DecodeError::NotOneHot {
                field: field.name,
                value,
            },
        }
    }
}
