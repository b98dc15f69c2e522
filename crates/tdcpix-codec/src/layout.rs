//! Bit layouts of the two TDCpix word kinds.
//!
//! Data word:
//!
//! ```text
//! 47     : data_selector (always 1)
//! 46..40 : address (0..=89)
//! 39..35 : address_arbiter (one-hot)
//! 34..30 : address_pileup (zero or one-hot)
//! 29     : leading_coarse_time_selector (always 0)
//! 28..17 : leading_coarse_time
//! 16..12 : leading_fine_time
//! 11     : trailing_coarse_time_selector (always 0)
//! 10..5  : trailing_coarse_time
//! 4..0   : trailing_fine_time
//! ```
//!
//! Frame word:
//!
//! ```text
//! 47..45 : frame_selector (always 0b111)
//! 44..43 : reserved
//! 42..37 : qchip_collision_count
//! 36..28 : hit_counter
//! 27..0  : frame_counter
//! ```

use crate::{
    bits::WORD_BITS,
    field::{Field, FieldRule},
    schema::Schema,
};

/// Highest pixel address reported by a TDCpix chip.
pub const MAX_ADDRESS: u8 = 89;

/// Number of sub-channels covered by the arbiter and pileup masks.
pub const SUBCHANNELS: u8 = 5;

/// Value of bits 47..45 that marks a frame word.
pub const FRAME_SELECTOR: u64 = 0b111;

pub(crate) mod data {
    pub const DATA_SELECTOR: usize = 0;
    pub const ADDRESS: usize = 1;
    pub const ADDRESS_ARBITER: usize = 2;
    pub const ADDRESS_PILEUP: usize = 3;
    pub const LEADING_COARSE_TIME_SELECTOR: usize = 4;
    pub const LEADING_COARSE_TIME: usize = 5;
    pub const LEADING_FINE_TIME: usize = 6;
    pub const TRAILING_COARSE_TIME_SELECTOR: usize = 7;
    pub const TRAILING_COARSE_TIME: usize = 8;
    pub const TRAILING_FINE_TIME: usize = 9;
}

pub(crate) mod frame {
    pub const FRAME_SELECTOR: usize = 0;
    pub const RESERVED: usize = 1;
    pub const QCHIP_COLLISION_COUNT: usize = 2;
    pub const HIT_COUNTER: usize = 3;
    pub const FRAME_COUNTER: usize = 4;
}

/// Field table of a data word, in the order used by [data_word_schema].
pub static DATA_WORD_FIELDS: [Field; 10] = [
    Field::bits("data_selector", 47, 47, FieldRule::Constant(1)),
    Field::bits(
        "address",
        46,
        40,
        FieldRule::Range {
            max: MAX_ADDRESS as u64,
        },
    ),
    Field::bits("address_arbiter", 39, 35, FieldRule::OneHot),
    Field::bits("address_pileup", 34, 30, FieldRule::OneHotOrZero),
    Field::bits("leading_coarse_time_selector", 29, 29, FieldRule::Constant(0)),
    Field::full("leading_coarse_time", 28, 17),
    Field::full("leading_fine_time", 16, 12),
    Field::bits("trailing_coarse_time_selector", 11, 11, FieldRule::Constant(0)),
    Field::full("trailing_coarse_time", 10, 5),
    Field::full("trailing_fine_time", 4, 0),
];

/// Field table of a frame word, in the order used by [frame_word_schema].
pub static FRAME_WORD_FIELDS: [Field; 5] = [
    Field::bits("frame_selector", 47, 45, FieldRule::Constant(FRAME_SELECTOR)),
    Field::full("reserved", 44, 43),
    Field::full("qchip_collision_count", 42, 37),
    Field::full("hit_counter", 36, 28),
    Field::full("frame_counter", 27, 0),
];

static DATA_WORD_SCHEMA: Schema = Schema::from_static(WORD_BITS, &DATA_WORD_FIELDS);
static FRAME_WORD_SCHEMA: Schema = Schema::from_static(WORD_BITS, &FRAME_WORD_FIELDS);

pub fn data_word_schema() -> &'static Schema {
    &DATA_WORD_SCHEMA
}

pub fn frame_word_schema() -> &'static Schema {
    &FRAME_WORD_SCHEMA
}
