//! Typed data and frame words and their encoders/decoders.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    bits::{WORD_BITS, extract_bits, one_hot, one_hot_position},
    errors::{DecodeError, EncodeError},
    hex::{parse_hex, render_hex},
    layout::{
        FRAME_SELECTOR, SUBCHANNELS, data, data_word_schema, frame, frame_word_schema,
    },
    pixel::Pixel,
};

/// Raw value of the frame word closing every generated chunk.
pub const SENTINEL_FRAME_WORD: u64 = 0xe8005000eb00;

/// One coarse-counter tick in picoseconds.
pub const COARSE_TICK_PS: u64 = 3_125;

/// One fine-interpolator tick in picoseconds.
pub const FINE_TICK_PS: u64 = 98;

/// A single pixel hit.
///
/// Arbiter and pileup are stored as bit positions; the masks written to the
/// word are derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataWord {
    pub address: u8,
    /// Which of the 5 sub-channels won arbitration.
    pub arbiter_bit: u8,
    /// Sub-channel that piled up, if any.
    pub pileup_bit: Option<u8>,
    pub leading_coarse_time: u16,
    pub leading_fine_time: u8,
    pub trailing_coarse_time: u8,
    pub trailing_fine_time: u8,
}

impl DataWord {
    pub fn arbiter_mask(&self) -> Result<u64, EncodeError> {
        subchannel_mask("address_arbiter", self.arbiter_bit)
    }

    pub fn pileup_mask(&self) -> Result<u64, EncodeError> {
        match self.pileup_bit {
            Some(bit) => subchannel_mask("address_pileup", bit),
            None => Ok(0),
        }
    }

    pub fn has_pileup(&self) -> bool {
        self.pileup_bit.is_some()
    }

    /// Packs the word. Selector bits are always set to their fixed values.
    pub fn encode(&self) -> Result<u64, EncodeError> {
        let mut values = [0u64; 10];
        values[data::DATA_SELECTOR] = 1;
        values[data::ADDRESS] = self.address as u64;
        values[data::ADDRESS_ARBITER] = self.arbiter_mask()?;
        values[data::ADDRESS_PILEUP] = self.pileup_mask()?;
        values[data::LEADING_COARSE_TIME_SELECTOR] = 0;
        values[data::LEADING_COARSE_TIME] = self.leading_coarse_time as u64;
        values[data::LEADING_FINE_TIME] = self.leading_fine_time as u64;
        values[data::TRAILING_COARSE_TIME_SELECTOR] = 0;
        values[data::TRAILING_COARSE_TIME] = self.trailing_coarse_time as u64;
        values[data::TRAILING_FINE_TIME] = self.trailing_fine_time as u64;

        data_word_schema().pack(&values)
    }

    pub fn decode(raw: u64) -> Result<Self, DecodeError> {
        let values = data_word_schema().unpack(raw)?;

        let arbiter = values[data::ADDRESS_ARBITER];
        let arbiter_bit = one_hot_position(arbiter).ok_or(DecodeError::NotOneHot {
            field: "address_arbiter",
            value: arbiter,
        })?;

        Ok(DataWord {
            address: values[data::ADDRESS] as u8,
            arbiter_bit,
            pileup_bit: one_hot_position(values[data::ADDRESS_PILEUP]),
            leading_coarse_time: values[data::LEADING_COARSE_TIME] as u16,
            leading_fine_time: values[data::LEADING_FINE_TIME] as u8,
            trailing_coarse_time: values[data::TRAILING_COARSE_TIME] as u8,
            trailing_fine_time: values[data::TRAILING_FINE_TIME] as u8,
        })
    }

    pub fn to_hex(&self) -> Result<String, EncodeError> {
        render_hex(self.encode()?)
    }

    /// Leading edge in picoseconds.
    pub fn start_time_ps(&self) -> u64 {
        self.leading_coarse_time as u64 * COARSE_TICK_PS
            + self.leading_fine_time as u64 * FINE_TICK_PS
    }

    /// Time over threshold in picoseconds, from the trailing fields.
    pub fn duration_ps(&self) -> u64 {
        self.trailing_coarse_time as u64 * COARSE_TICK_PS
            + self.trailing_fine_time as u64 * FINE_TICK_PS
    }

    pub fn end_time_ps(&self) -> u64 {
        self.start_time_ps() + self.duration_ps()
    }

    /// Matrix pixel that fired.
    pub fn pixel(&self) -> Result<Pixel, EncodeError> {
        check_subchannel("address_arbiter", self.arbiter_bit)?;
        Ok(Pixel::new(self.address, self.arbiter_bit))
    }

    /// Matrix pixel that piled up, if any.
    pub fn pileup_pixel(&self) -> Result<Option<Pixel>, EncodeError> {
        self.pileup_bit
            .map(|bit| {
                check_subchannel("address_pileup", bit)?;
                Ok(Pixel::new(self.address, bit))
            })
            .transpose()
    }
}

fn check_subchannel(field: &'static str, bit: u8) -> Result<(), EncodeError> {
    if bit >= SUBCHANNELS {
        return Err(EncodeError::InvalidBitPosition { field, bit });
    }

    Ok(())
}

fn subchannel_mask(field: &'static str, bit: u8) -> Result<u64, EncodeError> {
    check_subchannel(field, bit)?;
    Ok(one_hot(bit))
}

/// Summary record closing a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameWord {
    /// Bits 44..43, not assigned by the hardware table. Carried through unchanged.
    pub reserved: u8,
    pub qchip_collision_count: u8,
    pub hit_counter: u16,
    pub frame_counter: u32,
}

impl FrameWord {
    /// Field values of [SENTINEL_FRAME_WORD].
    pub const SENTINEL: FrameWord = FrameWord {
        reserved: 1,
        qchip_collision_count: 0,
        hit_counter: 5,
        frame_counter: 0xeb00,
    };

    pub fn new(qchip_collision_count: u8, hit_counter: u16, frame_counter: u32) -> Self {
        FrameWord {
            reserved: 0,
            qchip_collision_count,
            hit_counter,
            frame_counter,
        }
    }

    pub fn encode(&self) -> Result<u64, EncodeError> {
        let mut values = [0u64; 5];
        values[frame::FRAME_SELECTOR] = FRAME_SELECTOR;
        values[frame::RESERVED] = self.reserved as u64;
        values[frame::QCHIP_COLLISION_COUNT] = self.qchip_collision_count as u64;
        values[frame::HIT_COUNTER] = self.hit_counter as u64;
        values[frame::FRAME_COUNTER] = self.frame_counter as u64;

        frame_word_schema().pack(&values)
    }

    pub fn decode(raw: u64) -> Result<Self, DecodeError> {
        let values = frame_word_schema().unpack(raw)?;

        Ok(FrameWord {
            reserved: values[frame::RESERVED] as u8,
            qchip_collision_count: values[frame::QCHIP_COLLISION_COUNT] as u8,
            hit_counter: values[frame::HIT_COUNTER] as u16,
            frame_counter: values[frame::FRAME_COUNTER] as u32,
        })
    }

    pub fn to_hex(&self) -> Result<String, EncodeError> {
        render_hex(self.encode()?)
    }
}

/// Either kind of word, told apart by the frame selector in bits 47..45.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Word {
    Data(DataWord),
    Frame(FrameWord),
}

impl Word {
    pub fn is_frame_word(raw: u64) -> bool {
        extract_bits(raw, WORD_BITS - 3, 3) == FRAME_SELECTOR
    }

    pub fn decode(raw: u64) -> Result<Self, DecodeError> {
        if Self::is_frame_word(raw) {
            FrameWord::decode(raw).map(Word::Frame)
        } else {
            DataWord::decode(raw).map(Word::Data)
        }
    }

    pub fn from_hex(token: &str) -> Result<Self, DecodeError> {
        Self::decode(parse_hex(token)?)
    }

    pub fn encode(&self) -> Result<u64, EncodeError> {
        match self {
            Word::Data(word) => word.encode(),
            Word::Frame(word) => word.encode(),
        }
    }
}

/// Packs a data word; see [DataWord::encode].
pub fn encode_data_word(word: &DataWord) -> Result<u64, EncodeError> {
    word.encode()
}

/// The fixed frame word closing every generated chunk.
pub fn encode_frame_word() -> u64 {
    SENTINEL_FRAME_WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_word() -> DataWord {
        DataWord {
            address: 5,
            arbiter_bit: 2,
            pileup_bit: None,
            leading_coarse_time: 100,
            leading_fine_time: 3,
            trailing_coarse_time: 10,
            trailing_fine_time: 1,
        }
    }

    #[test]
    fn test_encode_data_word_by_hand() {
        let expected = 1u64 << 47
            | 5u64 << 40
            | 4u64 << 35
            | 0u64 << 30
            | 0u64 << 29
            | 100u64 << 17
            | 3u64 << 12
            | 0u64 << 11
            | 10u64 << 5
            | 1u64;
        assert_eq!(encode_data_word(&sample_word()), Ok(expected));
        assert_eq!(sample_word().to_hex().unwrap(), "852000c83141");
    }

    #[test]
    fn test_encode_data_word_with_pileup() {
        let word = DataWord {
            pileup_bit: Some(4),
            ..sample_word()
        };
        let raw = word.encode().unwrap();
        assert_eq!(extract_bits(raw, 30, 5), 0b10000);
    }

    #[test]
    fn test_encode_data_word_rejects_out_of_range() {
        let word = DataWord {
            address: 90,
            ..sample_word()
        };
        assert_eq!(
            word.encode().unwrap_err(),
            EncodeError::FieldOutOfRange {
                field: "address",
                value: 90,
                max: 89
            }
        );

        let word = DataWord {
            trailing_coarse_time: 64,
            ..sample_word()
        };
        assert_eq!(
            word.encode().unwrap_err(),
            EncodeError::FieldOutOfRange {
                field: "trailing_coarse_time",
                value: 64,
                max: 63
            }
        );

        let word = DataWord {
            leading_coarse_time: 4096,
            ..sample_word()
        };
        assert!(word.encode().is_err());
    }

    #[test]
    fn test_encode_data_word_rejects_bad_subchannel() {
        let word = DataWord {
            arbiter_bit: 5,
            ..sample_word()
        };
        assert_eq!(
            word.encode().unwrap_err(),
            EncodeError::InvalidBitPosition {
                field: "address_arbiter",
                bit: 5
            }
        );

        let word = DataWord {
            pileup_bit: Some(7),
            ..sample_word()
        };
        assert_eq!(
            word.encode().unwrap_err(),
            EncodeError::InvalidBitPosition {
                field: "address_pileup",
                bit: 7
            }
        );
    }

    #[test]
    fn test_decode_data_word() {
        let raw = sample_word().encode().unwrap();
        assert_eq!(DataWord::decode(raw), Ok(sample_word()));
    }

    #[test]
    fn test_decode_data_word_checks_selectors() {
        let raw = sample_word().encode().unwrap();

        assert_eq!(
            DataWord::decode(raw & !(1u64 << 47)).unwrap_err(),
            DecodeError::ConstantMismatch {
                field: "data_selector",
                expected: 1,
                actual: 0
            }
        );
        assert!(DataWord::decode(raw | 1u64 << 29).is_err());
        assert!(DataWord::decode(raw | 1u64 << 11).is_err());
    }

    #[test]
    fn test_decode_data_word_checks_masks() {
        let raw = sample_word().encode().unwrap();

        assert_eq!(
            DataWord::decode(raw | 1u64 << 35).unwrap_err(),
            DecodeError::NotOneHot {
                field: "address_arbiter",
                value: 0b00101
            }
        );
        assert!(DataWord::decode(raw | 0b11u64 << 30).is_err());
    }

    #[test]
    fn test_timing() {
        let word = sample_word();
        assert_eq!(word.start_time_ps(), 100 * 3_125 + 3 * 98);
        assert_eq!(word.duration_ps(), 10 * 3_125 + 98);
        assert_eq!(word.end_time_ps(), word.start_time_ps() + word.duration_ps());
    }

    #[test]
    fn test_pixels() {
        let word = DataWord {
            address: 89,
            arbiter_bit: 4,
            pileup_bit: Some(1),
            ..sample_word()
        };
        assert_eq!(word.pixel(), Ok(Pixel { x: 9, y: 44 }));
        assert_eq!(word.pileup_pixel(), Ok(Some(Pixel { x: 9, y: 17 })));
        assert_eq!(sample_word().pileup_pixel(), Ok(None));
    }

    #[test]
    fn test_pixels_reject_bad_subchannel() {
        let word = DataWord {
            arbiter_bit: 5,
            pileup_bit: Some(6),
            ..sample_word()
        };
        assert_eq!(
            word.pixel(),
            Err(EncodeError::InvalidBitPosition {
                field: "address_arbiter",
                bit: 5
            })
        );
        assert_eq!(
            word.pileup_pixel(),
            Err(EncodeError::InvalidBitPosition {
                field: "address_pileup",
                bit: 6
            })
        );
    }

    #[test]
    fn test_sentinel_is_general_encoding() {
        assert_eq!(FrameWord::SENTINEL.encode(), Ok(SENTINEL_FRAME_WORD));
        assert_eq!(encode_frame_word(), 0xe8005000eb00);
        assert_eq!(FrameWord::SENTINEL.to_hex().unwrap(), "e8005000eb00");
        assert_eq!(FrameWord::decode(SENTINEL_FRAME_WORD), Ok(FrameWord::SENTINEL));
    }

    #[test]
    fn test_encode_frame_word() {
        let word = FrameWord::new(63, 511, (1 << 28) - 1);
        assert_eq!(word.encode(), Ok(0xe7ff_ffff_ffff));
        assert_eq!(FrameWord::new(0, 0, 0).encode(), Ok(0xe000_0000_0000));
    }

    #[test]
    fn test_encode_frame_word_rejects_out_of_range() {
        assert_eq!(
            FrameWord::new(64, 0, 0).encode().unwrap_err(),
            EncodeError::FieldOutOfRange {
                field: "qchip_collision_count",
                value: 64,
                max: 63
            }
        );
        assert!(FrameWord::new(0, 512, 0).encode().is_err());
        assert!(FrameWord::new(0, 0, 1 << 28).encode().is_err());
    }

    #[test]
    fn test_word_classification() {
        assert!(Word::is_frame_word(SENTINEL_FRAME_WORD));
        assert!(!Word::is_frame_word(sample_word().encode().unwrap()));

        let highest = DataWord {
            address: 89,
            ..sample_word()
        };
        assert!(!Word::is_frame_word(highest.encode().unwrap()));
    }

    #[test]
    fn test_word_from_hex() {
        assert_eq!(
            Word::from_hex("e8005000eb00"),
            Ok(Word::Frame(FrameWord::SENTINEL))
        );
        assert_eq!(
            Word::from_hex("852000c83141"),
            Ok(Word::Data(sample_word()))
        );
        assert_eq!(
            Word::Data(sample_word()).encode(),
            sample_word().encode()
        );
    }
}
