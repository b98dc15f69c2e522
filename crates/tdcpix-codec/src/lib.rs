//! # tdcpix-codec
//!
//! Bit-level codec and test-vector generator for the 48-bit words of the
//! TDCpix readout.
//!
//! Both word kinds are described by a field table ([layout]) that a generic
//! [schema::Schema] packs and unpacks, so encoding and decoding share one
//! source of truth. On top of that sit typed [word::DataWord]/[word::FrameWord]
//! values, a random [sampler::RandomSampler], and the [chunk::ChunkAssembler]
//! that writes chunk lines. [pixel] places decoded hits on the pixel matrix.
//!
//! ## Example
//!
//! ```
//! use tdcpix_codec::chunk::ChunkAssembler;
//! use tdcpix_codec::word::DataWord;
//!
//! let hit = DataWord {
//!     address: 5,
//!     arbiter_bit: 2,
//!     pileup_bit: None,
//!     leading_coarse_time: 100,
//!     leading_fine_time: 3,
//!     trailing_coarse_time: 10,
//!     trailing_fine_time: 1,
//! };
//! let mut assembler = ChunkAssembler::new(move || hit);
//! let line = assembler.generate_chunk(2).unwrap();
//! assert_eq!(line, "852000c83141 852000c83141 e8005000eb00");
//! ```

pub mod bits;
pub mod chunk;
pub mod config;
pub mod errors;
pub mod field;
pub mod hex;
pub mod layout;
pub mod pixel;
pub mod sampler;
pub mod schema;
pub mod word;
