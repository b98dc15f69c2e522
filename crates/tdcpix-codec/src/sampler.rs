//! Random data-word sampling.
//!
//! Every field is drawn uniformly from its valid range, so sampled words always
//! encode. The only non-uniform field is the pileup mask, set on one draw in
//! `pileup_odds`.

use rand::Rng;
use tracing::trace;

use crate::{
    layout::{MAX_ADDRESS, SUBCHANNELS},
    word::DataWord,
};

/// One pileup in this many data words, on average.
pub const DEFAULT_PILEUP_ODDS: u32 = 333;

/// Anything that can hand out data words to a [crate::chunk::ChunkAssembler].
pub trait DataWordSource {
    fn next_data_word(&mut self) -> DataWord;
}

impl<F> DataWordSource for F
where
    F: FnMut() -> DataWord,
{
    fn next_data_word(&mut self) -> DataWord {
        self()
    }
}

/// Draws data words from an injected random number generator.
#[derive(Debug, Clone)]
pub struct RandomSampler<R> {
    rng: R,
    pileup_odds: u32,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            pileup_odds: DEFAULT_PILEUP_ODDS,
        }
    }

    /// Sets the pileup trigger to one in `odds` (values below 1 are treated as 1).
    pub fn with_pileup_odds(mut self, odds: u32) -> Self {
        self.pileup_odds = odds.max(1);
        self
    }

    pub fn pileup_odds(&self) -> u32 {
        self.pileup_odds
    }

    /// Draws one word. The draw order is fixed so that a seeded generator
    /// reproduces the same stream.
    pub fn sample(&mut self) -> DataWord {
        let address = self.rng.gen_range(0..=MAX_ADDRESS);
        let arbiter_bit = self.rng.gen_range(0..SUBCHANNELS);

        let pileup_bit = if self.rng.gen_range(0..self.pileup_odds) == 0 {
            let bit = self.rng.gen_range(0..SUBCHANNELS);
            trace!(address, bit, "pileup injected");
            Some(bit)
        } else {
            None
        };

        let leading_coarse_time = self.rng.gen_range(0..=4095);
        let leading_fine_time = self.rng.gen_range(0..=31);
        let trailing_coarse_time = self.rng.gen_range(0..=63);
        let trailing_fine_time = self.rng.gen_range(0..=31);

        DataWord {
            address,
            arbiter_bit,
            pileup_bit,
            leading_coarse_time,
            leading_fine_time,
            trailing_coarse_time,
            trailing_fine_time,
        }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> DataWordSource for RandomSampler<R> {
    fn next_data_word(&mut self) -> DataWord {
        self.sample()
    }
}
