//! Generator configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::DEFAULT_DATA_WORDS_PER_CHUNK, errors::ConfigError, sampler::DEFAULT_PILEUP_ODDS,
};

/// Number of chunks written when nothing else is requested.
pub const DEFAULT_NUM_CHUNKS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneratorConfig {
    pub num_chunks: usize,
    pub data_words_per_chunk: usize,
    /// Pileup is injected on one data word in this many.
    pub pileup_odds: u32,
    /// Seed for the ChaCha stream. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_chunks: DEFAULT_NUM_CHUNKS,
            data_words_per_chunk: DEFAULT_DATA_WORDS_PER_CHUNK,
            pileup_odds: DEFAULT_PILEUP_ODDS,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_chunks == 0 {
            return Err(ConfigError::NotPositive("num_chunks"));
        }
        if self.data_words_per_chunk == 0 {
            return Err(ConfigError::NotPositive("data_words_per_chunk"));
        }
        if self.pileup_odds == 0 {
            return Err(ConfigError::NotPositive("pileup_odds"));
        }

        Ok(())
    }
}
