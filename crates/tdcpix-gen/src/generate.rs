//! `generate` subcommand.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tdcpix_codec::{
    chunk::{ChunkAssembler, DEFAULT_DATA_WORDS_PER_CHUNK, GenerateStats},
    config::{DEFAULT_NUM_CHUNKS, GeneratorConfig},
    errors::GenerateError,
    sampler::{DEFAULT_PILEUP_ODDS, RandomSampler},
};
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of chunks (output lines)
    #[arg(long, default_value_t = DEFAULT_NUM_CHUNKS)]
    pub chunks: usize,

    /// Data words per chunk, before the frame word
    #[arg(long, default_value_t = DEFAULT_DATA_WORDS_PER_CHUNK)]
    pub data_words: usize,

    /// Inject pileup on one data word in this many
    #[arg(long, default_value_t = DEFAULT_PILEUP_ODDS)]
    pub pileup_odds: u32,

    /// Seed for reproducible output; drawn from the OS when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file, or `-` for stdout
    #[arg(short, long, default_value = "chunky_chunk.txt")]
    pub output: PathBuf,
}

impl GenerateArgs {
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            num_chunks: self.chunks,
            data_words_per_chunk: self.data_words,
            pileup_odds: self.pileup_odds,
            seed: self.seed,
        }
    }
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = args.config();
    config.validate().context("invalid generator settings")?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        chunks = config.num_chunks,
        data_words = config.data_words_per_chunk,
        pileup_odds = config.pileup_odds,
        "generating chunks"
    );

    let stats = if args.output.as_os_str() == "-" {
        generate_to(&config, seed, BufWriter::new(io::stdout().lock()))
            .context("failed to write chunks to stdout")?
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?;
        generate_to(&config, seed, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", args.output.display()))?
    };

    info!(
        chunks = stats.chunks,
        data_words = stats.data_words,
        pileup_words = stats.pileup_words,
        output = %args.output.display(),
        "done"
    );

    Ok(())
}

/// Writes the configured chunks into `sink` from a ChaCha stream seeded with `seed`.
pub fn generate_to<W: Write>(
    config: &GeneratorConfig,
    seed: u64,
    sink: W,
) -> Result<GenerateStats, GenerateError> {
    let sampler = RandomSampler::new(ChaCha8Rng::seed_from_u64(seed))
        .with_pileup_odds(config.pileup_odds);

    ChunkAssembler::new(sampler).write_output(
        sink,
        config.num_chunks,
        config.data_words_per_chunk,
    )
}
