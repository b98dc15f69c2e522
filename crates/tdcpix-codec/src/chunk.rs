//! Chunks: runs of data words closed by one frame word, one text line each.

use std::io::{BufRead, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{DecodeError, EncodeError, GenerateError, ReadChunksError},
    hex::parse_hex,
    sampler::DataWordSource,
    word::{DataWord, FrameWord, Word},
};

/// Data words per chunk in a standard test file.
pub const DEFAULT_DATA_WORDS_PER_CHUNK: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    pub data_words: Vec<DataWord>,
    pub frame_word: FrameWord,
}

impl Chunk {
    /// Renders the chunk as one line of space-separated tokens, without the line break.
    pub fn render(&self) -> Result<String, EncodeError> {
        let mut line = String::with_capacity((self.data_words.len() + 1) * 13);

        for word in &self.data_words {
            line.push_str(&word.to_hex()?);
            line.push(' ');
        }
        line.push_str(&self.frame_word.to_hex()?);

        Ok(line)
    }

    pub fn pileup_count(&self) -> usize {
        self.data_words.iter().filter(|w| w.has_pileup()).count()
    }
}

/// Parses one chunk line. The last token must be a frame word and every other
/// token a data word.
pub fn parse_chunk_line(line: &str) -> Result<Chunk, DecodeError> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let last = tokens.pop().ok_or(DecodeError::EmptyLine)?;

    let frame_word = match Word::decode(parse_hex(last)?)? {
        Word::Frame(frame_word) => frame_word,
        Word::Data(_) => return Err(DecodeError::MissingFrameWord),
    };

    let mut data_words = Vec::with_capacity(tokens.len());
    for (position, token) in tokens.into_iter().enumerate() {
        match Word::decode(parse_hex(token)?)? {
            Word::Data(word) => data_words.push(word),
            Word::Frame(_) => return Err(DecodeError::UnexpectedFrameWord(position)),
        }
    }

    Ok(Chunk {
        data_words,
        frame_word,
    })
}

/// Reads one chunk per non-blank line.
pub fn read_chunks<R: BufRead>(reader: R) -> Result<Vec<Chunk>, ReadChunksError> {
    let mut chunks = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let chunk = parse_chunk_line(&line).map_err(|source| ReadChunksError::Decode {
            line: index + 1,
            source,
        })?;
        chunks.push(chunk);
    }

    Ok(chunks)
}

/// Counters reported by [ChunkAssembler::write_output].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub chunks: usize,
    pub data_words: usize,
    pub pileup_words: usize,
}

/// Builds chunks from a [DataWordSource] and closes each one with the frame word.
#[derive(Debug, Clone)]
pub struct ChunkAssembler<S> {
    source: S,
    frame_word: FrameWord,
}

impl<S: DataWordSource> ChunkAssembler<S> {
    /// Assembler closing every chunk with [FrameWord::SENTINEL].
    pub fn new(source: S) -> Self {
        Self {
            source,
            frame_word: FrameWord::SENTINEL,
        }
    }

    pub fn with_frame_word(mut self, frame_word: FrameWord) -> Self {
        self.frame_word = frame_word;
        self
    }

    /// Draws `num_data_words` words and closes them with the frame word.
    pub fn next_chunk(&mut self, num_data_words: usize) -> Chunk {
        let data_words = (0..num_data_words)
            .map(|_| self.source.next_data_word())
            .collect();

        Chunk {
            data_words,
            frame_word: self.frame_word,
        }
    }

    /// One rendered chunk line, without the line break.
    pub fn generate_chunk(&mut self, num_data_words: usize) -> Result<String, EncodeError> {
        self.next_chunk(num_data_words).render()
    }

    /// `num_chunks` rendered lines, in generation order.
    pub fn generate_output(
        &mut self,
        num_chunks: usize,
        num_data_words: usize,
    ) -> Result<Vec<String>, EncodeError> {
        (0..num_chunks)
            .map(|_| self.generate_chunk(num_data_words))
            .collect()
    }

    /// Streams `num_chunks` lines into `sink`, each terminated by `\n`.
    pub fn write_output<W: Write>(
        &mut self,
        mut sink: W,
        num_chunks: usize,
        num_data_words: usize,
    ) -> Result<GenerateStats, GenerateError> {
        let mut stats = GenerateStats::default();

        for index in 0..num_chunks {
            let chunk = self.next_chunk(num_data_words);
            writeln!(sink, "{}", chunk.render()?)?;

            stats.chunks += 1;
            stats.data_words += chunk.data_words.len();
            stats.pileup_words += chunk.pileup_count();

            debug!(
                chunk = index,
                data_words = chunk.data_words.len(),
                pileup = chunk.pileup_count(),
                "chunk written"
            );
        }

        sink.flush()?;

        Ok(stats)
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
