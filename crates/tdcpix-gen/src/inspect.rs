//! `inspect` subcommand.

use std::{
    collections::BTreeSet,
    fmt::Write as _,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use tdcpix_codec::{
    chunk::{Chunk, read_chunks},
    errors::EncodeError,
    pixel::{HitMap, HitType, Pixel},
    word::{DataWord, FrameWord},
};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Chunk file to decode, or `-` for stdin
    pub path: PathBuf,

    /// Print every decoded chunk with its pixels as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Also print the hit pixels and times of the chunk at this index
    #[arg(long, value_name = "INDEX")]
    pub chunk: Option<usize>,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let chunks = if args.path.as_os_str() == "-" {
        load(io::stdin().lock()).context("failed to decode stdin")?
    } else {
        let file = File::open(&args.path)
            .with_context(|| format!("failed to open {}", args.path.display()))?;
        load(BufReader::new(file))
            .with_context(|| format!("failed to decode {}", args.path.display()))?
    };

    info!(chunks = chunks.len(), path = %args.path.display(), "decoded");

    let mut stdout = io::stdout().lock();
    if args.json {
        let reports = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| ChunkReport::from_chunk(index, chunk))
            .collect::<Result<Vec<_>, _>>()?;
        serde_json::to_writer_pretty(&mut stdout, &reports).context("failed to write JSON")?;
        writeln!(stdout)?;
        return Ok(());
    }

    let summary = Summary::from_chunks(&chunks);
    if summary.other_frame_words > 0 {
        warn!(
            count = summary.other_frame_words,
            "chunks closed by a frame word other than the sentinel"
        );
    }
    stdout.write_all(summary.render().as_bytes())?;

    if let Some(index) = args.chunk {
        let Some(chunk) = chunks.get(index) else {
            bail!("chunk {index} out of range, file has {} chunks", chunks.len());
        };
        let report = ChunkReport::from_chunk(index, chunk)?;
        writeln!(stdout)?;
        stdout.write_all(report.render().as_bytes())?;
    }

    Ok(())
}

fn load<R: BufRead>(reader: R) -> Result<Vec<Chunk>> {
    Ok(read_chunks(reader)?)
}

/// Aggregate counts over a decoded chunk file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub chunks: usize,
    pub data_words: usize,
    pub pileup_words: usize,
    pub double_hits: usize,
    pub min_chunk_len: usize,
    pub max_chunk_len: usize,
    pub distinct_addresses: usize,
    pub other_frame_words: usize,
}

impl Summary {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut addresses = BTreeSet::new();
        let mut summary = Summary {
            chunks: chunks.len(),
            min_chunk_len: chunks.iter().map(|c| c.data_words.len()).min().unwrap_or(0),
            max_chunk_len: chunks.iter().map(|c| c.data_words.len()).max().unwrap_or(0),
            ..Default::default()
        };

        for chunk in chunks {
            summary.data_words += chunk.data_words.len();
            summary.pileup_words += chunk.pileup_count();
            summary.double_hits += HitMap::from_words(&chunk.data_words).count(HitType::DoubleHit);
            addresses.extend(chunk.data_words.iter().map(|w| w.address));

            if chunk.frame_word != FrameWord::SENTINEL {
                summary.other_frame_words += 1;
            }
        }

        summary.distinct_addresses = addresses.len();
        summary
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "chunks:             {}", self.chunks);
        let _ = writeln!(out, "data words:         {}", self.data_words);
        let _ = writeln!(
            out,
            "words per chunk:    {}..={}",
            self.min_chunk_len, self.max_chunk_len
        );
        let _ = writeln!(out, "pileup words:       {}", self.pileup_words);
        let _ = writeln!(out, "double hits:        {}", self.double_hits);
        let _ = writeln!(out, "distinct addresses: {}", self.distinct_addresses);
        let _ = writeln!(out, "other frame words:  {}", self.other_frame_words);
        out
    }
}

/// One decoded data word with its matrix position and edge times.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HitReport {
    #[serde(flatten)]
    pub word: DataWord,
    pub pixel: Pixel,
    pub pileup_pixel: Option<Pixel>,
    pub start_time_ps: u64,
    pub end_time_ps: u64,
}

impl HitReport {
    fn from_word(word: DataWord) -> Result<Self, EncodeError> {
        Ok(HitReport {
            word,
            pixel: word.pixel()?,
            pileup_pixel: word.pileup_pixel()?,
            start_time_ps: word.start_time_ps(),
            end_time_ps: word.end_time_ps(),
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClassifiedPixel {
    #[serde(flatten)]
    pub pixel: Pixel,
    pub kind: HitType,
}

/// Pixel view of one chunk.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChunkReport {
    pub index: usize,
    pub hits: Vec<HitReport>,
    pub pixels: Vec<ClassifiedPixel>,
    pub frame_word: FrameWord,
}

impl ChunkReport {
    pub fn from_chunk(index: usize, chunk: &Chunk) -> Result<Self, EncodeError> {
        let hits = chunk
            .data_words
            .iter()
            .map(|&word| HitReport::from_word(word))
            .collect::<Result<Vec<_>, _>>()?;

        let pixels = HitMap::from_words(&chunk.data_words)
            .pixels()
            .into_iter()
            .map(|(pixel, kind)| ClassifiedPixel { pixel, kind })
            .collect();

        Ok(ChunkReport {
            index,
            hits,
            pixels,
            frame_word: chunk.frame_word,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "chunk {}: {} data words, frame counter {}",
            self.index,
            self.hits.len(),
            self.frame_word.frame_counter
        );

        for hit in &self.hits {
            let _ = write!(
                out,
                "  ({}, {}) {}..{} ps",
                hit.pixel.x, hit.pixel.y, hit.start_time_ps, hit.end_time_ps
            );
            if let Some(pileup) = hit.pileup_pixel {
                let _ = write!(out, " pileup ({}, {})", pileup.x, pileup.y);
            }
            let _ = writeln!(out);
        }

        let count = |kind: HitType| self.pixels.iter().filter(|p| p.kind == kind).count();
        let _ = writeln!(
            out,
            "pixels: {} hit, {} double hit, {} pileup",
            count(HitType::Hit),
            count(HitType::DoubleHit),
            count(HitType::Pileup)
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "852000c83141 852000c83141 e8005000eb00\n\
                        852080c83141 e02020000003\n";

    #[test]
    fn test_summary() {
        let chunks = load(FILE.as_bytes()).unwrap();
        let summary = Summary::from_chunks(&chunks);

        assert_eq!(
            summary,
            Summary {
                chunks: 2,
                data_words: 3,
                pileup_words: 1,
                double_hits: 0,
                min_chunk_len: 1,
                max_chunk_len: 2,
                distinct_addresses: 1,
                other_frame_words: 1,
            }
        );
    }

    #[test]
    fn test_summary_counts_double_hits() {
        // Second word piles up on the sub-channel the first one fired on.
        let chunks = load("852000c83141 852100c83141 e8005000eb00\n".as_bytes()).unwrap();
        assert_eq!(Summary::from_chunks(&chunks).double_hits, 1);
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::from_chunks(&[]), Summary::default());
    }

    #[test]
    fn test_render() {
        let summary = Summary {
            chunks: 10,
            data_words: 2540,
            ..Default::default()
        };
        let text = summary.render();
        assert!(text.contains("chunks:             10\n"));
        assert!(text.contains("data words:         2540\n"));
    }

    #[test]
    fn test_load_reports_bad_line() {
        let err = load("e8005000eb00\nnot-hex\n".as_bytes()).unwrap_err();
        assert!(format!("{err}").contains("line 2"));
    }

    #[test]
    fn test_chunk_report() {
        let chunks = load(FILE.as_bytes()).unwrap();
        let report = ChunkReport::from_chunk(1, &chunks[1]).unwrap();

        assert_eq!(report.hits.len(), 1);
        let hit = &report.hits[0];
        assert_eq!(hit.pixel, Pixel { x: 0, y: 23 });
        assert_eq!(hit.pileup_pixel, Some(Pixel { x: 0, y: 14 }));
        assert_eq!(hit.start_time_ps, 312_794);
        assert_eq!(hit.end_time_ps, 344_142);

        assert_eq!(
            report.pixels,
            vec![
                ClassifiedPixel {
                    pixel: Pixel { x: 0, y: 14 },
                    kind: HitType::Pileup
                },
                ClassifiedPixel {
                    pixel: Pixel { x: 0, y: 23 },
                    kind: HitType::Hit
                },
            ]
        );
    }

    #[test]
    fn test_chunk_report_render() {
        let chunks = load(FILE.as_bytes()).unwrap();
        let text = ChunkReport::from_chunk(1, &chunks[1]).unwrap().render();
        assert!(text.starts_with("chunk 1: 1 data words, frame counter 3\n"));
        assert!(text.contains("  (0, 23) 312794..344142 ps pileup (0, 14)\n"));
        assert!(text.ends_with("pixels: 1 hit, 0 double hit, 1 pileup\n"));
    }

    #[test]
    fn test_reports_serialize_to_json() {
        let chunks = load(FILE.as_bytes()).unwrap();
        let reports: Vec<ChunkReport> = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| ChunkReport::from_chunk(index, chunk).unwrap())
            .collect();
        let json = serde_json::to_value(&reports).unwrap();

        assert_eq!(json[0]["hits"][0]["address"], 5);
        assert_eq!(json[0]["hits"][0]["pixel"]["y"], 23);
        assert_eq!(json[0]["hits"][0]["end_time_ps"], 344_142);
        assert_eq!(json[0]["frame_word"]["hit_counter"], 5);
        assert_eq!(json[1]["hits"][0]["pileup_bit"], 1);
        assert_eq!(json[1]["pixels"][0]["kind"], "Pileup");
        assert_eq!(json[1]["pixels"][0]["x"], 0);
    }
}
