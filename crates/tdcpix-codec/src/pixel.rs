//! Placement of data words on the pixel matrix.
//!
//! An address names a group of [SUBCHANNELS] pixels. The group sits in column
//! `address / 9`; its members are the rows `address % 9 + k * 9` for
//! sub-channel `k`. The arbiter bit picks the pixel that fired, the pileup bit
//! the one that piled up.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{layout::SUBCHANNELS, word::DataWord};

/// Address groups stacked in one matrix column.
pub const GROUPS_PER_COLUMN: u8 = 9;

/// Column and row of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pixel {
    pub x: u8,
    pub y: u8,
}

impl Pixel {
    /// Pixel `subchannel` of the group at `address`. `subchannel` must be below [SUBCHANNELS].
    pub fn new(address: u8, subchannel: u8) -> Self {
        debug_assert!(subchannel < SUBCHANNELS, "sub-channel out of range");
        Pixel {
            x: address / GROUPS_PER_COLUMN,
            y: address % GROUPS_PER_COLUMN + subchannel * GROUPS_PER_COLUMN,
        }
    }
}

/// How a pixel shows up in one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HitType {
    Hit,
    /// Fired and also piled up within the same chunk.
    DoubleHit,
    Pileup,
}

/// Hit and pileup pixels of a set of data words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    hits: BTreeSet<Pixel>,
    pileups: BTreeSet<Pixel>,
}

impl HitMap {
    /// Collects the pixels of `words`. Words with an arbiter or pileup bit
    /// outside the group are skipped.
    pub fn from_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a DataWord>,
    {
        let mut map = HitMap::default();

        for word in words {
            if let Ok(pixel) = word.pixel() {
                map.hits.insert(pixel);
            }
            if let Ok(Some(pixel)) = word.pileup_pixel() {
                map.pileups.insert(pixel);
            }
        }

        map
    }

    pub fn hits(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.hits.iter().copied()
    }

    pub fn pileups(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.pileups.iter().copied()
    }

    pub fn classify(&self, pixel: Pixel) -> Option<HitType> {
        match (self.hits.contains(&pixel), self.pileups.contains(&pixel)) {
            (true, true) => Some(HitType::DoubleHit),
            (true, false) => Some(HitType::Hit),
            (false, true) => Some(HitType::Pileup),
            (false, false) => None,
        }
    }

    /// Every touched pixel with its classification, ordered by column then row.
    pub fn pixels(&self) -> Vec<(Pixel, HitType)> {
        self.hits
            .union(&self.pileups)
            .filter_map(|&pixel| self.classify(pixel).map(|kind| (pixel, kind)))
            .collect()
    }

    pub fn count(&self, kind: HitType) -> usize {
        self.pixels().iter().filter(|(_, k)| *k == kind).count()
    }
}
