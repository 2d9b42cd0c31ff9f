//! Vocabulary of the [osu! file format](https://osu.ppy.sh/wiki/en/Client/File_formats/osu_%28file_format%29) used by the converter.
//!
//! Only the osu!mania subset matters here: no sliders, no spinners, and the vertical position of
//! a hit object is ignored by the game.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format version written in the header.
pub const FORMAT_VERSION: u32 = 14;

/// Width of the osu! playfield in osu!pixels. Columns split it evenly.
pub const PLAYFIELD_WIDTH: f64 = 512.0;

/// Vertical position written for every hit object, half the playfield height.
pub const HIT_OBJECT_Y: i32 = 192;

/// `Mode` value of osu!mania in the `[General]` section.
pub const MANIA_MODE: u8 = 3;

/// Default sample set of the hit sounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleSet {
    /// Soft samples.
    #[default]
    Soft,
    /// Normal samples.
    Normal,
    /// Drum samples.
    Drum,
}

impl SampleSet {
    /// All sample sets.
    pub const ALL: [Self; 3] = [Self::Soft, Self::Normal, Self::Drum];

    /// Name written in the `[General]` section.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soft => "Soft",
            Self::Normal => "Normal",
            Self::Drum => "Drum",
        }
    }
}

impl fmt::Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for [`SampleSet::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown sample set `{0}`, expected one of Soft, Normal or Drum")]
pub struct UnknownSampleSetError(pub String);

impl FromStr for SampleSet {
    type Err = UnknownSampleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|set| set.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSampleSetError(s.to_owned()))
    }
}

/// Type bit of an osu!mania hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HitObjectKind {
    /// Hit circle, a plain note in osu!mania.
    Note = 1 << 0,
    /// osu!mania hold, also known as long note.
    Hold = 1 << 7,
}

impl HitObjectKind {
    /// Type bit written in the `[HitObjects]` section.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Values that the source beatmap does not carry, picked by the caller.
///
/// The converter trusts these values. Range checks (0 to 10 for the difficulty values, 0 to 100
/// for the volume) belong to whoever builds the options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// `OverallDifficulty`, the hit window strictness.
    pub overall_difficulty: f64,
    /// `HPDrainRate`.
    pub hp_drain_rate: f64,
    /// Volume percentage of every timing point.
    pub hit_sound_volume: u8,
    /// `SampleSet` of the beatmap.
    pub sample_set: SampleSet,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            overall_difficulty: 8.0,
            hp_drain_rate: 8.0,
            hit_sound_volume: 20,
            sample_set: SampleSet::Soft,
        }
    }
}
