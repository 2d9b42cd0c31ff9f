//! The [Quaver](https://github.com/Quaver/Quaver) `.qua` beatmap definition.
//!
//! A `.qua` file is a YAML document. Keys are written in `PascalCase`, and Quaver omits any value
//! equal to its default, so almost every field here is optional or carries a documented default:
//!
//! | Record              | Field        | Default  |
//! | ------------------- | ------------ | -------- |
//! | [`TimingPoint`]     | `StartTime`  | `0`      |
//! | [`TimingPoint`]     | `Bpm`        | `0`      |
//! | [`SliderVelocity`]  | `StartTime`  | `0`      |
//! | [`SliderVelocity`]  | `Multiplier` | `0`      |
//! | [`HitObject`]       | `StartTime`  | `0`      |
//! | [`HitObject`]       | `Lane`       | `0`      |
//!
//! Fields without a sane default (`Mode`, `AudioFile`, `BackgroundFile`) are still parsed as
//! optional, and their accessors fail with [`QuaFieldError::Missing`] when they are absent.
//!
//! Keys this crate has no use for (`Description`, `EditorLayers`, `CustomAudioSamples`,
//! `SoundEffects`, key sounds of notes, ...) are ignored.

pub mod hit_sound;

use std::{num::NonZeroU8, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::hit_sound::{HitSoundField, UnknownHitSoundError};

/// Top-level object of a `.qua` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Qua {
    /// Audio file name, relative to the mapset folder.
    pub audio_file: Option<String>,
    /// Preview point of the song in milliseconds.
    pub song_preview_time: Option<i64>,
    /// Background image file name, relative to the mapset folder.
    pub background_file: Option<String>,
    /// Online map id. Quaver ids have no meaning to osu!.
    pub map_id: Option<i64>,
    /// Online mapset id. Quaver ids have no meaning to osu!.
    pub map_set_id: Option<i64>,
    /// Game mode, `Keys4` or `Keys7`.
    pub mode: Option<String>,
    /// Song title.
    pub title: Option<String>,
    /// Song artist.
    pub artist: Option<String>,
    /// Where the song comes from.
    pub source: Option<String>,
    /// Space separated search tags.
    pub tags: Option<String>,
    /// Author of the map.
    pub creator: Option<String>,
    /// Name of this difficulty.
    pub difficulty_name: Option<String>,
    /// Tempo changes.
    #[serde(default)]
    pub timing_points: Vec<TimingPoint>,
    /// Scroll speed changes.
    #[serde(default)]
    pub slider_velocities: Vec<SliderVelocity>,
    /// Notes and long notes.
    #[serde(default)]
    pub hit_objects: Vec<HitObject>,
}

/// Tempo change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimingPoint {
    /// Time in milliseconds. Quaver may write fractional milliseconds here.
    pub start_time: f64,
    /// Beats per minute. Zero and negative values are legal in Quaver.
    pub bpm: f64,
}

/// Local scroll speed multiplier change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SliderVelocity {
    /// Time in milliseconds. Quaver may write fractional milliseconds here.
    pub start_time: f64,
    /// Scroll speed multiplier. Zero and negative values are legal in Quaver.
    pub multiplier: f64,
}

/// Note, or long note if it has [`HitObject::end_time`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HitObject {
    /// Time to hit in milliseconds.
    pub start_time: i64,
    /// Column of the note, 1-based.
    pub lane: i64,
    /// Time to release in milliseconds. Present only on long notes.
    pub end_time: Option<i64>,
    /// Hit sounds played on hit.
    pub hit_sound: Option<HitSoundField>,
}

impl HitObject {
    /// Returns whether this object must be held until [`HitObject::end_time`].
    #[must_use]
    pub const fn is_hold(&self) -> bool {
        self.end_time.is_some()
    }

    /// Hit sound bit flags of this object, `0` if it has none.
    ///
    /// # Errors
    ///
    /// Fails if the hit sound list names a sound outside of [`hit_sound::HitSound`].
    pub fn hit_sound_bits(&self) -> Result<i32, UnknownHitSoundError> {
        self.hit_sound.as_ref().map_or(Ok(0), HitSoundField::to_bits)
    }
}

/// A field the conversion needs is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum QuaFieldError {
    /// The field has no sane default and is missing.
    #[error("required field `{0}` is missing")]
    Missing(&'static str),
    /// `Mode` does not end with a positive key count digit.
    #[error("mode `{0}` does not end with a key count")]
    InvalidMode(String),
}

fn required<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str, QuaFieldError> {
    value.map(String::as_str).ok_or(QuaFieldError::Missing(name))
}

impl Qua {
    /// Game mode tag such as `Keys4`.
    ///
    /// # Errors
    ///
    /// Fails if `Mode` is missing.
    pub fn mode(&self) -> Result<&str, QuaFieldError> {
        required(self.mode.as_ref(), "Mode")
    }

    /// Number of columns, taken from the last character of the mode tag.
    ///
    /// # Errors
    ///
    /// Fails if `Mode` is missing or does not end with a digit from 1 to 9.
    pub fn key_count(&self) -> Result<NonZeroU8, QuaFieldError> {
        let mode = self.mode()?;
        mode.chars()
            .next_back()
            .and_then(|c| c.to_digit(10))
            .and_then(|digit| NonZeroU8::new(digit as u8))
            .ok_or_else(|| QuaFieldError::InvalidMode(mode.to_owned()))
    }

    /// Audio file name.
    ///
    /// # Errors
    ///
    /// Fails if `AudioFile` is missing.
    pub fn audio_file(&self) -> Result<&str, QuaFieldError> {
        required(self.audio_file.as_ref(), "AudioFile")
    }

    /// Background image file name.
    ///
    /// # Errors
    ///
    /// Fails if `BackgroundFile` is missing.
    pub fn background_file(&self) -> Result<&str, QuaFieldError> {
        required(self.background_file.as_ref(), "BackgroundFile")
    }

    /// Preview point in milliseconds, or `-1` (no preview point in osu!) if not set.
    #[must_use]
    pub fn preview_time(&self) -> i64 {
        self.song_preview_time.unwrap_or(-1)
    }
}

/// An error occurred when deserializing a `.qua` document.
#[derive(Debug, Error)]
#[error("invalid qua at `{path}`: {source}")]
pub struct QuaParseError {
    path: String,
    #[source]
    source: serde_yaml::Error,
}

impl QuaParseError {
    /// Path to the offending value, such as `HitObjects[3].Lane`. `.` for the document root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Byte offset in the source where the YAML parser stopped, if known.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.source.location().map(|location| location.index())
    }

    /// Line and column (both 1-based) where the YAML parser stopped, if known.
    #[must_use]
    pub fn line_column(&self) -> Option<(usize, usize)> {
        self.source
            .location()
            .map(|location| (location.line(), location.column()))
    }
}

/// Parse a `.qua` document from its YAML source.
///
/// # Example
///
/// ```
/// use qua2osu::qua::parse_qua;
///
/// let qua = parse_qua("Mode: Keys4\nHitObjects:\n- StartTime: 1000\n  Lane: 2\n").unwrap();
/// assert_eq!(qua.key_count().unwrap().get(), 4);
/// assert_eq!(qua.hit_objects[0].lane, 2);
/// ```
///
/// # Errors
///
/// Fails on malformed YAML or on a value of the wrong type.
pub fn parse_qua(source: &str) -> Result<Qua, QuaParseError> {
    let deserializer = serde_yaml::Deserializer::from_str(source);
    serde_path_to_error::deserialize(deserializer).map_err(|err| QuaParseError {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

impl FromStr for Qua {
    type Err = QuaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_qua(s)
    }
}
