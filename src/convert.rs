//! Conversion from [`Qua`] into `.osu` text.
//!
//! The output is assembled from the sections built in [`sections`], in the order osu! itself
//! writes them:
//!
//! ```text
//! // This map was converted using qua2osu
//!
//! osu file format v14
//!
//! [General]
//! ...
//!
//! [Editor]
//! ...
//! ```
//!
//! followed by `[Metadata]`, `[Difficulty]`, `[Events]`, `[TimingPoints]` and `[HitObjects]`.
//! osu! looks sections up by name, so the order only matters for the human reader.
//!
//! The conversion is a pure function of the document and the [`ConvertOptions`]: converting
//! the same input twice yields byte-identical text.

pub mod numeric;
pub mod sections;

use thiserror::Error;

use crate::{
    osu::{ConvertOptions, FORMAT_VERSION},
    qua::{Qua, QuaFieldError, QuaParseError, hit_sound::UnknownHitSoundError, parse_qua},
};

/// Comment line written at the top of every converted beatmap.
pub const SIGNATURE: &str = "// This map was converted using qua2osu";

/// An error that stops the conversion of one beatmap.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The source is not a valid `.qua` document.
    #[error("parse: {0}")]
    Parse(#[from] QuaParseError),
    /// A field the conversion needs is missing or unusable.
    #[error("field: {0}")]
    Field(#[from] QuaFieldError),
    /// A hit object can not be represented. Dropping it would silently change the gameplay.
    #[error("hit object #{index}: {source}")]
    MalformedRecord {
        /// Position of the hit object in the source.
        index: usize,
        /// What is wrong with it.
        #[source]
        source: UnknownHitSoundError,
    },
}

/// Something in the source that was converted as is but is probably not what the author meant.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum QuaToOsuWarning {
    /// The lane of a hit object is not one of the columns. Its position is written unclamped.
    #[error("hit object #{index} is on lane {lane}, outside of 1..={key_count}")]
    LaneOutOfRange {
        /// Position of the hit object in the source.
        index: usize,
        /// The offending lane.
        lane: i64,
        /// Number of columns of the beatmap.
        key_count: u8,
    },
}

/// Output of the conversion from [`Qua`] into `.osu` text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct QuaToOsuOutput {
    /// The whole `.osu` file, ending with a newline.
    pub osu: String,
    /// Warnings that occurred during the conversion.
    pub warnings: Vec<QuaToOsuWarning>,
}

impl Qua {
    /// Convert `Qua` into `.osu` text.
    ///
    /// # Errors
    ///
    /// Fails if a field without default is missing, or if a hit object names an unknown hit sound.
    pub fn to_osu(&self, options: &ConvertOptions) -> Result<QuaToOsuOutput, ConvertError> {
        let mut warnings = Vec::new();
        let blocks = [
            SIGNATURE.to_owned(),
            format!("osu file format v{FORMAT_VERSION}"),
            sections::general(self, options)?,
            sections::editor(),
            sections::metadata(self),
            sections::difficulty(self, options)?,
            sections::events(self)?,
            sections::timing_points(self, options),
            sections::hit_objects(self, &mut warnings)?,
        ];
        let mut osu = blocks.join("\n\n");
        osu.push('\n');
        Ok(QuaToOsuOutput { osu, warnings })
    }
}

/// Parse `.qua` source and convert it into `.osu` text in one step.
///
/// # Example
///
/// ```
/// use qua2osu::{convert::convert_qua, osu::ConvertOptions};
///
/// let source = "\
/// AudioFile: audio.mp3
/// BackgroundFile: bg.png
/// Mode: Keys4
/// TimingPoints:
/// - Bpm: 120
/// HitObjects:
/// - StartTime: 1000
///   Lane: 2
/// ";
/// let output = convert_qua(source, &ConvertOptions::default()).unwrap();
/// assert!(output.osu.contains("\n0,500.0,4,0,0,20,1,0\n"));
/// assert!(output.osu.ends_with("\n192,192,1000,1,0,0:0:0:0:\n"));
/// ```
///
/// # Errors
///
/// Fails if the source can not be parsed, or for any reason [`Qua::to_osu`] fails.
pub fn convert_qua(source: &str, options: &ConvertOptions) -> Result<QuaToOsuOutput, ConvertError> {
    parse_qua(source)?.to_osu(options)
}
