//! Converters of each `.osu` section.
//!
//! Every function here builds one self-contained block, starting with its `[Section]` header,
//! from the source [`Qua`] and the [`ConvertOptions`]. They share nothing, so they can be tested
//! and reordered independently.
//!
//! `[General]`, `[Editor]` and `[Difficulty]` pairs are written as `key: value`, while `[Metadata]`
//! pairs are written as `key:value`, as osu! itself writes them.

use std::fmt::Display;

use itertools::Itertools;

use super::{
    ConvertError, QuaToOsuWarning,
    numeric::{OsuFloat, OsuTime, beat_length, column_x, velocity_factor},
};
use crate::{
    osu::{ConvertOptions, HIT_OBJECT_Y, HitObjectKind},
    qua::Qua,
};

/// Token prepended to the tags, to mark where the beatmap comes from.
pub const ORIGIN_TAG: &str = "Quaver";

// `Mode` matches `MANIA_MODE`.
const GENERAL_DEFAULTS: [(&str, &str); 7] = [
    ("AudioLeadIn", "0"),
    ("Countdown", "0"),
    ("StackLeniency", "0.7"),
    ("Mode", "3"),
    ("LetterboxInBreaks", "0"),
    ("SpecialStyle", "0"),
    ("WidescreenStoryboard", "0"),
];

const EDITOR_DEFAULTS: [(&str, &str); 5] = [
    ("Bookmarks", ""),
    ("DistanceSpacing", "1.5"),
    ("BeatDivisor", "4"),
    ("GridSize", "4"),
    ("TimelineZoom", "2.5"),
];

const DIFFICULTY_DEFAULTS: [(&str, &str); 3] = [
    ("ApproachRate", "5"),
    ("SliderMultiplier", "1.4"),
    ("SliderTickRate", "1"),
];

// Both ids are disjoint from Quaver's, so the beatmap is marked as unsubmitted.
const METADATA_DEFAULTS: [(&str, &str); 2] = [("BeatmapID", "0"), ("BeatmapSetID", "-1")];

fn section(name: &str, lines: impl IntoIterator<Item = String>) -> String {
    std::iter::once(format!("[{name}]")).chain(lines).join("\n")
}

fn spaced(key: &str, value: impl Display) -> String {
    format!("{key}: {value}")
}

fn tight(key: &str, value: impl Display) -> String {
    format!("{key}:{value}")
}

/// `[General]`: sample set, audio file and preview point, then fixed defaults.
///
/// # Errors
///
/// Fails if the source has no `AudioFile`.
pub fn general(qua: &Qua, options: &ConvertOptions) -> Result<String, ConvertError> {
    let lines = [
        spaced("SampleSet", options.sample_set),
        spaced("AudioFilename", qua.audio_file()?),
        spaced("PreviewTime", qua.preview_time()),
    ]
    .into_iter()
    .chain(
        GENERAL_DEFAULTS
            .iter()
            .map(|&(key, value)| spaced(key, value)),
    );
    Ok(section("General", lines))
}

/// `[Editor]`: Quaver has no editor settings to carry over, so only defaults.
#[must_use]
pub fn editor() -> String {
    section(
        "Editor",
        EDITOR_DEFAULTS
            .iter()
            .map(|&(key, value)| spaced(key, value)),
    )
}

/// `[Metadata]`: each present field under its osu! name.
///
/// osu! expects a romanized and a Unicode variant of the title and the artist. Quaver has only
/// one of each, so it is written twice.
#[must_use]
pub fn metadata(qua: &Qua) -> String {
    let mut lines = Vec::new();
    if let Some(title) = &qua.title {
        lines.push(tight("Title", title));
        lines.push(tight("TitleUnicode", title));
    }
    if let Some(artist) = &qua.artist {
        lines.push(tight("Artist", artist));
        lines.push(tight("ArtistUnicode", artist));
    }
    if let Some(creator) = &qua.creator {
        lines.push(tight("Creator", creator));
    }
    if let Some(version) = &qua.difficulty_name {
        lines.push(tight("Version", version));
    }
    if let Some(source) = &qua.source {
        lines.push(tight("Source", source));
    }
    if let Some(tags) = &qua.tags {
        lines.push(tight("Tags", format_args!("{ORIGIN_TAG} {tags}")));
    }
    if let Some(preview_time) = qua.song_preview_time {
        lines.push(tight("PreviewTime", preview_time));
    }
    lines.extend(
        METADATA_DEFAULTS
            .iter()
            .map(|&(key, value)| tight(key, value)),
    );
    section("Metadata", lines)
}

/// `[Difficulty]`: key count in `CircleSize`, the caller's drain rate and overall difficulty,
/// then fixed defaults.
///
/// # Errors
///
/// Fails if the source has no usable `Mode`.
pub fn difficulty(qua: &Qua, options: &ConvertOptions) -> Result<String, ConvertError> {
    let lines = [
        spaced("CircleSize", qua.key_count()?),
        spaced("OverallDifficulty", options.overall_difficulty),
        spaced("HPDrainRate", options.hp_drain_rate),
    ]
    .into_iter()
    .chain(
        DIFFICULTY_DEFAULTS
            .iter()
            .map(|&(key, value)| spaced(key, value)),
    );
    Ok(section("Difficulty", lines))
}

/// `[Events]`: the background image only.
///
/// # Errors
///
/// Fails if the source has no `BackgroundFile`.
pub fn events(qua: &Qua) -> Result<String, ConvertError> {
    let background = format!("0,0,\"{}\",0,0", qua.background_file()?);
    Ok(section("Events", [background]))
}

/// `[TimingPoints]`: uninherited points from the tempo changes, then inherited points from the
/// scroll speed changes.
///
/// The lines are not sorted by time, osu! does not need them to be.
#[must_use]
pub fn timing_points(qua: &Qua, options: &ConvertOptions) -> String {
    let volume = options.hit_sound_volume;
    let uninherited = qua.timing_points.iter().map(|point| {
        format!(
            "{},{},4,0,0,{volume},1,0",
            OsuTime(point.start_time),
            OsuFloat(beat_length(point.bpm)),
        )
    });
    let inherited = qua.slider_velocities.iter().map(|velocity| {
        format!(
            "{},{},0,0,0,{volume},0,0",
            OsuTime(velocity.start_time),
            OsuFloat(velocity_factor(velocity.multiplier)),
        )
    });
    section("TimingPoints", uninherited.chain(inherited))
}

/// `[HitObjects]`: a note or a hold for every hit object, placed in its column.
///
/// A lane outside the columns is written as is and reported in `warnings`.
///
/// # Errors
///
/// Fails if the source has no usable `Mode`, or if a hit object names an unknown hit sound.
pub fn hit_objects(
    qua: &Qua,
    warnings: &mut Vec<QuaToOsuWarning>,
) -> Result<String, ConvertError> {
    let key_count = qua.key_count()?.get();
    let lines = qua
        .hit_objects
        .iter()
        .enumerate()
        .map(|(index, object)| -> Result<String, ConvertError> {
            if !(1..=i64::from(key_count)).contains(&object.lane) {
                warnings.push(QuaToOsuWarning::LaneOutOfRange {
                    index,
                    lane: object.lane,
                    key_count,
                });
            }
            let x = column_x(object.lane, key_count);
            let time = object.start_time;
            let hit_sound = object
                .hit_sound_bits()
                .map_err(|source| ConvertError::MalformedRecord { index, source })?;
            Ok(match object.end_time {
                None => format!(
                    "{x},{HIT_OBJECT_Y},{time},{},{hit_sound},0:0:0:0:",
                    HitObjectKind::Note.bits()
                ),
                Some(end_time) => format!(
                    "{x},{HIT_OBJECT_Y},{time},{},{hit_sound},{end_time}:0:0:0:0:",
                    HitObjectKind::Hold.bits()
                ),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(section("HitObjects", lines))
}
