//! Prelude module for the crate.
//!
//! You can use `use qua2osu::prelude::*;` to import the commonly used types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_convert_error, emit_qua_error};
#[cfg(feature = "archive")]
pub use crate::mapset::{
    ConvertedDifficulty, DifficultyError, FailedDifficulty, MapsetError, MapsetOptions,
    MapsetOutput, convert_mapset, find_mapsets, mapset_folder_name, preserved_output_dir,
};
pub use crate::{
    convert::{ConvertError, QuaToOsuOutput, QuaToOsuWarning, convert_qua},
    osu::{ConvertOptions, HitObjectKind, SampleSet},
    qua::{
        HitObject, Qua, QuaFieldError, QuaParseError, SliderVelocity, TimingPoint,
        hit_sound::{HitSound, HitSoundField},
        parse_qua,
    },
};
