//! Hit sound flags of a [`super::HitObject`].
//!
//! Quaver writes hit sounds as a comma separated list of names (`Whistle, Clap`). Old or hand
//! edited files sometimes carry a raw integer instead, which is kept as is.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A hit sound that both Quaver and osu! know. The discriminant is its osu! bit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum HitSound {
    /// The default hit sound.
    Normal = 1 << 0,
    /// Whistle.
    Whistle = 1 << 1,
    /// Finish, the cymbal-like one.
    Finish = 1 << 2,
    /// Clap.
    Clap = 1 << 3,
}

impl HitSound {
    /// All hit sounds in bit order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Whistle, Self::Finish, Self::Clap];

    /// Bit flag of this sound in osu! hit objects.
    #[must_use]
    pub const fn bit(self) -> i32 {
        self as i32
    }

    /// Name of this sound in both formats.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Whistle => "Whistle",
            Self::Finish => "Finish",
            Self::Clap => "Clap",
        }
    }
}

impl fmt::Display for HitSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for [`HitSound::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown hit sound `{0}`")]
pub struct UnknownHitSoundError(pub String);

impl FromStr for HitSound {
    type Err = UnknownHitSoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.name() == s)
            .ok_or_else(|| UnknownHitSoundError(s.to_owned()))
    }
}

/// Raw `HitSound` value of a hit object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitSoundField {
    /// Already packed bit flags.
    Bits(i32),
    /// Comma separated hit sound names, such as `Whistle, Clap`.
    Names(String),
}

impl HitSoundField {
    /// Parses the names into [`HitSound`]s. Yields nothing for [`HitSoundField::Bits`].
    pub fn sounds(&self) -> impl Iterator<Item = Result<HitSound, UnknownHitSoundError>> + '_ {
        let names = match self {
            Self::Bits(_) => "",
            Self::Names(names) => names.as_str(),
        };
        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<HitSound>)
    }

    /// Packs the sounds into osu! bit flags. Duplicated names set the same bit once.
    ///
    /// # Errors
    ///
    /// Fails on the first name that is not a [`HitSound`].
    pub fn to_bits(&self) -> Result<i32, UnknownHitSoundError> {
        match self {
            Self::Bits(bits) => Ok(*bits),
            Self::Names(_) => self
                .sounds()
                .try_fold(0, |bits, sound| sound.map(|sound| bits | sound.bit())),
        }
    }
}

impl From<HitSound> for HitSoundField {
    fn from(value: HitSound) -> Self {
        Self::Names(value.name().to_owned())
    }
}
