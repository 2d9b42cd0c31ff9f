//! The converter of Quaver beatmaps (.qua/.qp) into osu!mania beatmaps (.osu/.osz).
//!
//! `qua` module provides the model of a `.qua` document, a YAML file with the metadata, timing
//! points, scroll velocities and hit objects of one difficulty.
//!
//! `osu` module provides the vocabulary of the `.osu` text format and the [`osu::ConvertOptions`]
//! the user can pick.
//!
//! `convert` module turns a [`qua::Qua`] into `.osu` text. It is a pure function: no file system,
//! no randomness, and the same input always yields the same bytes.
//!
//! `mapset` module (feature `archive`) converts a whole `.qp` archive into an `.osz` archive.
//!
//! `diagnostics` module (feature `diagnostics`) renders errors against the `.qua` source.
//!
//! In detail, our policies are:
//!
//! - Support only the key modes (`Keys4`, `Keys7`, ...), as osu!mania is the only target.
//! - Do not guess missing required fields: fail instead.
//! - Convert values osu! can not express into documented sentinels instead of dropping them.
//!
//! # Example
//!
//! ```
//! use qua2osu::prelude::*;
//!
//! let qua: Qua = "\
//! AudioFile: audio.mp3
//! BackgroundFile: bg.png
//! Mode: Keys7
//! HitObjects:
//! - StartTime: 500
//!   Lane: 7
//!   EndTime: 900
//! "
//! .parse()
//! .unwrap();
//! let QuaToOsuOutput { osu, warnings } = qua.to_osu(&ConvertOptions::default()).unwrap();
//! assert!(warnings.is_empty());
//! assert!(osu.ends_with("448,192,500,128,0,900:0:0:0:0:\n"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod convert;
#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;
#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub mod mapset;
pub mod osu;
pub mod prelude;
pub mod qua;
