//! Conversion of whole mapsets: a Quaver `.qp` archive into an osu! `.osz` archive.
//!
//! Both archives are plain zip files holding the difficulty files next to the audio and image
//! assets. Converting a mapset:
//!
//! 1. extracts the `.qp` into `<output>/q_<name>/`,
//! 2. replaces every `<difficulty>.qua` in that folder by `<difficulty>.osu`,
//! 3. packs the folder into `<output>/q_<name>.osz`,
//! 4. removes the folder unless [`MapsetOptions::keep_extracted`] is set.
//!
//! Assets are carried over untouched. The `q_` prefix keeps osu! from picking preview
//! backgrounds by mistake, as it guesses them from numeric folder names.
//!
//! The folder and the `.osz` are claimed atomically: if either already exists, the conversion
//! fails with [`MapsetError::AlreadyExists`] and nothing of the other mapset is touched. Archives
//! sharing a file stem need distinct output folders, see [`preserved_output_dir`].
//!
//! A difficulty that fails to convert does not stop its siblings. It is reported in
//! [`MapsetOutput::failed`], its `.qua` stays in place and no `.osu` is left behind for it.

use std::{
    fs::{self, File},
    io,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;
use zip::{
    CompressionMethod, ZipArchive, ZipWriter, result::ZipError, write::SimpleFileOptions,
};

use crate::{
    convert::{ConvertError, QuaToOsuWarning, convert_qua},
    osu::ConvertOptions,
};

/// Extension of Quaver mapset archives.
pub const MAPSET_EXTENSION: &str = "qp";
/// Extension of Quaver difficulty files.
pub const SOURCE_EXTENSION: &str = "qua";
/// Extension of osu! difficulty files.
pub const TARGET_EXTENSION: &str = "osu";
/// Extension of osu! mapset archives.
pub const PACKAGE_EXTENSION: &str = "osz";
/// Prefix of the output folder and archive names.
pub const FOLDER_PREFIX: &str = "q_";

/// Options of [`convert_mapset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsetOptions {
    /// Options applied to every difficulty.
    pub convert: ConvertOptions,
    /// Leave the extracted and converted folder next to the `.osz`.
    pub keep_extracted: bool,
}

/// An error that stops the conversion of a whole mapset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapsetError {
    /// File system failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file or folder being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The archive could not be read or written.
    #[error("zip error on {}: {source}", .path.display())]
    Zip {
        /// The archive being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: ZipError,
    },
    /// A folder could not be walked.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    /// The archive path has no file name to derive the output name from.
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
    /// The working folder or the `.osz` is already there, maybe from another mapset of the
    /// same name.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

impl MapsetError {
    fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    // Like `io`, but reports a lost race for `path` as `AlreadyExists`.
    fn claim(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| {
            if source.kind() == io::ErrorKind::AlreadyExists {
                Self::AlreadyExists(path)
            } else {
                Self::Io { path, source }
            }
        }
    }

    fn zip(path: impl Into<PathBuf>) -> impl FnOnce(ZipError) -> Self {
        let path = path.into();
        move |source| Self::Zip { path, source }
    }
}

/// Why a single difficulty was not converted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DifficultyError {
    /// The `.qua` could not be read.
    #[error("read: {0}")]
    Read(#[source] io::Error),
    /// The `.qua` could not be converted.
    #[error("convert: {0}")]
    Convert(#[from] ConvertError),
    /// The `.osu` could not be written.
    #[error("write: {0}")]
    Write(#[source] io::Error),
}

/// A difficulty converted successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDifficulty {
    /// File name of the `.osu` inside the mapset.
    pub file_name: PathBuf,
    /// Warnings that occurred during the conversion.
    pub warnings: Vec<QuaToOsuWarning>,
}

/// A difficulty that could not be converted.
#[derive(Debug)]
pub struct FailedDifficulty {
    /// File name of the `.qua` inside the mapset.
    pub file_name: PathBuf,
    /// What went wrong.
    pub error: DifficultyError,
}

/// Output of [`convert_mapset`].
#[derive(Debug)]
#[must_use]
pub struct MapsetOutput {
    /// Path of the written `.osz`.
    pub archive: PathBuf,
    /// Difficulties converted, in file name order.
    pub converted: Vec<ConvertedDifficulty>,
    /// Difficulties that failed, in file name order.
    pub failed: Vec<FailedDifficulty>,
}

/// Output folder name of a mapset archive: its file stem with [`FOLDER_PREFIX`].
///
/// ```
/// use std::path::Path;
/// use qua2osu::mapset::mapset_folder_name;
///
/// assert_eq!(mapset_folder_name(Path::new("songs/123.qp")).unwrap(), "q_123");
/// ```
///
/// # Errors
///
/// Fails if `archive` has no file name.
pub fn mapset_folder_name(archive: &Path) -> Result<String, MapsetError> {
    let stem = archive
        .file_stem()
        .ok_or_else(|| MapsetError::NoFileName(archive.to_path_buf()))?;
    Ok(format!("{FOLDER_PREFIX}{}", stem.to_string_lossy()))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Finds the `.qp` archives in `dir`, and in its sub folders if `recursive`, sorted by path.
///
/// # Errors
///
/// Fails if a folder can not be read.
pub fn find_mapsets(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, MapsetError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), MAPSET_EXTENSION) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Output folder of `archive` that mirrors the folder it was found in, below `output_dir`.
///
/// Only the normal components of the parent folder are kept, so absolute paths and `..` never
/// lead outside of `output_dir`.
///
/// ```
/// use std::path::Path;
/// use qua2osu::mapset::preserved_output_dir;
///
/// assert_eq!(
///     preserved_output_dir(Path::new("out"), Path::new("songs/pack/1.qp")),
///     Path::new("out/songs/pack"),
/// );
/// assert_eq!(preserved_output_dir(Path::new("out"), Path::new("1.qp")), Path::new("out"));
/// ```
#[must_use]
pub fn preserved_output_dir(output_dir: &Path, archive: &Path) -> PathBuf {
    let mut dir = output_dir.to_path_buf();
    if let Some(parent) = archive.parent() {
        dir.extend(parent.components().filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        }));
    }
    dir
}

/// Converts one `.qua` file in place into a sibling `.osu` file, then deletes the `.qua`.
///
/// The `.osu` text is fully built before anything is written, and a failed write removes the
/// partial file, so a failure never leaves a `.osu` behind.
///
/// # Errors
///
/// Fails if the file can not be read, converted or written.
pub fn convert_difficulty(
    path: &Path,
    options: &ConvertOptions,
) -> Result<Vec<QuaToOsuWarning>, DifficultyError> {
    let source = fs::read_to_string(path).map_err(DifficultyError::Read)?;
    let output = convert_qua(&source, options)?;
    let target = path.with_extension(TARGET_EXTENSION);
    if let Err(err) = fs::write(&target, output.osu) {
        let _ = fs::remove_file(&target);
        return Err(DifficultyError::Write(err));
    }
    if let Err(err) = fs::remove_file(path) {
        log::warn!("could not remove {}: {err}", path.display());
    }
    Ok(output.warnings)
}

/// Converts the `.qp` mapset at `archive` into an `.osz` mapset in `output_dir`, which is created
/// if needed.
///
/// # Errors
///
/// Fails if the working folder or the `.osz` already exists, if the archive can not be extracted
/// or if the result can not be packed. Failures of single difficulties are reported in
/// [`MapsetOutput::failed`] instead.
pub fn convert_mapset(
    archive: &Path,
    output_dir: &Path,
    options: &MapsetOptions,
) -> Result<MapsetOutput, MapsetError> {
    let folder_name = mapset_folder_name(archive)?;
    let folder = output_dir.join(&folder_name);
    let package = output_dir.join(format!("{folder_name}.{PACKAGE_EXTENSION}"));
    if package.exists() {
        return Err(MapsetError::AlreadyExists(package));
    }

    extract(archive, output_dir, &folder)?;

    let mut difficulties = Vec::new();
    for entry in fs::read_dir(&folder).map_err(MapsetError::io(&folder))? {
        let path = entry.map_err(MapsetError::io(&folder))?.path();
        if path.is_file() && has_extension(&path, SOURCE_EXTENSION) {
            difficulties.push(path);
        }
    }
    difficulties.sort();

    let mut converted = Vec::new();
    let mut failed = Vec::new();
    for path in difficulties {
        let file_name = PathBuf::from(path.file_name().unwrap_or_default());
        match convert_difficulty(&path, &options.convert) {
            Ok(warnings) => {
                for warning in &warnings {
                    log::warn!("{}: {warning}", file_name.display());
                }
                log::debug!("converted {}", file_name.display());
                converted.push(ConvertedDifficulty {
                    file_name: file_name.with_extension(TARGET_EXTENSION),
                    warnings,
                });
            }
            Err(error) => {
                log::warn!("failed to convert {}: {error}", file_name.display());
                failed.push(FailedDifficulty { file_name, error });
            }
        }
    }

    let packed = pack(&folder, &package);
    if !options.keep_extracted {
        fs::remove_dir_all(&folder).map_err(MapsetError::io(&folder))?;
    }
    packed?;

    log::info!(
        "packed {} ({} converted, {} failed)",
        package.display(),
        converted.len(),
        failed.len()
    );
    Ok(MapsetOutput {
        archive: package,
        converted,
        failed,
    })
}

// `folder` must not exist yet: creating it is what claims it against concurrent conversions.
fn extract(archive: &Path, output_dir: &Path, folder: &Path) -> Result<(), MapsetError> {
    let file = File::open(archive).map_err(MapsetError::io(archive))?;
    let mut zip = ZipArchive::new(file).map_err(MapsetError::zip(archive))?;
    fs::create_dir_all(output_dir).map_err(MapsetError::io(output_dir))?;
    fs::create_dir(folder).map_err(MapsetError::claim(folder))?;
    zip.extract(folder).map_err(|source| {
        let _ = fs::remove_dir_all(folder);
        MapsetError::Zip {
            path: archive.to_path_buf(),
            source,
        }
    })
}

// Never overwrites an existing `package`. A partial one written here is removed on failure.
fn pack(folder: &Path, package: &Path) -> Result<(), MapsetError> {
    let file = File::create_new(package).map_err(MapsetError::claim(package))?;
    write_package(folder, package, file).inspect_err(|_| {
        let _ = fs::remove_file(package);
    })
}

fn write_package(folder: &Path, package: &Path, file: File) -> Result<(), MapsetError> {
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in WalkDir::new(folder).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(folder).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options)
            .map_err(MapsetError::zip(package))?;
        let mut source = File::open(entry.path()).map_err(MapsetError::io(entry.path()))?;
        io::copy(&mut source, &mut zip).map_err(MapsetError::io(package))?;
    }
    zip.finish().map_err(MapsetError::zip(package))?;
    Ok(())
}
