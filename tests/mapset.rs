//! Conversion of `.qp` archives into `.osz` archives.
#![cfg(feature = "archive")]

use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

use pretty_assertions::assert_eq;
use qua2osu::prelude::*;
use zip::{ZipArchive, ZipWriter, write::SimpleFileOptions};

const FOUR_KEYS: &str = include_str!("files/four_keys.qua");
const SEVEN_KEYS: &str = include_str!("files/seven_keys.qua");

fn write_qp(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap();
}

fn read_osz(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        entries.push((file.name().to_owned(), contents));
    }
    entries.sort();
    entries
}

#[test]
fn converts_every_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("1234.qp");
    write_qp(
        &archive,
        &[
            ("normal.qua", FOUR_KEYS.as_bytes()),
            ("chaos.qua", SEVEN_KEYS.as_bytes()),
            ("audio.mp3", b"not really audio"),
            ("bg.jpg", b"not really an image"),
        ],
    );
    let output_dir = dir.path().join("output");
    fs::create_dir(&output_dir).unwrap();

    let output = convert_mapset(&archive, &output_dir, &MapsetOptions::default()).unwrap();
    assert_eq!(output.archive, output_dir.join("q_1234.osz"));
    assert!(output.failed.is_empty());
    let converted: Vec<_> = output
        .converted
        .iter()
        .map(|difficulty| difficulty.file_name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(converted, vec!["chaos.osu", "normal.osu"]);

    let entries = read_osz(&output.archive);
    let names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["audio.mp3", "bg.jpg", "chaos.osu", "normal.osu"]);
    assert_eq!(entries[0].1, b"not really audio");
    assert_eq!(
        String::from_utf8(entries[3].1.clone()).unwrap(),
        include_str!("files/four_keys.osu")
    );

    assert!(!output_dir.join("q_1234").exists());
}

#[test]
fn failed_difficulty_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("mixed.qp");
    write_qp(
        &archive,
        &[
            ("good.qua", FOUR_KEYS.as_bytes()),
            ("bad.qua", b"Mode: Keys4\nAudioFile: a.mp3\n"),
        ],
    );

    let output = convert_mapset(&archive, dir.path(), &MapsetOptions::default()).unwrap();
    assert_eq!(output.converted.len(), 1);
    assert_eq!(output.failed.len(), 1);
    let failed = &output.failed[0];
    assert_eq!(failed.file_name, Path::new("bad.qua"));
    assert!(matches!(
        failed.error,
        DifficultyError::Convert(ConvertError::Field(QuaFieldError::Missing(
            "BackgroundFile"
        )))
    ));

    let entries = read_osz(&output.archive);
    let names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["bad.qua", "good.osu"]);
}

#[test]
fn nested_assets_keep_their_folders() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("nested.qp");
    write_qp(
        &archive,
        &[
            ("map.qua", FOUR_KEYS.as_bytes()),
            ("skin/note.png", b"png"),
        ],
    );

    let output = convert_mapset(&archive, dir.path(), &MapsetOptions::default()).unwrap();
    let names: Vec<_> = read_osz(&output.archive)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["map.osu", "skin/note.png"]);
}

#[test]
fn lane_warnings_are_reported_per_difficulty() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("wide.qp");
    let source = "\
Mode: Keys4
AudioFile: a.mp3
BackgroundFile: b.png
HitObjects:
- Lane: 5
";
    write_qp(&archive, &[("wide.qua", source.as_bytes())]);

    let output = convert_mapset(&archive, dir.path(), &MapsetOptions::default()).unwrap();
    assert_eq!(
        output.converted[0].warnings,
        vec![QuaToOsuWarning::LaneOutOfRange {
            index: 0,
            lane: 5,
            key_count: 4
        }]
    );
}

#[test]
fn find_then_convert_all() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output_dir = dir.path().join("output");
    fs::create_dir_all(input.join("more")).unwrap();
    fs::create_dir(&output_dir).unwrap();
    write_qp(&input.join("a.qp"), &[("a.qua", FOUR_KEYS.as_bytes())]);
    write_qp(&input.join("more/b.qp"), &[("b.qua", SEVEN_KEYS.as_bytes())]);

    assert_eq!(find_mapsets(&input, false).unwrap().len(), 1);
    let archives = find_mapsets(&input, true).unwrap();
    assert_eq!(archives.len(), 2);

    for archive in &archives {
        let output = convert_mapset(archive, &output_dir, &MapsetOptions::default()).unwrap();
        assert!(output.failed.is_empty());
    }
    assert!(output_dir.join("q_a.osz").is_file());
    assert!(output_dir.join("q_b.osz").is_file());
}

fn osz_names(path: &Path) -> Vec<String> {
    read_osz(path).into_iter().map(|(name, _)| name).collect()
}

#[test]
fn same_stem_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output_dir = dir.path().join("output");
    fs::create_dir_all(input.join("a")).unwrap();
    fs::create_dir_all(input.join("b")).unwrap();
    write_qp(&input.join("a/1.qp"), &[("first.qua", FOUR_KEYS.as_bytes())]);
    write_qp(&input.join("b/1.qp"), &[("second.qua", SEVEN_KEYS.as_bytes())]);

    let archives = find_mapsets(&input, true).unwrap();
    assert_eq!(archives, vec![input.join("a/1.qp"), input.join("b/1.qp")]);

    let first = convert_mapset(&archives[0], &output_dir, &MapsetOptions::default()).unwrap();
    let err = convert_mapset(&archives[1], &output_dir, &MapsetOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        MapsetError::AlreadyExists(ref path) if path == &output_dir.join("q_1.osz")
    ));
    assert_eq!(osz_names(&first.archive), vec!["first.osu"]);
    assert!(!output_dir.join("q_1").exists());
}

#[test]
fn concurrent_same_stem_claims_once() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("output");
    let archives = [dir.path().join("a"), dir.path().join("b")].map(|folder| {
        fs::create_dir(&folder).unwrap();
        let archive = folder.join("1.qp");
        write_qp(&archive, &[("map.qua", FOUR_KEYS.as_bytes())]);
        archive
    });

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = archives
            .iter()
            .map(|archive| {
                let output_dir = &output_dir;
                scope.spawn(move || {
                    convert_mapset(archive, output_dir, &MapsetOptions::default())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|result| matches!(result, Err(MapsetError::AlreadyExists(_))))
    );
    assert_eq!(osz_names(&output_dir.join("q_1.osz")), vec!["map.osu"]);
}

#[test]
fn preserved_layout_keeps_same_stems_apart() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    let output_dir = dir.path().join("output");
    fs::create_dir_all(input.join("a")).unwrap();
    fs::create_dir_all(input.join("b")).unwrap();
    write_qp(&input.join("a/1.qp"), &[("first.qua", FOUR_KEYS.as_bytes())]);
    write_qp(&input.join("b/1.qp"), &[("second.qua", SEVEN_KEYS.as_bytes())]);

    for archive in find_mapsets(&input, true).unwrap() {
        let relative = archive.strip_prefix(dir.path()).unwrap();
        let target = preserved_output_dir(&output_dir, relative);
        let output = convert_mapset(&archive, &target, &MapsetOptions::default()).unwrap();
        assert!(output.failed.is_empty());
    }

    assert_eq!(
        osz_names(&output_dir.join("input/a/q_1.osz")),
        vec!["first.osu"]
    );
    assert_eq!(
        osz_names(&output_dir.join("input/b/q_1.osz")),
        vec!["second.osu"]
    );
}
