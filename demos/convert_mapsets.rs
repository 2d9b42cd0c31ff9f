//! Example: Convert Quaver mapsets into osu! mapsets
//!
//! Every `.qp` given directly, or found in a given folder, is converted into a `.osz` in the
//! output folder. Mapsets are converted in parallel. Mapsets sharing a file name need
//! `--preserve-folder-structure`, otherwise only the first one claiming the name is written.
//!
//! ```sh
//! RUST_LOG=info cargo run --example convert_mapsets -- songs/ -o output --od 7.5 --sample-set drum
//! ```

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use clap::Parser;
use qua2osu::prelude::*;
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "convert_mapsets")]
#[command(about = "Converts .qp files to .osz files", long_about = None)]
struct Config {
    /// Directories containing .qp files, or direct paths to .qp files
    #[arg(value_name = "PATH", required = true)]
    inputs: Vec<PathBuf>,

    /// Output folder
    #[arg(short, long, default_value = "./output", value_name = "DIR")]
    output: PathBuf,

    /// Overall difficulty, between 0 and 10
    #[arg(long = "od", default_value = "8", value_parser = difficulty_value)]
    overall_difficulty: f64,

    /// HP drain rate, between 0 and 10
    #[arg(long = "hp", default_value = "8", value_parser = difficulty_value)]
    hp_drain_rate: f64,

    /// Hit sound volume, between 0 and 100
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: u8,

    /// Sample set: Soft, Normal or Drum
    #[arg(long, default_value = "Soft")]
    sample_set: SampleSet,

    /// Also search sub folders of the input folders
    #[arg(short, long)]
    recursive: bool,

    /// Mirror the folders the .qp files were found in below the output folder
    #[arg(short, long)]
    preserve_folder_structure: bool,

    /// Keep the extracted folders next to the .osz files
    #[arg(long)]
    keep_extracted: bool,
}

fn difficulty_value(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|err| format!("{err}"))?;
    if (0.0..=10.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 10"))
    }
}

fn collect_inputs(config: &Config) -> Result<Vec<PathBuf>, MapsetError> {
    let mut archives = Vec::new();
    for input in &config.inputs {
        if input.is_dir() {
            archives.extend(find_mapsets(input, config.recursive)?);
        } else {
            archives.push(input.clone());
        }
    }
    Ok(archives)
}

fn report(archive: &Path, result: &Result<MapsetOutput, MapsetError>) {
    match result {
        Ok(output) => {
            println!(
                "{} -> {} ({} converted)",
                archive.display(),
                output.archive.display(),
                output.converted.len()
            );
            for failed in &output.failed {
                println!("  skipped {}: {}", failed.file_name.display(), failed.error);
            }
        }
        Err(err @ MapsetError::AlreadyExists(_)) => eprintln!(
            "{}: {err} (another mapset has the same name, try --preserve-folder-structure)",
            archive.display()
        ),
        Err(err) => eprintln!("{}: {err}", archive.display()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = Config::parse();

    let options = MapsetOptions {
        convert: ConvertOptions {
            overall_difficulty: config.overall_difficulty,
            hp_drain_rate: config.hp_drain_rate,
            hit_sound_volume: config.volume,
            sample_set: config.sample_set,
        },
        keep_extracted: config.keep_extracted,
    };

    let archives = collect_inputs(&config)?;
    if archives.is_empty() {
        eprintln!("no .qp files found");
        return Ok(());
    }

    let start = Instant::now();
    let results: Vec<_> = archives
        .par_iter()
        .map(|archive| {
            let output_dir = if config.preserve_folder_structure {
                preserved_output_dir(&config.output, archive)
            } else {
                config.output.clone()
            };
            convert_mapset(archive, &output_dir, &options)
        })
        .collect();

    for (archive, result) in archives.iter().zip(&results) {
        report(archive, result);
    }
    let failures = results.iter().filter(|result| result.is_err()).count();
    println!(
        "converted {} of {} mapsets in {:.2?}",
        results.len() - failures,
        results.len(),
        start.elapsed()
    );
    Ok(())
}
