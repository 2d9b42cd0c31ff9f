//! Example: Convert a single `.qua` file and print the `.osu` text
//!
//! Errors are rendered against the source with ariadne, and warnings are listed on stderr.
//!
//! ```sh
//! cargo run --example qua_to_osu -- tests/files/four_keys.qua
//! ```

use std::path::PathBuf;

use clap::Parser;
use qua2osu::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "qua_to_osu")]
#[command(about = "Converts one .qua file into .osu text", long_about = None)]
struct Config {
    /// Path of the .qua file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Write the .osu here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = Config::parse();

    let source = std::fs::read_to_string(&config.path)?;
    let name = config.path.display().to_string();

    let QuaToOsuOutput { osu, warnings } = match convert_qua(&source, &ConvertOptions::default())
    {
        Ok(output) => output,
        Err(err) => {
            emit_convert_error(&name, &source, &err);
            std::process::exit(1);
        }
    };
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    match config.output {
        Some(path) => std::fs::write(path, osu)?,
        None => print!("{osu}"),
    }
    Ok(())
}
