//! # Comicgen CLI
//!
//! Command-line interface for generating comics.
//!
//! ## Usage
//!
//! ```bash
//! # One comic from ./, written to "default out.png" / "default out.txt"
//! comicgen
//!
//! # Three comics from a comic directory, web-optimized
//! comicgen -i ./comics -n 3 -w -p strip.png -o strip.txt
//!
//! # Reproduce a comic exactly
//! comicgen --seed 1234 --manifest strip.json
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`, `error` with `--silent`).

use clap::Parser;
use clap::error::ErrorKind;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use comicgen::{
    ComicError, GeneratorConfig,
    comic::{Generator, Outputs},
    error::EX_USAGE,
    font::FontLibrary,
};

const NOTICE: &str = "comicgen  Copyright (C) comicgen contributors
This program comes with ABSOLUTELY NO WARRANTY. This is free software, and
you are welcome to redistribute it under the terms of the GNU AGPL v3 or later.";

/// Comicgen - fill comic speech bubbles with generated dialogue
#[derive(Parser, Debug)]
#[command(name = "comicgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only print errors
    #[arg(short, long)]
    silent: bool,

    /// Input directory holding images/, transcripts/, word-bubbles/ and fonts/
    #[arg(short, long, value_name = "DIR", default_value = "./")]
    indir: PathBuf,

    /// Transcript output file
    #[arg(short, long, value_name = "FILE", default_value = "default out.txt")]
    outtextfile: PathBuf,

    /// Image output file
    #[arg(short = 'p', long, value_name = "FILE", default_value = "default out.png")]
    outimagefile: PathBuf,

    /// Number of comics to generate
    #[arg(short, long, default_value = "1")]
    number: usize,

    /// Quantize to the web palette and compress the PNG harder
    #[arg(short = 'w', long)]
    saveforweb: bool,

    /// Font file for dialogue
    #[arg(short, long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font file for bold words (synthesized from the regular font if absent)
    #[arg(long, value_name = "FILE")]
    bold_font: Option<PathBuf>,

    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Flip the case of each word's first letter at random
    #[arg(long)]
    randomize_capitals: bool,

    /// Left-align lines instead of centering them
    #[arg(long)]
    no_center: bool,

    /// Smallest font size to try, in pixels
    #[arg(long, default_value_t = GeneratorConfig::DEFAULT_MIN_FONT_SIZE)]
    min_font_size: u32,

    /// Also write a JSON manifest of the generated bubbles
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

/// Exit status for a failed argument parse: 0 for help and version output,
/// `EX_USAGE` for anything the user got wrong.
fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => EX_USAGE,
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_exit_code(&e);
            if code == 0 {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let default_filter = if cli.silent { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if !cli.silent {
        eprintln!("{}\n", NOTICE);
    }

    if cli.number == 0 {
        eprintln!("Error: --number must be at least 1");
        std::process::exit(EX_USAGE);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), ComicError> {
    let mut config = GeneratorConfig::new(&cli.indir);
    config.font = cli.font;
    config.bold_font = cli.bold_font;
    config.randomize_capitals = cli.randomize_capitals;
    config.center = !cli.no_center;
    config.min_font_size = cli.min_font_size.max(1);

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let outputs = Outputs {
        transcript: cli.outtextfile,
        image: cli.outimagefile,
        manifest: cli.manifest,
        for_web: cli.saveforweb,
    };
    for index in 0..cli.number {
        outputs.numbered(index, cli.number).check_writable()?;
    }

    let fonts = FontLibrary::discover(&config);
    let generator = Generator::new(config, fonts)?;

    for index in 0..cli.number {
        let comic = generator.generate(&mut rng)?;
        if !cli.silent {
            print!("{}", comic.transcript());
        }
        let overflowed = comic.overflowed();
        if overflowed > 0 {
            info!("{} bubble(s) overflowed at the minimum font size", overflowed);
        }
        comic.save(&outputs.numbered(index, cli.number), seed)?;
    }

    Ok(())
}
