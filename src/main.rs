//! Command-line front end for photodeck.
//!
//! # Usage
//!
//! Full batch with the conventional layout in the working directory:
//! ```sh
//! photodeck run
//! ```
//!
//! Full batch described by a manifest:
//! ```sh
//! photodeck run --manifest donors.yaml
//! ```
//!
//! Individual phases:
//! ```sh
//! photodeck normalize Photos/*.jpg --width 1152 --height 648
//! photodeck build --manifest donors.yaml
//! photodeck derive --manifest donors.yaml Jack Joan
//! photodeck inspect "Donor PowerPoints/Jack.pptx"
//! ```

use clap::{Parser, Subcommand};
use photodeck::batch::{self, Config, Resolution};
use photodeck::common::unit::{DEFAULT_DPI, emu_to_inches, emu_to_px};
use photodeck::ooxml::pptx::Package;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Build personalized photo slide decks
#[derive(Parser, Debug)]
#[command(
    name = "photodeck",
    about = "Build personalized PowerPoint photo decks from shared and per-recipient photos",
    version
)]
struct Cli {
    /// Log every asset as it is processed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize photos, build the base deck and derive every recipient deck
    Run {
        /// YAML manifest; the conventional layout is used when omitted
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Resize images in place to a fixed resolution
    Normalize {
        /// Images to normalize
        #[arg(value_name = "IMAGE", required = true)]
        files: Vec<PathBuf>,

        #[arg(long, default_value_t = Resolution::default().width)]
        width: u32,

        #[arg(long, default_value_t = Resolution::default().height)]
        height: u32,
    },

    /// Build the base deck from the shared photos
    Build {
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Derive recipient decks from an existing base deck
    Derive {
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Recipients to derive; all configured recipients when omitted
        #[arg(value_name = "NAME")]
        recipients: Vec<String>,
    },

    /// Print the canvas size and the pictures on each slide of a deck
    Inspect {
        #[arg(value_name = "DECK")]
        deck: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {} [{}]", err, err.kind());
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "photodeck=debug" } else { "photodeck=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(manifest: Option<&Path>) -> photodeck::Result<Config> {
    match manifest {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn execute(command: Command) -> photodeck::Result<()> {
    match command {
        Command::Run { manifest } => {
            let config = load_config(manifest.as_deref())?;
            let report = batch::run(&config)?;
            println!(
                "Your PowerPoints have been created! ({})",
                report.output_dir.display()
            );
        },
        Command::Normalize { files, width, height } => {
            let target = Resolution::new(width, height);
            for file in &files {
                batch::normalize(file, target)?;
            }
            println!("Normalized {} image(s) to {}", files.len(), target);
        },
        Command::Build { manifest } => {
            let config = load_config(manifest.as_deref())?;
            let base = batch::build(&config)?;
            println!("Base deck written to {}", base.display());
        },
        Command::Derive { manifest, recipients } => {
            let config = load_config(manifest.as_deref())?;
            let decks = batch::derive(&config, &recipients)?;
            for deck in &decks {
                println!("{}", deck.display());
            }
        },
        Command::Inspect { deck } => inspect(&deck)?,
    }
    Ok(())
}

fn inspect(path: &Path) -> photodeck::Result<()> {
    let package = Package::open(path)?;
    let pres = package.presentation()?;

    match (pres.slide_width()?, pres.slide_height()?) {
        (Some(cx), Some(cy)) => println!(
            "{}: {:.2}in x {:.2}in ({} x {} EMU)",
            path.display(),
            emu_to_inches(cx),
            emu_to_inches(cy),
            cx,
            cy
        ),
        _ => println!("{}: no slide size", path.display()),
    }

    for (idx, slide) in pres.slides()?.iter().enumerate() {
        println!(
            "slide {} [{}]",
            idx + 1,
            slide.layout_name.as_deref().unwrap_or("no layout")
        );
        for picture in &slide.pictures {
            println!(
                "  {} \"{}\" at ({}, {}), {}x{} px, {} ({} bytes)",
                picture.name,
                picture.description,
                picture.offset.0,
                picture.offset.1,
                emu_to_px(picture.extent.0, DEFAULT_DPI),
                emu_to_px(picture.extent.1, DEFAULT_DPI),
                picture.content_type,
                picture.image.len()
            );
        }
    }
    Ok(())
}
