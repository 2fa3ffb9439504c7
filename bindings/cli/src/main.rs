//! Command-line front end: turn one photo into a passport photo.
//!
//! Usage:
//!   passport-photo INPUT OUTPUT
//!   passport-photo                 # file dialogs, with the `interactive` feature

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use passphoto::{FaceDetector, PassportPhoto};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "interactive")]
mod interactive;

#[derive(Parser, Debug)]
#[command(name = "passport-photo")]
#[command(
    version,
    about = "Crop a photo to a 413x531 px, 300 DPI passport photo on a white background",
    long_about = None
)]
struct Args {
    /// Input image (JPEG, PNG, WebP, BMP, GIF, TIFF)
    input: Option<PathBuf>,

    /// Output JPEG path
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passphoto=warn,passport_photo=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    match (args.input, args.output) {
        (Some(input), Some(output)) => match make_photo(&input, &output) {
            Ok(photo) => {
                println!("{}", confirmation(&output, &photo));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
        (None, None) => match launch_interactive() {
            Some(code) => code,
            None => usage_error("INPUT and OUTPUT are required"),
        },
        _ => usage_error("expected exactly two arguments: INPUT OUTPUT"),
    }
}

fn usage_error(message: &str) -> ExitCode {
    usage(message).exit()
}

fn usage(message: &str) -> clap::Error {
    Args::command().error(ErrorKind::MissingRequiredArgument, message)
}

#[cfg(feature = "interactive")]
fn launch_interactive() -> Option<ExitCode> {
    interactive::available().then(interactive::run)
}

#[cfg(not(feature = "interactive"))]
fn launch_interactive() -> Option<ExitCode> {
    None
}

#[cfg(feature = "rustface")]
fn detector() -> Option<Box<dyn FaceDetector>> {
    match passphoto::RustfaceDetector::bundled() {
        Ok(detector) => Some(Box::new(detector)),
        Err(e) => {
            tracing::warn!(error = %e, "face detector unavailable");
            None
        }
    }
}

#[cfg(not(feature = "rustface"))]
fn detector() -> Option<Box<dyn FaceDetector>> {
    tracing::debug!("built without face detection, using center crop");
    None
}

/// Shared by the CLI and the interactive adapter.
pub(crate) fn make_photo(input: &Path, output: &Path) -> anyhow::Result<PassportPhoto> {
    passphoto::process(input, output, detector())
        .with_context(|| format!("could not make a passport photo from {}", input.display()))
}

pub(crate) fn confirmation(output: &Path, photo: &PassportPhoto) -> String {
    format!(
        "Written {} ({}x{} px, {} DPI passport photo)",
        output.display(),
        photo.width,
        photo.height,
        photo.dpi
    )
}
