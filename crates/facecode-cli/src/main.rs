use anyhow::Result;
use clap::Parser;
use facecode_core::{EncodeReport, FaceExtractor, OnnxFaceEncoder};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

const PROGRAM: &str = "facecode";

/// Print the first face encoding found in an image as a JSON record.
///
/// Failures are reported in the record (`"success": false`) with exit code 0.
/// Only a wrong number of arguments exits non-zero. There are no flags: every
/// argument, `--help` included, is an image path.
#[derive(Parser)]
#[command(name = PROGRAM, disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Image file to encode
    #[arg(value_name = "IMAGE_PATH", allow_hyphen_values = true, trailing_var_arg = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.debug);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            tracing::debug!(error = %e, "argument parsing failed");
            usage_exit();
        }
    };

    let [image_path] = cli.paths.as_slice() else {
        tracing::debug!(count = cli.paths.len(), "expected exactly one image path");
        usage_exit();
    };

    tracing::debug!(model_dir = %config.model_dir.display(), "using model directory");
    let mut extractor = FaceExtractor::new(OnnxFaceEncoder::new(config.encoder_options()));
    let report = EncodeReport::from(extractor.encode_face(image_path));

    if let Some(error) = &report.error {
        tracing::debug!(%error, "no encoding produced");
    }
    emit(&report)
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    // stdout carries only the JSON record
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(report: &EncodeReport) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", report.to_json()?)?;
    out.flush()?;
    Ok(())
}

fn usage_exit() -> ! {
    if let Err(e) = emit(&EncodeReport::usage(PROGRAM)) {
        tracing::error!(error = %e, "failed to write usage record");
    }
    process::exit(1);
}
