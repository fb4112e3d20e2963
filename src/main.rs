use std::{io, process::ExitCode};

use boundary_runner::{BoundaryRunner, LogFormat};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

mod admin;
mod boundary;
mod boundary_runner;
mod geometry;
mod osm_data;
mod result_writer;
mod ring_codec;
mod stitch;
#[cfg(test)]
mod test_utils;

fn init_tracing(format: LogFormat, level: Level) {
    let builder = FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_max_level(level);

    let result = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    if let Err(error) = result {
        eprintln!("setting default subscriber failed: {error}");
    }
}

fn main() -> ExitCode {
    let runner = match BoundaryRunner::init() {
        Ok(runner) => runner,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(runner.log_format(), runner.log_level());

    match runner.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "Run failed");
            ExitCode::FAILURE
        }
    }
}
