//! Generate a large, reproducible `city;temperature` measurements file.
//!
//! Lines are synthesized by parallel workers and reassembled in order by a
//! single writer, see the `pipeline` module for the workflow.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use failure::Error;

pub mod chunk;
pub mod city;
pub mod config;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod profile;
pub mod record;

pub use city::CityList;
pub use config::GeneratorConfig;
pub use error::GenError;
pub use pipeline::{Pipeline, Summary};

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Main entry function, generate `config.lines` records into `output`.
pub fn generate_file<P: AsRef<Path>>(
    output: P,
    config: GeneratorConfig,
    cities: CityList,
) -> Result<Summary, Error> {
    let output = output.as_ref();

    log::info!(
        "Start generation of file {} with {} lines, seed {}",
        output.display(),
        config.lines,
        config.seed
    );

    match internal_process(output, config, cities) {
        Ok(summary) => Ok(summary),
        Err(error) => {
            log::error!("Failed to generate {}, cause: {}", output.display(), error);
            Err(error)
        }
    }
}

fn internal_process(
    output: &Path,
    config: GeneratorConfig,
    cities: CityList,
) -> Result<Summary, Error> {
    let pipeline = Pipeline::new(config, cities)?;

    let file = File::create(output).map_err(|err| GenError::Destination {
        path: output.to_path_buf(),
        reason: err.to_string(),
    })?;

    let (_, summary) = pipeline.run(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file))?;

    Ok(summary)
}

/// Generate into any sink, handing it back once flushed.
pub fn generate<W: Write + Send + 'static>(
    out: W,
    config: GeneratorConfig,
    cities: CityList,
) -> Result<(W, Summary), Error> {
    Pipeline::new(config, cities)?.run(out)
}
