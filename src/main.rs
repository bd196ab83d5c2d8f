//! Generate a large, reproducible `city;temperature` measurements file.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger;
use failure::Error;

use weather_gen::config::{
    DEFAULT_BUFFER_FACTOR, DEFAULT_CHUNK_SIZE, DEFAULT_LINES, DEFAULT_SEED,
};
use weather_gen::{CityList, GeneratorConfig};

#[derive(Debug, Parser)]
#[command(name = "weather-gen", version, about)]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "out.txt")]
    output: PathBuf,

    /// Lines to output
    #[arg(short, long, default_value_t = DEFAULT_LINES)]
    lines: u64,

    /// Seed for the random streams
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Lines per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// In-flight chunks per worker
    #[arg(long, default_value_t = DEFAULT_BUFFER_FACTOR)]
    buffer_factor: usize,

    /// Worker threads, defaults to the available parallelism
    #[arg(short, long)]
    workers: Option<usize>,

    /// City list, one name per line, replaces the embedded one
    #[arg(short, long)]
    cities: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::default()
            .with_lines(self.lines)
            .with_seed(self.seed)
            .with_chunk_size(self.chunk_size)
            .with_buffer_factor(self.buffer_factor);

        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }

    fn cities(&self) -> Result<CityList, Error> {
        match &self.cities {
            Some(path) => CityList::from_file(path),
            None => Ok(CityList::embedded()?),
        }
    }
}

fn main() {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");

    env_logger::init_from_env(env);

    let args = Args::parse();

    let cities = match args.cities() {
        Ok(cities) => cities,
        Err(error) => {
            log::error!("Failed to load city list, cause: {}", error);
            process::exit(1);
        }
    };

    // Failures are already logged by the library.
    match weather_gen::generate_file(&args.output, args.config(), cities) {
        Ok(summary) => log::info!(
            "Generated {} lines in {:?} ({:.2} million lines/sec)",
            summary.lines,
            summary.elapsed,
            summary.million_lines_per_sec()
        ),
        Err(_) => process::exit(1),
    }
}
