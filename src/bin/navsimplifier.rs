extern crate clap;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::error;

use navsimplify::douglas_peucker::Strategy;
use navsimplify::nav_simplification::{simplify_nav_file, SimplifyOptions, DEFAULT_TOLERANCE};
use navsimplify::navfile::{OutputFormat, ReaderOptions};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    R2r,
    Geojson,
}

#[derive(Clone, Copy, ValueEnum)]
enum Walk {
    Stack,
    Recursive,
}

/// Reduce a navigation track with the Douglas-Peucker algorithm
#[derive(Parser)]
#[clap(version, about)]
struct Opts {
    /// Path to the input nav file
    input: PathBuf,

    /// Path to the simplified output file
    output: PathBuf,

    /// Maximum perpendicular deviation in degrees
    #[clap(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Field delimiter of the input file
    #[clap(short, long, default_value = "\t")]
    delimiter: char,

    /// Lines starting with this prefix are comments (repeatable)
    #[clap(long = "comment", default_values = ["//", "#", ">"])]
    comment_prefixes: Vec<String>,

    /// Skip the first non-comment record (column labels)
    #[clap(long, default_value = "false")]
    skip_first_record: bool,

    /// Zero-based column of the sample label
    #[clap(long, default_value = "0")]
    label_column: usize,

    /// Zero-based column of the longitude
    #[clap(long, default_value = "1")]
    lon_column: usize,

    /// Zero-based column of the latitude
    #[clap(long, default_value = "2")]
    lat_column: usize,

    /// Output format
    #[clap(short, long, value_enum, default_value = "r2r")]
    format: Format,

    /// Traversal used by the simplifier
    #[clap(long, value_enum, default_value = "stack")]
    strategy: Walk,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts: Opts = Opts::parse();

    let delimiter = match u8::try_from(opts.delimiter) {
        Ok(delimiter) => delimiter,
        Err(_) => {
            error!("delimiter must be a single byte character: {:?}", opts.delimiter);
            return ExitCode::FAILURE;
        }
    };

    let options = SimplifyOptions {
        tolerance: opts.tolerance,
        strategy: match opts.strategy {
            Walk::Stack => Strategy::Stack,
            Walk::Recursive => Strategy::Recursive,
        },
        format: match opts.format {
            Format::R2r => OutputFormat::R2r,
            Format::Geojson => OutputFormat::GeoJson,
        },
        reader: ReaderOptions {
            delimiter,
            comment_prefixes: opts.comment_prefixes,
            skip_first_record: opts.skip_first_record,
            label_column: opts.label_column,
            lon_column: opts.lon_column,
            lat_column: opts.lat_column,
        },
    };

    match simplify_nav_file(&opts.input, &opts.output, &options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(report) => {
            error!("{:?}", report);
            ExitCode::FAILURE
        }
    }
}
