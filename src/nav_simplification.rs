use std::path::Path;

use chrono::Utc;
use error_stack::{Result, ResultExt};
use log::info;

use crate::douglas_peucker::{douglas_peucker, Strategy};
use crate::error::NavSimplifyError;
use crate::navfile::{read_nav_file, write_nav_file, OutputFormat, OutputMeta, ReaderOptions};

/// Maximum perpendicular deviation, in degrees, used by the reference tool.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    pub tolerance: f64,
    pub strategy: Strategy,
    pub format: OutputFormat,
    pub reader: ReaderOptions,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            tolerance: DEFAULT_TOLERANCE,
            strategy: Strategy::default(),
            format: OutputFormat::default(),
            reader: ReaderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyStats {
    pub input_samples: usize,
    pub output_samples: usize,
}

/// Reads `input`, simplifies the track and writes it to `output`.
///
/// A missing or unreadable input aborts the run before anything is written.
pub fn simplify_nav_file(
    input: &Path,
    output: &Path,
    options: &SimplifyOptions,
) -> Result<SimplifyStats, NavSimplifyError> {
    let points = read_nav_file(input, &options.reader)
        .change_context(NavSimplifyError)?;
    info!("Number of input samples: {}", points.len());

    let simplified = douglas_peucker(&points, options.tolerance, options.strategy);

    let meta = OutputMeta {
        created: Utc::now(),
        tolerance: options.tolerance,
        input_samples: points.len(),
    };
    write_nav_file(output, options.format, &simplified, &meta)
        .change_context(NavSimplifyError)?;
    info!("Number of output samples: {}", simplified.len());

    Ok(SimplifyStats {
        input_samples: points.len(),
        output_samples: simplified.len(),
    })
}
