use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use error_stack::{Report, Result, ResultExt};
use log::{debug, warn};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use geojson::Value::LineString;

use crate::coordinate::Coordinate;
use crate::error::{NavReadError, NavWriteError, RecordError};

pub const R2R_FORMAT_URL: &str = "http://get.rvdata.us/format/100002/format-r2rnav.txt";

/// Layout of a delimited nav input file.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub delimiter: u8,
    /// Records whose first field starts with one of these are skipped.
    pub comment_prefixes: Vec<String>,
    /// Drop the first non-comment record (a column label row).
    pub skip_first_record: bool,
    pub label_column: usize,
    pub lon_column: usize,
    pub lat_column: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            delimiter: b'\t',
            comment_prefixes: vec![String::from("//"), String::from("#"), String::from(">")],
            skip_first_record: false,
            label_column: 0,
            lon_column: 1,
            lat_column: 2,
        }
    }
}

impl ReaderOptions {
    fn is_comment(&self, first_field: &str) -> bool {
        self.comment_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && first_field.starts_with(prefix.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    R2r,
    GeoJson,
}

/// Run details recorded alongside the simplified track.
#[derive(Debug, Clone)]
pub struct OutputMeta {
    pub created: DateTime<Utc>,
    pub tolerance: f64,
    pub input_samples: usize,
}

fn parse_degrees(record: &csv::StringRecord, column: usize) -> std::result::Result<f64, RecordError> {
    let value = record.get(column).ok_or(RecordError::MissingField {
        column,
        found: record.len(),
    })?;
    value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
        column,
        value: value.to_string(),
    })
}

fn parse_record(record: &csv::StringRecord, options: &ReaderOptions) -> std::result::Result<Coordinate, RecordError> {
    let label = record.get(options.label_column).ok_or(RecordError::MissingField {
        column: options.label_column,
        found: record.len(),
    })?;
    let lon = parse_degrees(record, options.lon_column)?;
    let lat = parse_degrees(record, options.lat_column)?;

    Ok(Coordinate::new(lon, lat, label))
}

/// Reads a track from delimited nav text.
///
/// Comment and blank lines are ignored. Records that cannot be parsed are
/// logged and skipped; only I/O failures abort the read.
pub fn read_nav<R: Read>(reader: R, options: &ReaderOptions) -> Result<Vec<Coordinate>, NavReadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut skip_record = options.skip_first_record;

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => {
                return Err(Report::new(err).change_context(NavReadError));
            }
            Err(err) => {
                warn!("skipping unreadable record: {}", err);
                continue;
            }
        };

        if record.iter().all(|field| field.is_empty()) || options.is_comment(&record[0]) {
            continue;
        }

        let line = record.position().map_or(0, |pos| pos.line());

        if skip_record {
            skip_record = false;
            debug!("line {}: skipping label record", line);
            continue;
        }

        match parse_record(&record, options) {
            Ok(coord) => points.push(coord),
            Err(err) => warn!("line {}: skipping record: {}", line, err),
        }
    }

    Ok(points)
}

pub fn read_nav_file(path: &Path, options: &ReaderOptions) -> Result<Vec<Coordinate>, NavReadError> {
    let file = File::open(path)
        .change_context(NavReadError)
        .attach_printable_lazy(|| format!("input file: {}", path.display()))?;

    let points = read_nav(file, options)
        .attach_printable_lazy(|| format!("input file: {}", path.display()))?;

    debug!("read {} samples from {}", points.len(), path.display());
    Ok(points)
}

// Shortest round-trip form, integral values keep their ".0".
fn format_degrees(value: f64) -> String {
    format!("{:?}", value)
}

/// Writes the R2R nav header followed by one tab separated line per point.
pub fn write_r2r<W: Write>(mut writer: W, points: &[Coordinate], meta: &OutputMeta) -> Result<(), NavWriteError> {
    let header = format!(
        "// Datetime [UTC], Longitude [deg], Latitude [deg]\n\
         // More detailed information may be found here: {}\n\
         // Creation date: {}Z\n",
        R2R_FORMAT_URL,
        meta.created.format("%Y-%m-%dT%H:%M:%S"),
    );
    writer.write_all(header.as_bytes()).change_context(NavWriteError)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for point in points {
        let lon = format_degrees(point.longitude);
        let lat = format_degrees(point.latitude);
        csv_writer
            .write_record([point.label.as_str(), lon.as_str(), lat.as_str()])
            .change_context(NavWriteError)
            .attach_printable_lazy(|| format!("sample {}", point.label))?;
    }

    csv_writer.flush().change_context(NavWriteError)?;
    Ok(())
}

pub fn to_geojson(points: &[Coordinate], meta: &OutputMeta) -> GeoJson {
    let coords: Vec<Vec<f64>> = points.iter()
        .map(|p| vec![p.longitude, p.latitude])
        .collect();
    let line_string = Geometry::new(LineString(coords));

    let mut properties = serde_json::Map::new();
    properties.insert(String::from("labels"),
        serde_json::Value::Array(
            points.iter().map(|p| serde_json::Value::String(p.label.clone())).collect()));

    if let Some(number) = serde_json::Number::from_f64(meta.tolerance) {
        properties.insert(String::from("tolerance"), serde_json::Value::Number(number));
    }

    properties.insert(String::from("input_samples"),
        serde_json::Value::Number(serde_json::Number::from(meta.input_samples as u64)));
    properties.insert(String::from("output_samples"),
        serde_json::Value::Number(serde_json::Number::from(points.len() as u64)));
    properties.insert(String::from("created"),
        serde_json::Value::String(meta.created.format("%Y-%m-%dT%H:%M:%SZ").to_string()));

    let feature = Feature {
        bbox: None,
        geometry: Some(line_string),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    };

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    })
}

pub fn write_geojson<W: Write>(mut writer: W, points: &[Coordinate], meta: &OutputMeta) -> Result<(), NavWriteError> {
    let geojson_string = serde_json::to_string_pretty(&to_geojson(points, meta))
        .change_context(NavWriteError)?;

    writer.write_all(geojson_string.as_bytes()).change_context(NavWriteError)?;
    writer.write_all(b"\n").change_context(NavWriteError)?;
    writer.flush().change_context(NavWriteError)?;
    Ok(())
}

pub fn write_nav_file(
    path: &Path,
    format: OutputFormat,
    points: &[Coordinate],
    meta: &OutputMeta,
) -> Result<(), NavWriteError> {
    let file = File::create(path)
        .change_context(NavWriteError)
        .attach_printable_lazy(|| format!("cannot create {}", path.display()))?;
    let writer = BufWriter::new(file);

    let written = match format {
        OutputFormat::R2r => write_r2r(writer, points, meta),
        OutputFormat::GeoJson => write_geojson(writer, points, meta),
    };
    written.attach_printable_lazy(|| format!("output file: {}", path.display()))
}
