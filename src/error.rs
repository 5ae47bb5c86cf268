//! Error contexts for the nav file layer. The simplifier itself cannot fail.

use std::fmt;

/// The input nav file could not be opened or read.
#[derive(Debug)]
pub struct NavReadError;

impl fmt::Display for NavReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to read nav file")
    }
}

impl std::error::Error for NavReadError {}

/// The simplified track could not be written.
#[derive(Debug)]
pub struct NavWriteError;

impl fmt::Display for NavWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to write simplified nav file")
    }
}

impl std::error::Error for NavWriteError {}

/// Top-level context for a full read, simplify, write run.
#[derive(Debug)]
pub struct NavSimplifyError;

impl fmt::Display for NavSimplifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("nav simplification failed")
    }
}

impl std::error::Error for NavSimplifyError {}

/// Why a single data record was rejected. These are logged and skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    MissingField { column: usize, found: usize },
    InvalidNumber { column: usize, value: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingField { column, found } => {
                write!(f, "missing column {} (record has {} fields)", column, found)
            }
            RecordError::InvalidNumber { column, value } => {
                write!(f, "column {} is not a number: {:?}", column, value)
            }
        }
    }
}

impl std::error::Error for RecordError {}
