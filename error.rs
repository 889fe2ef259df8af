// Copyright © 2023 David Caldwell <david@porkrind.org>

use thiserror::Error;

/// Everything that can go wrong while decoding a Unitel disk image. Out-of-range geometry arguments are not
/// in here: those only come from addresses we computed ourselves and are treated as bugs (they panic).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiskError {
    #[error("Invalid disk image: {0}")]
    MalformedImage(String),
    #[error("Malformed {field}: {reason}")]
    MalformedRecord { field: &'static str, reason: String },
    #[error("{0} not found")]
    FileNotFound(String),
}

impl DiskError {
    pub fn record(field: &'static str, reason: impl Into<String>) -> DiskError {
        DiskError::MalformedRecord { field, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, DiskError>;
