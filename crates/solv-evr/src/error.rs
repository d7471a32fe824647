use thiserror::Error;

/// Errors produced while parsing an epoch:version-release string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvrParseError {
    #[error("empty version string")]
    Empty,

    #[error("invalid epoch in '{0}': epoch must be a non-negative integer")]
    InvalidEpoch(String),

    #[error("version component is empty in '{0}'")]
    EmptyVersion(String),
}
