//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid pool selector {0}: expected 0 (red) or 1 (black)")]
    InvalidPoolSelector(i64),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid 32-byte hex value: {0}")]
    InvalidHash(String),

    #[error("invalid 64-byte signature: {0}")]
    InvalidSignature(String),
}
