//! Error taxonomy for the VM translator
//!
//! Every variant is fatal: the translator aborts the current file (and, in
//! directory mode, the whole run) on the first error it detects.

use std::fmt;

#[derive(Debug)]
pub enum TranslatorError {
    Io(std::io::Error),
    Arg(String),
    Parse(String),
}

impl fmt::Display for TranslatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Arg(msg) => write!(f, "argument error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TranslatorError {}

impl From<std::io::Error> for TranslatorError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
