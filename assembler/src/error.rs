//! Error taxonomy for the Hack assembler
//!
//! One fatal error type per failure class (io, argument, syntax, semantic,
//! symbol). All variants are terminal: the assembler does not attempt
//! recovery past the first error in a file.

use std::fmt;

/// Top-level error produced by any assembler stage.
#[derive(Debug)]
pub enum AssemblerError {
    /// File could not be opened, read, or written.
    Io(std::io::Error),
    /// Command-line usage error: wrong arity, wrong extension, missing file.
    Arg(String),
    /// A line could not be classified as an A-, C-, or L-instruction.
    Parse(String),
    /// A value or mnemonic violated the Hack instruction format.
    Semantic(String),
    /// A label was defined more than once.
    Symbol(String),
}

impl fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Arg(msg) => write!(f, "argument error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Semantic(msg) => write!(f, "semantic error: {msg}"),
            Self::Symbol(msg) => write!(f, "symbol error: {msg}"),
        }
    }
}

impl std::error::Error for AssemblerError {}

impl From<std::io::Error> for AssemblerError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<crate::parser::ParserError> for AssemblerError {
    fn from(error: crate::parser::ParserError) -> Self {
        match error {
            crate::parser::ParserError::IoError(e) => Self::Io(e),
            crate::parser::ParserError::InvalidState(msg) => Self::Parse(msg.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
