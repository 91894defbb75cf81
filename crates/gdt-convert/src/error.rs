use std::path::PathBuf;

/// Errors that can occur during a conversion batch.
///
/// The record builders never fail; these surface from reading descriptors,
/// reading models, file I/O and batch-level checks.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A material descriptor could not be parsed.
    #[error("Descriptor parse error in {path} (line {line}): {message}")]
    DescriptorParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A model file could not be read.
    #[error("Model read error for {path}: {message}")]
    ModelRead { path: PathBuf, message: String },

    /// Input validation failed (empty list, bad path, etc.).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two different source paths produce the same record identifier.
    #[error("Identifier collision: {identifier} is produced by both {path_a} and {path_b}")]
    IdentifierCollision {
        identifier: String,
        path_a: String,
        path_b: String,
    },
}
