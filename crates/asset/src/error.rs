//! Errors raised while loading meshes.

use std::path::PathBuf;

use thiserror::Error;

/// Mesh load failure. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Failed to read mesh {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    ReadLine {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed OBJ record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Face on line {line} references normal {index}, but only {available} normals are declared")]
    DanglingNormalReference {
        line: usize,
        index: i64,
        available: usize,
    },

    #[error(
        "Face on line {line} references position {index}, but only {available} positions are declared"
    )]
    DanglingPositionReference {
        line: usize,
        index: i64,
        available: usize,
    },

    #[error("Face on line {line} has {arity} vertices; only triangles are supported")]
    UnsupportedFaceArity { line: usize, arity: usize },

    #[error("Face on line {line} references vertex {index}, beyond the {} addressable by u32 indices", u32::MAX)]
    TooManyVertices { line: usize, index: usize },
}

impl MeshError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Source line of the offending record, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::ReadLine { line, .. }
            | Self::MalformedRecord { line, .. }
            | Self::DanglingNormalReference { line, .. }
            | Self::DanglingPositionReference { line, .. }
            | Self::UnsupportedFaceArity { line, .. }
            | Self::TooManyVertices { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
