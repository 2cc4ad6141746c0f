//! Error types for progmesh

use thiserror::Error;

/// Main error type for progmesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A vertex whose one-ring cannot be closed into a single ordered cycle.
    #[error("Non-manifold vertex {vertex}: {reason}")]
    NonManifoldVertex { vertex: usize, reason: String },

    /// The mesh invariants no longer hold while a pass runs.
    #[error("Inconsistent mesh at gate ({}, {}){}: {reason}", .gate.0, .gate.1, fmt_front(.front))]
    Inconsistency {
        gate: (usize, usize),
        front: Option<usize>,
        reason: String,
    },

    #[error("Unsupported valence {valence} for vertex {vertex} (expected 3..=6)")]
    UnsupportedValence { vertex: usize, valence: usize },
}

fn fmt_front(front: &Option<usize>) -> String {
    match front {
        Some(v) => format!(", front {v}"),
        None => String::new(),
    }
}

impl Error {
    /// Shorthand for an [`Error::Inconsistency`].
    pub fn inconsistency(gate: (usize, usize), front: Option<usize>, reason: impl Into<String>) -> Self {
        Error::Inconsistency {
            gate,
            front,
            reason: reason.into(),
        }
    }
}

/// Result type alias for progmesh operations
pub type Result<T> = std::result::Result<T, Error>;
