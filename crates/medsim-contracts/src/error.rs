//! Error types for the MedSim engine.
//!
//! All fallible operations across the workspace return `MedsimResult<T>`.
//! Out-of-range physiological values are never errors — they are clamped by
//! the vitals model. Unknown treatment or test identifiers are never errors
//! either — they fall back to the documented generic branches.

use thiserror::Error;

/// The unified error type for the MedSim engine.
#[derive(Debug, Error)]
pub enum MedsimError {
    /// A referenced patient, medication, or diagnosis does not exist.
    ///
    /// `kind` names the missing resource class ("patient", "medication",
    /// "diagnosis") so the presentation layer can phrase the failure.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// A catalog document failed to parse or validate at load time.
    #[error("catalog configuration error: {reason}")]
    CatalogConfig { reason: String },

    /// The storage collaborator could not load or persist a snapshot.
    #[error("storage error: {reason}")]
    Storage { reason: String },
}

impl MedsimError {
    /// Shorthand for the common not-found construction.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }
}

/// Convenience alias used throughout the MedSim crates.
pub type MedsimResult<T> = Result<T, MedsimError>;
