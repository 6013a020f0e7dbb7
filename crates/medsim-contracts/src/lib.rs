//! # medsim-contracts
//!
//! Shared clinical data types and error contracts for the MedSim engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, bounded mutators, and error types.
//! Every type serializes as plain structured data so snapshots and result
//! records cross a process boundary without modification.

pub mod catalog;
pub mod error;
pub mod intervention;
pub mod patient;
pub mod vitals;

#[cfg(test)]
mod tests {
    use super::*;
    use error::MedsimError;

    // ── MedsimError display messages ─────────────────────────────────────────

    #[test]
    fn error_not_found_display() {
        let err = MedsimError::not_found("medication", "Quinine");
        let msg = err.to_string();
        assert!(msg.contains("medication"));
        assert!(msg.contains("Quinine"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn error_catalog_config_display() {
        let err = MedsimError::CatalogConfig {
            reason: "missing field `name`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("catalog configuration error"));
        assert!(msg.contains("missing field `name`"));
    }

    #[test]
    fn error_storage_display() {
        let err = MedsimError::Storage {
            reason: "snapshot lock poisoned".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("snapshot lock poisoned"));
    }
}
