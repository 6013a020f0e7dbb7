//! Collaborator traits for the case orchestrator.
//!
//! The orchestrator does not care where patient templates or medication
//! definitions come from. It talks to these two traits, and the concrete
//! backends (in-memory store, TOML-loaded catalog) implement them.

use medsim_contracts::catalog::Medication;
use medsim_contracts::error::MedsimResult;
use medsim_contracts::patient::Patient;

/// Source of patient templates and sink for completed-case snapshots.
pub trait PatientStore: Send + Sync {
    /// Load a patient template by identifier.
    fn load_template(&self, id: &str) -> MedsimResult<Patient>;

    /// Persist the current state of a patient.
    fn save_snapshot(&self, patient: &Patient) -> MedsimResult<()>;
}

/// Lookup of medication definitions by exact name.
pub trait MedicationSource: Send + Sync {
    fn medication(&self, name: &str) -> Option<&Medication>;
}
