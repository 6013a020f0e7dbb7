//! In-memory implementation of `PatientStore`.
//!
//! `InMemoryPatientStore` is the reference implementation of the
//! `PatientStore` trait. It keeps patient templates and archived snapshots in
//! maps protected by a `Mutex`, making it safe to share behind an `Arc` while
//! the orchestrator loads templates and persists completed cases.
//!
//! Snapshots are an archive: saving under an existing id overwrites the entry,
//! and nothing is ever deleted.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

use medsim_contracts::error::{MedsimError, MedsimResult};
use medsim_contracts::patient::Patient;
use medsim_core::traits::PatientStore;

use crate::samples;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryPatientStore`.
struct StoreState {
    /// Templates keyed by their stable id.
    templates: HashMap<String, Patient>,

    /// Archived case snapshots keyed by case id. Latest write wins.
    snapshots: HashMap<String, Patient>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory patient template store and snapshot archive.
///
/// # Thread safety
///
/// All methods acquire a `Mutex` internally. Multiple threads may drive cases
/// against one store behind an `Arc` without additional synchronization.
pub struct InMemoryPatientStore {
    state: Mutex<StoreState>,
}

impl InMemoryPatientStore {
    /// Create an empty store with no templates.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                templates: HashMap::new(),
                snapshots: HashMap::new(),
            }),
        }
    }

    /// Create a store seeded with the built-in sample patients.
    pub fn with_samples() -> Self {
        let store = Self::new();
        for patient in samples::sample_patients() {
            // A freshly-built store's lock cannot be poisoned.
            if let Ok(mut state) = store.state.lock() {
                state.templates.insert(patient.id.clone(), patient);
            }
        }
        store
    }

    /// Register a template under its own id, replacing any previous entry.
    pub fn add_template(&self, patient: Patient) -> MedsimResult<()> {
        let mut state = self.lock()?;
        info!(patient_id = %patient.id, "template registered");
        state.templates.insert(patient.id.clone(), patient);
        Ok(())
    }

    /// All registered template ids, sorted for stable presentation.
    pub fn template_ids(&self) -> MedsimResult<Vec<String>> {
        let state = self.lock()?;
        let mut ids: Vec<String> = state.templates.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Fetch an archived snapshot by case id, if one was saved.
    pub fn snapshot(&self, case_id: &str) -> MedsimResult<Option<Patient>> {
        let state = self.lock()?;
        Ok(state.snapshots.get(case_id).cloned())
    }

    /// Number of archived snapshots.
    pub fn snapshot_count(&self) -> MedsimResult<usize> {
        Ok(self.lock()?.snapshots.len())
    }

    fn lock(&self) -> MedsimResult<std::sync::MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|e| MedsimError::Storage {
            reason: format!("patient store lock poisoned: {e}"),
        })
    }
}

impl Default for InMemoryPatientStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── PatientStore impl ─────────────────────────────────────────────────────────

impl PatientStore for InMemoryPatientStore {
    /// Hand out a deep copy of the template; the stored original is never
    /// mutated by a running case.
    fn load_template(&self, id: &str) -> MedsimResult<Patient> {
        let state = self.lock()?;
        state
            .templates
            .get(id)
            .cloned()
            .ok_or_else(|| MedsimError::not_found("patient", id))
    }

    /// Archive the snapshot under its case id, overwriting any earlier save.
    fn save_snapshot(&self, patient: &Patient) -> MedsimResult<()> {
        let mut state = self.lock()?;
        info!(patient_id = %patient.id, completed = patient.completed, "snapshot archived");
        state.snapshots.insert(patient.id.clone(), patient.clone());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_templates() {
        let store = InMemoryPatientStore::new();
        assert!(store.template_ids().unwrap().is_empty());
        let err = store.load_template("P001").unwrap_err();
        assert_eq!(err.to_string(), "patient 'P001' not found");
    }

    #[test]
    fn sample_store_serves_known_templates() {
        let store = InMemoryPatientStore::with_samples();
        let ids = store.template_ids().unwrap();
        assert!(!ids.is_empty());

        for id in &ids {
            let patient = store.load_template(id).unwrap();
            assert!(!patient.active_symptoms.is_empty(), "{id} has no symptoms");
            assert!((1..=10).contains(&patient.condition_severity));
            assert!(!patient.completed);
        }
    }

    /// Loading hands out copies; mutating one never leaks into the store.
    #[test]
    fn loaded_templates_are_isolated_copies() {
        let store = InMemoryPatientStore::with_samples();
        let id = store.template_ids().unwrap().remove(0);

        let mut first = store.load_template(&id).unwrap();
        first.add_symptom("Spontaneous Combustion");
        first.set_severity(10);

        let second = store.load_template(&id).unwrap();
        assert!(!second.has_symptom("Spontaneous Combustion"));
    }

    /// Snapshots archive by case id; re-saving the same case overwrites.
    #[test]
    fn snapshots_overwrite_by_case_id() {
        let store = InMemoryPatientStore::new();
        let mut patient = Patient::new("case-1", "A", 30, "female", 5);

        store.save_snapshot(&patient).unwrap();
        patient.completed = true;
        store.save_snapshot(&patient).unwrap();

        assert_eq!(store.snapshot_count().unwrap(), 1);
        let archived = store.snapshot("case-1").unwrap().unwrap();
        assert!(archived.completed);
        assert!(store.snapshot("case-2").unwrap().is_none());
    }

    #[test]
    fn added_templates_replace_earlier_entries() {
        let store = InMemoryPatientStore::new();
        let mut patient = Patient::new("P010", "A", 30, "female", 3);
        store.add_template(patient.clone()).unwrap();

        patient.set_severity(8);
        store.add_template(patient).unwrap();

        assert_eq!(store.load_template("P010").unwrap().condition_severity, 8);
        assert_eq!(store.template_ids().unwrap(), vec!["P010"]);
    }
}
