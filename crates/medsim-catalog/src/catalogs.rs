//! The catalog collections and their TOML loaders.
//!
//! Catalogs are populated once at process start and never mutated afterwards.
//! Wrap a [`CatalogBundle`] in an `Arc` to share it across any number of
//! concurrent cases — every accessor takes `&self`.
//!
//! ## Document format
//!
//! ```toml
//! [[diagnoses]]
//! name = "Pneumonia"
//! description = "Infection that inflames air sacs in one or both lungs"
//! primary_symptoms = ["Cough", "Fever", "Shortness of Breath"]
//! recommended_tests = ["Chest X-Ray"]
//! severity = 6
//!
//! [[medications]]
//! name = "Amoxicillin"
//! category = "Antibiotic"
//! # ...
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use medsim_contracts::catalog::{Diagnosis, Medication};
use medsim_contracts::error::{MedsimError, MedsimResult};
use medsim_core::traits::MedicationSource;

use crate::builtin;

// ── Document shape ────────────────────────────────────────────────────────────

/// The top-level TOML document. Either section may be omitted.
#[derive(Debug, Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    medications: Vec<Medication>,
}

// ── Diagnosis catalog ─────────────────────────────────────────────────────────

/// The fixed set of diagnosis definitions, keyed by name for O(1) lookup.
#[derive(Debug, Clone)]
pub struct DiagnosisCatalog {
    entries: HashMap<String, Diagnosis>,
}

impl DiagnosisCatalog {
    /// Build a catalog from explicit entries. Severity is clamped; later
    /// duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = Diagnosis>) -> Self {
        let entries = entries
            .into_iter()
            .map(|d| d.clamp_severity())
            .map(|d| (d.name.clone(), d))
            .collect();
        Self { entries }
    }

    /// The compiled-in default catalog.
    pub fn builtin() -> Self {
        Self::from_entries(builtin::default_diagnoses())
    }

    /// Look up a diagnosis by exact name.
    pub fn get(&self, name: &str) -> Option<&Diagnosis> {
        self.entries.get(name)
    }

    /// Like [`get`](Self::get), but a missing entry is a `NotFound` error.
    pub fn require(&self, name: &str) -> MedsimResult<&Diagnosis> {
        self.get(name)
            .ok_or_else(|| MedsimError::not_found("diagnosis", name))
    }

    /// Iterate over all entries. Order is unspecified — ranking applies its
    /// own deterministic tie-break.
    pub fn all(&self) -> impl Iterator<Item = &Diagnosis> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Medication catalog ────────────────────────────────────────────────────────

/// The fixed set of medication definitions, keyed by name for O(1) lookup.
#[derive(Debug, Clone)]
pub struct MedicationCatalog {
    entries: HashMap<String, Medication>,
}

impl MedicationCatalog {
    /// Build a catalog from explicit entries; later duplicates replace
    /// earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = Medication>) -> Self {
        let entries = entries.into_iter().map(|m| (m.name.clone(), m)).collect();
        Self { entries }
    }

    /// The compiled-in default catalog.
    pub fn builtin() -> Self {
        Self::from_entries(builtin::default_medications())
    }

    /// Look up a medication by exact name.
    pub fn get(&self, name: &str) -> Option<&Medication> {
        self.entries.get(name)
    }

    /// Like [`get`](Self::get), but a missing entry is a `NotFound` error.
    pub fn require(&self, name: &str) -> MedsimResult<&Medication> {
        self.get(name)
            .ok_or_else(|| MedsimError::not_found("medication", name))
    }

    /// Iterate over all entries in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = &Medication> {
        self.entries.values()
    }

    /// All medications in the given category (case-insensitive).
    pub fn by_category(&self, category: &str) -> Vec<&Medication> {
        let wanted = category.to_lowercase();
        let mut found: Vec<&Medication> = self
            .entries
            .values()
            .filter(|m| m.category.to_lowercase() == wanted)
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// All medications whose indications mention the symptom.
    ///
    /// Matching is literal case-insensitive substring containment, the same
    /// convention the medication response uses.
    pub fn for_symptom(&self, symptom: &str) -> Vec<&Medication> {
        let wanted = symptom.to_lowercase();
        let mut found: Vec<&Medication> = self
            .entries
            .values()
            .filter(|m| {
                m.indications
                    .iter()
                    .any(|i| i.to_lowercase().contains(&wanted))
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MedicationSource for MedicationCatalog {
    fn medication(&self, name: &str) -> Option<&Medication> {
        self.get(name)
    }
}

// ── Bundle ────────────────────────────────────────────────────────────────────

/// Both catalogs, loaded together at process start.
#[derive(Debug, Clone)]
pub struct CatalogBundle {
    pub diagnoses: DiagnosisCatalog,
    pub medications: MedicationCatalog,
}

impl CatalogBundle {
    /// The compiled-in defaults.
    pub fn builtin() -> Self {
        Self {
            diagnoses: DiagnosisCatalog::builtin(),
            medications: MedicationCatalog::builtin(),
        }
    }

    /// Parse a catalog document from a TOML string.
    ///
    /// An empty or partial document is valid — omitted sections produce empty
    /// catalogs. Malformed TOML is a `CatalogConfig` error.
    pub fn from_toml_str(input: &str) -> MedsimResult<Self> {
        let doc: CatalogDoc = toml::from_str(input).map_err(|e| MedsimError::CatalogConfig {
            reason: format!("failed to parse catalog TOML: {e}"),
        })?;

        let bundle = Self {
            diagnoses: DiagnosisCatalog::from_entries(doc.diagnoses),
            medications: MedicationCatalog::from_entries(doc.medications),
        };
        info!(
            diagnoses = bundle.diagnoses.len(),
            medications = bundle.medications.len(),
            "catalog loaded"
        );
        Ok(bundle)
    }

    /// Load a catalog document from a TOML file on disk.
    pub fn from_file(path: &Path) -> MedsimResult<Self> {
        let input = std::fs::read_to_string(path).map_err(|e| MedsimError::CatalogConfig {
            reason: format!("failed to read catalog file {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&input)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_is_by_exact_name() {
        let catalog = DiagnosisCatalog::builtin();
        assert!(catalog.get("Pneumonia").is_some());
        assert!(catalog.get("pneumonia").is_none());
        assert!(catalog.get("Dropsy").is_none());
    }

    #[test]
    fn require_surfaces_not_found() {
        let catalog = DiagnosisCatalog::builtin();
        assert!(catalog.require("Pneumonia").is_ok());
        let err = catalog.require("Dropsy").unwrap_err();
        assert_eq!(err.to_string(), "diagnosis 'Dropsy' not found");
    }

    #[test]
    fn medication_category_filter_is_case_insensitive() {
        let catalog = MedicationCatalog::builtin();
        let antibiotics = catalog.by_category("antibiotic");
        assert_eq!(antibiotics.len(), 1);
        assert_eq!(antibiotics[0].name, "Amoxicillin");
    }

    /// Symptom lookup uses substring containment: "fever" matches the
    /// indication "Fever" on Ibuprofen and nothing else in the builtin set.
    #[test]
    fn medication_symptom_lookup_uses_substring_containment() {
        let catalog = MedicationCatalog::builtin();
        let for_fever = catalog.for_symptom("fever");
        assert_eq!(for_fever.len(), 1);
        assert_eq!(for_fever[0].name, "Ibuprofen");

        assert!(catalog.for_symptom("Telepathy").is_empty());
    }

    #[test]
    fn bundle_parses_partial_toml_document() {
        let toml = r#"
            [[diagnoses]]
            name = "Tension Headache"
            description = "Mild, diffuse head pain"
            primary_symptoms = ["Headache"]
            severity = 2
        "#;

        let bundle = CatalogBundle::from_toml_str(toml).unwrap();
        assert_eq!(bundle.diagnoses.len(), 1);
        assert!(bundle.medications.is_empty());
        assert_eq!(bundle.diagnoses.get("Tension Headache").unwrap().severity, 2);
    }

    /// Severity outside the 1–10 scale is clamped at load time, not rejected.
    #[test]
    fn loaded_severity_is_clamped() {
        let toml = r#"
            [[diagnoses]]
            name = "Overscaled"
            description = ""
            primary_symptoms = ["X"]
            severity = 99
        "#;

        let bundle = CatalogBundle::from_toml_str(toml).unwrap();
        assert_eq!(bundle.diagnoses.get("Overscaled").unwrap().severity, 10);
    }

    /// Malformed TOML must surface as a CatalogConfig error.
    #[test]
    fn malformed_toml_is_a_config_error() {
        let result = CatalogBundle::from_toml_str("this is not toml ][[[");
        match result {
            Err(MedsimError::CatalogConfig { reason }) => {
                assert!(reason.contains("failed to parse catalog TOML"), "got: {reason}");
            }
            other => panic!("expected CatalogConfig, got {:?}", other),
        }
    }
}
