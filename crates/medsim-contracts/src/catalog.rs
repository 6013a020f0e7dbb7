//! Catalog entry types: diagnoses and medications.
//!
//! Entries are immutable after load. The catalog collections that hold them
//! live in `medsim-catalog`; this module defines only the data shape shared
//! across the workspace.

use serde::{Deserialize, Serialize};

/// A diagnosis definition the matcher scores patients against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub name: String,
    pub description: String,
    /// Symptoms that strongly indicate this diagnosis (weight 3.0).
    pub primary_symptoms: Vec<String>,
    /// Symptoms that may accompany it (weight 1.0).
    #[serde(default)]
    pub secondary_symptoms: Vec<String>,
    /// Tests that help confirm this diagnosis (weight 2.0).
    #[serde(default)]
    pub recommended_tests: Vec<String>,
    /// Treatments typically used for this condition.
    #[serde(default)]
    pub recommended_treatments: Vec<String>,
    /// Typical acuity on the 1–10 scale, clamped on construction.
    #[serde(default = "default_severity")]
    pub severity: i32,
}

fn default_severity() -> i32 {
    3
}

impl Diagnosis {
    /// Clamp severity into [1, 10]. Called by catalog loaders after
    /// construction so hand-written TOML cannot smuggle an out-of-scale value.
    pub fn clamp_severity(mut self) -> Self {
        self.severity = self.severity.clamp(1, 10);
        self
    }
}

/// A single possible side effect of a medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideEffect {
    pub name: String,
    /// Per-administration occurrence probability in [0, 1].
    pub probability: f64,
    /// Severity label: "mild", "moderate", or "severe".
    pub severity: String,
}

/// A medication definition, used read-only by the medication response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    /// Drug class driving the vital-sign response ("Painkiller",
    /// "Antibiotic", "Antihypertensive", "Bronchodilator", ...).
    pub category: String,
    pub description: String,
    /// Available dosages, first entry is the default.
    pub dosages: Vec<String>,
    /// Administration routes, first entry is the default.
    pub administration_routes: Vec<String>,
    /// Conditions and symptoms this medication treats. Matched by
    /// case-insensitive substring containment.
    pub indications: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<SideEffect>,
    #[serde(default)]
    pub interactions: Vec<String>,
}

impl Medication {
    /// The default dosage (first listed), if any.
    pub fn default_dosage(&self) -> Option<&str> {
        self.dosages.first().map(String::as_str)
    }

    /// The default administration route (first listed), if any.
    pub fn default_route(&self) -> Option<&str> {
        self.administration_routes.first().map(String::as_str)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_severity_clamps() {
        let d = Diagnosis {
            name: "X".into(),
            description: String::new(),
            primary_symptoms: vec![],
            secondary_symptoms: vec![],
            recommended_tests: vec![],
            recommended_treatments: vec![],
            severity: 42,
        }
        .clamp_severity();
        assert_eq!(d.severity, 10);
    }

    #[test]
    fn medication_defaults_are_first_listed() {
        let med = Medication {
            name: "Amoxicillin".into(),
            category: "Antibiotic".into(),
            description: String::new(),
            dosages: vec!["250mg".into(), "500mg".into()],
            administration_routes: vec!["Oral".into()],
            indications: vec![],
            contraindications: vec![],
            side_effects: vec![],
            interactions: vec![],
        };
        assert_eq!(med.default_dosage(), Some("250mg"));
        assert_eq!(med.default_route(), Some("Oral"));
    }

    /// Catalog entries deserialize from sparse documents — omitted optional
    /// lists default to empty.
    #[test]
    fn diagnosis_deserializes_with_defaults() {
        let json = r#"{
            "name": "Migraine",
            "description": "Recurring headache",
            "primary_symptoms": ["Headache"]
        }"#;
        let d: Diagnosis = serde_json::from_str(json).unwrap();
        assert!(d.secondary_symptoms.is_empty());
        assert!(d.recommended_tests.is_empty());
        assert_eq!(d.severity, 3);
    }
}
