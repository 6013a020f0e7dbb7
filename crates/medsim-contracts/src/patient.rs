//! The patient snapshot: identity, symptom ledger, vitals, and audit logs.
//!
//! A `Patient` is the unit of state the engine operates on. One case owns one
//! snapshot exclusively; the catalogs are shared read-only, but a snapshot is
//! never mutated from two places at once.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vitals::VitalSigns;

/// One append-only log entry for a performed test or applied treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionRecord {
    /// Display name of the intervention (e.g. "ECG/EKG", "Oxygen Therapy").
    pub name: String,
    /// Wall-clock time the intervention was recorded (UTC).
    pub timestamp: DateTime<Utc>,
}

impl InterventionRecord {
    /// Create a record stamped with the current time.
    pub fn now(name: impl Into<String>) -> Self {
        Self { name: name.into(), timestamp: Utc::now() }
    }
}

/// A patient's full clinical state for one case.
///
/// `active_symptoms` uses a `BTreeSet` so iteration order is deterministic —
/// seeded runs reproduce exactly, and the matcher's tie-break is the only
/// ordering the ranking depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Opaque identifier. Templates carry stable ids; cases get fresh ones.
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Past condition labels, append-only.
    pub medical_history: Vec<String>,
    /// Symptom labels currently attached to the case.
    pub active_symptoms: BTreeSet<String>,
    /// Owned exclusively by this snapshot.
    pub vital_signs: VitalSigns,
    /// Overall clinical acuity, clamped to [1, 10]; 10 is most severe.
    pub condition_severity: i32,
    /// The finalized diagnosis label, if any. Overwritable within a case.
    pub diagnosis: Option<String>,
    /// Treatments applied this case, in order, with timestamps.
    pub treatments_applied: Vec<InterventionRecord>,
    /// Tests performed this case, in order, with timestamps.
    pub tests_performed: Vec<InterventionRecord>,
    /// Set when the learner finalizes the case; archived, never deleted.
    pub completed: bool,
}

impl Patient {
    /// Create a patient with default vitals, empty ledgers, and severity
    /// clamped into [1, 10].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        gender: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            gender: gender.into(),
            medical_history: Vec::new(),
            active_symptoms: BTreeSet::new(),
            vital_signs: VitalSigns::default(),
            condition_severity: severity.clamp(1, 10),
            diagnosis: None,
            treatments_applied: Vec::new(),
            tests_performed: Vec::new(),
            completed: false,
        }
    }

    /// Attach a symptom label. Duplicates are silently ignored.
    pub fn add_symptom(&mut self, symptom: impl Into<String>) {
        self.active_symptoms.insert(symptom.into());
    }

    /// Detach a symptom label. Returns true if it was present.
    pub fn remove_symptom(&mut self, symptom: &str) -> bool {
        self.active_symptoms.remove(symptom)
    }

    /// True when the symptom label is currently active.
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.active_symptoms.contains(symptom)
    }

    /// Set condition severity, clamping into [1, 10].
    pub fn set_severity(&mut self, severity: i32) {
        self.condition_severity = severity.clamp(1, 10);
    }

    /// Append a treatment to the audit log, stamped now.
    pub fn record_treatment(&mut self, name: impl Into<String>) {
        self.treatments_applied.push(InterventionRecord::now(name));
    }

    /// Append a performed test to the audit log, stamped now.
    pub fn record_test(&mut self, name: impl Into<String>) {
        self.tests_performed.push(InterventionRecord::now(name));
    }

    /// The names of all tests performed so far, in order, for the matcher.
    pub fn performed_test_names(&self) -> Vec<String> {
        self.tests_performed.iter().map(|r| r.name.clone()).collect()
    }

    /// Whether the patient is in critical condition based on severity and
    /// vital signs.
    pub fn is_critical(&self) -> bool {
        self.condition_severity >= 8
            || self.vital_signs.pulse > 120
            || self.vital_signs.pulse < 50
            || self.vital_signs.systolic > 180
            || self.vital_signs.systolic < 90
            || self.vital_signs.oxygen_saturation < 90
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient::new("P001", "Jan Kowalski", 45, "male", 5)
    }

    #[test]
    fn severity_clamps_on_construction_and_update() {
        let p = Patient::new("P002", "A", 30, "female", 99);
        assert_eq!(p.condition_severity, 10);

        let mut p = patient();
        p.set_severity(-7);
        assert_eq!(p.condition_severity, 1);
        p.set_severity(12);
        assert_eq!(p.condition_severity, 10);
    }

    #[test]
    fn symptom_set_deduplicates() {
        let mut p = patient();
        p.add_symptom("Fever");
        p.add_symptom("Fever");
        assert_eq!(p.active_symptoms.len(), 1);
        assert!(p.has_symptom("Fever"));

        assert!(p.remove_symptom("Fever"));
        assert!(!p.remove_symptom("Fever"));
        assert!(p.active_symptoms.is_empty());
    }

    #[test]
    fn intervention_logs_append_in_order() {
        let mut p = patient();
        p.record_test("Blood Pressure");
        p.record_test("ECG/EKG");
        p.record_treatment("Oxygen Therapy");

        assert_eq!(p.performed_test_names(), vec!["Blood Pressure", "ECG/EKG"]);
        assert_eq!(p.treatments_applied.len(), 1);
        assert_eq!(p.treatments_applied[0].name, "Oxygen Therapy");
    }

    /// Criticality is driven by both the severity scale and vital thresholds.
    #[test]
    fn critical_thresholds() {
        let mut p = patient();
        assert!(!p.is_critical());

        p.set_severity(8);
        assert!(p.is_critical());

        let mut p = patient();
        p.vital_signs.oxygen_saturation = 89;
        assert!(p.is_critical());

        let mut p = patient();
        p.vital_signs.pulse = 125;
        assert!(p.is_critical());
    }

    /// Snapshots serialize as plain data and round-trip losslessly.
    #[test]
    fn snapshot_round_trips_through_json() {
        let mut p = patient();
        p.add_symptom("Chest Pain");
        p.medical_history.push("Hypertension".to_string());
        p.record_test("ECG/EKG");

        let json = serde_json::to_string(&p).unwrap();
        let decoded: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(p, decoded);
    }
}
