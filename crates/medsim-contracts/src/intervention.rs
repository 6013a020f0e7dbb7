//! Intervention vocabularies and structured result records.
//!
//! Treatments and tests are closed enums so unknown identifiers are handled
//! at the parse boundary instead of deep inside a dispatch table. Both carry
//! an explicit `Other` variant that preserves the documented generic fallback
//! behavior — an unrecognized name is never an error.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Diagnosis;
use crate::vitals::VitalChanges;

// ── Treatment vocabulary ──────────────────────────────────────────────────────

/// The closed treatment vocabulary, plus the generic fallback variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Treatment {
    PainRelief,
    Antibiotics,
    BetaBlockers,
    AceInhibitors,
    OxygenTherapy,
    IvFluids,
    Defibrillation,
    Intubation,
    /// Any identifier outside the closed vocabulary. Handled by the generic
    /// branch of the treatment effect.
    Other(String),
}

impl Treatment {
    /// The display name used in logs, result records, and catalogs.
    pub fn name(&self) -> &str {
        match self {
            Treatment::PainRelief => "Pain Relief",
            Treatment::Antibiotics => "Antibiotics",
            Treatment::BetaBlockers => "Beta-blockers",
            Treatment::AceInhibitors => "ACE Inhibitors",
            Treatment::OxygenTherapy => "Oxygen Therapy",
            Treatment::IvFluids => "IV Fluids",
            Treatment::Defibrillation => "Defibrillation",
            Treatment::Intubation => "Intubation",
            Treatment::Other(name) => name,
        }
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Treatment {
    type Err = std::convert::Infallible;

    /// Every string parses; names outside the vocabulary become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Pain Relief" => Treatment::PainRelief,
            "Antibiotics" => Treatment::Antibiotics,
            "Beta-blockers" => Treatment::BetaBlockers,
            "ACE Inhibitors" => Treatment::AceInhibitors,
            "Oxygen Therapy" => Treatment::OxygenTherapy,
            "IV Fluids" => Treatment::IvFluids,
            "Defibrillation" => Treatment::Defibrillation,
            "Intubation" => Treatment::Intubation,
            other => Treatment::Other(other.to_string()),
        })
    }
}

// ── Test vocabulary ───────────────────────────────────────────────────────────

/// The closed diagnostic-test vocabulary, plus the generic fallback variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    BloodPressure,
    BasicBloodTest,
    Ecg,
    ChestXray,
    PulmonaryFunction,
    PhysicalExamination,
    Urinalysis,
    /// Any identifier outside the closed vocabulary. Produces the generic
    /// "completed, quality good" payload.
    Other(String),
}

impl TestKind {
    /// The display name used in logs, result records, and catalogs.
    pub fn name(&self) -> &str {
        match self {
            TestKind::BloodPressure => "Blood Pressure",
            TestKind::BasicBloodTest => "Basic Blood Test",
            TestKind::Ecg => "ECG/EKG",
            TestKind::ChestXray => "Chest X-Ray",
            TestKind::PulmonaryFunction => "Pulmonary Function Test",
            TestKind::PhysicalExamination => "Physical Examination",
            TestKind::Urinalysis => "Urinalysis",
            TestKind::Other(name) => name,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestKind {
    type Err = std::convert::Infallible;

    /// Every string parses; names outside the vocabulary become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Blood Pressure" => TestKind::BloodPressure,
            "Basic Blood Test" => TestKind::BasicBloodTest,
            "ECG/EKG" => TestKind::Ecg,
            "Chest X-Ray" => TestKind::ChestXray,
            "Pulmonary Function Test" => TestKind::PulmonaryFunction,
            "Physical Examination" => TestKind::PhysicalExamination,
            "Urinalysis" => TestKind::Urinalysis,
            other => TestKind::Other(other.to_string()),
        })
    }
}

// ── Result records ────────────────────────────────────────────────────────────

/// The structured result of applying one treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentOutcome {
    /// Headline message for the presentation layer.
    pub message: String,
    /// Individual observed effects, in order.
    pub effects: Vec<String>,
    /// Display strings for each vital that moved, keyed by vital name.
    pub vital_changes: BTreeMap<String, String>,
    /// Signed change already applied to `condition_severity`, in −3..=+1.
    pub severity_delta: i32,
}

/// The structured result of administering one medication.
///
/// This record mandates no mutation by itself — the caller decides whether
/// and how to apply `vital_changes` to the patient's vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationOutcome {
    /// Effectiveness score in [0, 1].
    pub effectiveness: f64,
    /// Side effects that occurred, with their severity labels.
    pub side_effects: Vec<ObservedSideEffect>,
    /// Proposed fractional vital deltas, scaled by effectiveness.
    pub vital_changes: VitalChanges,
    /// Tiered narrative description of the response.
    pub response_text: String,
}

/// One side effect that actually occurred during a medication response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedSideEffect {
    pub name: String,
    pub severity: String,
}

/// The structured result of one diagnostic test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Headline message for the presentation layer.
    pub message: String,
    /// Test-specific key→value findings. Imaging tests include an opaque
    /// `image_ref` placeholder; the engine never renders images.
    pub details: BTreeMap<String, String>,
    /// Narrative interpretation of the findings.
    pub interpretation: String,
    pub is_abnormal: bool,
    /// Follow-up suggestions, in order.
    pub recommendations: Vec<String>,
}

/// A ranked catalog entry produced by the diagnosis matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisMatch {
    pub diagnosis: Diagnosis,
    /// Weighted score in [0, 1].
    pub confidence: f64,
}

/// The verdict returned when a learner finalizes a diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisVerdict {
    pub is_correct: bool,
    /// Score bonus (positive) or penalty (negative) earned.
    pub score_delta: i32,
}

/// Which family of intervention the learner selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterventionKind {
    Treatment,
    Test,
    Medication,
}

/// The result of `record_intervention`, one variant per intervention family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterventionOutcome {
    Treatment(TreatmentOutcome),
    Test(TestReport),
    Medication(MedicationOutcome),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Every name in the closed vocabulary round-trips through parse/display.
    #[test]
    fn treatment_names_round_trip() {
        for name in [
            "Pain Relief",
            "Antibiotics",
            "Beta-blockers",
            "ACE Inhibitors",
            "Oxygen Therapy",
            "IV Fluids",
            "Defibrillation",
            "Intubation",
        ] {
            let parsed: Treatment = name.parse().unwrap();
            assert!(!matches!(parsed, Treatment::Other(_)), "{name} fell to Other");
            assert_eq!(parsed.name(), name);
        }
    }

    /// Outside the vocabulary, parsing produces the generic variant and the
    /// original name is preserved.
    #[test]
    fn unknown_treatment_falls_back_to_other() {
        let parsed: Treatment = "Leeches".parse().unwrap();
        assert_eq!(parsed, Treatment::Other("Leeches".to_string()));
        assert_eq!(parsed.name(), "Leeches");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for name in [
            "Blood Pressure",
            "Basic Blood Test",
            "ECG/EKG",
            "Chest X-Ray",
            "Pulmonary Function Test",
            "Physical Examination",
            "Urinalysis",
        ] {
            let parsed: TestKind = name.parse().unwrap();
            assert!(!matches!(parsed, TestKind::Other(_)), "{name} fell to Other");
            assert_eq!(parsed.name(), name);
        }
    }

    #[test]
    fn unknown_test_falls_back_to_other() {
        let parsed: TestKind = "Tarot Reading".parse().unwrap();
        assert_eq!(parsed, TestKind::Other("Tarot Reading".to_string()));
    }

    /// Result records cross a process boundary as plain data.
    #[test]
    fn test_report_round_trips_through_json() {
        let mut details = BTreeMap::new();
        details.insert("category".to_string(), "Stage 1 Hypertension".to_string());
        let report = TestReport {
            message: "Test 'Blood Pressure' completed.".to_string(),
            details,
            interpretation: "Patient has Stage 1 Hypertension.".to_string(),
            is_abnormal: true,
            recommendations: vec!["Recommend lifestyle modifications and monitoring.".to_string()],
        };

        let json = serde_json::to_string(&report).unwrap();
        let decoded: TestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, decoded);
    }
}
