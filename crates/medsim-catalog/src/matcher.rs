//! The diagnosis matcher: ranks catalog entries against a patient's
//! presentation.
//!
//! Scoring is a literal behavioral contract:
//!
//! - primary symptoms weigh 3.0, secondary 1.0, recommended tests 2.0;
//! - symptom confidence is normalized over the entry's own symptom weights;
//! - test confidence counts only when the entry has recommended tests AND at
//!   least one test was performed;
//! - overall = 0.7 × symptom + 0.3 × test;
//! - an entry is admitted only when its symptom confidence exceeds 0.2 —
//!   test overlap alone can never qualify an entry.
//!
//! The result is ordered by confidence descending with ties broken by name
//! ascending, so identical inputs always produce identical rankings.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use medsim_contracts::intervention::DiagnosisMatch;

use crate::catalogs::DiagnosisCatalog;

const PRIMARY_WEIGHT: f64 = 3.0;
const SECONDARY_WEIGHT: f64 = 1.0;
const TEST_WEIGHT: f64 = 2.0;

/// Symptom-confidence admission threshold (strict).
const ADMISSION_THRESHOLD: f64 = 0.2;

impl DiagnosisCatalog {
    /// Rank every catalog entry against the active symptoms and the tests
    /// performed so far.
    ///
    /// With no active symptoms the result is unconditionally empty. Entries
    /// that define no symptoms at all are excluded from ranking.
    pub fn match_diagnoses(
        &self,
        active_symptoms: &BTreeSet<String>,
        performed_tests: &[String],
    ) -> Vec<DiagnosisMatch> {
        if active_symptoms.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<DiagnosisMatch> = Vec::new();

        for diagnosis in self.all() {
            let primary_hits = diagnosis
                .primary_symptoms
                .iter()
                .filter(|s| active_symptoms.contains(*s))
                .count() as f64;
            let secondary_hits = diagnosis
                .secondary_symptoms
                .iter()
                .filter(|s| active_symptoms.contains(*s))
                .count() as f64;
            let test_hits = diagnosis
                .recommended_tests
                .iter()
                .filter(|t| performed_tests.contains(*t))
                .count() as f64;

            let symptom_possible = diagnosis.primary_symptoms.len() as f64 * PRIMARY_WEIGHT
                + diagnosis.secondary_symptoms.len() as f64 * SECONDARY_WEIGHT;
            if symptom_possible <= 0.0 {
                // Entries that define no symptoms cannot be ranked.
                continue;
            }

            let symptom_confidence =
                (primary_hits * PRIMARY_WEIGHT + secondary_hits * SECONDARY_WEIGHT)
                    / symptom_possible;

            let test_confidence = if !diagnosis.recommended_tests.is_empty()
                && !performed_tests.is_empty()
            {
                (test_hits * TEST_WEIGHT)
                    / (diagnosis.recommended_tests.len() as f64 * TEST_WEIGHT)
            } else {
                0.0
            };

            let overall = symptom_confidence * 0.7 + test_confidence * 0.3;

            if symptom_confidence > ADMISSION_THRESHOLD {
                debug!(
                    diagnosis = %diagnosis.name,
                    symptom_confidence,
                    test_confidence,
                    overall,
                    "diagnosis admitted to ranking"
                );
                matches.push(DiagnosisMatch {
                    diagnosis: diagnosis.clone(),
                    confidence: overall,
                });
            }
        }

        // Confidence descending; ties broken by name ascending for stability.
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.diagnosis.name.cmp(&b.diagnosis.name))
        });
        matches
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use medsim_contracts::catalog::Diagnosis;

    use crate::catalogs::DiagnosisCatalog;

    fn symptoms(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn entry(name: &str, primary: &[&str], secondary: &[&str], tests: &[&str]) -> Diagnosis {
        Diagnosis {
            name: name.to_string(),
            description: String::new(),
            primary_symptoms: primary.iter().map(|s| s.to_string()).collect(),
            secondary_symptoms: secondary.iter().map(|s| s.to_string()).collect(),
            recommended_tests: tests.iter().map(|s| s.to_string()).collect(),
            recommended_treatments: vec![],
            severity: 5,
        }
    }

    /// The worked example: a full primary match with no secondaries defined
    /// gives symptom confidence 1.0; one of three recommended tests performed
    /// gives test confidence 1/3; overall 1.0×0.7 + (1/3)×0.3 = 0.8.
    #[test]
    fn full_primary_match_scores_exactly() {
        let catalog = DiagnosisCatalog::from_entries([entry(
            "Acute Coronary Syndrome",
            &["Chest Pain", "Shortness of Breath", "Sweating"],
            &[],
            &["ECG/EKG", "Cardiac Enzyme Test", "Blood Pressure"],
        )]);
        let presentation = symptoms(&["Chest Pain", "Shortness of Breath", "Sweating"]);
        let tests = vec!["ECG/EKG".to_string()];

        let matches = catalog.match_diagnoses(&presentation, &tests);

        assert_eq!(matches.len(), 1);
        assert!((matches[0].confidence - 0.8).abs() < 1e-9);
    }

    /// Against the builtin catalog the classic infarction presentation ranks
    /// the infarction first; its secondaries dilute the score below 1.0 but
    /// it still clears the correctness bar.
    #[test]
    fn infarction_presentation_ranks_infarction_first() {
        let catalog = DiagnosisCatalog::builtin();
        let presentation = symptoms(&["Chest Pain", "Shortness of Breath", "Sweating"]);
        let tests = vec!["ECG/EKG".to_string()];

        let matches = catalog.match_diagnoses(&presentation, &tests);

        assert!(!matches.is_empty());
        assert_eq!(matches[0].diagnosis.name, "Acute Myocardial Infarction");
        // symptom 9/12 × 0.7 + test (1/3) × 0.3 = 0.625
        assert!((matches[0].confidence - 0.625).abs() < 1e-9);
    }

    /// No symptoms → no matches, unconditionally.
    #[test]
    fn empty_symptoms_yield_empty_ranking() {
        let catalog = DiagnosisCatalog::builtin();
        let matches = catalog.match_diagnoses(
            &BTreeSet::new(),
            &["ECG/EKG".to_string(), "Blood Pressure".to_string()],
        );
        assert!(matches.is_empty());
    }

    /// Test overlap alone can never admit an entry: zero symptom overlap
    /// excludes a diagnosis even when every recommended test was performed.
    #[test]
    fn test_only_overlap_is_excluded() {
        let catalog = DiagnosisCatalog::from_entries([entry(
            "Test-Only Entry",
            &["Rash"],
            &[],
            &["Blood Pressure", "ECG/EKG"],
        )]);

        let presentation = symptoms(&["Headache"]); // no symptom overlap
        let tests = vec!["Blood Pressure".to_string(), "ECG/EKG".to_string()];

        assert!(catalog.match_diagnoses(&presentation, &tests).is_empty());
    }

    /// The admission threshold is strict: symptom confidence must exceed 0.2.
    #[test]
    fn admission_threshold_is_strict() {
        let catalog = DiagnosisCatalog::from_entries([
            // One secondary hit over weight 3·3 + 1·1 = 10 → 0.1: excluded.
            entry("Below", &["A", "B", "C"], &["Hit"], &[]),
            // One primary hit over weight 3·3 = 9 → 0.333: included.
            entry("Above", &["Hit", "Y", "Z"], &[], &[]),
        ]);

        let matches = catalog.match_diagnoses(&symptoms(&["Hit"]), &[]);
        let names: Vec<&str> = matches.iter().map(|m| m.diagnosis.name.as_str()).collect();
        assert_eq!(names, vec!["Above"]);
    }

    /// An entry with no symptoms defined is never ranked.
    #[test]
    fn symptomless_entry_is_never_ranked() {
        let catalog = DiagnosisCatalog::from_entries([entry(
            "Symptomless",
            &[],
            &[],
            &["Blood Pressure"],
        )]);
        let matches =
            catalog.match_diagnoses(&symptoms(&["Anything"]), &["Blood Pressure".to_string()]);
        assert!(matches.is_empty());
    }

    /// Equal confidences order by name ascending, so rankings are stable
    /// across runs regardless of map iteration order.
    #[test]
    fn ties_break_by_name_ascending() {
        let catalog = DiagnosisCatalog::from_entries([
            entry("Zeta Syndrome", &["Fever"], &[], &[]),
            entry("Alpha Syndrome", &["Fever"], &[], &[]),
            entry("Mid Syndrome", &["Fever"], &[], &[]),
        ]);

        let matches = catalog.match_diagnoses(&symptoms(&["Fever"]), &[]);
        let names: Vec<&str> = matches.iter().map(|m| m.diagnosis.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Syndrome", "Mid Syndrome", "Zeta Syndrome"]);
    }

    /// Identical inputs produce identical rankings on repeated calls.
    #[test]
    fn ranking_is_deterministic() {
        let catalog = DiagnosisCatalog::builtin();
        let presentation = symptoms(&["Cough", "Fever", "Fatigue", "Headache"]);
        let tests = vec!["Basic Blood Test".to_string()];

        let first = catalog.match_diagnoses(&presentation, &tests);
        for _ in 0..10 {
            let again = catalog.match_diagnoses(&presentation, &tests);
            assert_eq!(first, again);
        }
    }

    /// Performing no tests leaves test confidence at zero rather than
    /// penalizing the symptom score.
    #[test]
    fn no_tests_performed_means_zero_test_confidence() {
        let catalog = DiagnosisCatalog::from_entries([entry(
            "Acute Coronary Syndrome",
            &["Chest Pain", "Shortness of Breath", "Sweating"],
            &[],
            &["ECG/EKG", "Cardiac Enzyme Test", "Blood Pressure"],
        )]);
        let presentation = symptoms(&["Chest Pain", "Shortness of Breath", "Sweating"]);

        let matches = catalog.match_diagnoses(&presentation, &[]);
        // symptom 1.0 × 0.7 + 0 = 0.7
        assert!((matches[0].confidence - 0.7).abs() < 1e-9);
    }
}
