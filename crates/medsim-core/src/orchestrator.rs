//! Case orchestrator: the single entry point a presentation layer drives.
//!
//! The orchestrator owns the run's random generator and talks to its
//! collaborators through the [`PatientStore`] and [`MedicationSource`] traits.
//! Seeding the generator makes an entire case replayable; two orchestrators
//! built with the same seed and driven identically produce identical
//! patients.

use std::str::FromStr;
use std::sync::Arc;

use medsim_contracts::error::{MedsimError, MedsimResult};
use medsim_contracts::intervention::{
    DiagnosisMatch, DiagnosisVerdict, InterventionKind, InterventionOutcome, MedicationOutcome,
    TestKind, Treatment,
};
use medsim_contracts::patient::Patient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use uuid::Uuid;

use crate::medication::medication_response;
use crate::severity::adjust_condition;
use crate::testsim::perform_test;
use crate::traits::{MedicationSource, PatientStore};
use crate::treatment::apply_treatment;

/// Score awarded for a correct finalized diagnosis.
pub const CORRECT_DIAGNOSIS_SCORE: i32 = 100;
/// Score penalty for an incorrect finalized diagnosis.
pub const INCORRECT_DIAGNOSIS_PENALTY: i32 = -50;
/// Confidence above which a non-top-ranked diagnosis still counts as correct.
pub const CORRECTNESS_CONFIDENCE: f64 = 0.6;

/// Drives one or more cases against a patient store and medication source.
pub struct CaseOrchestrator {
    rng: StdRng,
    medications: Arc<dyn MedicationSource>,
    store: Arc<dyn PatientStore>,
}

impl CaseOrchestrator {
    /// Build an orchestrator with a fixed seed. The same seed and the same
    /// sequence of calls replay a case exactly.
    pub fn with_seed(
        medications: Arc<dyn MedicationSource>,
        store: Arc<dyn PatientStore>,
        seed: u64,
    ) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), medications, store }
    }

    /// Build an orchestrator seeded from the operating system.
    pub fn from_entropy(
        medications: Arc<dyn MedicationSource>,
        store: Arc<dyn PatientStore>,
    ) -> Self {
        Self { rng: StdRng::from_entropy(), medications, store }
    }

    /// Begin a fresh case from a patient template.
    ///
    /// The case patient copies the template's demographics, history, symptoms,
    /// vitals, and severity, but gets a fresh identity, empty intervention
    /// logs, no diagnosis, and `completed = false`. The template is never
    /// mutated.
    pub fn start_case(&mut self, template: &Patient) -> Patient {
        let mut patient = template.clone();
        patient.id = format!("{}-{}", template.id, Uuid::new_v4());
        patient.diagnosis = None;
        patient.treatments_applied.clear();
        patient.tests_performed.clear();
        patient.completed = false;

        info!(
            template_id = %template.id,
            patient_id = %patient.id,
            severity = patient.condition_severity,
            "case started"
        );
        patient
    }

    /// Begin a fresh case from a template stored under `template_id`.
    pub fn start_case_from_template(&mut self, template_id: &str) -> MedsimResult<Patient> {
        let template = self.store.load_template(template_id)?;
        Ok(self.start_case(&template))
    }

    /// Apply one learner-selected intervention by name.
    ///
    /// Treatment and test names outside the known vocabularies fall to the
    /// generic branches; only an unknown medication name is an error.
    pub fn record_intervention(
        &mut self,
        patient: &mut Patient,
        kind: InterventionKind,
        name: &str,
    ) -> MedsimResult<InterventionOutcome> {
        match kind {
            InterventionKind::Treatment => {
                let treatment = Treatment::from_str(name).unwrap_or(Treatment::Other(name.into()));
                Ok(InterventionOutcome::Treatment(apply_treatment(
                    patient,
                    &treatment,
                    &mut self.rng,
                )))
            }
            InterventionKind::Test => {
                let test = TestKind::from_str(name).unwrap_or(TestKind::Other(name.into()));
                Ok(InterventionOutcome::Test(perform_test(patient, &test, &mut self.rng)))
            }
            InterventionKind::Medication => {
                let (dosage, route) = {
                    let med = self
                        .medications
                        .medication(name)
                        .ok_or_else(|| MedsimError::not_found("medication", name))?;
                    (
                        med.default_dosage().unwrap_or("standard dose").to_string(),
                        med.default_route().unwrap_or("Oral").to_string(),
                    )
                };
                let outcome = self.administer_medication(patient, name, &dosage, &route)?;
                Ok(InterventionOutcome::Medication(outcome))
            }
        }
    }

    /// Administer a medication at an explicit dosage and route.
    ///
    /// Computes the response, applies its proposed vital changes through the
    /// bounded update, and records the administration in the treatment log.
    pub fn administer_medication(
        &mut self,
        patient: &mut Patient,
        name: &str,
        dosage: &str,
        route: &str,
    ) -> MedsimResult<MedicationOutcome> {
        let medication = self
            .medications
            .medication(name)
            .ok_or_else(|| MedsimError::not_found("medication", name))?
            .clone();

        let outcome = medication_response(patient, &medication, dosage, route, &mut self.rng);
        patient.vital_signs.apply_delta(&outcome.vital_changes.rounded());
        patient.record_treatment(format!("{} {dosage}", medication.name));

        info!(
            patient_id = %patient.id,
            medication = %medication.name,
            dosage,
            route,
            effectiveness = outcome.effectiveness,
            "medication administered"
        );
        Ok(outcome)
    }

    /// Finalize the learner's diagnosis against the current ranked matches.
    ///
    /// The choice is correct when it is the top-ranked match or its own
    /// confidence exceeds 0.6. A correct call improves the patient (severity
    /// −2) and scores +100; an incorrect one worsens them (severity +1) and
    /// scores −50. The chosen label is stored on the patient either way.
    pub fn finalize_diagnosis(
        &mut self,
        patient: &mut Patient,
        chosen: &str,
        matches: &[DiagnosisMatch],
    ) -> DiagnosisVerdict {
        let confidence = matches
            .iter()
            .find(|m| m.diagnosis.name == chosen)
            .map(|m| m.confidence)
            .unwrap_or(0.0);
        let top_ranked = matches
            .first()
            .map(|m| m.diagnosis.name == chosen)
            .unwrap_or(false);
        let is_correct = top_ranked || confidence > CORRECTNESS_CONFIDENCE;

        patient.diagnosis = Some(chosen.to_string());
        let (severity_delta, score_delta) = if is_correct {
            (-2, CORRECT_DIAGNOSIS_SCORE)
        } else {
            (1, INCORRECT_DIAGNOSIS_PENALTY)
        };
        adjust_condition(patient, severity_delta, &mut self.rng);

        info!(
            patient_id = %patient.id,
            diagnosis = chosen,
            is_correct,
            confidence,
            score_delta,
            "diagnosis finalized"
        );
        DiagnosisVerdict { is_correct, score_delta }
    }

    /// Mark the case complete and persist the final snapshot.
    pub fn complete_case(&mut self, patient: &mut Patient) -> MedsimResult<()> {
        patient.completed = true;
        self.store.save_snapshot(patient)?;
        info!(patient_id = %patient.id, "case completed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
