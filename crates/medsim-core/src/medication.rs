//! Medication response model.
//!
//! Administering a medication computes an effectiveness score, rolls each of
//! the drug's side effects, and proposes category-driven vital changes. The
//! function reads the patient but never writes it; the orchestrator decides
//! whether to apply the proposed changes.

use medsim_contracts::catalog::Medication;
use medsim_contracts::intervention::{MedicationOutcome, ObservedSideEffect};
use medsim_contracts::patient::Patient;
use medsim_contracts::vitals::VitalChanges;
use rand::Rng;
use tracing::debug;

/// Ages above this multiply side-effect probabilities by 1.5.
const ELDERLY_AGE: u32 = 65;

/// Compute the patient's response to one medication administration.
///
/// Effectiveness starts at 0.5, gains 0.3 when an indication matches the
/// current diagnosis and 0.2 when one matches an active symptom, loses 0.4
/// when a contraindication appears in the medical history, takes ±0.1 of
/// noise, and clamps into [0, 1]. All matching is case-insensitive substring
/// containment.
pub fn medication_response<R: Rng>(
    patient: &Patient,
    medication: &Medication,
    dosage: &str,
    route: &str,
    rng: &mut R,
) -> MedicationOutcome {
    let mut effectiveness: f64 = 0.5;

    if let Some(diagnosis) = &patient.diagnosis {
        let diagnosis = diagnosis.to_lowercase();
        if medication
            .indications
            .iter()
            .any(|ind| diagnosis.contains(&ind.to_lowercase()))
        {
            effectiveness += 0.3;
        }
    }

    if medication.indications.iter().any(|ind| {
        let ind = ind.to_lowercase();
        patient
            .active_symptoms
            .iter()
            .any(|sym| ind.contains(&sym.to_lowercase()))
    }) {
        effectiveness += 0.2;
    }

    if medication.contraindications.iter().any(|contra| {
        let contra = contra.to_lowercase();
        patient
            .medical_history
            .iter()
            .any(|entry| entry.to_lowercase().contains(&contra))
    }) {
        effectiveness -= 0.4;
    }

    effectiveness += rng.gen_range(-0.1..0.1);
    effectiveness = effectiveness.clamp(0.0, 1.0);

    let side_effects = roll_side_effects(patient, medication, rng);
    let vital_changes = category_vital_changes(patient, medication, effectiveness, rng);
    let response_text = response_text(&medication.name, effectiveness, &side_effects);

    debug!(
        patient_id = %patient.id,
        medication = %medication.name,
        dosage,
        route,
        effectiveness,
        side_effects = side_effects.len(),
        "medication response computed"
    );

    MedicationOutcome { effectiveness, side_effects, vital_changes, response_text }
}

/// Roll each listed side effect independently. Elderly patients carry a 1.5x
/// probability multiplier.
fn roll_side_effects<R: Rng>(
    patient: &Patient,
    medication: &Medication,
    rng: &mut R,
) -> Vec<ObservedSideEffect> {
    let multiplier = if patient.age > ELDERLY_AGE { 1.5 } else { 1.0 };
    medication
        .side_effects
        .iter()
        .filter(|se| rng.gen::<f64>() < se.probability * multiplier)
        .map(|se| ObservedSideEffect { name: se.name.clone(), severity: se.severity.clone() })
        .collect()
}

/// Vital deltas driven by drug category, scaled by effectiveness, with ±20%
/// relative noise on each nonzero component.
fn category_vital_changes<R: Rng>(
    patient: &Patient,
    medication: &Medication,
    effectiveness: f64,
    rng: &mut R,
) -> VitalChanges {
    let mut changes = VitalChanges::default();

    match medication.category.to_lowercase().as_str() {
        "painkiller" => {
            changes.temperature = -0.2 * effectiveness;
            changes.pulse = -5.0 * effectiveness;
        }
        "antibiotic" => {
            let has_fever = patient
                .active_symptoms
                .iter()
                .any(|s| s.to_lowercase() == "fever");
            if has_fever {
                changes.temperature = -0.5 * effectiveness;
            }
        }
        "antihypertensive" => {
            changes.systolic = -15.0 * effectiveness;
            changes.diastolic = -10.0 * effectiveness;
        }
        "bronchodilator" => {
            changes.oxygen_saturation = 3.0 * effectiveness;
            if patient.vital_signs.respiratory_rate > 16 {
                changes.respiratory_rate = -2.0 * effectiveness;
            }
        }
        _ => {}
    }

    for field in [
        &mut changes.pulse,
        &mut changes.systolic,
        &mut changes.diastolic,
        &mut changes.temperature,
        &mut changes.respiratory_rate,
        &mut changes.oxygen_saturation,
    ] {
        if *field != 0.0 {
            *field += rng.gen_range(-0.2..0.2) * field.abs();
        }
    }

    changes
}

/// Tiered narrative text, plus a listing of any observed side effects.
fn response_text(name: &str, effectiveness: f64, side_effects: &[ObservedSideEffect]) -> String {
    let mut text = if effectiveness > 0.8 {
        format!("The patient responds very well to {name}. Symptoms are significantly improving.")
    } else if effectiveness > 0.5 {
        format!("The patient shows moderate improvement after receiving {name}.")
    } else if effectiveness > 0.2 {
        format!("The patient shows slight improvement after receiving {name}.")
    } else {
        format!("The patient shows minimal response to {name}.")
    };

    if side_effects.is_empty() {
        text.push_str("\n\nNo side effects observed.");
    } else {
        text.push_str("\n\nThe following side effects were observed:");
        for se in side_effects {
            text.push_str(&format!("\n- {} ({})", se.name, se.severity));
        }
    }

    text
}

// ── Tests ─────────────────────────────────────────────────────────────────────
