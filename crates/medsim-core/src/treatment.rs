//! Treatment effect function.
//!
//! One treatment application reads the patient's current symptoms and vitals,
//! mutates the snapshot through the bounded vital update, and returns a
//! structured [`TreatmentOutcome`]. Unknown treatment names are never an
//! error; they fall to the generic branch. Every vital write goes through
//! `VitalSigns::apply_delta`, so clamping is enforced in one place.

use std::collections::BTreeMap;

use medsim_contracts::intervention::{Treatment, TreatmentOutcome};
use medsim_contracts::patient::Patient;
use medsim_contracts::vitals::VitalDelta;
use rand::Rng;
use tracing::info;

use crate::severity::adjust_condition;

/// Apply one treatment to the patient.
///
/// Records the treatment in the audit log, runs the treatment-specific
/// branch, then feeds the resulting severity delta through the severity
/// adjustment so vitals drift with the outcome.
pub fn apply_treatment<R: Rng>(
    patient: &mut Patient,
    treatment: &Treatment,
    rng: &mut R,
) -> TreatmentOutcome {
    patient.record_treatment(treatment.name());

    let mut effects: Vec<String> = Vec::new();
    let mut vital_changes: BTreeMap<String, String> = BTreeMap::new();
    let mut severity_delta = 0;

    match treatment {
        Treatment::PainRelief => {
            let painful = ["Headache", "Pain", "Chest Pain", "Abdominal Pain"];
            if painful.iter().any(|s| patient.has_symptom(s)) {
                effects.push("Pain reduced".to_string());
                patient.remove_symptom("Headache");
                patient.remove_symptom("Pain");
                if patient.has_symptom("Chest Pain") {
                    effects.push("Chest pain partially relieved but not eliminated".to_string());
                }
                severity_delta = -1;
            }
        }

        Treatment::Antibiotics => {
            if patient.has_symptom("Fever") || patient.has_symptom("Cough") {
                if rng.gen_bool(0.7) {
                    effects.push("Antibiotic appears to be effective".to_string());
                    severity_delta = -2;
                    if patient.vital_signs.temperature > 37.5 {
                        let current = patient.vital_signs.temperature;
                        let target = (current - rng.gen_range(0.5..=1.2)).max(36.8);
                        patient.vital_signs.apply_delta(&VitalDelta {
                            temperature: target - current,
                            ..VitalDelta::default()
                        });
                        vital_changes.insert(
                            "temperature".to_string(),
                            format!("Decreased to {:.1}°C", patient.vital_signs.temperature),
                        );
                    }
                } else {
                    effects.push("Patient's response to antibiotics is still developing".to_string());
                    severity_delta = -1;
                }
            } else {
                effects.push("No immediate effect observed".to_string());
            }
        }

        Treatment::BetaBlockers => {
            let v = patient.vital_signs.clone();
            if v.pulse > 90 {
                let target = (v.pulse - rng.gen_range(10..=25)).max(70);
                patient.vital_signs.apply_delta(&VitalDelta {
                    pulse: target - v.pulse,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "heart_rate".to_string(),
                    format!("Decreased to {} BPM", patient.vital_signs.pulse),
                );
                effects.push("Heart rate decreased".to_string());
            }
            if v.systolic > 140 || v.diastolic > 90 {
                let sys_target = (v.systolic - rng.gen_range(15..=30)).max(120);
                let dia_target = (v.diastolic - rng.gen_range(5..=15)).max(80);
                patient.vital_signs.apply_delta(&VitalDelta {
                    systolic: sys_target - v.systolic,
                    diastolic: dia_target - v.diastolic,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "blood_pressure".to_string(),
                    format!("Decreased to {}", patient.vital_signs.formatted_bp()),
                );
                effects.push("Blood pressure reduced".to_string());
            }
            if patient.has_symptom("Chest Pain") {
                if rng.gen_bool(0.6) {
                    patient.remove_symptom("Chest Pain");
                    effects.push("Chest pain relieved".to_string());
                } else {
                    effects.push("Chest pain partially improved".to_string());
                }
            }
            severity_delta = if effects.is_empty() { -1 } else { -2 };
        }

        Treatment::AceInhibitors => {
            let v = patient.vital_signs.clone();
            if v.systolic > 130 || v.diastolic > 85 {
                let sys_target = (v.systolic - rng.gen_range(10..=20)).max(120);
                let dia_target = (v.diastolic - rng.gen_range(5..=10)).max(80);
                patient.vital_signs.apply_delta(&VitalDelta {
                    systolic: sys_target - v.systolic,
                    diastolic: dia_target - v.diastolic,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "blood_pressure".to_string(),
                    format!("Decreased to {}", patient.vital_signs.formatted_bp()),
                );
                effects.push("Blood pressure reduced".to_string());
                severity_delta = -1;
            } else {
                // Dosing a normotensive patient can push the pressure too low.
                let sys_target = (v.systolic - rng.gen_range(5..=15)).max(90);
                let dia_target = (v.diastolic - rng.gen_range(3..=8)).max(60);
                patient.vital_signs.apply_delta(&VitalDelta {
                    systolic: sys_target - v.systolic,
                    diastolic: dia_target - v.diastolic,
                    ..VitalDelta::default()
                });
                if patient.vital_signs.systolic < 100 {
                    vital_changes.insert(
                        "blood_pressure".to_string(),
                        format!("Decreased to {}", patient.vital_signs.formatted_bp()),
                    );
                    effects.push("Blood pressure dropped too low - possible hypotension".to_string());
                    if !patient.has_symptom("Dizziness") {
                        patient.add_symptom("Dizziness");
                        effects.push("Patient developed dizziness".to_string());
                    }
                    severity_delta = 1;
                }
            }
        }

        Treatment::OxygenTherapy => {
            if patient.vital_signs.oxygen_saturation < 95 {
                let current = patient.vital_signs.oxygen_saturation;
                let target = (current + rng.gen_range(3..=8)).min(99);
                patient.vital_signs.apply_delta(&VitalDelta {
                    oxygen_saturation: target - current,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "oxygen_saturation".to_string(),
                    format!("Increased to {}%", patient.vital_signs.oxygen_saturation),
                );
                effects.push("Oxygen saturation improved".to_string());
                if patient.has_symptom("Shortness of Breath") {
                    if rng.gen_bool(0.7) {
                        patient.remove_symptom("Shortness of Breath");
                        effects.push("Breathing difficulty relieved".to_string());
                    } else {
                        effects.push("Breathing difficulty partially improved".to_string());
                    }
                }
                severity_delta = -2;
            } else {
                effects.push("Oxygen levels already adequate".to_string());
            }
        }

        Treatment::IvFluids => {
            let v = patient.vital_signs.clone();
            if v.systolic < 100 {
                let sys_target = (v.systolic + rng.gen_range(10..=20)).min(120);
                let dia_target = (v.diastolic + rng.gen_range(5..=10)).min(80);
                patient.vital_signs.apply_delta(&VitalDelta {
                    systolic: sys_target - v.systolic,
                    diastolic: dia_target - v.diastolic,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "blood_pressure".to_string(),
                    format!("Stabilized at {}", patient.vital_signs.formatted_bp()),
                );
                effects.push("Blood pressure stabilized".to_string());
            }
            if patient.has_symptom("Dizziness") && rng.gen_bool(0.8) {
                patient.remove_symptom("Dizziness");
                effects.push("Dizziness relieved".to_string());
            }
            severity_delta = -1;
        }

        Treatment::Defibrillation => {
            if patient.condition_severity >= 8 && patient.has_symptom("Chest Pain") {
                if rng.gen_bool(0.7) {
                    effects.push("Cardiac rhythm restored".to_string());
                    let current = patient.vital_signs.pulse;
                    let target = rng.gen_range(70..=90);
                    patient.vital_signs.apply_delta(&VitalDelta {
                        pulse: target - current,
                        ..VitalDelta::default()
                    });
                    vital_changes.insert(
                        "heart_rate".to_string(),
                        format!("Stabilized at {} BPM", patient.vital_signs.pulse),
                    );
                    severity_delta = -3;
                } else {
                    effects.push("Defibrillation performed, patient requires continued care".to_string());
                    severity_delta = -1;
                }
            } else {
                effects.push("Defibrillation not indicated for current condition".to_string());
            }
        }

        Treatment::Intubation => {
            let indicated = patient.vital_signs.oxygen_saturation < 85
                || (patient.has_symptom("Shortness of Breath") && patient.condition_severity >= 7);
            if indicated {
                effects.push("Airway secured, ventilation established".to_string());
                let current = patient.vital_signs.oxygen_saturation;
                let target = (current + rng.gen_range(10..=15)).min(98);
                patient.vital_signs.apply_delta(&VitalDelta {
                    oxygen_saturation: target - current,
                    respiratory_rate: 14 - patient.vital_signs.respiratory_rate,
                    ..VitalDelta::default()
                });
                vital_changes.insert(
                    "oxygen_saturation".to_string(),
                    format!("Increased to {}%", patient.vital_signs.oxygen_saturation),
                );
                vital_changes.insert(
                    "respiratory_rate".to_string(),
                    "Controlled at 14 breaths/min".to_string(),
                );
                severity_delta = -3;
            } else {
                effects.push("Intubation not indicated for current condition".to_string());
            }
        }

        Treatment::Other(_) => {
            if !patient.active_symptoms.is_empty() && rng.gen_bool(0.6) {
                let idx = rng.gen_range(0..patient.active_symptoms.len());
                let symptom = patient
                    .active_symptoms
                    .iter()
                    .nth(idx)
                    .cloned()
                    .unwrap_or_default();
                patient.remove_symptom(&symptom);
                effects.push(format!("{symptom} relieved"));
                severity_delta = -1;
            }
        }
    }

    adjust_condition(patient, severity_delta, rng);

    let message = if severity_delta < 0 {
        format!(
            "Treatment '{}' applied successfully. Patient's condition is improving.",
            treatment.name()
        )
    } else if severity_delta > 0 {
        format!(
            "Treatment '{}' applied, but patient condition has worsened.",
            treatment.name()
        )
    } else {
        format!("Treatment '{}' applied.", treatment.name())
    };

    info!(
        patient_id = %patient.id,
        treatment = treatment.name(),
        severity_delta,
        effects = effects.len(),
        "treatment applied"
    );

    TreatmentOutcome { message, effects, vital_changes, severity_delta }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
