//! Diagnostic test simulator.
//!
//! Performing a test reads the patient and appends to `tests_performed`, but
//! never changes symptoms, vitals, or severity; running the same test twice
//! only lengthens the log. Each test kind produces a structured report with
//! its own detail keys; unknown test names fall to a generic completion
//! payload.

use std::collections::BTreeMap;

use medsim_contracts::intervention::{TestKind, TestReport};
use medsim_contracts::patient::Patient;
use rand::Rng;
use tracing::info;

/// Probability that a test comes back abnormal, driven by symptom load and
/// severity: 0.2 + min(0.6, 0.1·symptoms) + min(0.2, 0.02·severity).
fn abnormal_chance(patient: &Patient) -> f64 {
    let symptom_load = (0.1 * patient.active_symptoms.len() as f64).min(0.6);
    let severity_load = (0.02 * patient.condition_severity as f64).min(0.2);
    0.2 + symptom_load + severity_load
}

/// Perform one diagnostic test on the patient.
///
/// The test is recorded in the audit log first, so even a perfectly normal
/// result counts toward the matcher's test-confidence term.
pub fn perform_test<R: Rng>(patient: &mut Patient, test: &TestKind, rng: &mut R) -> TestReport {
    patient.record_test(test.name());
    let abnormal_roll = rng.gen::<f64>() < abnormal_chance(patient);

    let mut report = match test {
        TestKind::BloodPressure => blood_pressure(patient, abnormal_roll),
        TestKind::BasicBloodTest => basic_blood_test(patient, abnormal_roll, rng),
        TestKind::Ecg => ecg(patient, abnormal_roll, rng),
        TestKind::ChestXray => chest_xray(patient, abnormal_roll, rng),
        TestKind::PulmonaryFunction => pulmonary_function(patient, abnormal_roll, rng),
        TestKind::PhysicalExamination => physical_examination(patient),
        TestKind::Urinalysis => urinalysis(patient, rng),
        TestKind::Other(name) => generic_test(patient, name, rng),
    };
    report.message = format!("Test '{}' performed successfully.", test.name());

    info!(
        patient_id = %patient.id,
        test = test.name(),
        is_abnormal = report.is_abnormal,
        "test performed"
    );

    report
}

fn empty_report() -> TestReport {
    TestReport {
        message: String::new(),
        details: BTreeMap::new(),
        interpretation: String::new(),
        is_abnormal: false,
        recommendations: Vec::new(),
    }
}

/// Categorical reading straight off the current vitals; no randomness beyond
/// the abnormal roll, which the category overrides when pressure is elevated.
fn blood_pressure(patient: &Patient, abnormal_roll: bool) -> TestReport {
    let mut report = empty_report();
    let systolic = patient.vital_signs.systolic;
    let diastolic = patient.vital_signs.diastolic;

    let category = if systolic >= 180 || diastolic >= 120 {
        "Hypertensive Crisis"
    } else if systolic >= 140 || diastolic >= 90 {
        "Stage 2 Hypertension"
    } else if systolic >= 130 || diastolic >= 85 {
        "Stage 1 Hypertension"
    } else if systolic >= 120 {
        "Elevated"
    } else {
        "Normal"
    };

    report.details.insert("systolic".to_string(), format!("{systolic} mmHg"));
    report.details.insert("diastolic".to_string(), format!("{diastolic} mmHg"));
    report.details.insert("category".to_string(), category.to_string());

    report.is_abnormal = abnormal_roll;
    if category != "Normal" {
        report.is_abnormal = true;
        report.interpretation = format!("Patient has {category}.");
        match category {
            "Hypertensive Crisis" => {
                report.recommendations.push("Immediate medical attention required.".to_string());
            }
            "Stage 1 Hypertension" | "Stage 2 Hypertension" => {
                report
                    .recommendations
                    .push("Consider anti-hypertensive medications.".to_string());
                report.recommendations.push(
                    "Recommend lifestyle modifications including diet and exercise.".to_string(),
                );
            }
            _ => {
                report
                    .recommendations
                    .push("Recommend lifestyle modifications and monitoring.".to_string());
            }
        }
    } else {
        report.interpretation = "Blood pressure is within normal range.".to_string();
    }

    report
}

struct Analyte {
    key: &'static str,
    unit: &'static str,
    low: f64,
    high: f64,
}

const ANALYTES: [Analyte; 4] = [
    Analyte { key: "WBC", unit: "x10^9/L", low: 4.0, high: 11.0 },
    Analyte { key: "RBC", unit: "x10^12/L", low: 4.2, high: 5.8 },
    Analyte { key: "Hemoglobin", unit: "g/dL", low: 12.0, high: 17.5 },
    Analyte { key: "Glucose", unit: "mg/dL", low: 70.0, high: 100.0 },
];

/// Small panel with symptom-driven shifts: fever pushes white cells up,
/// fatigue pulls hemoglobin down, and an otherwise-unexplained abnormal roll
/// elevates glucose.
fn basic_blood_test<R: Rng>(patient: &Patient, abnormal_roll: bool, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    let has_fever = patient.has_symptom("Fever");
    let has_fatigue = patient.has_symptom("Fatigue");

    let mut values = [0.0f64; ANALYTES.len()];
    for (value, analyte) in values.iter_mut().zip(&ANALYTES) {
        *value = rng.gen_range(analyte.low..analyte.high);
        match analyte.key {
            "WBC" if has_fever => *value += rng.gen_range(3.0..7.0),
            "Hemoglobin" if has_fatigue => *value -= rng.gen_range(2.0..4.0),
            "Glucose" if abnormal_roll && !has_fever && !has_fatigue => {
                *value += rng.gen_range(30.0..60.0)
            }
            _ => {}
        }
    }

    let mut abnormal_findings: Vec<String> = Vec::new();
    for (&value, analyte) in values.iter().zip(&ANALYTES) {
        report.details.insert(
            analyte.key.to_string(),
            format!("{:.1} {} (ref {:.1}-{:.1})", value, analyte.unit, analyte.low, analyte.high),
        );
        if value > analyte.high {
            abnormal_findings.push(format!("{} is elevated ({:.1} {})", analyte.key, value, analyte.unit));
        } else if value < analyte.low {
            abnormal_findings.push(format!("{} is low ({:.1} {})", analyte.key, value, analyte.unit));
        }
    }

    for finding in &abnormal_findings {
        if finding.starts_with("WBC") {
            report.recommendations.push("Consider infection workup.".to_string());
        } else if finding.starts_with("Hemoglobin") || finding.starts_with("RBC") {
            report.recommendations.push("Evaluate for anemia or blood loss.".to_string());
        } else if finding.starts_with("Glucose") {
            report.recommendations.push("Check for diabetes or metabolic disorders.".to_string());
        }
    }

    report.is_abnormal = abnormal_roll;
    if abnormal_findings.is_empty() {
        report.interpretation = "Blood test results are within normal ranges.".to_string();
    } else {
        report.is_abnormal = true;
        report.interpretation =
            format!("Abnormal blood test results: {}.", abnormal_findings.join(", "));
    }

    report
}

const ECG_CHEST_PAIN_FINDINGS: [&str; 4] = [
    "ST segment elevation suggesting possible myocardial infarction",
    "T wave inversion indicating possible ischemia",
    "Sinus tachycardia with nonspecific ST-T changes",
    "Premature ventricular contractions noted",
];

const ECG_OTHER_FINDINGS: [&str; 4] = [
    "Sinus tachycardia",
    "Sinus bradycardia",
    "First-degree AV block",
    "Nonspecific ST-T wave changes",
];

fn ecg<R: Rng>(patient: &Patient, abnormal_roll: bool, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    let has_chest_pain = patient.has_symptom("Chest Pain");
    let abnormal = abnormal_roll || has_chest_pain;

    report
        .details
        .insert("heart_rate".to_string(), format!("{} BPM", patient.vital_signs.pulse));
    report.details.insert(
        "rhythm".to_string(),
        if abnormal && rng.gen_bool(0.5) { "Irregular" } else { "Regular" }.to_string(),
    );
    report.details.insert(
        "intervals".to_string(),
        if abnormal { "Abnormal" } else { "Normal" }.to_string(),
    );
    report
        .details
        .insert("image_ref".to_string(), format!("ecg/{}", patient.id));

    if abnormal {
        report.is_abnormal = true;
        let finding = if has_chest_pain {
            ECG_CHEST_PAIN_FINDINGS[rng.gen_range(0..ECG_CHEST_PAIN_FINDINGS.len())]
        } else {
            ECG_OTHER_FINDINGS[rng.gen_range(0..ECG_OTHER_FINDINGS.len())]
        };
        report.interpretation = finding.to_string();
        if has_chest_pain {
            report.recommendations.push("Order cardiac enzyme tests.".to_string());
            report.recommendations.push("Cardiology consultation advised.".to_string());
            if finding.starts_with("ST segment elevation") {
                report
                    .recommendations
                    .push("Consider urgent cardiac catheterization.".to_string());
            }
        } else {
            report
                .recommendations
                .push("Consider cardiac follow-up if clinically indicated.".to_string());
        }
    } else {
        report.interpretation =
            "Normal sinus rhythm with no acute ST-T wave changes.".to_string();
    }

    report
}

const XRAY_PNEUMONIA_FINDINGS: [&str; 3] = [
    "Right lower lobe consolidation consistent with pneumonia",
    "Patchy bilateral infiltrates suggestive of pneumonia",
    "Left lower lobe opacity consistent with pneumonia",
];

const XRAY_CARDIAC_FINDINGS: [&str; 3] = [
    "Cardiomegaly with pulmonary vascular congestion",
    "Enlarged cardiac silhouette",
    "Mild pulmonary edema pattern",
];

const XRAY_FRACTURE_FINDINGS: [&str; 3] = [
    "Nondisplaced rib fracture on the left",
    "Possible rib fracture, clinical correlation recommended",
    "Healing rib fractures noted",
];

const XRAY_NORMAL_FINDINGS: [&str; 3] = [
    "Clear lung fields with no acute abnormality",
    "No consolidation, effusion, or pneumothorax",
    "Normal cardiac silhouette and clear lungs",
];

fn chest_xray<R: Rng>(patient: &Patient, abnormal_roll: bool, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    let has_cough = patient.has_symptom("Cough");
    let has_fever = patient.has_symptom("Fever");
    let has_chest_pain = patient.has_symptom("Chest Pain");
    let has_dyspnea = patient.has_symptom("Shortness of Breath");

    let suspicious = abnormal_roll || has_chest_pain || has_dyspnea;

    // Symptom pattern picks the kind of abnormality, when one shows at all.
    let condition = if !suspicious {
        None
    } else if has_cough && has_fever {
        Some("pneumonia")
    } else if has_chest_pain {
        Some(if rng.gen_bool(0.5) { "cardiac" } else { "fracture" })
    } else if has_dyspnea {
        Some(if rng.gen_bool(0.7) { "cardiac" } else { "pneumonia" })
    } else {
        None
    };

    let interpretation = match condition {
        Some("pneumonia") => {
            report.recommendations.push("Start empiric antibiotics.".to_string());
            report.recommendations.push("Follow-up imaging in 4-6 weeks.".to_string());
            XRAY_PNEUMONIA_FINDINGS[rng.gen_range(0..XRAY_PNEUMONIA_FINDINGS.len())]
        }
        Some("cardiac") => {
            report.recommendations.push("Echocardiogram recommended.".to_string());
            report.recommendations.push("Evaluate for heart failure.".to_string());
            XRAY_CARDIAC_FINDINGS[rng.gen_range(0..XRAY_CARDIAC_FINDINGS.len())]
        }
        Some(_) => {
            report.recommendations.push("Pain management as needed.".to_string());
            report.recommendations.push("Avoid strenuous activity.".to_string());
            XRAY_FRACTURE_FINDINGS[rng.gen_range(0..XRAY_FRACTURE_FINDINGS.len())]
        }
        None => XRAY_NORMAL_FINDINGS[rng.gen_range(0..XRAY_NORMAL_FINDINGS.len())],
    };

    report.is_abnormal = condition.is_some();
    report.interpretation = interpretation.to_string();
    report.details.insert("findings".to_string(), interpretation.to_string());
    report.details.insert(
        "quality".to_string(),
        if rng.gen_bool(0.8) { "Good" } else { "Limited due to patient positioning" }.to_string(),
    );
    report
        .details
        .insert("image_ref".to_string(), format!("chest-xray/{}", patient.id));

    report
}

const PFT_ABNORMAL_FINDINGS: [&str; 3] = [
    "Moderate obstructive pattern consistent with asthma or COPD",
    "Mild restrictive pattern",
    "Reduced diffusion capacity with obstructive features",
];

fn pulmonary_function<R: Rng>(patient: &Patient, abnormal_roll: bool, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    let impaired = abnormal_roll || patient.has_symptom("Shortness of Breath");

    // Predicted normals for an average adult; measured values are scaled.
    let (fev1, fvc, dlco) = if impaired {
        (
            3.5 * rng.gen_range(0.5..0.8),
            4.5 * rng.gen_range(0.6..0.9),
            rng.gen_range(40.0..70.0),
        )
    } else {
        (
            3.5 * rng.gen_range(0.9..1.1),
            4.5 * rng.gen_range(0.9..1.1),
            rng.gen_range(70.0..100.0),
        )
    };

    report.details.insert(
        "FEV1".to_string(),
        format!("{:.2} L ({:.0}% predicted)", fev1, fev1 / 3.5 * 100.0),
    );
    report.details.insert(
        "FVC".to_string(),
        format!("{:.2} L ({:.0}% predicted)", fvc, fvc / 4.5 * 100.0),
    );
    report
        .details
        .insert("FEV1/FVC".to_string(), format!("{:.1}%", fev1 / fvc * 100.0));
    report
        .details
        .insert("DLCO".to_string(), format!("{dlco:.0}% predicted"));

    if impaired {
        report.is_abnormal = true;
        let finding = PFT_ABNORMAL_FINDINGS[rng.gen_range(0..PFT_ABNORMAL_FINDINGS.len())];
        report.interpretation = finding.to_string();
        report.recommendations.push("Trial of bronchodilator therapy.".to_string());
        report.recommendations.push("Consider chest imaging.".to_string());
        if finding.contains("obstructive") {
            report
                .recommendations
                .push("Consider inhaled corticosteroids.".to_string());
        }
    } else {
        report.interpretation = "Pulmonary function within normal limits.".to_string();
    }

    report
}

/// Deterministic bedside exam driven entirely by symptoms and severity.
fn physical_examination(patient: &Patient) -> TestReport {
    let mut report = empty_report();
    let severity = patient.condition_severity;

    report.details.insert(
        "general_appearance".to_string(),
        if severity < 5 { "Alert and oriented" } else { "Distressed" }.to_string(),
    );
    report.details.insert(
        "skin".to_string(),
        if severity < 4 { "Normal" } else { "Pale and clammy" }.to_string(),
    );
    report.details.insert(
        "lungs".to_string(),
        if patient.has_symptom("Shortness of Breath") { "Wheezing noted" } else { "Clear" }
            .to_string(),
    );
    report.details.insert(
        "heart".to_string(),
        if patient.has_symptom("Chest Pain") { "Irregular rhythm" } else { "Regular rhythm" }
            .to_string(),
    );
    report.details.insert(
        "abdomen".to_string(),
        if patient.has_symptom("Abdominal Pain") { "Tender to palpation" } else { "Soft" }
            .to_string(),
    );

    if severity > 3 {
        report.is_abnormal = true;
        report.interpretation = "Abnormal examination findings.".to_string();
    } else {
        report.interpretation = "Normal findings.".to_string();
    }

    report
}

fn urinalysis<R: Rng>(patient: &Patient, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    let mut blood = "Negative";
    let mut protein = "Negative";

    if patient.condition_severity > 5 {
        if rng.gen_bool(0.5) {
            blood = "Positive";
            report.is_abnormal = true;
        }
        if rng.gen_bool(0.3) {
            protein = "Trace";
            report.is_abnormal = true;
        }
    }

    report.details.insert("color".to_string(), "Yellow".to_string());
    report.details.insert("clarity".to_string(), "Clear".to_string());
    report.details.insert("specific_gravity".to_string(), "1.015".to_string());
    report.details.insert("pH".to_string(), "6.0".to_string());
    report.details.insert("glucose".to_string(), "Negative".to_string());
    report.details.insert("blood".to_string(), blood.to_string());
    report.details.insert("protein".to_string(), protein.to_string());
    report.details.insert("nitrites".to_string(), "Negative".to_string());
    report.details.insert("leukocytes".to_string(), "Negative".to_string());

    report.interpretation = if report.is_abnormal {
        "Abnormal urinalysis findings.".to_string()
    } else {
        "Urinalysis within normal limits.".to_string()
    };

    report
}

fn generic_test<R: Rng>(patient: &Patient, name: &str, rng: &mut R) -> TestReport {
    let mut report = empty_report();
    report.details.insert("Test Completed".to_string(), "Yes".to_string());
    report.details.insert("Quality".to_string(), "Good".to_string());

    report.is_abnormal = rng.gen::<f64>() < patient.condition_severity as f64 / 10.0;
    report.interpretation = if report.is_abnormal {
        format!("Abnormal findings on {name}.")
    } else {
        format!("Normal findings on {name}.")
    };

    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
