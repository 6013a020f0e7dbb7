//! The built-in catalog data set.
//!
//! Ten common diagnoses and five reference medications, compiled in so the
//! engine works with no external configuration. Deployments that need a
//! different case mix load their own TOML document instead.

use medsim_contracts::catalog::{Diagnosis, Medication, SideEffect};

fn diagnosis(
    name: &str,
    description: &str,
    primary: &[&str],
    secondary: &[&str],
    tests: &[&str],
    treatments: &[&str],
    severity: i32,
) -> Diagnosis {
    Diagnosis {
        name: name.to_string(),
        description: description.to_string(),
        primary_symptoms: primary.iter().map(|s| s.to_string()).collect(),
        secondary_symptoms: secondary.iter().map(|s| s.to_string()).collect(),
        recommended_tests: tests.iter().map(|s| s.to_string()).collect(),
        recommended_treatments: treatments.iter().map(|s| s.to_string()).collect(),
        severity,
    }
    .clamp_severity()
}

/// The default diagnosis definitions.
pub fn default_diagnoses() -> Vec<Diagnosis> {
    vec![
        diagnosis(
            "Acute Myocardial Infarction",
            "Heart attack caused by blocked blood flow to the heart muscle",
            &["Chest Pain", "Shortness of Breath", "Sweating"],
            &["Nausea", "Dizziness", "Fatigue"],
            &["ECG/EKG", "Cardiac Enzyme Test", "Blood Pressure"],
            &["Aspirin", "Beta-blockers", "ACE Inhibitors", "Anticoagulants", "Oxygen Therapy"],
            9,
        ),
        diagnosis(
            "Pneumonia",
            "Infection that inflames air sacs in one or both lungs",
            &["Cough", "Fever", "Shortness of Breath"],
            &["Chest Pain", "Fatigue", "Sweating"],
            &["Chest X-Ray", "Blood Culture", "Sputum Culture", "Basic Blood Test"],
            &["Antibiotics", "Oxygen Therapy", "IV Fluids"],
            6,
        ),
        diagnosis(
            "Gastroenteritis",
            "Inflammation of the stomach and intestines",
            &["Abdominal Pain", "Nausea", "Diarrhea"],
            &["Fever", "Headache", "Loss of Appetite"],
            &["Stool Culture", "Basic Blood Test"],
            &["IV Fluids", "Antibiotics", "Anti-nausea Medication"],
            4,
        ),
        diagnosis(
            "Migraine",
            "Recurring headache that causes moderate to severe pain",
            &["Headache", "Nausea", "Sensitivity to Light"],
            &["Dizziness", "Fatigue", "Visual Disturbances"],
            &["Neurological Examination", "MRI"],
            &["Pain Relief", "Anti-nausea Medication", "Rest in Dark Room"],
            3,
        ),
        diagnosis(
            "Hypertensive Crisis",
            "Severe increase in blood pressure that can lead to organ damage",
            &["Dizziness", "Headache", "Chest Pain"],
            &["Shortness of Breath", "Nausea", "Vision Problems"],
            &["Blood Pressure", "ECG/EKG", "Basic Blood Test"],
            &["ACE Inhibitors", "Beta-blockers", "IV Fluids"],
            8,
        ),
        diagnosis(
            "Allergic Reaction",
            "Immune system response to a substance that's normally harmless",
            &["Rash", "Itching", "Swelling"],
            &["Shortness of Breath", "Dizziness", "Nausea"],
            &["Allergy Test", "Basic Blood Test"],
            &["Antihistamines", "Corticosteroids", "Epinephrine"],
            5,
        ),
        diagnosis(
            "Influenza",
            "Contagious viral infection affecting the respiratory system",
            &["Fever", "Cough", "Fatigue"],
            &["Headache", "Sore Throat", "Body Aches"],
            &["Rapid Influenza Diagnostic Test", "Basic Blood Test"],
            &["Antiviral Medication", "Pain Relief", "Rest"],
            4,
        ),
        diagnosis(
            "Appendicitis",
            "Inflammation of the appendix",
            &["Abdominal Pain", "Nausea", "Loss of Appetite"],
            &["Fever", "Vomiting", "Inability to Pass Gas"],
            &["Physical Examination", "CT Scan", "Urinalysis"],
            &["Surgery", "IV Fluids", "Antibiotics"],
            7,
        ),
        diagnosis(
            "Diabetes Mellitus",
            "Chronic condition affecting how the body processes blood sugar",
            &["Fatigue", "Increased Thirst", "Frequent Urination"],
            &["Weight Loss", "Blurred Vision", "Slow-Healing Sores"],
            &["Blood Glucose Test", "Urinalysis", "A1C Test"],
            &["Insulin", "Oral Medications", "Diet Management"],
            6,
        ),
        diagnosis(
            "Bronchitis",
            "Inflammation of the bronchial tubes in the lungs",
            &["Cough", "Shortness of Breath", "Chest Discomfort"],
            &["Fatigue", "Fever", "Sore Throat"],
            &["Chest X-Ray", "Sputum Culture", "Pulmonary Function Test"],
            &["Bronchodilators", "Antibiotics", "Rest"],
            4,
        ),
    ]
}

fn side_effect(name: &str, probability: f64, severity: &str) -> SideEffect {
    SideEffect {
        name: name.to_string(),
        probability,
        severity: severity.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The default medication definitions.
pub fn default_medications() -> Vec<Medication> {
    vec![
        Medication {
            name: "Amoxicillin".to_string(),
            category: "Antibiotic".to_string(),
            description: "Broad-spectrum penicillin antibiotic used to treat bacterial infections."
                .to_string(),
            dosages: strings(&["250mg", "500mg", "875mg"]),
            administration_routes: strings(&["Oral"]),
            indications: strings(&[
                "Respiratory infections",
                "Ear infections",
                "Sinusitis",
                "Pneumonia",
            ]),
            contraindications: strings(&["Penicillin allergy"]),
            side_effects: vec![
                side_effect("Diarrhea", 0.15, "mild"),
                side_effect("Nausea", 0.10, "mild"),
                side_effect("Rash", 0.05, "moderate"),
                side_effect("Allergic reaction", 0.01, "severe"),
            ],
            interactions: strings(&["Probenecid", "Allopurinol"]),
        },
        Medication {
            name: "Ibuprofen".to_string(),
            category: "Painkiller".to_string(),
            description:
                "Nonsteroidal anti-inflammatory drug used to reduce pain, inflammation, and fever."
                    .to_string(),
            dosages: strings(&["200mg", "400mg", "600mg", "800mg"]),
            administration_routes: strings(&["Oral"]),
            indications: strings(&["Pain", "Inflammation", "Fever", "Headache", "Arthritis"]),
            contraindications: strings(&["NSAID allergy", "Stomach ulcers", "Heart failure"]),
            side_effects: vec![
                side_effect("Stomach upset", 0.20, "mild"),
                side_effect("Heartburn", 0.15, "mild"),
                side_effect("Dizziness", 0.05, "moderate"),
                side_effect("Stomach bleeding", 0.01, "severe"),
            ],
            interactions: strings(&["Aspirin", "Blood thinners", "Diuretics"]),
        },
        Medication {
            name: "Lisinopril".to_string(),
            category: "Antihypertensive".to_string(),
            description: "ACE inhibitor used to treat high blood pressure and heart failure."
                .to_string(),
            dosages: strings(&["5mg", "10mg", "20mg", "40mg"]),
            administration_routes: strings(&["Oral"]),
            indications: strings(&["Hypertension", "Heart failure", "Post-heart attack"]),
            contraindications: strings(&["Pregnancy", "History of angioedema"]),
            side_effects: vec![
                side_effect("Dry cough", 0.20, "moderate"),
                side_effect("Dizziness", 0.15, "mild"),
                side_effect("Low blood pressure", 0.10, "moderate"),
                side_effect("Increased potassium", 0.05, "moderate"),
            ],
            interactions: strings(&["Potassium supplements", "NSAIDs", "Diuretics"]),
        },
        Medication {
            name: "Albuterol".to_string(),
            category: "Bronchodilator".to_string(),
            description:
                "Bronchodilator that relaxes muscles in the airways to improve breathing."
                    .to_string(),
            dosages: strings(&["90mcg inhaler", "2mg tablet", "4mg tablet"]),
            administration_routes: strings(&["Inhalation", "Oral"]),
            indications: strings(&["Asthma", "COPD", "Bronchitis", "Wheezing"]),
            contraindications: strings(&["Tachycardia"]),
            side_effects: vec![
                side_effect("Tremors", 0.20, "mild"),
                side_effect("Increased heart rate", 0.15, "moderate"),
                side_effect("Nervousness", 0.10, "mild"),
                side_effect("Headache", 0.10, "mild"),
            ],
            interactions: strings(&["Beta-blockers", "Diuretics", "Other stimulants"]),
        },
        Medication {
            name: "Metformin".to_string(),
            category: "Antidiabetic".to_string(),
            description: "Oral diabetes medication that helps control blood sugar levels."
                .to_string(),
            dosages: strings(&["500mg", "850mg", "1000mg"]),
            administration_routes: strings(&["Oral"]),
            indications: strings(&["Type 2 diabetes", "Insulin resistance", "Prediabetes"]),
            contraindications: strings(&["Kidney disease", "Liver disease"]),
            side_effects: vec![
                side_effect("Digestive issues", 0.30, "mild"),
                side_effect("Nausea", 0.20, "mild"),
                side_effect("Vitamin B12 deficiency", 0.05, "moderate"),
                side_effect("Lactic acidosis", 0.01, "severe"),
            ],
            interactions: strings(&["Contrast dyes", "Alcohol", "Other diabetes medications"]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_data_is_well_formed() {
        let diagnoses = default_diagnoses();
        assert_eq!(diagnoses.len(), 10);
        for d in &diagnoses {
            assert!((1..=10).contains(&d.severity), "{} severity out of scale", d.name);
            assert!(!d.primary_symptoms.is_empty(), "{} has no primary symptoms", d.name);
        }

        let medications = default_medications();
        assert_eq!(medications.len(), 5);
        for m in &medications {
            assert!(m.default_dosage().is_some(), "{} has no dosage", m.name);
            assert!(m.default_route().is_some(), "{} has no route", m.name);
            for se in &m.side_effects {
                assert!((0.0..=1.0).contains(&se.probability));
            }
        }
    }
}
