//! Built-in sample patient templates.
//!
//! Five presentations spanning the builtin diagnosis catalog: a critical
//! cardiac case, a respiratory infection, a hypertensive neurological
//! picture, an abdominal complaint, and an allergic reaction.

use medsim_contracts::patient::Patient;
use medsim_contracts::vitals::VitalSigns;

fn template(
    id: &str,
    name: &str,
    age: u32,
    gender: &str,
    severity: i32,
    history: &[&str],
    symptoms: &[&str],
    vitals: VitalSigns,
) -> Patient {
    let mut patient = Patient::new(id, name, age, gender, severity);
    patient.medical_history = history.iter().map(|s| s.to_string()).collect();
    for symptom in symptoms {
        patient.add_symptom(*symptom);
    }
    patient.vital_signs = vitals;
    patient
}

/// The built-in sample templates, in id order.
pub fn sample_patients() -> Vec<Patient> {
    vec![
        template(
            "P001",
            "John Smith",
            45,
            "Male",
            7,
            &["Hypertension", "High Cholesterol"],
            &["Chest Pain", "Shortness of Breath", "Sweating"],
            VitalSigns {
                pulse: 110,
                systolic: 160,
                diastolic: 95,
                temperature: 37.2,
                respiratory_rate: 22,
                oxygen_saturation: 94,
            },
        ),
        template(
            "P002",
            "Sarah Johnson",
            32,
            "Female",
            4,
            &["Asthma"],
            &["Cough", "Fever", "Fatigue"],
            VitalSigns {
                pulse: 95,
                systolic: 125,
                diastolic: 80,
                temperature: 38.7,
                respiratory_rate: 20,
                oxygen_saturation: 96,
            },
        ),
        template(
            "P003",
            "Robert Davis",
            67,
            "Male",
            6,
            &["Diabetes Type 2", "Coronary Artery Disease", "Stroke (2018)"],
            &["Dizziness", "Confusion", "Headache"],
            VitalSigns {
                pulse: 88,
                systolic: 175,
                diastolic: 100,
                temperature: 36.5,
                respiratory_rate: 18,
                oxygen_saturation: 95,
            },
        ),
        template(
            "P004",
            "Emily Wilson",
            28,
            "Female",
            3,
            &[],
            &["Abdominal Pain", "Nausea", "Loss of Appetite"],
            VitalSigns {
                pulse: 100,
                systolic: 110,
                diastolic: 70,
                temperature: 37.8,
                respiratory_rate: 16,
                oxygen_saturation: 98,
            },
        ),
        template(
            "P005",
            "Michael Chen",
            52,
            "Male",
            2,
            &["Allergies to Penicillin"],
            &["Rash", "Itching", "Swelling"],
            VitalSigns {
                pulse: 105,
                systolic: 135,
                diastolic: 85,
                temperature: 37.4,
                respiratory_rate: 18,
                oxygen_saturation: 97,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_unique_and_ordered() {
        let patients = sample_patients();
        assert_eq!(patients.len(), 5);

        let ids: Vec<&str> = patients.iter().map(|p| p.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    /// Severities span mild to serious so the scoring paths all get exercised.
    #[test]
    fn sample_acuity_spans_the_scale() {
        let patients = sample_patients();
        assert!(patients.iter().any(|p| p.condition_severity >= 7));
        assert!(patients.iter().any(|p| p.condition_severity <= 2));
    }
}
