//! Severity adjustment with correlated vital-sign drift.
//!
//! Every intervention that moves `condition_severity` also nudges the vital
//! signs in the matching direction, so a worsening patient looks worse on the
//! monitor and an improving one settles back toward baseline. All randomness
//! comes through the caller's generator.

use medsim_contracts::patient::Patient;
use medsim_contracts::vitals::VitalDelta;
use rand::Rng;
use tracing::debug;

/// Shift the patient's condition severity by `delta` and drift the vitals to
/// match. A zero delta leaves the patient untouched.
///
/// Worsening raises pulse and blood pressure and drops oxygen saturation.
/// Improvement walks each vital back toward its resting value but never past
/// it: pulse settles no lower than 60, blood pressure no lower than 90/60, and
/// saturation tops out at 100.
pub fn adjust_condition<R: Rng>(patient: &mut Patient, delta: i32, rng: &mut R) {
    if delta == 0 {
        return;
    }
    patient.set_severity(patient.condition_severity + delta);

    if delta > 0 {
        let bp = rng.gen_range(5..=15);
        let drift = VitalDelta {
            pulse: rng.gen_range(5..=15),
            systolic: bp,
            diastolic: bp / 2,
            oxygen_saturation: -rng.gen_range(1..=5),
            ..VitalDelta::default()
        };
        patient.vital_signs.apply_delta(&drift);
    } else {
        let v = &patient.vital_signs;
        let bp = rng.gen_range(5..=10);
        let pulse_target = (v.pulse - rng.gen_range(5..=10)).max(60);
        let systolic_target = (v.systolic - bp).max(90);
        let diastolic_target = (v.diastolic - bp / 2).max(60);
        let spo2_target = (v.oxygen_saturation + rng.gen_range(1..=3)).min(100);
        let drift = VitalDelta {
            pulse: pulse_target - v.pulse,
            systolic: systolic_target - v.systolic,
            diastolic: diastolic_target - v.diastolic,
            oxygen_saturation: spo2_target - v.oxygen_saturation,
            ..VitalDelta::default()
        };
        patient.vital_signs.apply_delta(&drift);
    }

    debug!(
        patient_id = %patient.id,
        severity = patient.condition_severity,
        delta,
        "condition severity adjusted"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn patient() -> Patient {
        Patient::new("p-1", "Test Patient", 40, "female", 5)
    }

    /// A zero delta must not consume randomness or touch the patient.
    #[test]
    fn zero_delta_is_a_noop() {
        let mut p = patient();
        let before = p.clone();
        let mut rng = StdRng::seed_from_u64(1);
        adjust_condition(&mut p, 0, &mut rng);
        assert_eq!(p, before);
    }

    #[test]
    fn worsening_raises_pulse_and_drops_saturation() {
        let mut p = patient();
        let mut rng = StdRng::seed_from_u64(7);
        adjust_condition(&mut p, 2, &mut rng);
        assert_eq!(p.condition_severity, 7);
        assert!(p.vital_signs.pulse > 80);
        assert!(p.vital_signs.systolic > 120);
        assert!(p.vital_signs.oxygen_saturation < 98);
    }

    #[test]
    fn improvement_never_overshoots_resting_values() {
        for seed in 0..50 {
            let mut p = patient();
            p.vital_signs.pulse = 62;
            p.vital_signs.systolic = 92;
            p.vital_signs.diastolic = 61;
            p.vital_signs.oxygen_saturation = 99;
            let mut rng = StdRng::seed_from_u64(seed);
            adjust_condition(&mut p, -2, &mut rng);
            assert!(p.vital_signs.pulse >= 60);
            assert!(p.vital_signs.systolic >= 90);
            assert!(p.vital_signs.diastolic >= 60);
            assert!(p.vital_signs.oxygen_saturation <= 100);
        }
    }

    #[test]
    fn severity_stays_within_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = patient();
        p.set_severity(10);
        adjust_condition(&mut p, 3, &mut rng);
        assert_eq!(p.condition_severity, 10);

        let mut p = patient();
        p.set_severity(1);
        adjust_condition(&mut p, -3, &mut rng);
        assert_eq!(p.condition_severity, 1);
    }
}
