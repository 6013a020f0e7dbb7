//! The patient vital-signs model: pure data plus one bounded update.
//!
//! `VitalSigns` is mutated exclusively through [`VitalSigns::apply_delta`],
//! which clamps every field into its physiological band. Presentation code
//! never writes vitals directly; effect functions and the orchestrator's
//! severity-linked adjustment are the only writers.

use serde::{Deserialize, Serialize};

/// Lowest survivable core temperature the model will report (°C).
pub const TEMPERATURE_FLOOR: f64 = 34.0;

/// A patient's current vital signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Heart rate in beats per minute.
    pub pulse: i32,
    /// Systolic blood pressure in mmHg.
    pub systolic: i32,
    /// Diastolic blood pressure in mmHg.
    pub diastolic: i32,
    /// Core body temperature in °C.
    pub temperature: f64,
    /// Breaths per minute.
    pub respiratory_rate: i32,
    /// SpO2 percentage.
    pub oxygen_saturation: i32,
}

impl Default for VitalSigns {
    /// Normal resting adult values.
    fn default() -> Self {
        Self {
            pulse: 80,
            systolic: 120,
            diastolic: 80,
            temperature: 36.6,
            respiratory_rate: 16,
            oxygen_saturation: 98,
        }
    }
}

impl VitalSigns {
    /// Apply signed deltas to each field and clamp into the valid band.
    ///
    /// Clamps: pulse ≥ 40, systolic ≥ 90, diastolic ≥ 60, respiratory rate
    /// ≥ 6, SpO2 ∈ [70, 100], temperature ≥ [`TEMPERATURE_FLOOR`]. There are
    /// no error conditions — arbitrary inputs are silently bounded.
    pub fn apply_delta(&mut self, delta: &VitalDelta) {
        self.pulse = (self.pulse + delta.pulse).max(40);
        self.systolic = (self.systolic + delta.systolic).max(90);
        self.diastolic = (self.diastolic + delta.diastolic).max(60);
        self.temperature = (self.temperature + delta.temperature).max(TEMPERATURE_FLOOR);
        self.respiratory_rate = (self.respiratory_rate + delta.respiratory_rate).max(6);
        self.oxygen_saturation = (self.oxygen_saturation + delta.oxygen_saturation).clamp(70, 100);
    }

    /// Blood pressure in the standard clinical format, e.g. `"120/80 mmHg"`.
    pub fn formatted_bp(&self) -> String {
        format!("{}/{} mmHg", self.systolic, self.diastolic)
    }
}

/// Signed per-field deltas consumed by [`VitalSigns::apply_delta`].
///
/// The zero value is a no-op update, so callers set only the fields they
/// intend to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalDelta {
    pub pulse: i32,
    pub systolic: i32,
    pub diastolic: i32,
    pub temperature: f64,
    pub respiratory_rate: i32,
    pub oxygen_saturation: i32,
}

/// Fractional vital deltas produced by the medication response.
///
/// Medication effects scale with effectiveness and so are computed in f64;
/// the caller decides whether to apply them, converting with [`rounded`].
///
/// [`rounded`]: VitalChanges::rounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalChanges {
    pub pulse: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub temperature: f64,
    pub respiratory_rate: f64,
    pub oxygen_saturation: f64,
}

impl VitalChanges {
    /// Convert to the integer delta form accepted by `apply_delta`.
    ///
    /// Temperature stays fractional; every other field rounds to the nearest
    /// whole unit.
    pub fn rounded(&self) -> VitalDelta {
        VitalDelta {
            pulse: self.pulse.round() as i32,
            systolic: self.systolic.round() as i32,
            diastolic: self.diastolic.round() as i32,
            temperature: self.temperature,
            respiratory_rate: self.respiratory_rate.round() as i32,
            oxygen_saturation: self.oxygen_saturation.round() as i32,
        }
    }

    /// True when every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A zero delta leaves every field untouched.
    #[test]
    fn zero_delta_is_noop() {
        let mut vitals = VitalSigns::default();
        let before = vitals.clone();
        vitals.apply_delta(&VitalDelta::default());
        assert_eq!(vitals, before);
    }

    /// Oxygen saturation never leaves [70, 100] regardless of input magnitude.
    #[test]
    fn oxygen_saturation_stays_bounded() {
        let mut vitals = VitalSigns::default();
        vitals.apply_delta(&VitalDelta { oxygen_saturation: -500, ..Default::default() });
        assert_eq!(vitals.oxygen_saturation, 70);

        vitals.apply_delta(&VitalDelta { oxygen_saturation: 500, ..Default::default() });
        assert_eq!(vitals.oxygen_saturation, 100);
    }

    /// No field goes negative (or below its floor) under extreme deltas.
    #[test]
    fn extreme_negative_deltas_clamp_to_floors() {
        let mut vitals = VitalSigns::default();
        vitals.apply_delta(&VitalDelta {
            pulse: -1000,
            systolic: -1000,
            diastolic: -1000,
            temperature: -1000.0,
            respiratory_rate: -1000,
            oxygen_saturation: -1000,
        });

        assert_eq!(vitals.pulse, 40);
        assert_eq!(vitals.systolic, 90);
        assert_eq!(vitals.diastolic, 60);
        assert_eq!(vitals.respiratory_rate, 6);
        assert_eq!(vitals.oxygen_saturation, 70);
        assert_eq!(vitals.temperature, TEMPERATURE_FLOOR);
    }

    /// Temperature is unconstrained upward.
    #[test]
    fn temperature_rises_unclamped() {
        let mut vitals = VitalSigns::default();
        vitals.apply_delta(&VitalDelta { temperature: 5.4, ..Default::default() });
        assert!((vitals.temperature - 42.0).abs() < 1e-9);
    }

    #[test]
    fn formatted_bp_matches_clinical_convention() {
        let vitals = VitalSigns { systolic: 135, diastolic: 88, ..Default::default() };
        assert_eq!(vitals.formatted_bp(), "135/88 mmHg");
    }

    /// Rounding keeps temperature fractional and rounds the integer fields.
    #[test]
    fn vital_changes_round_to_delta() {
        let changes = VitalChanges {
            pulse: -4.6,
            systolic: -14.4,
            temperature: -0.35,
            ..Default::default()
        };
        let delta = changes.rounded();
        assert_eq!(delta.pulse, -5);
        assert_eq!(delta.systolic, -14);
        assert!((delta.temperature + 0.35).abs() < 1e-9);
        assert_eq!(delta.oxygen_saturation, 0);
    }
}
