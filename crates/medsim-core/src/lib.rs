//! # medsim-core
//!
//! The clinical simulation engine: treatment and medication effect functions,
//! the diagnostic test simulator, severity adjustment, and the case
//! orchestrator that ties them together.
//!
//! ## Design
//!
//! Effect functions are free functions over a `Patient` and a caller-supplied
//! random generator; nothing in this crate holds hidden state. The
//! [`CaseOrchestrator`](orchestrator::CaseOrchestrator) owns one `StdRng` per
//! run and reaches its collaborators through the [`traits`] seams, so a whole
//! case replays deterministically from a seed and tests can swap in mock
//! stores and medication sources.
//!
//! All vital-sign writes funnel through `VitalSigns::apply_delta` in
//! `medsim-contracts`; no code here bypasses its clamping.

pub mod medication;
pub mod orchestrator;
pub mod severity;
pub mod testsim;
pub mod traits;
pub mod treatment;

pub use orchestrator::CaseOrchestrator;
pub use traits::{MedicationSource, PatientStore};
