//! # medsim-catalog
//!
//! The read-only diagnosis and medication catalogs for the MedSim engine,
//! plus the diagnosis matcher.
//!
//! ## Overview
//!
//! Catalogs are populated once at process start — either from the compiled-in
//! defaults or from a TOML document — and are immutable afterwards. Lookup is
//! O(1) by name. The matcher ranks every diagnosis against a patient's active
//! symptoms and performed tests; see [`matcher`] for the scoring contract.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medsim_catalog::CatalogBundle;
//!
//! let catalog = Arc::new(CatalogBundle::builtin());
//! let ranked = catalog.diagnoses.match_diagnoses(&patient.active_symptoms,
//!     &patient.performed_test_names());
//! ```

pub mod builtin;
pub mod catalogs;
pub mod matcher;

pub use catalogs::{CatalogBundle, DiagnosisCatalog, MedicationCatalog};
