//! # medsim-store
//!
//! Storage backends for the MedSim engine. The only backend today is
//! [`InMemoryPatientStore`], which serves patient templates and archives
//! completed-case snapshots behind a `Mutex`; anything that implements
//! `medsim_core::PatientStore` can replace it.

pub mod memory;
pub mod samples;

pub use memory::InMemoryPatientStore;
