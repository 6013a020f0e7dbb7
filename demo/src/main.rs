//! MedSim Clinical Simulation Engine — Demo CLI
//!
//! Drives one scripted case against real MedSim components (catalogs, effect
//! functions, test simulator, orchestrator) wired to the in-memory sample
//! store.
//!
//! Usage:
//!   cargo run -p demo -- run-case
//!   cargo run -p demo -- run-case --template P002 --seed 42
//!   cargo run -p demo -- match-demo
//!   cargo run -p demo -- catalog

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medsim_catalog::CatalogBundle;
use medsim_contracts::error::MedsimResult;
use medsim_contracts::intervention::{InterventionKind, InterventionOutcome};
use medsim_contracts::patient::Patient;
use medsim_core::{CaseOrchestrator, PatientStore};
use medsim_store::InMemoryPatientStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MedSim — clinical state and diagnosis engine demo.
///
/// Each subcommand exercises one slice of the engine against the built-in
/// catalogs and sample patients.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MedSim clinical simulation engine demo",
    long_about = "Runs a scripted clinical case end to end: start from a sample\n\
                  template, perform tests, apply treatments and medications, rank\n\
                  diagnoses, and finalize the case."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scripted case end to end.
    RunCase {
        /// Sample template id to start from.
        #[arg(long, default_value = "P001")]
        template: String,
        /// Fixed seed for a replayable run; omitted means OS entropy.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rank the builtin diagnosis catalog against each sample patient.
    MatchDemo,
    /// Print the builtin diagnosis and medication catalogs.
    Catalog,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunCase { template, seed } => run_case(&template, seed),
        Command::MatchDemo => match_demo(),
        Command::Catalog => print_catalog(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scripted case ─────────────────────────────────────────────────────────────

fn run_case(template_id: &str, seed: Option<u64>) -> MedsimResult<()> {
    let catalog = Arc::new(CatalogBundle::builtin());
    let store = Arc::new(InMemoryPatientStore::with_samples());
    let medications = Arc::new(catalog.medications.clone());

    let mut orchestrator = match seed {
        Some(seed) => {
            CaseOrchestrator::with_seed(medications, Arc::clone(&store) as Arc<dyn PatientStore>, seed)
        }
        None => CaseOrchestrator::from_entropy(medications, Arc::clone(&store) as Arc<dyn PatientStore>),
    };

    let mut patient = orchestrator.start_case_from_template(template_id)?;
    print_patient(&patient);

    // Work the case: examine, test, treat, medicate.
    for (kind, name) in [
        (InterventionKind::Test, "Physical Examination"),
        (InterventionKind::Test, "ECG/EKG"),
        (InterventionKind::Test, "Blood Pressure"),
        (InterventionKind::Treatment, "Oxygen Therapy"),
        (InterventionKind::Medication, "Ibuprofen"),
    ] {
        let outcome = orchestrator.record_intervention(&mut patient, kind, name)?;
        print_outcome(name, &outcome);
    }

    // Rank the catalog against what we now know and finalize the top match.
    let matches = catalog
        .diagnoses
        .match_diagnoses(&patient.active_symptoms, &patient.performed_test_names());
    println!("Differential ({} candidates):", matches.len());
    for m in matches.iter().take(3) {
        println!("  {:>5.1}%  {}", m.confidence * 100.0, m.diagnosis.name);
    }

    if let Some(top) = matches.first() {
        let chosen = top.diagnosis.name.clone();
        let verdict = orchestrator.finalize_diagnosis(&mut patient, &chosen, &matches);
        println!();
        println!(
            "Finalized '{}': {} ({:+} points)",
            chosen,
            if verdict.is_correct { "correct" } else { "incorrect" },
            verdict.score_delta
        );
    } else {
        println!("No diagnosis reached the admission threshold.");
    }

    orchestrator.complete_case(&mut patient)?;
    println!();
    print_patient(&patient);
    println!("Case archived ({} snapshot(s) in store).", store.snapshot_count()?);
    Ok(())
}

// ── Matcher walkthrough ───────────────────────────────────────────────────────

fn match_demo() -> MedsimResult<()> {
    let catalog = CatalogBundle::builtin();
    let store = InMemoryPatientStore::with_samples();

    for id in store.template_ids()? {
        let patient = store.load_template(&id)?;
        let matches = catalog
            .diagnoses
            .match_diagnoses(&patient.active_symptoms, &patient.performed_test_names());

        println!("{} — {} (severity {})", patient.id, patient.name, patient.condition_severity);
        if matches.is_empty() {
            println!("  no candidate above the admission threshold");
        }
        for m in matches.iter().take(3) {
            println!("  {:>5.1}%  {}", m.confidence * 100.0, m.diagnosis.name);
        }
        println!();
    }
    Ok(())
}

// ── Catalog listing ───────────────────────────────────────────────────────────

fn print_catalog() -> MedsimResult<()> {
    let catalog = CatalogBundle::builtin();

    println!("Diagnoses ({}):", catalog.diagnoses.len());
    let mut diagnoses: Vec<_> = catalog.diagnoses.all().collect();
    diagnoses.sort_by(|a, b| a.name.cmp(&b.name));
    for d in diagnoses {
        println!("  [{:>2}] {} — {}", d.severity, d.name, d.description);
    }

    println!();
    println!("Medications ({}):", catalog.medications.len());
    let mut medications: Vec<_> = catalog.medications.all().collect();
    medications.sort_by(|a, b| a.name.cmp(&b.name));
    for m in medications {
        println!(
            "  {} ({}) — default {} {}",
            m.name,
            m.category,
            m.default_dosage().unwrap_or("n/a"),
            m.default_route().unwrap_or("n/a"),
        );
    }
    Ok(())
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn print_patient(patient: &Patient) {
    println!(
        "{} — {} ({}, {}), severity {}/10{}{}",
        patient.id,
        patient.name,
        patient.age,
        patient.gender,
        patient.condition_severity,
        if patient.is_critical() { " [CRITICAL]" } else { "" },
        if patient.completed { " [COMPLETED]" } else { "" },
    );
    let v = &patient.vital_signs;
    println!(
        "  vitals: {} BPM, {}, {:.1}°C, {} breaths/min, SpO2 {}%",
        v.pulse,
        v.formatted_bp(),
        v.temperature,
        v.respiratory_rate,
        v.oxygen_saturation
    );
    let symptoms: Vec<&str> = patient.active_symptoms.iter().map(String::as_str).collect();
    println!("  symptoms: {}", if symptoms.is_empty() { "none".to_string() } else { symptoms.join(", ") });
    if let Some(diagnosis) = &patient.diagnosis {
        println!("  diagnosis: {diagnosis}");
    }
    println!();
}

fn print_outcome(name: &str, outcome: &InterventionOutcome) {
    match outcome {
        InterventionOutcome::Treatment(t) => {
            println!("> {}", t.message);
            for effect in &t.effects {
                println!("    - {effect}");
            }
            for (vital, change) in &t.vital_changes {
                println!("    - {vital}: {change}");
            }
        }
        InterventionOutcome::Test(report) => {
            println!("> {} — {}", name, report.interpretation);
            for rec in &report.recommendations {
                println!("    - {rec}");
            }
        }
        InterventionOutcome::Medication(m) => {
            println!(
                "> {} (effectiveness {:.0}%)",
                m.response_text.lines().next().unwrap_or_default(),
                m.effectiveness * 100.0
            );
            for se in &m.side_effects {
                println!("    - side effect: {} ({})", se.name, se.severity);
            }
        }
    }
    println!();
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("MedSim — Clinical State & Diagnosis Engine");
    println!("==========================================");
    println!();
    println!("Engine flow per case:");
    println!("  [1] Start from a patient template (fresh case id, empty logs)");
    println!("  [2] Tests read state and build the diagnostic picture");
    println!("  [3] Treatments and medications move vitals through bounded updates");
    println!("  [4] The matcher ranks the diagnosis catalog by weighted evidence");
    println!("  [5] Finalizing scores the call and archives the snapshot");
    println!();
}
