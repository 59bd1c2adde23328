//! medbot-seed: extend a doctor dataset with synthetic hospitals.
//!
//! Usage: `medbot-seed [INPUT] [OUTPUT]`, defaulting to
//! `data/hospital_doctors.csv` and `data/hospital_doctors_extended.csv`.
//! The output holds every input row followed by the generated ones.

use std::fs::File;
use std::io::BufWriter;

use medbot_core::record::{read_csv_path, write_csv};
use medbot_core::synthetic::{EXTRA_HOSPITALS, synthetic_records};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_INPUT: &str = "data/hospital_doctors.csv";
const DEFAULT_OUTPUT: &str = "data/hospital_doctors_extended.csv";

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| DEFAULT_INPUT.into());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.into());

    let mut records = read_csv_path(&input).expect("Failed to read input dataset");
    let base = records.len();
    let extra = synthetic_records(&records, EXTRA_HOSPITALS.iter().copied());
    records.extend(extra);

    let file = File::create(&output).expect("Failed to create output dataset");
    write_csv(BufWriter::new(file), &records).expect("Failed to write output dataset");

    tracing::info!(
        input = %input,
        output = %output,
        base,
        generated = records.len() - base,
        "Extended dataset written"
    );
}
