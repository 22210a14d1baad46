//! Convert a FASTA protein database into a Prosit compatible peptide CSV file

use std::path::PathBuf;

use clap::Parser;
use context_error::{BoxedError, FullErrorContent};
use mzdigest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// The command line interface arguments
#[derive(Debug, Parser)]
#[command(about = "Convert a FASTA file to a Prosit compatible CSV file")]
struct Cli {
    /// The input FASTA file
    #[arg(long, visible_alias = "ff", default_value = "test_file.fasta")]
    fasta_file: PathBuf,
    /// The collision energy in keV, normally between 10 and 50
    #[arg(long, visible_alias = "ce", default_value_t = 28, allow_negative_numbers = true)]
    collision_energy: i32,
    /// The charge states from which one is randomly selected for every peptide
    #[arg(
        long,
        visible_alias = "cs",
        value_delimiter = ',',
        default_value = "2",
        allow_negative_numbers = true
    )]
    charge_states: Vec<i32>,
    /// The maximal number of missed cleavages (0, 1, or 2)
    #[arg(long, default_value_t = MissedCleavages::Two, value_parser = parse_missed_cleavages)]
    missed_cleavages: MissedCleavages,
    /// The minimal peptide length
    #[arg(long, default_value_t = 7)]
    min_length: usize,
    /// The maximal peptide length
    #[arg(long, default_value_t = 30)]
    max_length: usize,
    /// The output path for the resulting CSV file
    #[arg(short, long, default_value = "peptides.csv")]
    out_path: PathBuf,
    /// Also write all digested peptides (before deduplication and filtering) to this file, one per line
    #[arg(long)]
    peptide_list: Option<PathBuf>,
    /// The prefix for every line in the peptide list
    #[arg(long, default_value = "")]
    peptide_prefix: String,
    /// The seed for the charge state sampling, for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// Show the progress for every protein
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Cli::parse();
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match run(&args) {
        Ok(table) => {
            println!(
                "Wrote {} peptides to {}",
                table.len(),
                args.out_path.display()
            );
        }
        Err(error) => {
            eprintln!("{}: {error}", error.get_kind());
            std::process::exit(1);
        }
    }
}

fn parse_missed_cleavages(value: &str) -> Result<MissedCleavages, String> {
    value.parse().map_err(|error: BoxedError<'static, DigestError>| error.to_string())
}

fn run(args: &Cli) -> Result<PeptideTable, BoxedError<'static, DigestError>> {
    let settings = TableSettings {
        missed_cleavages: args.missed_cleavages,
        min_length: args.min_length,
        max_length: args.max_length,
        collision_energy: args.collision_energy,
        charge_states: args.charge_states.clone(),
    };
    settings.validate()?;

    let records = FastaRecord::parse_file(&args.fasta_file)?;
    info!(
        "Read {} proteins from {}",
        records.len(),
        args.fasta_file.display()
    );

    let peptides = digest_records(&records, settings.missed_cleavages);
    if let Some(path) = &args.peptide_list {
        save_peptide_list(path, &peptides, &args.peptide_prefix)?;
        info!("Wrote {} peptides to {}", peptides.len(), path.display());
    }

    let mut rng = args
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let table = PeptideTable::from_peptides(peptides, &settings, &mut rng)?;
    table.save(&args.out_path)?;
    for (peptide, row) in table.iter().take(10) {
        debug!(
            "{peptide},{},{}",
            row.collision_energy, row.precursor_charge
        );
    }
    Ok(table)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::Path;

    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let path =
                std::env::temp_dir().join(format!("fasta-to-prosit-{name}-{}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self(path)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.0).unwrap();
        }
    }

    fn cli(fasta: &Path, out: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "fasta-to-prosit".to_string(),
            "--ff".to_string(),
            fasta.display().to_string(),
            "-o".to_string(),
            out.display().to_string(),
            "--seed".to_string(),
            "42".to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn arguments() {
        let args = Cli::try_parse_from([
            "fasta-to-prosit",
            "--ce",
            "30",
            "--cs",
            "2,3",
            "--missed-cleavages",
            "1",
        ])
        .unwrap();
        assert_eq!(args.fasta_file, PathBuf::from("test_file.fasta"));
        assert_eq!(args.collision_energy, 30);
        assert_eq!(args.charge_states, vec![2, 3]);
        assert_eq!(args.missed_cleavages, MissedCleavages::One);
        assert_eq!(args.out_path, PathBuf::from("peptides.csv"));
        assert!(Cli::try_parse_from(["fasta-to-prosit", "--missed-cleavages", "3"]).is_err());
    }

    #[test]
    fn successful_run() {
        let directory = TempDir::new("success");
        let fasta = directory.0.join("proteins.fasta");
        let out = directory.0.join("peptides.csv");
        std::fs::write(
            &fasta,
            ">sp|P1|EXAMPLE\nMKWVTFISLLLLFSSAYSRGVFRRDTHKSEIAHRFKDLGEEHFK*\n",
        )
        .unwrap();

        let table = run(&cli(&fasta, &out, &["--cs", "3"])).unwrap();
        let csv = std::fs::read_to_string(&out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("modified_sequence,collision_energy,precursor_charge")
        );
        assert_eq!(lines.count(), table.len());
        assert_eq!(
            table.get("WVTFISLLLLFSSAYSR").map(|row| row.precursor_charge),
            Some(3)
        );
    }

    #[test]
    fn failed_runs_leave_no_output() {
        let directory = TempDir::new("failure");
        let fasta = directory.0.join("proteins.fasta");
        let out = directory.0.join("peptides.csv");
        std::fs::write(&fasta, ">sp|P1|EXAMPLE\nMKWVTFISLLLLFSSAYSRGVFR\n").unwrap();

        // Settings are checked before the input is read
        let error = run(&cli(
            &directory.0.join("missing.fasta"),
            &out,
            &["--min-length", "20", "--max-length", "10"],
        ))
        .unwrap_err();
        assert_eq!(error.get_kind(), DigestError::InvalidConfiguration);
        assert!(!out.exists());

        let error = run(&cli(&fasta, &out, &["--min-length", "25"])).unwrap_err();
        assert_eq!(error.get_kind(), DigestError::EmptyResultSet);
        assert!(!out.exists());

        let error = run(&cli(&directory.0.join("missing.fasta"), &out, &[])).unwrap_err();
        assert_eq!(error.get_kind(), DigestError::InvalidSequenceFile);
        assert!(!out.exists());
    }
}
