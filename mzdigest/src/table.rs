//! Build the table of unique peptides with their spectrum prediction settings.

use std::{io::Write, ops::RangeInclusive, path::Path};

use context_error::{BoxedError, Context, CreateError};
use indexmap::{IndexMap, IndexSet};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    csv::{write_csv, write_file},
    error::DigestError,
    fasta::FastaRecord,
    sequence::{AminoAcid, MissedCleavages, digest, known_proteases},
};

/// The collision energies that are sensible for most instruments
pub const RECOMMENDED_COLLISION_ENERGY: RangeInclusive<i32> = 10..=50;

/// The settings for digesting a protein database and annotating the resulting peptides
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TableSettings {
    /// The maximal number of missed cleavages
    pub missed_cleavages: MissedCleavages,
    /// The minimal peptide length (inclusive)
    pub min_length: usize,
    /// The maximal peptide length (inclusive)
    pub max_length: usize,
    /// The collision energy assigned to every peptide (keV)
    pub collision_energy: i32,
    /// The charge states to pick from for each peptide
    pub charge_states: Vec<i32>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            missed_cleavages: MissedCleavages::Two,
            min_length: 7,
            max_length: 30,
            collision_energy: 28,
            charge_states: vec![2],
        }
    }
}

impl TableSettings {
    /// Check the settings for consistency. A collision energy outside of the recommended range
    /// is only reported as a warning.
    /// # Errors
    /// A [`DigestError::InvalidConfiguration`] error if the charge states are empty or not all
    /// positive, the length range is empty or starts at zero, or the collision energy is negative.
    pub fn validate(&self) -> Result<(), BoxedError<'static, DigestError>> {
        let invalid = |short: &'static str, long: String| {
            Err(BoxedError::new(
                DigestError::InvalidConfiguration,
                short,
                long,
                Context::none(),
            ))
        };
        if self.charge_states.is_empty() {
            return invalid(
                "No charge states",
                "At least one charge state has to be given to sample from".to_string(),
            );
        }
        if let Some(charge) = self.charge_states.iter().find(|c| **c <= 0) {
            return invalid(
                "Invalid charge state",
                format!("Charge states have to be positive, but {charge} was given"),
            );
        }
        if self.min_length == 0 {
            return invalid(
                "Invalid minimal length",
                "The minimal peptide length has to be at least 1".to_string(),
            );
        }
        if self.min_length > self.max_length {
            return invalid(
                "Invalid length range",
                format!(
                    "The minimal peptide length ({}) is bigger than the maximal peptide length ({})",
                    self.min_length, self.max_length
                ),
            );
        }
        if self.collision_energy < 0 {
            return invalid(
                "Invalid collision energy",
                format!(
                    "The collision energy cannot be negative, but {} was given",
                    self.collision_energy
                ),
            );
        }
        if !RECOMMENDED_COLLISION_ENERGY.contains(&self.collision_energy) {
            warn!(
                "The collision energy {} is outside of the recommended range of {} to {} keV",
                self.collision_energy,
                RECOMMENDED_COLLISION_ENERGY.start(),
                RECOMMENDED_COLLISION_ENERGY.end()
            );
        }
        Ok(())
    }

    /// The inclusive range of allowed peptide lengths
    pub const fn length_range(&self) -> RangeInclusive<usize> {
        self.min_length..=self.max_length
    }
}

/// The annotation of a single peptide in the table
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PeptideRow {
    /// The collision energy (keV)
    pub collision_energy: i32,
    /// The precursor charge
    pub precursor_charge: i32,
}

/// A table of unique peptides, in order of first occurrence in the database
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PeptideTable {
    rows: IndexMap<String, PeptideRow>,
}

impl PeptideTable {
    /// The column names as expected by Prosit
    pub const HEADER: [&'static str; 3] =
        ["modified_sequence", "collision_energy", "precursor_charge"];

    /// Deduplicate the peptides, keep only the ones with a length in the settings' range, and
    /// annotate them with the collision energy and a charge state sampled uniformly from the
    /// settings' charge states.
    /// # Errors
    /// * [`DigestError::InvalidConfiguration`] if the settings are invalid.
    /// * [`DigestError::EmptyResultSet`] if no peptides are left after filtering.
    pub fn from_peptides<R: Rng + ?Sized>(
        peptides: impl IntoIterator<Item = String>,
        settings: &TableSettings,
        rng: &mut R,
    ) -> Result<Self, BoxedError<'static, DigestError>> {
        settings.validate()?;
        Self::annotate(peptides, settings, rng)
    }

    /// Build the table from settings that are already validated
    fn annotate<R: Rng + ?Sized>(
        peptides: impl IntoIterator<Item = String>,
        settings: &TableSettings,
        rng: &mut R,
    ) -> Result<Self, BoxedError<'static, DigestError>> {
        let unique: IndexSet<String> = peptides.into_iter().collect();
        let unique_count = unique.len();
        let length_range = settings.length_range();
        let mut rows = IndexMap::with_capacity(unique_count);
        for peptide in unique
            .into_iter()
            .filter(|p| length_range.contains(&p.len()))
        {
            let precursor_charge = *settings.charge_states.choose(rng).ok_or_else(|| {
                BoxedError::new(
                    DigestError::InvalidConfiguration,
                    "No charge states",
                    "At least one charge state has to be given to sample from",
                    Context::none(),
                )
            })?;
            rows.insert(
                peptide,
                PeptideRow {
                    collision_energy: settings.collision_energy,
                    precursor_charge,
                },
            );
        }
        info!(
            "{unique_count} unique peptides, {} with a length between {} and {}",
            rows.len(),
            settings.min_length,
            settings.max_length
        );
        if rows.is_empty() {
            return Err(BoxedError::new(
                DigestError::EmptyResultSet,
                "No peptides left",
                format!(
                    "None of the {unique_count} unique peptides has a length between {} and {}, check the length bounds",
                    settings.min_length, settings.max_length
                ),
                Context::none(),
            ));
        }
        Ok(Self { rows })
    }

    /// The number of peptides
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no peptides
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the annotation for a peptide
    pub fn get(&self, peptide: &str) -> Option<&PeptideRow> {
        self.rows.get(peptide)
    }

    /// Iterate over all peptides with their annotation
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &PeptideRow)> + '_ {
        self.rows.iter().map(|(p, r)| (p.as_str(), r))
    }

    /// Write the table as CSV, with the peptide as first column
    /// # Errors
    /// If the `Write` implementation errors.
    pub fn write_csv(&self, writer: impl Write) -> Result<(), std::io::Error> {
        write_csv(
            writer,
            &Self::HEADER,
            self.rows.iter().map(|(peptide, row)| {
                [
                    peptide.clone(),
                    row.collision_energy.to_string(),
                    row.precursor_charge.to_string(),
                ]
            }),
            ',',
        )
    }

    /// Save the table as a CSV file, the file is only created when all writing succeeds
    /// # Errors
    /// A [`DigestError::OutputNotWritable`] error if the file could not be written.
    pub fn save(&self, path: &Path) -> Result<(), BoxedError<'static, DigestError>> {
        write_file(path, |writer| self.write_csv(writer))
    }
}

/// Digest all records with trypsin and collect all peptides in one list, in order of the records.
/// The peptides are not deduplicated nor filtered on length.
pub fn digest_records(records: &[FastaRecord], missed_cleavages: MissedCleavages) -> Vec<String> {
    let mut peptides = Vec::new();
    for record in records {
        if record.sequence().is_empty() {
            warn!("Protein {} has an empty sequence", record.accession());
            continue;
        }
        let before = peptides.len();
        peptides.extend(
            digest(
                record.sequence(),
                &*known_proteases::TRYPSIN,
                missed_cleavages,
            )
            .into_iter()
            .map(AminoAcid::sequence_to_string),
        );
        debug!(
            "Digested {} ({} residues) into {} peptides",
            record.accession(),
            record.sequence().len(),
            peptides.len() - before
        );
    }
    info!(
        "Digested {} proteins into {} peptides with up to {missed_cleavages} missed cleavages",
        records.len(),
        peptides.len()
    );
    peptides
}

/// Write a list of peptides, one per line with the given prefix, the file is only created when all writing succeeds
/// # Errors
/// A [`DigestError::OutputNotWritable`] error if the file could not be written.
pub fn save_peptide_list(
    path: &Path,
    peptides: &[String],
    prefix: &str,
) -> Result<(), BoxedError<'static, DigestError>> {
    write_file(path, |writer| {
        for peptide in peptides {
            writeln!(writer, "{prefix}{peptide}")?;
        }
        Ok(())
    })
}

/// Digest all records and build the annotated table of unique peptides.
/// # Errors
/// * [`DigestError::InvalidConfiguration`] if the settings are invalid.
/// * [`DigestError::EmptyResultSet`] if no peptides are left after filtering.
pub fn build_table<R: Rng + ?Sized>(
    records: &[FastaRecord],
    settings: &TableSettings,
    rng: &mut R,
) -> Result<PeptideTable, BoxedError<'static, DigestError>> {
    settings.validate()?;
    PeptideTable::annotate(
        digest_records(records, settings.missed_cleavages),
        settings,
        rng,
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use context_error::FullErrorContent;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn record(label: &str, sequence: &str) -> FastaRecord {
        FastaRecord::new(label, AminoAcid::parse_sequence(sequence).unwrap())
    }

    fn peptides(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn invalid_settings() {
        let cases = [
            TableSettings {
                charge_states: Vec::new(),
                ..TableSettings::default()
            },
            TableSettings {
                charge_states: vec![2, 0],
                ..TableSettings::default()
            },
            TableSettings {
                min_length: 31,
                ..TableSettings::default()
            },
            TableSettings {
                min_length: 0,
                ..TableSettings::default()
            },
            TableSettings {
                collision_energy: -1,
                ..TableSettings::default()
            },
        ];
        for settings in cases {
            let error = settings.validate().unwrap_err();
            assert_eq!(
                error.get_kind(),
                DigestError::InvalidConfiguration,
                "{settings:?}"
            );
        }
        assert!(TableSettings::default().validate().is_ok());
        assert!(
            TableSettings {
                collision_energy: 70,
                ..TableSettings::default()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn empty_charge_states_before_digestion() {
        let settings = TableSettings {
            charge_states: Vec::new(),
            ..TableSettings::default()
        };
        let error = build_table(
            &[record("A", "PEPTIDEKPEPTIDER")],
            &settings,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert_eq!(error.get_kind(), DigestError::InvalidConfiguration);
    }

    #[test]
    fn length_filter_bounds() {
        let settings = TableSettings {
            min_length: 7,
            max_length: 10,
            ..TableSettings::default()
        };
        let table = PeptideTable::from_peptides(
            peptides(&["AAAAAA", "AAAAAAA", "AAAAAAAAAA", "AAAAAAAAAAA"]),
            &settings,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("AAAAAAA").is_some());
        assert!(table.get("AAAAAAAAAA").is_some());
        assert!(table.get("AAAAAA").is_none());
        assert!(table.get("AAAAAAAAAAA").is_none());
    }

    #[test]
    fn deduplicated_in_order() {
        let table = PeptideTable::from_peptides(
            peptides(&["PEPTIDEK", "MKWVTFISLLK", "PEPTIDEK", "AAAAAAAR"]),
            &TableSettings::default(),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(
            table.iter().map(|(p, _)| p).collect::<Vec<_>>(),
            vec!["PEPTIDEK", "MKWVTFISLLK", "AAAAAAAR"]
        );
        for (_, row) in table.iter() {
            assert_eq!(
                *row,
                PeptideRow {
                    collision_energy: 28,
                    precursor_charge: 2
                }
            );
        }
    }

    #[test]
    fn empty_result() {
        // Only peptides of length 3 and 50
        let long = "A".repeat(50);
        let error = build_table(
            &[record("A", &format!("AAK{long}"))],
            &TableSettings {
                missed_cleavages: MissedCleavages::Zero,
                ..TableSettings::default()
            },
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert_eq!(error.get_kind(), DigestError::EmptyResultSet);
    }

    #[test]
    fn charge_sampling() {
        let settings = TableSettings {
            min_length: 1,
            charge_states: vec![1, 2, 3],
            ..TableSettings::default()
        };
        let list = (1..=30).map(|n| "A".repeat(n)).collect::<Vec<_>>();
        let first =
            PeptideTable::from_peptides(list.clone(), &settings, &mut StdRng::seed_from_u64(42))
                .unwrap();
        let second =
            PeptideTable::from_peptides(list, &settings, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second, "Same seed should give the same table");
        assert!(
            first
                .iter()
                .all(|(_, row)| settings.charge_states.contains(&row.precursor_charge))
        );
        for charge in &settings.charge_states {
            assert!(
                first.iter().any(|(_, row)| row.precursor_charge == *charge),
                "Charge {charge} never sampled in 30 draws"
            );
        }
    }

    #[test]
    fn csv_output() {
        let table = build_table(
            &[
                record("sp|P1|ONE", "AAAKPAAAKAAAR"),
                record("sp|P2|TWO", "AAAKPAAAKGGGGGGGR"),
            ],
            &TableSettings {
                missed_cleavages: MissedCleavages::Zero,
                min_length: 4,
                ..TableSettings::default()
            },
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "modified_sequence,collision_energy,precursor_charge\nAAAKPAAAK,28,2\nAAAR,28,2\nGGGGGGGR,28,2\n"
        );
    }

    #[test]
    fn raw_peptides_keep_duplicates() {
        let list = digest_records(
            &[
                record("A", "AAAKPAAAKAAAR"),
                record("B", ""),
                record("C", "AAAKPAAAKAAAR"),
            ],
            MissedCleavages::Zero,
        );
        assert_eq!(list, peptides(&["AAAKPAAAK", "AAAR", "AAAKPAAAK", "AAAR"]));
    }
}
