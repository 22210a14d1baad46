use std::{ops::Range, str::FromStr};

use context_error::{BoxedError, Context, CreateError};
use serde::{Deserialize, Serialize};

use crate::{
    error::DigestError,
    sequence::{AminoAcid, CleavageRule, known_proteases},
};

/// The maximal number of internal cleavage sites that can be skipped when forming a peptide.
/// Only zero, one, and two missed cleavages are supported.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum MissedCleavages {
    /// Only fully cleaved peptides
    Zero,
    /// Peptides spanning up to two segments
    One,
    /// Peptides spanning up to three segments
    #[default]
    Two,
}

impl MissedCleavages {
    /// The number of cleavage sites that may be missed
    pub const fn count(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl std::fmt::Display for MissedCleavages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

impl TryFrom<usize> for MissedCleavages {
    type Error = BoxedError<'static, DigestError>;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            n => Err(BoxedError::new(
                DigestError::UnsupportedBudget,
                "Unsupported number of missed cleavages",
                format!("Only 0, 1, or 2 missed cleavages are supported, but {n} was requested"),
                Context::none(),
            )),
        }
    }
}

impl FromStr for MissedCleavages {
    type Err = BoxedError<'static, DigestError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| {
                BoxedError::new(
                    DigestError::UnsupportedBudget,
                    "Unsupported number of missed cleavages",
                    "The number of missed cleavages should be 0, 1, or 2",
                    Context::line(None, s, 0, s.len()).to_owned(),
                )
            })
            .and_then(Self::try_from)
    }
}

/// The ordered offsets in a sequence where a protease cuts. This always starts at 0 and ends at
/// the length of the sequence, so a sequence without any internal site has the sites `[0, len]`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CleavageSites(Vec<usize>);

impl CleavageSites {
    /// Find all cut sites of the given rule in the sequence. A site `i + 1` is recorded for every
    /// position `i` where the rule cleaves between residue `i` and residue `i + 1`.
    pub fn find(sequence: &[AminoAcid], rule: &impl CleavageRule) -> Self {
        let mut sites = vec![0];
        sites.extend(
            sequence
                .windows(2)
                .enumerate()
                .filter_map(|(index, pair)| rule.cleaves(pair[0], pair[1]).then_some(index + 1)),
        );
        if sites.last() != Some(&sequence.len()) {
            sites.push(sequence.len());
        }
        Self(sites)
    }

    /// All sites, including the 0 and length sentinels
    pub fn sites(&self) -> &[usize] {
        &self.0
    }

    /// The number of segments between consecutive sites
    pub fn segments(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The number of internal cleavage sites, so excluding the sentinels
    pub fn internal(&self) -> usize {
        self.0.len().saturating_sub(2)
    }

    /// The windows for every start site that has room for all `missed_cleavages + 1` widths.
    /// These start at sites `0..segments - missed_cleavages`.
    fn full_windows(
        &self,
        missed_cleavages: MissedCleavages,
    ) -> impl Iterator<Item = Range<usize>> + '_ {
        let widths = missed_cleavages.count() + 1;
        let starts = self.segments().saturating_sub(missed_cleavages.count());
        (0..starts).flat_map(move |start| {
            (1..=widths).map(move |width| self.0[start]..self.0[start + width])
        })
    }

    /// The windows for the last start sites near the C terminus, where fewer than
    /// `missed_cleavages + 1` segments remain. Every remaining width is emitted so the
    /// C terminal peptides are neither dropped nor duplicated.
    fn tail_windows(
        &self,
        missed_cleavages: MissedCleavages,
    ) -> impl Iterator<Item = Range<usize>> + '_ {
        let segments = self.segments();
        let first = segments.saturating_sub(missed_cleavages.count());
        (first..segments).flat_map(move |start| {
            (1..=segments - start).map(move |width| self.0[start]..self.0[start + width])
        })
    }
}

/// Digest a protein with the given rule, returning every peptide with at most the given number
/// of missed cleavages. The peptides are ordered by start site and then by length, and are not
/// deduplicated. A sequence without internal cleavage sites is returned whole, an empty sequence
/// results in no peptides.
///
/// ```rust
/// # use mzdigest::sequence::{AminoAcid, MissedCleavages, digest, known_proteases};
/// let protein = AminoAcid::parse_sequence("AAAKPAAAKAAAR").unwrap();
/// let peptides = digest(&protein, &*known_proteases::TRYPSIN, MissedCleavages::Zero);
/// assert_eq!(peptides.len(), 2);
/// assert_eq!(AminoAcid::sequence_to_string(peptides[0]), "AAAKPAAAK");
/// assert_eq!(AminoAcid::sequence_to_string(peptides[1]), "AAAR");
/// ```
pub fn digest<'a>(
    sequence: &'a [AminoAcid],
    rule: &impl CleavageRule,
    missed_cleavages: MissedCleavages,
) -> Vec<&'a [AminoAcid]> {
    if sequence.is_empty() {
        return Vec::new();
    }
    let sites = CleavageSites::find(sequence, rule);
    if sites.internal() == 0 {
        return vec![sequence];
    }
    sites
        .full_windows(missed_cleavages)
        .chain(sites.tail_windows(missed_cleavages))
        .map(|range| &sequence[range])
        .collect()
}

/// Digest a protein given as one letter codes with trypsin.
/// # Errors
/// * [`DigestError::UnsupportedBudget`] if the number of missed cleavages is not 0, 1, or 2.
/// * [`DigestError::InvalidSequenceFile`] if the sequence contains a character that is not an amino acid.
pub fn trypsin_digest(
    sequence: &str,
    missed_cleavages: usize,
) -> Result<Vec<String>, BoxedError<'static, DigestError>> {
    let missed_cleavages = MissedCleavages::try_from(missed_cleavages)?;
    let protein = AminoAcid::parse_sequence(sequence).map_err(|index| {
        BoxedError::new(
            DigestError::InvalidSequenceFile,
            "Invalid protein sequence",
            "Character is not an amino acid",
            Context::line(None, sequence, index, 1).to_owned(),
        )
    })?;
    Ok(digest(&protein, &*known_proteases::TRYPSIN, missed_cleavages)
        .into_iter()
        .map(AminoAcid::sequence_to_string)
        .collect())
}
