use std::sync::LazyLock;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::sequence::AminoAcid;

/// A rule deciding if a protease cuts between two neighbouring residues. Any closure taking the
/// residue before and the residue after the potential cut site is a rule as well.
///
/// ```rust
/// # use mzdigest::sequence::{AminoAcid, CleavageRule};
/// let after_histidine = |residue: AminoAcid, _next: AminoAcid| residue == AminoAcid::Histidine;
/// assert!(after_histidine.cleaves(AminoAcid::Histidine, AminoAcid::Proline));
/// ```
pub trait CleavageRule {
    /// Check if the bond between `residue` and `next` is cut
    fn cleaves(&self, residue: AminoAcid, next: AminoAcid) -> bool;
}

impl<F: Fn(AminoAcid, AminoAcid) -> bool> CleavageRule for F {
    fn cleaves(&self, residue: AminoAcid, next: AminoAcid) -> bool {
        self(residue, next)
    }
}

/// A protease defined by the residues it accepts on either side of the cut site. A cut is made
/// between two residues if the n terminal residue is contained in `before` and the c terminal
/// residue is contained in `after`.
///
/// ```rust
/// # use mzdigest::sequence::{AminoAcid, CleavageRule, known_proteases};
/// let trypsin = &known_proteases::TRYPSIN;
/// assert!(trypsin.cleaves(AminoAcid::Lysine, AminoAcid::Alanine));
/// assert!(!trypsin.cleaves(AminoAcid::Lysine, AminoAcid::Proline));
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Protease {
    /// The amino acids n terminal of the cut site.
    pub before: Vec<AminoAcid>,
    /// The amino acids c terminal of the cut site.
    pub after: Vec<AminoAcid>,
}

impl Protease {
    /// Define a protease that cuts between any of the specified options before the site and any of the specified options after the site.
    pub const fn between_options(before: Vec<AminoAcid>, after: Vec<AminoAcid>) -> Self {
        Self { before, after }
    }

    /// Define a protease that cuts on the c terminal side of the provided amino acids.
    pub fn c_terminal_of(residues: Vec<AminoAcid>) -> Self {
        Self {
            before: residues,
            after: AminoAcid::ALL_AMINO_ACIDS.to_vec(),
        }
    }

    /// Helper function to get a list of all amino acids except the ones given
    pub fn get_exclusive(exclude: &[AminoAcid]) -> Vec<AminoAcid> {
        AminoAcid::ALL_AMINO_ACIDS
            .iter()
            .copied()
            .filter(|aa| !exclude.contains(aa))
            .collect_vec()
    }
}

impl CleavageRule for Protease {
    fn cleaves(&self, residue: AminoAcid, next: AminoAcid) -> bool {
        self.before.contains(&residue) && self.after.contains(&next)
    }
}

/// Well known proteases
pub mod known_proteases {
    use super::*;

    /// `Trypsin` cuts after Lysine (K) or Arginine (R), unless followed by Proline (P)
    pub static TRYPSIN: LazyLock<Protease> = LazyLock::new(|| {
        Protease::between_options(
            vec![AminoAcid::Lysine, AminoAcid::Arginine],
            Protease::get_exclusive(&[AminoAcid::Proline]),
        )
    });
}
