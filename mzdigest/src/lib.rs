#![doc = include_str!("../README.md")]

pub mod csv;
pub mod error;
pub mod fasta;
pub mod sequence;
pub mod table;

/// The types and functions that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::error::DigestError;
    pub use crate::fasta::FastaRecord;
    pub use crate::sequence::{
        AminoAcid, CleavageRule, CleavageSites, MissedCleavages, Protease, digest,
        known_proteases, trypsin_digest,
    };
    pub use crate::table::{
        PeptideRow, PeptideTable, TableSettings, build_table, digest_records, save_peptide_list,
    };
}
