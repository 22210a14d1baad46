//! The [`DigestError`] which makes it easy for downstream users of the error type to match on the exact error.

use context_error::ErrorKind;

/// The kind of error that can occur when turning a protein database into a peptide table
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DigestError {
    /// The sequence file could not be read or is not a valid FASTA file
    #[default]
    InvalidSequenceFile,
    /// The number of missed cleavages is not one of the supported values (0, 1, or 2)
    UnsupportedBudget,
    /// No peptides are left after digestion and length filtering
    EmptyResultSet,
    /// The settings are inconsistent, for example an empty set of charge states
    InvalidConfiguration,
    /// An output file could not be created, written, or moved into place
    OutputNotWritable,
}

impl ErrorKind for DigestError {
    type Settings = ();
    fn descriptor(&self) -> &'static str {
        "error"
    }
    fn ignored(&self, _settings: Self::Settings) -> bool {
        false
    }
    fn is_error(&self, _settings: Self::Settings) -> bool {
        true
    }
}

impl std::fmt::Display for DigestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::InvalidSequenceFile => "InvalidSequenceFile",
                Self::UnsupportedBudget => "UnsupportedBudget",
                Self::EmptyResultSet => "EmptyResultSet",
                Self::InvalidConfiguration => "InvalidConfiguration",
                Self::OutputNotWritable => "OutputNotWritable",
            }
        )
    }
}
