use serde::{Deserialize, Serialize};

/// An amino acid, alongside the standard ones some [ambiguous (B/J/Z/X) and non-standard (U/O)](https://www.insdc.org/submitting-standards/feature-table/#7.4.3) are included.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
pub enum AminoAcid {
    /// Ala, A
    #[default]
    Alanine = 0,
    /// Arg, R
    Arginine,
    /// Asn, N
    Asparagine,
    /// Asp, D
    AsparticAcid,
    /// Cys, C
    Cysteine,
    /// Gln, Q
    Glutamine,
    /// Glu, E
    GlutamicAcid,
    /// Gly, G
    Glycine,
    /// His, H
    Histidine,
    /// Ile, I
    Isoleucine,
    /// Leu, L
    Leucine,
    /// Lys, K
    Lysine,
    /// Met, M
    Methionine,
    /// Phe, F
    Phenylalanine,
    /// Pro, P
    Proline,
    /// Ser, S
    Serine,
    /// Thr, T
    Threonine,
    /// Trp, W
    Tryptophan,
    /// Tyr, Y
    Tyrosine,
    /// Val, V
    Valine,
    /// Asx, B
    AmbiguousAsparagine,
    /// Xle, J
    AmbiguousLeucine,
    /// Glx, Z
    AmbiguousGlutamine,
    /// Sec, U
    Selenocysteine,
    /// Pyl, O
    Pyrrolysine,
    /// Xxx, X
    Unknown,
}

impl AminoAcid {
    /// All amino acids, in declaration order
    pub const ALL_AMINO_ACIDS: &'static [Self] = &[
        Self::Alanine,
        Self::Arginine,
        Self::Asparagine,
        Self::AsparticAcid,
        Self::Cysteine,
        Self::Glutamine,
        Self::GlutamicAcid,
        Self::Glycine,
        Self::Histidine,
        Self::Isoleucine,
        Self::Leucine,
        Self::Lysine,
        Self::Methionine,
        Self::Phenylalanine,
        Self::Proline,
        Self::Serine,
        Self::Threonine,
        Self::Tryptophan,
        Self::Tyrosine,
        Self::Valine,
        Self::AmbiguousAsparagine,
        Self::AmbiguousLeucine,
        Self::AmbiguousGlutamine,
        Self::Selenocysteine,
        Self::Pyrrolysine,
        Self::Unknown,
    ];

    /// The uppercase one letter code
    pub const fn one_letter_code(self) -> char {
        match self {
            Self::Alanine => 'A',
            Self::AmbiguousAsparagine => 'B',
            Self::Cysteine => 'C',
            Self::AsparticAcid => 'D',
            Self::GlutamicAcid => 'E',
            Self::Phenylalanine => 'F',
            Self::Glycine => 'G',
            Self::Histidine => 'H',
            Self::Isoleucine => 'I',
            Self::AmbiguousLeucine => 'J',
            Self::Lysine => 'K',
            Self::Leucine => 'L',
            Self::Methionine => 'M',
            Self::Asparagine => 'N',
            Self::Pyrrolysine => 'O',
            Self::Proline => 'P',
            Self::Glutamine => 'Q',
            Self::Arginine => 'R',
            Self::Serine => 'S',
            Self::Threonine => 'T',
            Self::Selenocysteine => 'U',
            Self::Valine => 'V',
            Self::Tryptophan => 'W',
            Self::Unknown => 'X',
            Self::Tyrosine => 'Y',
            Self::AmbiguousGlutamine => 'Z',
        }
    }

    /// Parse a sequence of one letter codes, returns the index of the first invalid character on failure
    /// # Errors
    /// If any of the characters is not an amino acid.
    pub fn parse_sequence(text: &str) -> Result<Vec<Self>, usize> {
        text.char_indices()
            .map(|(index, c)| Self::try_from(c).map_err(|()| index))
            .collect()
    }

    /// Render a sequence of amino acids as its one letter code string
    pub fn sequence_to_string(sequence: &[Self]) -> String {
        sequence.iter().map(|aa| aa.one_letter_code()).collect()
    }
}

impl std::fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.one_letter_code())
    }
}

impl std::str::FromStr for AminoAcid {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.try_into(),
            _ => Err(()),
        }
    }
}

impl TryFrom<char> for AminoAcid {
    type Error = ();
    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii() {
            let num = value as u8;
            num.try_into()
        } else {
            Err(())
        }
    }
}

impl TryFrom<u8> for AminoAcid {
    type Error = ();
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            b'A' => Ok(Self::Alanine),
            b'B' => Ok(Self::AmbiguousAsparagine),
            b'C' => Ok(Self::Cysteine),
            b'D' => Ok(Self::AsparticAcid),
            b'E' => Ok(Self::GlutamicAcid),
            b'F' => Ok(Self::Phenylalanine),
            b'G' => Ok(Self::Glycine),
            b'H' => Ok(Self::Histidine),
            b'I' => Ok(Self::Isoleucine),
            b'J' => Ok(Self::AmbiguousLeucine),
            b'K' => Ok(Self::Lysine),
            b'L' => Ok(Self::Leucine),
            b'M' => Ok(Self::Methionine),
            b'N' => Ok(Self::Asparagine),
            b'O' => Ok(Self::Pyrrolysine),
            b'P' => Ok(Self::Proline),
            b'Q' => Ok(Self::Glutamine),
            b'R' => Ok(Self::Arginine),
            b'S' => Ok(Self::Serine),
            b'T' => Ok(Self::Threonine),
            b'U' => Ok(Self::Selenocysteine),
            b'V' => Ok(Self::Valine),
            b'W' => Ok(Self::Tryptophan),
            b'X' => Ok(Self::Unknown),
            b'Y' => Ok(Self::Tyrosine),
            b'Z' => Ok(Self::AmbiguousGlutamine),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn read_aa() {
        assert_eq!(AminoAcid::try_from('B'), Ok(AminoAcid::AmbiguousAsparagine));
        assert_eq!(AminoAcid::try_from(b'k'), Ok(AminoAcid::Lysine));
        assert_eq!("P".parse::<AminoAcid>(), Ok(AminoAcid::Proline));
        assert_eq!(AminoAcid::try_from('*'), Err(()));
        assert_eq!(AminoAcid::try_from('é'), Err(()));
        assert_eq!("PP".parse::<AminoAcid>(), Err(()));
    }

    #[test]
    fn one_letter_codes_roundtrip() {
        for aa in AminoAcid::ALL_AMINO_ACIDS {
            assert_eq!(AminoAcid::try_from(aa.one_letter_code()), Ok(*aa));
        }
    }

    #[test]
    fn parse_sequence() {
        let sequence = AminoAcid::parse_sequence("pepTIDEK").unwrap();
        assert_eq!(AminoAcid::sequence_to_string(&sequence), "PEPTIDEK");
        assert_eq!(AminoAcid::parse_sequence("PEP1DE"), Err(3));
    }
}
