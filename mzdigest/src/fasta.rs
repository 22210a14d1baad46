//! Read protein databases in the FASTA format.

use std::{
    io::{BufRead, BufReader},
    ops::Range,
    path::Path,
};

use context_error::{BoxedError, Context, CreateError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::DigestError, sequence::AminoAcid};

/// A single protein from a FASTA file
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct FastaRecord {
    full_header: String,
    accession: Range<usize>,
    line_index: usize,
    sequence: Vec<AminoAcid>,
}

impl FastaRecord {
    /// Create a record from a label (the header without the leading '>') and a sequence
    pub fn new(label: impl Into<String>, sequence: Vec<AminoAcid>) -> Self {
        let full_header = format!(">{}", label.into());
        Self {
            accession: accession_range(&full_header),
            full_header,
            line_index: 0,
            sequence,
        }
    }

    /// The full header line without the leading '>'
    pub fn label(&self) -> &str {
        &self.full_header[1..]
    }

    /// The accession, the first word of the header
    pub fn accession(&self) -> &str {
        &self.full_header[self.accession.clone()]
    }

    /// The index of the header line in the original file
    pub const fn line_index(&self) -> usize {
        self.line_index
    }

    /// The protein sequence
    pub fn sequence(&self) -> &[AminoAcid] {
        &self.sequence
    }

    /// Parse a single fasta file
    /// # Errors
    /// A [`DigestError::InvalidSequenceFile`] error when it is not a valid fasta file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Self>, BoxedError<'static, DigestError>> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            BoxedError::new(
                DigestError::InvalidSequenceFile,
                "Failed reading fasta file",
                format!("Error occurred while opening the file: {e}"),
                Context::none().source(path.to_string_lossy()).to_owned(),
            )
        })?;
        let reader = BufReader::new(file);
        Self::parse_reader(reader, Some(path))
    }

    /// Parse a single fasta file from a reader. A stop codon ('*') ends the sequence of a record,
    /// any residues following it up to the next header are ignored.
    /// # Errors
    /// A [`DigestError::InvalidSequenceFile`] error when it is not a valid fasta file, this
    /// includes files without any record and files with sequence data before the first header
    pub fn parse_reader(
        reader: impl BufRead,
        path: Option<&Path>,
    ) -> Result<Vec<Self>, BoxedError<'static, DigestError>> {
        let base_context = || {
            path.map_or_else(Context::none, |p| {
                Context::none().source(p.to_string_lossy()).to_owned()
            })
        };
        let mut records = Vec::new();
        let mut current: Option<Self> = None;
        let mut terminated = false;

        for (line_index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                BoxedError::new(
                    DigestError::InvalidSequenceFile,
                    "Failed reading fasta file",
                    format!("Error occurred while reading line {}: {e}", line_index + 1),
                    base_context(),
                )
            })?;
            if line.starts_with('>') {
                if let Some(record) = current.take() {
                    records.push(record);
                }
                current = Some(Self {
                    accession: accession_range(&line),
                    full_header: line,
                    line_index,
                    sequence: Vec::new(),
                });
                terminated = false;
            } else if line.trim().is_empty() {
                continue;
            } else if let Some(record) = current.as_mut() {
                for (i, c) in line.char_indices().filter(|(_, c)| !c.is_ascii_whitespace()) {
                    if terminated {
                        break;
                    }
                    if c == '*' {
                        // Stop codon, anything after it is not part of the protein
                        terminated = true;
                        if line[i + 1..].trim().is_empty() {
                            continue;
                        }
                        debug!(
                            "Ignoring sequence after the stop codon on line {} of {}",
                            line_index + 1,
                            record.accession()
                        );
                        break;
                    }
                    record.sequence.push(c.try_into().map_err(|()| {
                        BoxedError::new(
                            DigestError::InvalidSequenceFile,
                            "Failed reading fasta file",
                            "Character is not an amino acid",
                            Context::line(Some(line_index as u32), &line, i, 1).to_owned(),
                        )
                    })?);
                }
            } else {
                return Err(BoxedError::new(
                    DigestError::InvalidSequenceFile,
                    "Failed reading fasta file",
                    "Sequence data was found before the first header line (starting with '>')",
                    Context::full_line(line_index as u32, &line).to_owned(),
                ));
            }
        }
        if let Some(record) = current {
            records.push(record);
        }

        if records.is_empty() {
            Err(BoxedError::new(
                DigestError::InvalidSequenceFile,
                "Failed reading fasta file",
                "The file does not contain any records",
                base_context(),
            ))
        } else {
            Ok(records)
        }
    }
}

/// The range of the first word after the '>' in a header line
fn accession_range(header: &str) -> Range<usize> {
    let start = usize::from(header.starts_with('>'));
    let rest = &header[start..];
    let leading = rest.len() - rest.trim_start().len();
    let word = rest.trim_start();
    let end = word.find(char::is_whitespace).unwrap_or(word.len());
    start + leading..start + leading + end
}
