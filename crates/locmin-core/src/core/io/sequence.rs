use crate::core::models::sequence::{Sequence, SequenceError};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequenceFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No sequence line found")]
    Missing,
    #[error("Invalid sequence: {0}")]
    Invalid(#[from] SequenceError),
}

/// A sequence together with the FASTA name that preceded it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: Option<String>,
    pub sequence: Sequence,
}

/// Whether `token` starts like a nucleotide sequence (two leading nucleotide letters).
pub fn is_sequence_token(token: &str) -> bool {
    let is_nucleotide =
        |c: Option<char>| matches!(c.map(|c| c.to_ascii_uppercase()), Some('A' | 'C' | 'G' | 'U' | 'T'));
    let mut chars = token.chars();
    is_nucleotide(chars.next()) && is_nucleotide(chars.next())
}

/// Reads a plain or FASTA-formatted single sequence.
///
/// Blank lines are skipped. A `>` line names the sequence; the first whitespace-separated
/// token of the next non-blank line is the sequence itself.
pub fn read_sequence(reader: &mut impl BufRead) -> Result<NamedSequence, SequenceFileError> {
    let mut name = None;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('>') {
            name = header.split_whitespace().next().map(str::to_string);
            continue;
        }
        let token = trimmed
            .split_whitespace()
            .next()
            .ok_or(SequenceFileError::Missing)?;
        let sequence = token.parse()?;
        return Ok(NamedSequence { name, sequence });
    }
    Err(SequenceFileError::Missing)
}
