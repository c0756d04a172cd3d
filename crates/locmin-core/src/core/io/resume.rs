//! Readers for files produced by earlier runs.
//!
//! Both formats put the sequence somewhere on the first line and one minimum per following
//! line: `index structure energy ...`. Lines whose structure or energy column cannot be read
//! are skipped with a warning.

use super::candidates::is_structure_token;
use super::sequence::is_sequence_token;
use crate::core::models::barrier::BarrierAggregate;
use crate::core::models::energy::{Energy, from_kcal};
use crate::core::models::sequence::{Sequence, SequenceError};
use crate::core::models::structure::Structure;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ResumeFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No sequence found on the first line")]
    MissingSequence,
    #[error("Invalid sequence: {0}")]
    Sequence(#[from] SequenceError),
    #[error("Line {line}: structure length {found} does not match sequence length {expected}")]
    LengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A minimum listed in a previous report.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousMinimum {
    pub structure: Structure,
    /// Energy as printed; callers normally re-evaluate it under the current model.
    pub energy: Energy,
    pub hits: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviousRun {
    pub sequence: Sequence,
    pub minima: Vec<PreviousMinimum>,
}

/// A minimum listed in a barrier file.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierRecord {
    pub structure: Structure,
    pub energy: Energy,
    pub aggregate: BarrierAggregate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarrierListing {
    pub sequence: Sequence,
    pub records: Vec<BarrierRecord>,
}

struct IndexedLine<'a> {
    structure: Structure,
    energy: Energy,
    rest: Vec<&'a str>,
}

fn read_header(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Sequence, ResumeFileError> {
    let first = lines.next().transpose()?.ok_or(ResumeFileError::MissingSequence)?;
    let token = first
        .split_whitespace()
        .find(|t| is_sequence_token(t))
        .ok_or(ResumeFileError::MissingSequence)?;
    Ok(token.parse()?)
}

fn split_indexed_line<'a>(
    line: &'a str,
    line_number: usize,
    sequence_len: usize,
) -> Result<Option<IndexedLine<'a>>, ResumeFileError> {
    let mut tokens = line.split_whitespace();
    let _index = tokens.next();
    let Some(structure_token) = tokens.next().filter(|t| is_structure_token(t)) else {
        if !line.trim().is_empty() {
            warn!(line = line_number, "Skipping line without a structure column");
        }
        return Ok(None);
    };
    let found = structure_token.chars().count();
    if found != sequence_len {
        return Err(ResumeFileError::LengthMismatch {
            line: line_number,
            expected: sequence_len,
            found,
        });
    }
    let structure = match Structure::from_dot_bracket(structure_token) {
        Ok(structure) => structure,
        Err(e) => {
            warn!(line = line_number, error = %e, "Skipping line with a malformed structure");
            return Ok(None);
        }
    };
    let Some(energy) = tokens.next().and_then(|t| t.parse::<f64>().ok()) else {
        warn!(line = line_number, "Skipping line without an energy column");
        return Ok(None);
    };
    Ok(Some(IndexedLine {
        structure,
        energy: from_kcal(energy),
        rest: tokens.collect(),
    }))
}

/// Reads a minima report written by an earlier exploration.
///
/// The hit count is the last column of either report layout: `index structure energy hits`
/// or `index structure energy father barrier hits`. A missing or unreadable count is taken
/// as a single hit.
pub fn read_previous(reader: &mut impl BufRead) -> Result<PreviousRun, ResumeFileError> {
    let mut lines = reader.lines();
    let sequence = read_header(&mut lines)?;
    let mut minima = Vec::new();

    for (offset, line) in lines.enumerate() {
        let line = line?;
        let Some(parsed) = split_indexed_line(&line, offset + 2, sequence.len())? else {
            continue;
        };
        let count_column = match parsed.rest.len() {
            1 => parsed.rest.first(),
            n if n >= 3 => parsed.rest.get(2),
            _ => None,
        };
        let hits = count_column
            .and_then(|t| t.parse::<usize>().ok())
            .unwrap_or(1);
        minima.push(PreviousMinimum {
            structure: parsed.structure,
            energy: parsed.energy,
            hits,
        });
    }

    Ok(PreviousRun { sequence, minima })
}

/// Reads a barrier listing: `index structure energy father e_diff bsize fbsize fen grad feng`.
///
/// Trailing columns may be absent; absent or unreadable values stay zero.
pub fn read_barrier_listing(reader: &mut impl BufRead) -> Result<BarrierListing, ResumeFileError> {
    let mut lines = reader.lines();
    let sequence = read_header(&mut lines)?;
    let mut records = Vec::new();

    for (offset, line) in lines.enumerate() {
        let line = line?;
        let Some(parsed) = split_indexed_line(&line, offset + 2, sequence.len())? else {
            continue;
        };
        let int = |i: usize| parsed.rest.get(i).and_then(|t| t.parse::<i32>().ok()).unwrap_or(0);
        let float = |i: usize| parsed.rest.get(i).and_then(|t| t.parse::<f32>().ok()).unwrap_or(0.0);
        let aggregate = BarrierAggregate {
            father: int(0),
            e_diff: parsed
                .rest
                .get(1)
                .and_then(|t| t.parse::<f64>().ok())
                .map(from_kcal)
                .unwrap_or(0),
            basin_size: int(2),
            father_basin_size: int(3),
            free_energy: float(4),
            gradient_basin: int(5),
            gradient_free_energy: float(6),
        };
        records.push(BarrierRecord {
            structure: parsed.structure,
            energy: parsed.energy,
            aggregate,
        });
    }

    Ok(BarrierListing { sequence, records })
}
