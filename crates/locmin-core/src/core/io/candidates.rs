use crate::core::models::structure::{Structure, StructureError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("Structure length {found} does not match sequence length {expected}: '{line}'")]
    LengthMismatch {
        expected: usize,
        found: usize,
        line: String,
    },
    #[error("Malformed structure '{line}': {source}")]
    Malformed {
        line: String,
        #[source]
        source: StructureError,
    },
    #[error("Structure '{structure}' pairs bases that cannot pair in this sequence")]
    ForbiddenPair { structure: String },
}

/// How a single input line was understood.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateLine<'a> {
    /// A FASTA-style header (`>` in the first column).
    Header,
    /// No whitespace-separated token looked like a structure.
    NoStructure,
    Structure {
        token: &'a str,
        energy: Option<f64>,
        /// Set when more than one token looked like a structure; the first one wins.
        ambiguous: bool,
    },
}

/// A token starts like a dot-bracket string when its first two characters are `.`, `(` or `)`.
pub fn is_structure_token(token: &str) -> bool {
    let mut chars = token.chars();
    let is_bracket = |c: Option<char>| matches!(c, Some('.' | '(' | ')'));
    is_bracket(chars.next()) && is_bracket(chars.next())
}

/// Parses an energy token, tolerating the parentheses folding tools put around energies.
pub fn parse_energy_token(token: &str) -> Option<f64> {
    token
        .trim_matches(|c| c == '(' || c == ')')
        .parse::<f64>()
        .ok()
        .filter(|e| e.is_finite())
}

pub fn classify_line(line: &str) -> CandidateLine<'_> {
    if line.starts_with('>') {
        return CandidateLine::Header;
    }

    let mut structure = None;
    let mut energy = None;
    let mut ambiguous = false;
    for token in line.split_whitespace() {
        if is_structure_token(token) {
            if structure.is_some() {
                ambiguous = true;
            } else {
                structure = Some(token);
            }
        } else if energy.is_none() {
            energy = parse_energy_token(token);
        }
    }

    match structure {
        Some(token) => CandidateLine::Structure {
            token,
            energy,
            ambiguous,
        },
        None => CandidateLine::NoStructure,
    }
}

/// Converts a structure token into a pair table of the expected length.
pub fn parse_candidate(
    token: &str,
    expected_len: usize,
    line: &str,
) -> Result<Structure, CandidateError> {
    let found = token.chars().count();
    if found != expected_len {
        return Err(CandidateError::LengthMismatch {
            expected: expected_len,
            found,
            line: line.to_string(),
        });
    }
    Structure::from_dot_bracket(token).map_err(|source| CandidateError::Malformed {
        line: line.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_with_trailing_energy_is_recognized() {
        assert_eq!(
            classify_line("((...))  -1.20"),
            CandidateLine::Structure {
                token: "((...))",
                energy: Some(-1.2),
                ambiguous: false
            }
        );
    }

    #[test]
    fn parenthesized_energy_is_accepted() {
        match classify_line("((...)) (-3.40)") {
            CandidateLine::Structure { energy, .. } => assert_eq!(energy, Some(-3.4)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn header_lines_are_flagged() {
        assert_eq!(classify_line(">seq1 some comment"), CandidateLine::Header);
    }

    #[test]
    fn line_without_structure_is_reported() {
        assert_eq!(classify_line("GGGAAACCC -1.0"), CandidateLine::NoStructure);
        assert_eq!(classify_line(""), CandidateLine::NoStructure);
        assert_eq!(classify_line("( -1.0"), CandidateLine::NoStructure);
    }

    #[test]
    fn second_structure_token_marks_line_ambiguous() {
        match classify_line("((...)) ....... 2.0") {
            CandidateLine::Structure {
                token, ambiguous, ..
            } => {
                assert_eq!(token, "((...))");
                assert!(ambiguous);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = parse_candidate("((...))", 9, "((...))").unwrap_err();
        assert!(matches!(
            err,
            CandidateError::LengthMismatch {
                expected: 9,
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn malformed_structure_is_an_error() {
        assert!(matches!(
            parse_candidate("((....", 6, "((...."),
            Err(CandidateError::Malformed { .. })
        ));
        assert!(parse_candidate("(....)", 6, "(....)").is_ok());
    }
}
