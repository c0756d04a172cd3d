use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    U,
}

impl Base {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'U' | 'T' => Some(Base::U),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        }
    }
}

/// The six canonical pair types (Watson-Crick plus GU wobble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairType {
    AU,
    UA,
    GC,
    CG,
    GU,
    UG,
}

impl PairType {
    pub fn of(five_prime: Base, three_prime: Base) -> Option<Self> {
        match (five_prime, three_prime) {
            (Base::A, Base::U) => Some(PairType::AU),
            (Base::U, Base::A) => Some(PairType::UA),
            (Base::G, Base::C) => Some(PairType::GC),
            (Base::C, Base::G) => Some(PairType::CG),
            (Base::G, Base::U) => Some(PairType::GU),
            (Base::U, Base::G) => Some(PairType::UG),
            _ => None,
        }
    }

    /// Row/column of this pair type in the stacking table.
    pub fn index(self) -> usize {
        match self {
            PairType::AU => 0,
            PairType::UA => 1,
            PairType::GC => 2,
            PairType::CG => 3,
            PairType::GU => 4,
            PairType::UG => 5,
        }
    }

    /// Pairs closed by only two hydrogen bonds carry a terminal penalty.
    pub fn is_weak(self) -> bool {
        !matches!(self, PairType::GC | PairType::CG)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Invalid nucleotide '{character}' at position {position}")]
    InvalidNucleotide { character: char, position: usize },
}

/// A validated RNA sequence. `T` is read as `U`; lowercase input is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    bases: Vec<Base>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    #[inline]
    pub fn base(&self, position: usize) -> Base {
        self.bases[position]
    }

    #[inline]
    pub fn pair_type(&self, i: usize, j: usize) -> Option<PairType> {
        PairType::of(self.bases[i], self.bases[j])
    }

    #[inline]
    pub fn can_pair(&self, i: usize, j: usize) -> bool {
        self.pair_type(i, j).is_some()
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SequenceError::Empty);
        }
        let bases = trimmed
            .chars()
            .enumerate()
            .map(|(position, character)| {
                Base::from_char(character).ok_or(SequenceError::InvalidNucleotide {
                    character,
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bases })
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.bases {
            write!(f, "{}", base.to_char())?;
        }
        Ok(())
    }
}
