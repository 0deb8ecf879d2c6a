use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::DELETION_CHAR;

///
/// An observed allele at one reference position.
///
/// The declaration order is the total order used for tie-breaks.
///
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Allele {
    A,
    C,
    G,
    T,
    N,
    Deletion,
}

impl Allele {
    /// Every allele, in index order.
    pub const ALL: [Allele; 6] = [
        Allele::A,
        Allele::C,
        Allele::G,
        Allele::T,
        Allele::N,
        Allele::Deletion,
    ];

    /// The four nucleotides that can be reported as substitutions.
    pub const NUCLEOTIDES: [Allele; 4] = [Allele::A, Allele::C, Allele::G, Allele::T];

    /// Parse a read or reference base. Returns `None` for anything that is not A, C, G, T or N.
    pub fn from_base(base: u8) -> Option<Self> {
        match base {
            b'A' | b'a' => Some(Self::A),
            b'C' | b'c' => Some(Self::C),
            b'G' | b'g' => Some(Self::G),
            b'T' | b't' => Some(Self::T),
            b'N' | b'n' => Some(Self::N),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
            Self::N => 4,
            Self::Deletion => 5,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
            Self::N => 'N',
            Self::Deletion => DELETION_CHAR,
        }
    }

    /// N carries no quality sum.
    pub fn tracks_quality(&self) -> bool {
        !matches!(self, Self::N)
    }
}

impl Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn from_reverse_flag(is_reverse: bool) -> Self {
        if is_reverse {
            Self::Reverse
        } else {
            Self::Forward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(b'A', Some(Allele::A))]
    #[case(b'c', Some(Allele::C))]
    #[case(b'g', Some(Allele::G))]
    #[case(b'T', Some(Allele::T))]
    #[case(b'n', Some(Allele::N))]
    #[case(b'R', None)]
    #[case(b'-', None)]
    fn test_from_base(#[case] base: u8, #[case] expected: Option<Allele>) {
        assert_eq!(Allele::from_base(base), expected);
    }

    #[rstest]
    fn test_indices_follow_declaration_order() {
        for (i, allele) in Allele::ALL.iter().enumerate() {
            assert_eq!(allele.index(), i);
        }
        assert!(Allele::A < Allele::T);
        assert!(Allele::N < Allele::Deletion);
    }

    #[rstest]
    fn test_deletion_is_displayed_as_d() {
        assert_eq!(Allele::Deletion.to_string(), "D");
        assert_eq!(Allele::Deletion.tracks_quality(), true);
        assert_eq!(Allele::N.tracks_quality(), false);
    }
}
