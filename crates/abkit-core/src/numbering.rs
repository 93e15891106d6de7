//! Antibody numbering.
//!
//! The numbering tool only reports the residues of the variable domain it recognised,
//! so its output is realigned onto the full input sequence and padded with gaps.
//! The result always has exactly one [`NumberingLabel`] per input residue.
use super::align::{first_aligned_block, realign};
use super::error::CoreError;
use super::sequence::standardize_seq;
use log::warn;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::iter::repeat;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Numbering schemes understood by ANARCI.
///
/// Region boundaries in [`crate::Region`] are only meaningful for IMGT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scheme {
    #[default]
    Imgt,
    Kabat,
    Chothia,
    Martin,
    Aho,
}

/// A numbered position such as `111` or `111A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImgtPosition {
    pub number: u32,
    pub insertion: Option<char>,
}

impl ImgtPosition {
    pub fn new(number: u32, insertion: Option<char>) -> Self {
        ImgtPosition { number, insertion }
    }
}

impl fmt::Display for ImgtPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.insertion {
            Some(ins) => write!(f, "{}{}", self.number, ins),
            None => write!(f, "{}", self.number),
        }
    }
}

impl FromStr for ImgtPosition {
    type Err = CoreError;

    /// Accepts the tool's spelling, which may carry padding spaces (`"111 "`, `"111A"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || CoreError::InvalidLabel(s.to_string());
        let (digits, insertion) = match label.chars().last() {
            Some(last) if last.is_ascii_alphabetic() => {
                (&label[..label.len() - 1], Some(last.to_ascii_uppercase()))
            }
            Some(_) => (label.as_str(), None),
            None => return Err(invalid()),
        };
        let number = digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(ImgtPosition { number, insertion })
    }
}

/// Label of one residue in a numbered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberingLabel {
    Gap,
    Position(ImgtPosition),
}

impl NumberingLabel {
    pub fn is_gap(&self) -> bool {
        matches!(self, NumberingLabel::Gap)
    }
    pub fn position(&self) -> Option<&ImgtPosition> {
        match self {
            NumberingLabel::Gap => None,
            NumberingLabel::Position(pos) => Some(pos),
        }
    }
}

impl fmt::Display for NumberingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberingLabel::Gap => write!(f, "-"),
            NumberingLabel::Position(pos) => pos.fmt(f),
        }
    }
}

impl FromStr for NumberingLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "-" {
            Ok(NumberingLabel::Gap)
        } else {
            s.parse().map(NumberingLabel::Position)
        }
    }
}

pub type Numbering = Vec<NumberingLabel>;

/// One entry of the numbering tool's output. `residue` is `'-'` where the scheme
/// position is unoccupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedResidue {
    pub position: ImgtPosition,
    pub residue: char,
}

/// External numbering tool.
pub trait Numberer {
    /// Number a normalized sequence.
    ///
    /// `Ok(None)` means the tool ran but found no domain to number.
    fn number(&self, seq: &str, scheme: Scheme)
        -> Result<Option<Vec<NumberedResidue>>, CoreError>;
}

impl<T: Numberer + ?Sized> Numberer for &T {
    fn number(
        &self,
        seq: &str,
        scheme: Scheme,
    ) -> Result<Option<Vec<NumberedResidue>>, CoreError> {
        (**self).number(seq, scheme)
    }
}

/// Number `seq` and return one label per residue.
///
/// Returns `Ok(None)` (and logs the sequence) when the tool produced nothing that could
/// be placed on the sequence. Errors are reserved for failures to run the tool.
pub fn get_numbering<N: Numberer + ?Sized>(
    numberer: &N,
    seq: &str,
    scheme: Scheme,
) -> Result<Option<Numbering>, CoreError> {
    let seq = standardize_seq(seq);
    let Some(numbered) = numberer.number(&seq, scheme)? else {
        warn!("numbering failed for sequence {seq}");
        return Ok(None);
    };

    let (positions, residues): (Vec<ImgtPosition>, Vec<u8>) = numbered
        .iter()
        .filter(|r| r.residue != '-')
        .map(|r| {
            let aa = if r.residue.is_ascii() { r.residue as u8 } else { b'X' };
            (r.position, aa)
        })
        .unzip();
    if residues.is_empty() {
        warn!("numbering returned only gaps for sequence {seq}");
        return Ok(None);
    }

    let alignment = realign(&residues, seq.as_bytes());
    let Some(block) = first_aligned_block(&alignment) else {
        warn!("numbered residues could not be aligned to sequence {seq}");
        return Ok(None);
    };

    let mut numbering = Vec::with_capacity(seq.len());
    numbering.extend(repeat(NumberingLabel::Gap).take(block.y_start));
    numbering.extend(
        positions[block.x_start..block.x_stop]
            .iter()
            .map(|pos| NumberingLabel::Position(*pos)),
    );
    numbering.extend(repeat(NumberingLabel::Gap).take(seq.len() - block.y_stop));
    debug_assert_eq!(numbering.len(), seq.len());
    Ok(Some(numbering))
}

/// Replace each position with its rank among the distinct positions.
///
/// Ranks follow the lexicographic order of the zero-padded label with a default
/// insertion letter `A` (so `1` sorts as `001A`, `111` as `111A`).
pub fn reindex_numbering(positions: &[ImgtPosition]) -> Vec<usize> {
    let sort_key = |pos: &ImgtPosition| -> String {
        let label = format!("{}{}", pos.number, pos.insertion.unwrap_or('A'));
        format!("{label:0>4}")
    };
    let keys: Vec<String> = positions.iter().map(sort_key).collect();
    let ranks: HashMap<&str, usize> = keys
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .enumerate()
        .map(|(rank, key)| (key, rank))
        .collect();
    keys.iter().map(|key| ranks[key.as_str()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SEQ: &str = "MKTAQVQLVESGGGLVQPGGSLRLSCAASGFTFSSYAMSWVRQAPGKGLEWVSAISGSGGSTYYADSVKGRFTISRDNSKNTLYLQMNSLRAEDTAVYYCAKDRLSITIRPRYYGLDVWGQGTTVTVSSASTKGP";

    /// Pretends to be the numbering tool: numbers `SEQ[start..stop]` from position 1 and
    /// sprinkles unoccupied positions in between.
    struct FakeNumberer {
        start: usize,
        stop: usize,
        seen: RefCell<Vec<String>>,
    }

    impl FakeNumberer {
        fn new(start: usize, stop: usize) -> Self {
            FakeNumberer {
                start,
                stop,
                seen: RefCell::new(vec![]),
            }
        }
    }

    impl Numberer for FakeNumberer {
        fn number(
            &self,
            seq: &str,
            _scheme: Scheme,
        ) -> Result<Option<Vec<NumberedResidue>>, CoreError> {
            self.seen.borrow_mut().push(seq.to_string());
            if self.start >= self.stop || self.stop > seq.len() {
                return Ok(None);
            }
            let mut out = vec![];
            for (i, aa) in seq[self.start..self.stop].chars().enumerate() {
                let number = (i + 1) as u32;
                if number % 10 == 0 {
                    out.push(NumberedResidue {
                        position: ImgtPosition::new(number, Some('A')),
                        residue: '-',
                    });
                }
                out.push(NumberedResidue {
                    position: ImgtPosition::new(number, None),
                    residue: aa,
                });
            }
            Ok(Some(out))
        }
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!(
            "111A".parse::<ImgtPosition>().unwrap(),
            ImgtPosition::new(111, Some('A'))
        );
        assert_eq!(
            "27 ".parse::<ImgtPosition>().unwrap(),
            ImgtPosition::new(27, None)
        );
        assert_eq!("-".parse::<NumberingLabel>().unwrap(), NumberingLabel::Gap);
        assert!("A".parse::<ImgtPosition>().is_err());
        assert!("".parse::<ImgtPosition>().is_err());
        assert_eq!(ImgtPosition::new(112, Some('B')).to_string(), "112B");
        assert_eq!(NumberingLabel::Gap.to_string(), "-");
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("IMGT".parse::<Scheme>().unwrap(), Scheme::Imgt);
        assert_eq!("kabat".parse::<Scheme>().unwrap(), Scheme::Kabat);
        assert_eq!(Scheme::Imgt.to_string(), "imgt");
    }

    #[test]
    fn test_numbering_pads_unaligned_ends() {
        let numberer = FakeNumberer::new(4, 124);
        let numbering = get_numbering(&numberer, SEQ, Scheme::Imgt)
            .unwrap()
            .unwrap();
        assert_eq!(numbering.len(), SEQ.len());
        assert!(numbering[..4].iter().all(NumberingLabel::is_gap));
        assert_eq!(
            numbering[4],
            NumberingLabel::Position(ImgtPosition::new(1, None))
        );
        assert_eq!(
            numbering[123],
            NumberingLabel::Position(ImgtPosition::new(120, None))
        );
        assert!(numbering[124..].iter().all(NumberingLabel::is_gap));
        // unoccupied positions reported by the tool never show up
        assert!(numbering
            .iter()
            .filter_map(NumberingLabel::position)
            .all(|pos| pos.insertion.is_none()));
    }

    #[test]
    fn test_numbering_normalizes_input() {
        let numberer = FakeNumberer::new(0, 10);
        let raw = "qvqlXesggg";
        let numbering = get_numbering(&numberer, raw, Scheme::Imgt)
            .unwrap()
            .unwrap();
        assert_eq!(numbering.len(), raw.len());
        assert_eq!(numberer.seen.borrow()[0], "QVQLAESGGG");
    }

    #[test]
    fn test_numbering_failure_is_none() {
        let numberer = FakeNumberer::new(10, 5);
        assert!(get_numbering(&numberer, SEQ, Scheme::Imgt)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_numbering_length_matches_input() {
        for (start, stop) in [(0, 20), (3, 50), (30, SEQ.len()), (0, SEQ.len())] {
            let numberer = FakeNumberer::new(start, stop);
            let numbering = get_numbering(&numberer, SEQ, Scheme::Imgt)
                .unwrap()
                .unwrap();
            assert_eq!(numbering.len(), SEQ.len());
            let numbered = numbering.iter().filter(|l| !l.is_gap()).count();
            assert_eq!(numbered, stop - start);
        }
    }

    #[test]
    fn test_reindex() {
        let positions = [
            ImgtPosition::new(1, None),
            ImgtPosition::new(111, Some('A')),
            ImgtPosition::new(111, None),
            ImgtPosition::new(2, None),
            ImgtPosition::new(111, Some('B')),
            ImgtPosition::new(2, None),
        ];
        // `111` and `111A` share a key
        assert_eq!(reindex_numbering(&positions), vec![0, 2, 2, 1, 3, 1]);
    }
}
