//! Pairwise alignments scored with BLOSUM90.
//!
//! Two flavours are needed:
//!
//! - [`realign`] places the residues reported by the numbering tool back onto the full
//!   input sequence. Internal gaps open at -10 and do not extend; the ends of the full
//!   sequence are free.
//! - [`global_score`] compares two sequences end to end with free gaps, used to rank
//!   variant references.
use super::scoring::blosum90;
use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};

const REALIGN_GAP_OPEN: i32 = -10;
const REALIGN_GAP_EXTEND: i32 = 0;

/// Half-open coordinates of a gap-free aligned segment in both sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedBlock {
    pub x_start: usize,
    pub x_stop: usize,
    pub y_start: usize,
    pub y_stop: usize,
}

impl AlignedBlock {
    pub fn len(&self) -> usize {
        self.x_stop - self.x_start
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Align all of `x` onto part of `y`.
pub fn realign(x: &[u8], y: &[u8]) -> Alignment {
    let mut aligner =
        Aligner::with_capacity(x.len(), y.len(), REALIGN_GAP_OPEN, REALIGN_GAP_EXTEND, blosum90);
    aligner.semiglobal(x, y)
}

/// First run of consecutive match/substitution columns in an alignment.
///
/// Returns `None` when the alignment pairs no residues at all.
pub fn first_aligned_block(alignment: &Alignment) -> Option<AlignedBlock> {
    let (mut x, mut y) = (alignment.xstart, alignment.ystart);
    let mut block: Option<AlignedBlock> = None;
    for op in &alignment.operations {
        match *op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                match block.as_mut() {
                    Some(b) => {
                        b.x_stop = x + 1;
                        b.y_stop = y + 1;
                    }
                    None => {
                        block = Some(AlignedBlock {
                            x_start: x,
                            x_stop: x + 1,
                            y_start: y,
                            y_stop: y + 1,
                        })
                    }
                }
                x += 1;
                y += 1;
            }
            // any gap closes the first block
            _ if block.is_some() => break,
            AlignmentOperation::Ins => x += 1,
            AlignmentOperation::Del => y += 1,
            AlignmentOperation::Xclip(n) => x += n,
            AlignmentOperation::Yclip(n) => y += n,
        }
    }
    block
}

/// Global alignment score with zero gap penalties.
pub fn global_score(query: &[u8], target: &[u8]) -> i32 {
    let mut aligner = Aligner::with_capacity(query.len(), target.len(), 0, 0, blosum90);
    aligner.global(query, target).score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realign_substring() {
        let y = b"MKTAYQVQLVESGGGLVQPGGSLRLSCAAS";
        let x = b"QVQLVESGGGLVQPGG";
        let aln = realign(x, y);
        let block = first_aligned_block(&aln).unwrap();
        assert_eq!(
            block,
            AlignedBlock {
                x_start: 0,
                x_stop: x.len(),
                y_start: 5,
                y_stop: 5 + x.len(),
            }
        );
    }

    #[test]
    fn test_realign_with_mismatch_stays_one_block() {
        let y = b"GGGGQVQLVESGGGLVQ";
        let x = b"QVELVESG";
        let block = first_aligned_block(&realign(x, y)).unwrap();
        assert_eq!((block.y_start, block.y_stop), (4, 12));
        assert_eq!(block.len(), 8);
    }

    fn alignment_from(operations: Vec<AlignmentOperation>) -> Alignment {
        Alignment {
            score: 0,
            ystart: 0,
            xstart: 0,
            yend: 0,
            xend: 0,
            ylen: 0,
            xlen: 0,
            operations,
            mode: bio::alignment::AlignmentMode::Semiglobal,
        }
    }

    #[test]
    fn test_first_block_stops_at_gap() {
        use AlignmentOperation::*;
        let aln = alignment_from(vec![Del, Del, Match, Subst, Ins, Match, Match]);
        let block = first_aligned_block(&aln).unwrap();
        assert_eq!(
            block,
            AlignedBlock {
                x_start: 0,
                x_stop: 2,
                y_start: 2,
                y_stop: 4,
            }
        );
        assert!(first_aligned_block(&alignment_from(vec![Del, Ins])).is_none());
    }

    #[test]
    fn test_global_score() {
        let seq = b"NITNLCPFGEV";
        let self_score: i32 = seq.iter().map(|&a| blosum90(a, a)).sum();
        assert_eq!(global_score(seq, seq), self_score);
        // a substitution can never beat the identical sequence
        assert!(global_score(seq, b"NITNLCPFDEV") < self_score);
    }
}
