//! IMGT framework/CDR regions.
//!
//! Boundaries follow
//! <https://www.imgt.org/IMGTScientificChart/Nomenclature/IMGT-FRCDRdefinition.html>.
use super::error::CoreError;
use super::numbering::{get_numbering, Numberer, NumberingLabel, Scheme};
use itertools::Itertools;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[repr(u8)]
pub enum Region {
    #[strum(serialize = "-")]
    Gap = 0,
    #[strum(serialize = "FR1")]
    Fr1 = 1,
    #[strum(serialize = "CDR1")]
    Cdr1 = 2,
    #[strum(serialize = "FR2")]
    Fr2 = 3,
    #[strum(serialize = "CDR2")]
    Cdr2 = 4,
    #[strum(serialize = "FR3")]
    Fr3 = 5,
    #[strum(serialize = "CDR3")]
    Cdr3 = 6,
    #[strum(serialize = "FR4")]
    Fr4 = 7,
}

impl Region {
    /// Region of an IMGT position number. Insertion letters do not matter.
    pub fn from_position(number: u32) -> Region {
        match number {
            0..=26 => Region::Fr1,
            27..=38 => Region::Cdr1,
            39..=55 => Region::Fr2,
            56..=65 => Region::Cdr2,
            66..=104 => Region::Fr3,
            105..=117 => Region::Cdr3,
            _ => Region::Fr4,
        }
    }

    pub fn from_label(label: &NumberingLabel) -> Region {
        match label {
            NumberingLabel::Gap => Region::Gap,
            NumberingLabel::Position(pos) => Region::from_position(pos.number),
        }
    }

    /// Small-integer encoding for tabular storage.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Region> {
        use Region::*;
        [Gap, Fr1, Cdr1, Fr2, Cdr2, Fr3, Cdr3, Fr4]
            .get(code as usize)
            .copied()
    }

    pub fn is_cdr(self) -> bool {
        matches!(self, Region::Cdr1 | Region::Cdr2 | Region::Cdr3)
    }
}

pub fn mark_region(numbering: &[NumberingLabel]) -> Vec<Region> {
    numbering.iter().map(Region::from_label).collect()
}

pub fn encode_regions(regions: &[Region]) -> Vec<u8> {
    regions.iter().map(|r| r.code()).collect()
}

/// Number `seq` with IMGT and return its encoded regions separated by spaces,
/// e.g. `"0 0 1 1 1 ..."`.
pub fn get_region<N: Numberer + ?Sized>(
    numberer: &N,
    seq: &str,
) -> Result<Option<String>, CoreError> {
    let Some(numbering) = get_numbering(numberer, seq, Scheme::Imgt)? else {
        return Ok(None);
    };
    let encoded = encode_regions(&mark_region(&numbering));
    Ok(Some(encoded.iter().join(" ")))
}
