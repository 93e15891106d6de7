use abkit_core::aa3to1;
use itertools::Itertools;
use std::fmt;

/// Atom names kept by backbone filtering.
pub const BACKBONE_ATOMS: [&str; 3] = ["N", "CA", "C"];

/// Chain, author residue number, insertion code and name of one residue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueLabel {
    pub chain_id: String,
    pub res_id: i32,
    pub ins_code: Option<char>,
    pub res_name: String,
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ins_code {
            Some(ins) => write!(f, "{}:{}{}:{}", self.chain_id, self.res_id, ins, self.res_name),
            None => write!(f, "{}:{}:{}", self.chain_id, self.res_id, self.res_name),
        }
    }
}

/// Atoms of the first model, stored column by column.
///
/// Only the first conformer of each atom is kept, so a residue carries at most one
/// atom of a given name. HETATM records are kept but flagged, and residue-level
/// selections skip them.
#[derive(Debug, Clone, Default)]
pub struct AtomCollection {
    coords: Vec<[f64; 3]>,
    is_hetero: Vec<bool>,
    atom_names: Vec<String>,
    res_ids: Vec<i32>,
    ins_codes: Vec<Option<char>>,
    res_names: Vec<String>,
    chain_ids: Vec<String>,
}

impl AtomCollection {
    pub fn new(
        coords: Vec<[f64; 3]>,
        is_hetero: Vec<bool>,
        atom_names: Vec<String>,
        res_ids: Vec<i32>,
        ins_codes: Vec<Option<char>>,
        res_names: Vec<String>,
        chain_ids: Vec<String>,
    ) -> Self {
        AtomCollection {
            coords,
            is_hetero,
            atom_names,
            res_ids,
            ins_codes,
            res_names,
            chain_ids,
        }
    }
    pub fn len(&self) -> usize {
        self.coords.len()
    }
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
    pub fn get_coords(&self) -> &[[f64; 3]] {
        &self.coords
    }
    pub fn get_is_hetero(&self, idx: usize) -> bool {
        self.is_hetero[idx]
    }
    pub fn get_atom_names(&self) -> &[String] {
        &self.atom_names
    }
    pub fn get_resids(&self) -> &[i32] {
        &self.res_ids
    }
    pub fn get_ins_codes(&self) -> &[Option<char>] {
        &self.ins_codes
    }
    pub fn get_resnames(&self) -> &[String] {
        &self.res_names
    }
    pub fn get_chain_ids(&self) -> &[String] {
        &self.chain_ids
    }
    /// Distinct chain ids in file order.
    pub fn chains(&self) -> Vec<&str> {
        self.chain_ids.iter().map(String::as_str).unique().collect()
    }
    pub fn residue_label(&self, idx: usize) -> ResidueLabel {
        ResidueLabel {
            chain_id: self.chain_ids[idx].clone(),
            res_id: self.res_ids[idx],
            ins_code: self.ins_codes[idx],
            res_name: self.res_names[idx].clone(),
        }
    }

    /// Keep the atoms whose index passes `keep`, preserving order.
    pub fn filter<F: Fn(usize) -> bool>(&self, keep: F) -> AtomCollection {
        let indices: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        AtomCollection {
            coords: indices.iter().map(|&i| self.coords[i]).collect(),
            is_hetero: indices.iter().map(|&i| self.is_hetero[i]).collect(),
            atom_names: indices.iter().map(|&i| self.atom_names[i].clone()).collect(),
            res_ids: indices.iter().map(|&i| self.res_ids[i]).collect(),
            ins_codes: indices.iter().map(|&i| self.ins_codes[i]).collect(),
            res_names: indices.iter().map(|&i| self.res_names[i].clone()).collect(),
            chain_ids: indices.iter().map(|&i| self.chain_ids[i].clone()).collect(),
        }
    }
    pub fn select_chains<S: AsRef<str>>(&self, chains: &[S]) -> AtomCollection {
        self.filter(|i| chains.iter().any(|c| c.as_ref() == self.chain_ids[i]))
    }
    pub fn backbone(&self) -> AtomCollection {
        self.filter(|i| {
            !self.is_hetero[i] && BACKBONE_ATOMS.contains(&self.atom_names[i].as_str())
        })
    }
    fn is_alpha_carbon(&self, idx: usize) -> bool {
        !self.is_hetero[idx] && self.atom_names[idx] == "CA"
    }
    /// Alpha carbons, one per residue. Calcium ions share the atom name and are skipped.
    pub fn ca(&self) -> AtomCollection {
        self.filter(|i| self.is_alpha_carbon(i))
    }
    /// One-letter sequence over the alpha carbons, chains concatenated in file order.
    pub fn sequence(&self) -> String {
        self.res_names
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_alpha_carbon(*i))
            .map(|(_, res_name)| aa3to1(res_name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> AtomCollection {
        AtomCollection::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [3.0, 0.0, 0.0],
                [4.0, 0.0, 0.0],
            ],
            vec![false, false, false, false, true],
            vec!["N".into(), "CA".into(), "CB".into(), "CA".into(), "CA".into()],
            vec![1, 1, 1, 2, 301],
            vec![None, None, None, Some('A'), None],
            vec!["GLY".into(), "GLY".into(), "GLY".into(), "TRP".into(), "CA".into()],
            vec!["H".into(), "H".into(), "H".into(), "L".into(), "L".into()],
        )
    }

    #[test]
    fn test_selections() {
        let ac = collection();
        assert_eq!(ac.len(), 5);
        assert_eq!(ac.chains(), vec!["H", "L"]);
        assert_eq!(ac.backbone().len(), 3);
        assert_eq!(ac.ca().get_resids(), &[1, 2]);
        assert_eq!(ac.select_chains(&["L"]).get_ins_codes(), &[Some('A'), None]);
        assert!(ac.get_is_hetero(4));
        assert_eq!(ac.sequence(), "GW");
        assert_eq!(ac.residue_label(3).to_string(), "L:2A:TRP");
    }
}
