use super::atomcollection::AtomCollection;
use super::error::StructureError;
use itertools::Itertools;
use pdbtbx::PDB;
use std::collections::HashSet;
use std::path::Path;

impl From<&PDB> for AtomCollection {
    // PDB --> Chain --> Residue --> Atom, collected in one pass.
    // pdbtbx exposes the first model through `chains()`.
    fn from(pdb_data: &PDB) -> Self {
        let (coords, is_hetero, atom_names, res_ids, ins_codes, res_names, chain_ids): (
            Vec<[f64; 3]>,
            Vec<bool>,
            Vec<String>,
            Vec<i32>,
            Vec<Option<char>>,
            Vec<String>,
            Vec<String>,
        ) = pdb_data
            .chains()
            .flat_map(|chain| {
                let chain_id = chain.id().to_string();
                chain.residues().flat_map(move |residue| {
                    let (res_number, insertion_code) = residue.id();
                    let res_id = res_number as i32;
                    let ins_code = insertion_code.and_then(|code| code.chars().next());
                    let res_name = residue.name().unwrap_or_default().to_string();
                    let chain_id = chain_id.clone();
                    // alternate conformers repeat atom names; the first one wins
                    let mut seen = HashSet::new();
                    residue
                        .atoms()
                        .filter(move |atom| seen.insert(atom.name().to_string()))
                        .map(move |atom| {
                            let (x, y, z) = atom.pos();
                            (
                                [x, y, z],
                                atom.hetero(),
                                atom.name().to_string(),
                                res_id,
                                ins_code,
                                res_name.clone(),
                                chain_id.clone(),
                            )
                        })
                })
            })
            .multiunzip();

        AtomCollection::new(
            coords, is_hetero, atom_names, res_ids, ins_codes, res_names, chain_ids,
        )
    }
}

/// Read a PDB or mmCIF file.
///
/// With `chains` only those chains are kept and each of them must exist. With
/// `backbone` only `N`, `CA` and `C` atoms are kept.
pub fn load_structure<S: AsRef<str>>(
    path: impl AsRef<Path>,
    chains: Option<&[S]>,
    backbone: bool,
) -> Result<AtomCollection, StructureError> {
    let path = path.as_ref();
    let (pdb, _warnings) = pdbtbx::open(path.to_string_lossy()).map_err(|errors| {
        StructureError::Parse(errors.iter().map(|e| e.to_string()).join("; "))
    })?;
    let mut atoms = AtomCollection::from(&pdb);
    if backbone {
        atoms = atoms.backbone();
    }
    let all_chains = atoms.chains();
    if all_chains.is_empty() {
        return Err(StructureError::NoChains);
    }
    match chains {
        None => Ok(atoms),
        Some(chains) => {
            if let Some(missing) = chains
                .iter()
                .find(|chain| !all_chains.contains(&chain.as_ref()))
            {
                return Err(StructureError::MissingChain(missing.as_ref().to_string()));
            }
            Ok(atoms.select_chains(chains))
        }
    }
}
