use super::atomcollection::{AtomCollection, ResidueLabel};
use super::conversions::load_structure;
use super::distance::cdist;
use super::error::StructureError;
use abkit_core::{RBD_END, RBD_LEN, RBD_START};
use abkit_remote::{LookupError, RcsbClient, StructureFormat};
use log::{debug, info};
use ndarray::Array2;
use polars::prelude::*;
use std::path::PathBuf;

/// Cα distance, in Ångström, at or below which two residues are in contact.
pub const DEFAULT_CONTACT_THRESHOLD: f64 = 8.0;

/// Antibody residues (rows) against RBD positions 319-541 (columns).
#[derive(Debug, Clone)]
pub struct ContactMatrix {
    labels: Vec<ResidueLabel>,
    contacts: Array2<bool>,
}

impl ContactMatrix {
    pub fn labels(&self) -> &[ResidueLabel] {
        &self.labels
    }
    pub fn contacts(&self) -> &Array2<bool> {
        &self.contacts
    }
    pub fn n_contacts(&self) -> usize {
        self.contacts.iter().filter(|&&c| c).count()
    }
    /// RBD residue numbers touched by antibody residue `row`.
    pub fn contacts_of(&self, row: usize) -> Vec<i32> {
        self.contacts
            .row(row)
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(col, _)| RBD_START + col as i32)
            .collect()
    }
    /// One row per antibody residue: `chain`, `res_id`, `ins_code`, `res_name` and a
    /// 0/1 column for each RBD position.
    pub fn to_dataframe(&self) -> Result<DataFrame, StructureError> {
        let mut columns: Vec<Column> = vec![
            Series::new(
                "chain".into(),
                self.labels.iter().map(|l| l.chain_id.clone()).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "res_id".into(),
                self.labels.iter().map(|l| l.res_id).collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "ins_code".into(),
                self.labels
                    .iter()
                    .map(|l| l.ins_code.map(String::from))
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(
                "res_name".into(),
                self.labels.iter().map(|l| l.res_name.clone()).collect::<Vec<_>>(),
            )
            .into(),
        ];
        for (col, position) in (RBD_START..=RBD_END).enumerate() {
            let values: Vec<i32> = self.contacts.column(col).iter().map(|&c| c as i32).collect();
            columns.push(Series::new(position.to_string().into(), values).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Contacts between the Cα atoms of `ab_chains` and RBD positions on `rbd_chain`.
///
/// Chain ids are author chain ids. RBD residues with an insertion code or outside
/// 319-541 are ignored; positions absent from the structure stay all-false.
pub fn contact_matrix<S: AsRef<str>>(
    structure: &AtomCollection,
    ab_chains: &[S],
    rbd_chain: &str,
    threshold: f64,
) -> Result<ContactMatrix, StructureError> {
    let chains = structure.chains();
    let missing = ab_chains
        .iter()
        .map(AsRef::as_ref)
        .chain(std::iter::once(rbd_chain))
        .find(|chain| !chains.contains(chain));
    if let Some(chain) = missing {
        return Err(StructureError::MissingChain(chain.to_string()));
    }

    let ca = structure.ca();
    let antibody = ca.select_chains(ab_chains);
    let rbd = ca.filter(|i| {
        ca.get_chain_ids()[i] == rbd_chain
            && ca.get_ins_codes()[i].is_none()
            && (RBD_START..=RBD_END).contains(&ca.get_resids()[i])
    });
    debug!(
        "{} antibody residues, {} RBD residues",
        antibody.len(),
        rbd.len()
    );

    let distances = cdist(antibody.get_coords(), rbd.get_coords());
    let mut contacts = Array2::from_elem((antibody.len(), RBD_LEN), false);
    for ((row, j), &d) in distances.indexed_iter() {
        if d <= threshold {
            let col = (rbd.get_resids()[j] - RBD_START) as usize;
            contacts[[row, col]] = true;
        }
    }
    let labels = (0..antibody.len())
        .map(|i| antibody.residue_label(i))
        .collect();
    Ok(ContactMatrix { labels, contacts })
}

fn split_instance_id(instance_id: &str) -> Result<(&str, &str), StructureError> {
    match instance_id.split_once('.') {
        Some((pdb_id, asym_id)) if !pdb_id.is_empty() && !asym_id.is_empty() => {
            Ok((pdb_id, asym_id))
        }
        _ => Err(StructureError::InvalidInstanceId(instance_id.to_string())),
    }
}

/// Download an entry in PDB format, or as mmCIF when RCSB has no PDB-format file
/// (large entries). Both are read with author chain ids.
fn fetch_entry<F>(pdb_id: &str, fetch: F) -> Result<PathBuf, LookupError>
where
    F: Fn(StructureFormat) -> Result<PathBuf, LookupError>,
{
    match fetch(StructureFormat::Pdb) {
        Err(LookupError::NotFound(_)) => {
            info!("{pdb_id} has no PDB-format file, using mmCIF");
            fetch(StructureFormat::Cif)
        }
        result => result,
    }
}

/// Contact matrix for RCSB instance ids such as `7KMG.A`.
///
/// All instances must belong to the same entry.
pub fn detect_rbd_contacts(
    client: &RcsbClient,
    ab_instance_ids: &[&str],
    rbd_instance_id: &str,
    threshold: f64,
) -> Result<ContactMatrix, StructureError> {
    let (pdb_id, _) = split_instance_id(rbd_instance_id)?;
    for id in ab_instance_ids {
        let (other, _) = split_instance_id(id)?;
        if !other.eq_ignore_ascii_case(pdb_id) {
            return Err(StructureError::InvalidInstanceId(id.to_string()));
        }
    }
    let ab_chains = ab_instance_ids
        .iter()
        .map(|id| client.auth_instance_id(id))
        .collect::<Result<Vec<_>, _>>()?;
    let rbd_chain = client.auth_instance_id(rbd_instance_id)?;
    info!(
        "{pdb_id}: antibody chains {:?}, RBD chain {rbd_chain}",
        ab_chains
    );

    let path = fetch_entry(pdb_id, |format| client.fetch_structure(pdb_id, format))?;
    let mut chains = ab_chains.clone();
    chains.push(rbd_chain.clone());
    let structure = load_structure(&path, Some(&chains[..]), false)?;
    contact_matrix(&structure, &ab_chains[..], &rbd_chain, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abkit_test_data::TestFile;

    fn complex_contacts() -> ContactMatrix {
        let (pdb_file, _temp) = TestFile::complex_01().create_temp().unwrap();
        let structure = load_structure::<&str>(&pdb_file, None, false).unwrap();
        contact_matrix(&structure, &["H", "L"], "E", DEFAULT_CONTACT_THRESHOLD).unwrap()
    }

    #[test]
    fn test_contact_matrix() {
        let matrix = complex_contacts();
        assert_eq!(matrix.contacts().dim(), (8, RBD_LEN));
        let rows: Vec<String> = matrix.labels().iter().map(|l| l.to_string()).collect();
        assert_eq!(rows[0], "H:1:GLU");
        assert_eq!(rows[5], "L:1:ASP");
        // the calcium ion of chain H sits next to E319 but is not a residue
        assert!(matrix.labels().iter().all(|label| label.res_id != 301));

        let expected: [&[i32]; 8] = [
            &[319],
            &[319],
            &[],
            &[],
            // exactly at the threshold
            &[323],
            &[320],
            &[320, 541],
            &[320, 541],
        ];
        for (row, contacts) in expected.iter().enumerate() {
            assert_eq!(matrix.contacts_of(row), contacts.to_vec(), "row {}", rows[row]);
        }
        assert_eq!(matrix.n_contacts(), 8);
    }

    #[test]
    fn test_contact_threshold() {
        let (pdb_file, _temp) = TestFile::complex_01().create_temp().unwrap();
        let structure = load_structure::<&str>(&pdb_file, None, false).unwrap();
        let matrix = contact_matrix(&structure, &["H"], "E", 7.9).unwrap();
        assert_eq!(matrix.contacts_of(4), Vec::<i32>::new());
        assert_eq!(matrix.contacts_of(0), vec![319]);
    }

    #[test]
    fn test_contact_matrix_missing_chain() {
        let (pdb_file, _temp) = TestFile::complex_01().create_temp().unwrap();
        let structure = load_structure::<&str>(&pdb_file, None, false).unwrap();
        let err = contact_matrix(&structure, &["H"], "A", 8.0).unwrap_err();
        assert!(matches!(err, StructureError::MissingChain(chain) if chain == "A"));
    }

    #[test]
    fn test_to_dataframe() {
        let df = complex_contacts().to_dataframe().unwrap();
        assert_eq!(df.shape(), (8, 4 + RBD_LEN));
        let names = df.get_column_names();
        assert_eq!(names[4].as_str(), "319");
        assert_eq!(names[4 + RBD_LEN - 1].as_str(), "541");
        let col = df.column("541").unwrap().i32().unwrap();
        assert_eq!(col.get(6), Some(1));
        assert_eq!(col.get(0), Some(0));
    }

    #[test]
    fn test_fetch_entry_falls_back_to_mmcif() {
        let requested = std::cell::RefCell::new(vec![]);
        let path = fetch_entry("7A29", |format| {
            requested.borrow_mut().push(format);
            match format {
                StructureFormat::Pdb => Err(LookupError::NotFound("7A29".to_string())),
                StructureFormat::Cif => Ok(PathBuf::from("7a29.cif")),
            }
        })
        .unwrap();
        assert_eq!(path, PathBuf::from("7a29.cif"));
        assert_eq!(*requested.borrow(), [StructureFormat::Pdb, StructureFormat::Cif]);

        let path = fetch_entry("7KMG", |format| Ok(PathBuf::from(format!("7kmg.{format}")))).unwrap();
        assert_eq!(path, PathBuf::from("7kmg.pdb"));

        let err = fetch_entry("7KMG", |_| Err(LookupError::Malformed("{}".to_string())));
        assert!(matches!(err, Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_split_instance_id() {
        assert_eq!(split_instance_id("7KMG.A").unwrap(), ("7KMG", "A"));
        assert!(split_instance_id("7KMG").is_err());
        assert!(split_instance_id(".A").is_err());
    }
}
