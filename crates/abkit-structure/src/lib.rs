//! # abkit-structure
//!
//! Coordinates of antibody/antigen complexes.
//!
//! __abkit-structure__ provides:
//! * [`AtomCollection`], a column-oriented view of the atoms of a pdbtbx structure
//! * [`load_structure`] with chain and backbone filtering
//! * Pairwise and cross distance matrices
//! * [`ContactMatrix`] between antibody residues and the SARS-CoV-2 RBD (319-541)
//!
mod atomcollection;
mod contacts;
mod conversions;
mod distance;
mod error;

pub use self::atomcollection::{AtomCollection, ResidueLabel, BACKBONE_ATOMS};
pub use self::contacts::{
    contact_matrix, detect_rbd_contacts, ContactMatrix, DEFAULT_CONTACT_THRESHOLD,
};
pub use self::conversions::load_structure;
pub use self::distance::{cdist, distance_matrix};
pub use self::error::StructureError;
