//! # abkit-remote
//!
//! Blocking clients for the two web services the antibody pipeline talks to:
//!
//! * [`RcsbClient`] for the RCSB PDB GraphQL API and structure downloads
//! * [`EntrezClient`] for NCBI E-utilities (esearch, epost, efetch)
//!
//! Both take an explicit configuration object; nothing is read from globals.
mod entrez;
mod rcsb;

pub use self::entrez::{EntrezClient, EntrezConfig, EntrezError, HistoryEntry, ENTREZ_BASE_URL};
pub use self::rcsb::{
    Annotation, IdMapping, LookupError, RcsbClient, RcsbConfig, StructureFormat,
    RCSB_DOWNLOAD_URL, RCSB_GRAPHQL_URL,
};
