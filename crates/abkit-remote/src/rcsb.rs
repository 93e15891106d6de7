//! RCSB PDB data and file services.
//!
//! Every lookup sends one GraphQL query and walks a fixed key path in the response.
//! Identifiers are uppercased before they are sent.
use log::{debug, info};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display, EnumString};
use thiserror::Error;

pub const RCSB_GRAPHQL_URL: &str = "https://data.rcsb.org/graphql";
pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download/";

#[derive(Debug, Error)]
pub enum LookupError {
    /// The service answered but knows nothing about the identifier.
    #[error("{0} not found")]
    NotFound(String),

    /// The response did not have the expected shape. Holds the raw payload.
    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct RcsbConfig {
    pub graphql_url: String,
    pub download_url: String,
    pub timeout: Duration,
    /// Downloaded structures are kept here and reused.
    pub cache_dir: PathBuf,
}

impl Default for RcsbConfig {
    fn default() -> Self {
        RcsbConfig {
            graphql_url: RCSB_GRAPHQL_URL.to_string(),
            download_url: RCSB_DOWNLOAD_URL.to_string(),
            timeout: Duration::from_secs(60),
            cache_dir: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StructureFormat {
    #[default]
    Cif,
    Pdb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotation_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Entity/instance/author-chain correspondence for one polymer chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdMapping {
    pub entity_id: String,
    pub instance_id: String,
    pub auth_instance_id: String,
}

/// GraphQL root field and the key path below its first element.
struct QueryPath {
    root: &'static str,
    path: &'static [&'static str],
}

const ENTITY_IDS: QueryPath = QueryPath {
    root: "entries",
    path: &["rcsb_entry_container_identifiers", "entity_ids"],
};
const INSTANCE_IDS: QueryPath = QueryPath {
    root: "polymer_entities",
    path: &["rcsb_polymer_entity_container_identifiers", "asym_ids"],
};
const ENTITY_ANNOTATIONS: QueryPath = QueryPath {
    root: "polymer_entities",
    path: &["rcsb_polymer_entity_annotation"],
};
const AUTH_INSTANCE_ID: QueryPath = QueryPath {
    root: "polymer_entity_instances",
    path: &[
        "rcsb_polymer_entity_instance_container_identifiers",
        "auth_asym_id",
    ],
};
const INSTANCE_ANNOTATIONS: QueryPath = QueryPath {
    root: "polymer_entity_instances",
    path: &["rcsb_polymer_instance_annotation"],
};
const SEQUENCE: QueryPath = QueryPath {
    root: "polymer_entities",
    path: &["entity_poly", "pdbx_seq_one_letter_code"],
};
const SEQUENCE_CANONICAL: QueryPath = QueryPath {
    root: "polymer_entities",
    path: &["entity_poly", "pdbx_seq_one_letter_code_can"],
};
const ENTITY_DESCRIPTION: QueryPath = QueryPath {
    root: "polymer_entities",
    path: &["rcsb_polymer_entity", "pdbx_description"],
};
const ENTRY_TITLE: QueryPath = QueryPath {
    root: "entries",
    path: &["struct", "title"],
};

fn id_argument(root: &str) -> &'static str {
    match root {
        "entries" => "entry_ids",
        "polymer_entities" => "entity_ids",
        _ => "instance_ids",
    }
}

/// `{root(ids:["ID"]){a{b}}}`, or `{a{b,c}}` style selections for annotation lists.
fn build_query(query: &QueryPath, id: &str) -> String {
    let selection = match query.path.last() {
        Some(&"rcsb_polymer_entity_annotation") | Some(&"rcsb_polymer_instance_annotation") => {
            "{annotation_id,name,type}"
        }
        _ => "",
    };
    let mut fields = String::new();
    for (depth, key) in query.path.iter().enumerate() {
        fields.push_str(key);
        if depth + 1 < query.path.len() {
            fields.push('{');
        }
    }
    fields.push_str(selection);
    fields.push_str(&"}".repeat(query.path.len() - 1));
    format!(
        "{{{}({}:[\"{}\"]){{{}}}}}",
        query.root,
        id_argument(query.root),
        id,
        fields
    )
}

/// Walk `data.<root>[0].<path...>` in a GraphQL response body.
fn extract(body: &str, query: &QueryPath, id: &str) -> Result<Value, LookupError> {
    let payload: Value = serde_json::from_str(body)?;
    let malformed = || LookupError::Malformed(body.to_string());

    let root = payload
        .get("data")
        .and_then(|data| data.get(query.root))
        .ok_or_else(malformed)?;
    let first = match root {
        Value::Null => return Err(LookupError::NotFound(id.to_string())),
        Value::Array(items) if items.is_empty() => {
            return Err(LookupError::NotFound(id.to_string()))
        }
        Value::Array(items) => &items[0],
        _ => return Err(malformed()),
    };
    let mut value = first;
    for key in query.path {
        value = value.get(*key).ok_or_else(malformed)?;
    }
    if value.is_null() {
        return Err(malformed());
    }
    Ok(value.clone())
}

fn extract_as<T: DeserializeOwned>(
    body: &str,
    query: &QueryPath,
    id: &str,
) -> Result<T, LookupError> {
    let value = extract(body, query, id)?;
    serde_json::from_value(value).map_err(|_| LookupError::Malformed(body.to_string()))
}

pub struct RcsbClient {
    config: RcsbConfig,
    http: Client,
}

impl RcsbClient {
    pub fn new(config: RcsbConfig) -> Result<Self, LookupError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(RcsbClient { config, http })
    }

    pub fn config(&self) -> &RcsbConfig {
        &self.config
    }

    fn lookup<T: DeserializeOwned>(&self, query: &QueryPath, id: &str) -> Result<T, LookupError> {
        let id = id.to_uppercase();
        let graphql = build_query(query, &id);
        debug!("RCSB query {graphql}");
        let body = self
            .http
            .get(&self.config.graphql_url)
            .query(&[("query", graphql.as_str())])
            .send()?
            .error_for_status()?
            .text()?;
        extract_as(&body, query, &id)
    }

    /// Entity ids (`"1"`, `"2"`, ...) of an entry.
    pub fn entity_ids(&self, pdb_id: &str) -> Result<Vec<String>, LookupError> {
        self.lookup(&ENTITY_IDS, pdb_id)
    }

    /// Instance (label asym) ids of an entity such as `7KMG_1`.
    pub fn instance_ids(&self, entity_id: &str) -> Result<Vec<String>, LookupError> {
        self.lookup(&INSTANCE_IDS, entity_id)
    }

    pub fn entity_annotations(&self, entity_id: &str) -> Result<Vec<Annotation>, LookupError> {
        self.lookup(&ENTITY_ANNOTATIONS, entity_id)
    }

    /// Author chain id of an instance such as `7KMG.A`.
    pub fn auth_instance_id(&self, instance_id: &str) -> Result<String, LookupError> {
        self.lookup(&AUTH_INSTANCE_ID, instance_id)
    }

    pub fn instance_annotations(&self, instance_id: &str) -> Result<Vec<Annotation>, LookupError> {
        self.lookup(&INSTANCE_ANNOTATIONS, instance_id)
    }

    pub fn sequence(&self, entity_id: &str, canonical: bool) -> Result<String, LookupError> {
        if canonical {
            self.lookup(&SEQUENCE_CANONICAL, entity_id)
        } else {
            self.lookup(&SEQUENCE, entity_id)
        }
    }

    pub fn entity_description(&self, entity_id: &str) -> Result<String, LookupError> {
        self.lookup(&ENTITY_DESCRIPTION, entity_id)
    }

    pub fn entry_title(&self, pdb_id: &str) -> Result<String, LookupError> {
        self.lookup(&ENTRY_TITLE, pdb_id)
    }

    /// One row per polymer instance of the entry.
    pub fn build_idmapping(&self, pdb_id: &str) -> Result<Vec<IdMapping>, LookupError> {
        let pdb_id = pdb_id.to_uppercase();
        let mut mapping = vec![];
        for entity_id in self.entity_ids(&pdb_id)? {
            let instance_ids = self.instance_ids(&format!("{pdb_id}_{entity_id}"))?;
            for instance_id in instance_ids {
                let auth_instance_id = self.auth_instance_id(&format!("{pdb_id}.{instance_id}"))?;
                mapping.push(IdMapping {
                    entity_id: entity_id.clone(),
                    instance_id,
                    auth_instance_id,
                });
            }
        }
        Ok(mapping)
    }

    pub fn download_link(&self, pdb_id: &str, format: StructureFormat, zipped: bool) -> String {
        let mut link = format!(
            "{}{}.{}",
            self.config.download_url,
            pdb_id.to_uppercase(),
            format
        );
        if zipped {
            link.push_str(".gz");
        }
        link
    }

    /// Download a structure into the cache directory, reusing a previous download.
    pub fn fetch_structure(
        &self,
        pdb_id: &str,
        format: StructureFormat,
    ) -> Result<PathBuf, LookupError> {
        let path = self
            .config
            .cache_dir
            .join(format!("{}.{}", pdb_id.to_lowercase(), format));
        if path.exists() {
            debug!("using cached {}", path.display());
            return Ok(path);
        }
        let link = self.download_link(pdb_id, format, false);
        info!("downloading {link}");
        let response = self.http.get(&link).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(pdb_id.to_uppercase()));
        }
        let bytes = response.error_for_status()?.bytes()?;
        fs::create_dir_all(&self.config.cache_dir)?;
        fs::write(&path, &bytes)?;
        Ok(path)
    }
}
