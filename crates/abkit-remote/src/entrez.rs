//! NCBI E-utilities.
//!
//! Searches and uploads leave their results on the Entrez history server; records are
//! then fetched per `(WebEnv, query_key)` pair as GenBank text.
use abkit_io::{parse_genbank, GenBankRecord, IoError};
use log::info;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

pub const ENTREZ_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

#[derive(Debug, Error)]
pub enum EntrezError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no {0}")]
    MissingField(&'static str),

    #[error("could not parse records: {0}")]
    Records(#[from] IoError),
}

#[derive(Debug, Clone)]
pub struct EntrezConfig {
    /// NCBI asks every client to identify itself with a contact address.
    pub email: String,
    pub api_key: Option<String>,
    pub tool: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        EntrezConfig {
            email: String::new(),
            api_key: None,
            tool: env!("CARGO_PKG_NAME").to_string(),
            base_url: ENTREZ_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// An accession and where its record sits on the history server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub genbank: String,
    /// Search term that produced the accession, if it came from [`EntrezClient::search`].
    pub query: Option<String>,
    pub webenv: String,
    pub query_key: String,
}

#[derive(Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    webenv: Option<String>,
    querykey: Option<String>,
}

fn parse_esearch(body: &str, query: &str) -> Result<Option<Vec<HistoryEntry>>, EntrezError> {
    let response: EsearchResponse = serde_json::from_str(body)?;
    let result = response.esearchresult;
    if result.idlist.is_empty() {
        return Ok(None);
    }
    let webenv = result.webenv.ok_or(EntrezError::MissingField("WebEnv"))?;
    let query_key = result.querykey.ok_or(EntrezError::MissingField("QueryKey"))?;
    let entries = result
        .idlist
        .into_iter()
        .map(|genbank| HistoryEntry {
            genbank,
            query: Some(query.to_string()),
            webenv: webenv.clone(),
            query_key: query_key.clone(),
        })
        .collect();
    Ok(Some(entries))
}

fn xml_tag<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    body.split(&format!("<{tag}>"))
        .nth(1)
        .and_then(|s| s.split(&format!("</{tag}>")).next())
        .map(str::trim)
}

/// `(WebEnv, QueryKey)` of an epost answer.
fn parse_epost(body: &str) -> Result<(String, String), EntrezError> {
    let webenv = xml_tag(body, "WebEnv").ok_or(EntrezError::MissingField("WebEnv"))?;
    let query_key = xml_tag(body, "QueryKey").ok_or(EntrezError::MissingField("QueryKey"))?;
    Ok((webenv.to_string(), query_key.to_string()))
}

/// Distinct `(webenv, query_key)` pairs in first-seen order.
fn unique_histories(entries: &[HistoryEntry]) -> Vec<(&str, &str)> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| (e.webenv.as_str(), e.query_key.as_str()))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

pub struct EntrezClient {
    config: EntrezConfig,
    http: Client,
}

impl EntrezClient {
    pub fn new(config: EntrezConfig) -> Result<Self, EntrezError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(EntrezClient { config, http })
    }

    fn url(&self, utility: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{utility}.fcgi?", self.config.base_url);
        let credentials = [
            ("email", Some(self.config.email.as_str())),
            ("tool", Some(self.config.tool.as_str())),
            ("api_key", self.config.api_key.as_deref()),
        ];
        let credentials = credentials
            .iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (*key, v)));
        let query: Vec<String> = params
            .iter()
            .copied()
            .chain(credentials)
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect();
        url.push_str(&query.join("&"));
        url
    }

    fn get(&self, url: &str) -> Result<String, EntrezError> {
        Ok(self.http.get(url).send()?.error_for_status()?.text()?)
    }

    /// Search the nucleotide database for an exact phrase.
    ///
    /// Returns `None` when nothing matches.
    pub fn search(&self, query: &str) -> Result<Option<Vec<HistoryEntry>>, EntrezError> {
        let term = format!("\"{query}\"");
        let url = self.url(
            "esearch",
            &[
                ("db", "nucleotide"),
                ("term", &term),
                ("usehistory", "y"),
                ("idtype", "acc"),
                ("retmode", "json"),
            ],
        );
        let body = self.get(&url)?;
        parse_esearch(&body, query)
    }

    /// Post accessions to the history server in batches of `batch_size`.
    pub fn upload_ids(
        &self,
        ids: &[String],
        batch_size: usize,
        db: &str,
    ) -> Result<Vec<HistoryEntry>, EntrezError> {
        let mut entries = Vec::with_capacity(ids.len());
        for (batch_no, batch) in ids.chunks(batch_size.max(1)).enumerate() {
            info!("epost batch {} ({} ids)", batch_no + 1, batch.len());
            let joined = batch.join(",");
            let url = self.url("epost", &[("db", db), ("id", &joined)]);
            let (webenv, query_key) = parse_epost(&self.get(&url)?)?;
            entries.extend(batch.iter().map(|genbank| HistoryEntry {
                genbank: genbank.clone(),
                query: None,
                webenv: webenv.clone(),
                query_key: query_key.clone(),
            }));
        }
        Ok(entries)
    }

    /// Fetch the GenBank records behind each distinct history entry.
    pub fn fetch_records(
        &self,
        entries: &[HistoryEntry],
        db: &str,
    ) -> Result<Vec<GenBankRecord>, EntrezError> {
        let mut records = vec![];
        for (webenv, query_key) in unique_histories(entries) {
            let url = self.url(
                "efetch",
                &[
                    ("db", db),
                    ("rettype", "gb"),
                    ("retmode", "text"),
                    ("WebEnv", webenv),
                    ("query_key", query_key),
                ],
            );
            let body = self.get(&url)?;
            records.extend(parse_genbank(body.as_bytes())?);
        }
        info!("fetched {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(genbank: &str, webenv: &str, query_key: &str) -> HistoryEntry {
        HistoryEntry {
            genbank: genbank.to_string(),
            query: None,
            webenv: webenv.to_string(),
            query_key: query_key.to_string(),
        }
    }

    #[test]
    fn test_parse_esearch() {
        let body = r#"{"header":{},"esearchresult":{"count":"2","idlist":["MW123456.1","MW654321.1"],"querykey":"1","webenv":"MCID_abc"}}"#;
        let entries = parse_esearch(body, "CV07-209").unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].genbank, "MW123456.1");
        assert_eq!(entries[0].query.as_deref(), Some("CV07-209"));
        assert_eq!(entries[1].webenv, "MCID_abc");
        assert_eq!(entries[1].query_key, "1");

        let empty = r#"{"esearchresult":{"count":"0","idlist":[]}}"#;
        assert!(parse_esearch(empty, "nothing").unwrap().is_none());
    }

    #[test]
    fn test_parse_epost() {
        let body = "<?xml version=\"1.0\" ?>\n<ePostResult>\n\t<QueryKey>3</QueryKey>\n\t<WebEnv>MCID_xyz</WebEnv>\n</ePostResult>\n";
        let (webenv, query_key) = parse_epost(body).unwrap();
        assert_eq!(webenv, "MCID_xyz");
        assert_eq!(query_key, "3");
        assert!(matches!(
            parse_epost("<ERROR>bad</ERROR>"),
            Err(EntrezError::MissingField("WebEnv"))
        ));
    }

    #[test]
    fn test_unique_histories() {
        let entries = vec![
            entry("a", "W1", "1"),
            entry("b", "W1", "1"),
            entry("c", "W1", "2"),
            entry("d", "W2", "1"),
        ];
        assert_eq!(
            unique_histories(&entries),
            vec![("W1", "1"), ("W1", "2"), ("W2", "1")]
        );
    }

    #[test]
    fn test_url_carries_credentials() {
        let client = EntrezClient::new(EntrezConfig {
            email: "me@example.org".to_string(),
            api_key: Some("k3y".to_string()),
            ..Default::default()
        })
        .unwrap();
        let url = client.url("esearch", &[("db", "nucleotide"), ("term", "\"CV07 209\"")]);
        assert_eq!(
            url,
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?db=nucleotide&term=%22CV07%20209%22&email=me%40example.org&tool=abkit-remote&api_key=k3y"
        );
    }

    #[test]
    #[ignore = "requires network access"]
    fn test_search_online() {
        let client = EntrezClient::new(EntrezConfig::default()).unwrap();
        let entries = client.search("CV07-209").unwrap().unwrap();
        let records = client.fetch_records(&entries, "nucleotide").unwrap();
        assert!(!records.is_empty());
    }
}
