//! Hosted space API client
//!
//! A *space* is a named partition of the graph with its own on-chain
//! governance contract. The hosted API answers read queries against an
//! indexed view of a space, converts published edits into transaction
//! calldata, and deploys new spaces. All write effects still go through
//! the chain; this client never mutates anything by itself.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ipfs;
use crate::ops::RelationSpec;

/// Network tag the hosted API expects on calldata requests
const NETWORK: &str = "TESTNET";

/// Target contract and input bytes for an edit-accepting transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calldata {
    pub to: String,
    pub data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalldataRequest<'a> {
    cid: &'a str,
    network: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    initial_editor_address: &'a str,
    space_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployResponse {
    space_id: String,
}

/// Read access to the relation index of a space.
///
/// Seam for the existence checker; the hosted API implements it, tests
/// substitute an in-memory index.
#[async_trait]
pub trait RelationIndex: Send + Sync {
    /// Whether at least one relation matches the `(from, type, to)` key.
    ///
    /// `Ok(false)` covers both "indexed and absent" and "space unknown"
    /// (the API reports the latter as 404).
    async fn relation_exists(&self, spec: &RelationSpec) -> Result<bool>;
}

/// Source of transaction calldata for a published edit
#[async_trait]
pub trait CalldataSource: Send + Sync {
    async fn edit_calldata(&self, cid: &str) -> Result<Calldata>;
}

/// HTTP client for one space on the hosted API.
///
/// # Example
///
/// ```no_run
/// use graphwire_kg::space::SpaceClient;
///
/// let client = SpaceClient::new(
///     "https://api-testnet.grc-20.thegraph.com",
///     "NCdYgAuRjEYgsRrzQ5W4NC",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SpaceClient {
    http: reqwest::Client,
    base_url: String,
    space_id: String,
}

impl SpaceClient {
    pub fn new(base_url: impl Into<String>, space_id: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            space_id: space_id.into(),
        }
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// Query the relation index for edges matching the given key.
    ///
    /// Returns the raw indexed records. A 404 means the space or edge is
    /// unknown to the index and yields an empty list; any other
    /// non-success status is an [`Error::Api`].
    pub async fn find_relations(&self, spec: &RelationSpec) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/space/{}/relations", self.base_url, self.space_id);
        debug!(
            from = %spec.from_id,
            relation_type = %spec.relation_type_id,
            to = %spec.to_id,
            "querying relation index"
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("fromId", spec.from_id.as_str()),
                ("toId", spec.to_id.as_str()),
                ("relationTypeId", spec.relation_type_id.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(Error::api(response.status().as_u16(), response.text().await?));
        }

        let relations = response.json::<Vec<serde_json::Value>>().await?;
        Ok(relations)
    }

    /// Convert a published edit into transaction calldata for this space's
    /// governance contract. The cid is normalized to its `ipfs://` form
    /// before the request.
    pub async fn calldata_for_edit(&self, cid: &str) -> Result<Calldata> {
        let url = format!("{}/space/{}/edit/calldata", self.base_url, self.space_id);
        let cid = ipfs::normalize_cid(cid);
        debug!(%cid, "requesting calldata");

        let response = self
            .http
            .post(&url)
            .json(&CalldataRequest {
                cid: &cid,
                network: NETWORK,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::api(response.status().as_u16(), response.text().await?));
        }

        let calldata = response.json::<Calldata>().await?;
        if calldata.to.is_empty() || calldata.data.is_empty() {
            return Err(Error::Api {
                status: 200,
                body: "calldata response missing to/data".to_string(),
            });
        }
        Ok(calldata)
    }
}

/// Deploy a new space with the given editor as its initial member.
///
/// Standalone because deployment happens before any space id exists.
/// Returns the new space id.
pub async fn deploy_space(api_url: &str, editor_address: &str, space_name: &str) -> Result<String> {
    let url = format!("{}/deploy", api_url.trim_end_matches('/'));
    debug!(editor = %editor_address, name = %space_name, "deploying space");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&DeployRequest {
            initial_editor_address: editor_address,
            space_name,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::api(response.status().as_u16(), response.text().await?));
    }

    let deployed = response.json::<DeployResponse>().await?;
    Ok(deployed.space_id)
}

#[async_trait]
impl RelationIndex for SpaceClient {
    async fn relation_exists(&self, spec: &RelationSpec) -> Result<bool> {
        let relations = self.find_relations(spec).await?;
        Ok(!relations.is_empty())
    }
}

#[async_trait]
impl CalldataSource for SpaceClient {
    async fn edit_calldata(&self, cid: &str) -> Result<Calldata> {
        self.calldata_for_edit(cid).await
    }
}

/// Duplicate-edge guard in front of relation writes.
///
/// Best effort by contract: `exists` never raises. Any index failure is
/// logged and treated as "does not exist", so writes proceed and the
/// worst outcome of an index outage is a duplicate edge, never a lost
/// write.
#[derive(Clone)]
pub struct RelationChecker {
    index: Arc<dyn RelationIndex>,
}

impl RelationChecker {
    pub fn new(index: Arc<dyn RelationIndex>) -> Self {
        Self { index }
    }

    /// Whether the edge already exists, erring on the side of `false`.
    ///
    /// A key with an empty id is never queried; it cannot match anything.
    pub async fn exists(&self, spec: &RelationSpec) -> bool {
        if spec.has_empty_component() {
            warn!(
                from = %spec.from_id,
                relation_type = %spec.relation_type_id,
                to = %spec.to_id,
                "relation key has an empty id, skipping check"
            );
            return false;
        }
        match self.index.relation_exists(spec).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    from = %spec.from_id,
                    relation_type = %spec.relation_type_id,
                    to = %spec.to_id,
                    error = %e,
                    "relation check failed, assuming missing"
                );
                false
            }
        }
    }

    /// Filter the given edges down to those not present in the index,
    /// preserving order.
    pub async fn missing(&self, specs: &[RelationSpec]) -> Vec<RelationSpec> {
        let mut out = Vec::new();
        for spec in specs {
            if !self.exists(spec).await {
                out.push(spec.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// In-memory index holding `(from, type, to)` keys, optionally failing
    struct FakeIndex {
        present: HashSet<(String, String, String)>,
        fail_with: Option<u16>,
    }

    impl FakeIndex {
        fn with_edges(edges: &[(&str, &str, &str)]) -> Self {
            Self {
                present: edges
                    .iter()
                    .map(|(f, r, t)| (f.to_string(), r.to_string(), t.to_string()))
                    .collect(),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                present: HashSet::new(),
                fail_with: Some(status),
            }
        }
    }

    #[async_trait]
    impl RelationIndex for FakeIndex {
        async fn relation_exists(&self, spec: &RelationSpec) -> Result<bool> {
            if let Some(status) = self.fail_with {
                if status == 404 {
                    // the client maps 404 to an empty result set
                    return Ok(false);
                }
                return Err(Error::api(status, "index unavailable"));
            }
            Ok(self.present.contains(&(
                spec.from_id.clone(),
                spec.relation_type_id.clone(),
                spec.to_id.clone(),
            )))
        }
    }

    fn spec(from: &str, rel: &str, to: &str) -> RelationSpec {
        RelationSpec::new(from, rel, to)
    }

    #[tokio::test]
    async fn test_exists_when_indexed() {
        let checker = RelationChecker::new(Arc::new(FakeIndex::with_edges(&[("a", "r", "b")])));
        assert!(checker.exists(&spec("a", "r", "b")).await);
        assert!(!checker.exists(&spec("a", "r", "c")).await);
    }

    #[tokio::test]
    async fn test_not_found_means_missing() {
        let checker = RelationChecker::new(Arc::new(FakeIndex::failing(404)));
        assert!(!checker.exists(&spec("a", "r", "b")).await);
    }

    #[tokio::test]
    async fn test_index_failure_means_missing() {
        let checker = RelationChecker::new(Arc::new(FakeIndex::failing(500)));
        // never raises, treats the edge as absent
        assert!(!checker.exists(&spec("a", "r", "b")).await);
    }

    #[tokio::test]
    async fn test_empty_key_is_never_queried() {
        // the index claims these keys exist; the guard must answer first
        let checker = RelationChecker::new(Arc::new(FakeIndex::with_edges(&[
            ("", "r", "b"),
            ("a", "", "b"),
            ("a", "r", ""),
        ])));
        assert!(!checker.exists(&spec("", "r", "b")).await);
        assert!(!checker.exists(&spec("a", "", "b")).await);
        assert!(!checker.exists(&spec("a", "r", "")).await);
    }

    #[tokio::test]
    async fn test_missing_preserves_order() {
        let checker = RelationChecker::new(Arc::new(FakeIndex::with_edges(&[("a", "r", "b")])));
        let specs = vec![
            spec("a", "r", "b"),
            spec("c", "r", "d"),
            spec("e", "r", "f"),
        ];
        let missing = checker.missing(&specs).await;
        assert_eq!(missing, vec![spec("c", "r", "d"), spec("e", "r", "f")]);
    }

    #[tokio::test]
    async fn test_missing_empty_when_all_indexed() {
        let checker = RelationChecker::new(Arc::new(FakeIndex::with_edges(&[
            ("a", "r", "b"),
            ("c", "r", "d"),
        ])));
        let specs = vec![spec("a", "r", "b"), spec("c", "r", "d")];
        assert!(checker.missing(&specs).await.is_empty());
    }
}
