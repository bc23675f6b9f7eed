//! End-to-end edit submission
//!
//! Ties the three stages together: publish the edit to content-addressed
//! storage, ask the space API for the matching calldata, sign and send
//! the anchoring transaction. Each stage sits behind a trait so tests run
//! the whole flow against in-memory fakes.
//!
//! Submission is two-phase by design. `publish_only` covers ingestion
//! flows that record cids for later anchoring; `submit_cid` anchors a
//! previously published edit; `submit_edit` does both in one call.

use std::sync::Arc;

use tracing::info;

use crate::chain::CalldataSender;
use crate::error::{Error, Result};
use crate::ipfs::EditPublisher;
use crate::ops::{Edit, Op, RelationSpec};
use crate::space::{CalldataSource, RelationChecker};

/// Outcome of a full submission: where the edit lives and what anchored it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReceipt {
    /// `ipfs://` content id of the published edit
    pub cid: String,
    /// Hash of the accepted transaction, `0x`-prefixed
    pub tx_hash: String,
}

/// Publish-and-anchor pipeline over pluggable stage implementations.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use graphwire_kg::chain::TransactionSubmitter;
/// use graphwire_kg::ipfs::IpfsPublisher;
/// use graphwire_kg::pipeline::EditPipeline;
/// use graphwire_kg::space::SpaceClient;
///
/// let api = "https://api-testnet.grc-20.thegraph.com";
/// let space = SpaceClient::new(api, "NCdYgAuRjEYgsRrzQ5W4NC");
/// let submitter = TransactionSubmitter::new(
///     "https://rpc-geo-test-zc16z3tcvf.t.conduit.xyz/",
///     "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
/// ).unwrap();
///
/// let pipeline = EditPipeline::new(
///     Arc::new(IpfsPublisher::new(api)),
///     Arc::new(space),
///     Arc::new(submitter),
/// ).with_author("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// ```
#[derive(Clone)]
pub struct EditPipeline {
    publisher: Arc<dyn EditPublisher>,
    calldata: Arc<dyn CalldataSource>,
    sender: Arc<dyn CalldataSender>,
    author: Option<String>,
}

impl EditPipeline {
    pub fn new(
        publisher: Arc<dyn EditPublisher>,
        calldata: Arc<dyn CalldataSource>,
        sender: Arc<dyn CalldataSender>,
    ) -> Self {
        Self {
            publisher,
            calldata,
            sender,
            author: None,
        }
    }

    /// Address recorded as the edit's author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    fn author(&self) -> Result<&str> {
        self.author
            .as_deref()
            .ok_or_else(|| Error::Config("author address is not set".to_string()))
    }

    /// Publish a named edit without anchoring it. Returns the cid, or
    /// `None` when there is nothing to publish.
    pub async fn publish_only(&self, name: &str, ops: Vec<Op>) -> Result<Option<String>> {
        if ops.is_empty() {
            info!(name, "no operations, skipping publish");
            return Ok(None);
        }

        let edit = Edit::new(name, self.author()?, ops);
        let cid = self.publisher.publish(&edit).await?;
        info!(name, %cid, ops = edit.ops.len(), "edit published");
        Ok(Some(cid))
    }

    /// Anchor a previously published edit on chain. Returns the
    /// transaction hash.
    pub async fn submit_cid(&self, cid: &str) -> Result<String> {
        let calldata = self.calldata.edit_calldata(cid).await?;
        let tx_hash = self.sender.send(&calldata).await?;
        info!(%cid, %tx_hash, "edit anchored");
        Ok(tx_hash)
    }

    /// Publish a named edit and anchor it in one call.
    ///
    /// Empty `ops` short-circuits to `Ok(None)` before any network
    /// traffic. A failure after publish leaves the edit on storage; the
    /// cid has been logged and can be anchored later with
    /// [`submit_cid`](Self::submit_cid).
    pub async fn submit_edit(&self, name: &str, ops: Vec<Op>) -> Result<Option<EditReceipt>> {
        let Some(cid) = self.publish_only(name, ops).await? else {
            return Ok(None);
        };
        let tx_hash = self.submit_cid(&cid).await?;
        Ok(Some(EditReceipt { cid, tx_hash }))
    }

    /// Create the given relations, skipping any the index already holds.
    ///
    /// Every spec must have all three ids non-empty. When nothing is
    /// missing the edit is not created at all and `Ok(None)` is returned.
    pub async fn submit_relations(
        &self,
        checker: &RelationChecker,
        name: &str,
        specs: &[RelationSpec],
    ) -> Result<Option<EditReceipt>> {
        for spec in specs {
            if spec.has_empty_component() {
                return Err(Error::InvalidInput(format!(
                    "relation {} --({})--> {} has an empty id",
                    spec.from_id, spec.relation_type_id, spec.to_id
                )));
            }
        }

        let missing = checker.missing(specs).await;
        if missing.len() < specs.len() {
            info!(
                existing = specs.len() - missing.len(),
                "skipping relations already present"
            );
        }

        let ops = missing.iter().map(Op::create_relation).collect();
        self.submit_edit(name, ops).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::space::{Calldata, RelationIndex};

    /// Records published edits and hands out a fixed cid
    struct FakePublisher {
        published: Mutex<Vec<Edit>>,
        cid: String,
    }

    impl FakePublisher {
        fn new(cid: &str) -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                cid: cid.to_string(),
            }
        }

        fn published(&self) -> Vec<Edit> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EditPublisher for FakePublisher {
        async fn publish(&self, edit: &Edit) -> Result<String> {
            self.published.lock().unwrap().push(edit.clone());
            Ok(self.cid.clone())
        }
    }

    /// Derives calldata from the cid, or fails with a fixed status
    struct FakeCalldata {
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl CalldataSource for FakeCalldata {
        async fn edit_calldata(&self, cid: &str) -> Result<Calldata> {
            if let Some(status) = self.fail_with {
                return Err(Error::api(status, "calldata unavailable"));
            }
            Ok(Calldata {
                to: "0x0000000000000000000000000000000000000001".to_string(),
                data: format!("0x{}", hex_of(cid)),
            })
        }
    }

    fn hex_of(s: &str) -> String {
        s.bytes().map(|b| format!("{b:02x}")).collect()
    }

    /// Records sent calldata and hands out a fixed hash
    struct FakeSender {
        sent: Mutex<Vec<Calldata>>,
    }

    impl FakeSender {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Calldata> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CalldataSender for FakeSender {
        async fn send(&self, calldata: &Calldata) -> Result<String> {
            self.sent.lock().unwrap().push(calldata.clone());
            Ok("0xaaaa".to_string())
        }
    }

    fn pipeline_with(
        publisher: Arc<FakePublisher>,
        sender: Arc<FakeSender>,
        fail_calldata: Option<u16>,
    ) -> EditPipeline {
        EditPipeline::new(
            publisher,
            Arc::new(FakeCalldata {
                fail_with: fail_calldata,
            }),
            sender,
        )
        .with_author("0xauthor")
    }

    #[tokio::test]
    async fn test_submit_edit_publishes_then_anchors() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmTest"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), None);

        let ops = vec![
            Op::set_triple("e1", "a1", crate::ops::Value::text("v")),
            Op::create_relation(&RelationSpec::new("e1", "r1", "e2")),
        ];
        let receipt = pipeline
            .submit_edit("Test edit", ops.clone())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(receipt.cid, "ipfs://QmTest");
        assert_eq!(receipt.tx_hash, "0xaaaa");

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].name, "Test edit");
        assert_eq!(published[0].author, "0xauthor");
        assert_eq!(published[0].ops, ops);

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data, format!("0x{}", hex_of("ipfs://QmTest")));
    }

    #[tokio::test]
    async fn test_empty_ops_short_circuit() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmTest"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), None);

        let receipt = pipeline.submit_edit("Empty", Vec::new()).await.unwrap();
        assert!(receipt.is_none());

        // nothing was published or sent
        assert!(publisher.published().is_empty());
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_calldata_failure_after_publish() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmTest"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), Some(500));

        let ops = vec![Op::set_triple("e1", "a1", crate::ops::Value::text("v"))];
        let err = pipeline.submit_edit("Test edit", ops).await.unwrap_err();

        assert_eq!(err.api_status(), Some(500));
        // the edit was published before the failure, nothing was sent
        assert_eq!(publisher.published().len(), 1);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_author_is_config_error() {
        let pipeline = EditPipeline::new(
            Arc::new(FakePublisher::new("ipfs://QmTest")),
            Arc::new(FakeCalldata { fail_with: None }),
            Arc::new(FakeSender::new()),
        );

        let ops = vec![Op::set_triple("e1", "a1", crate::ops::Value::text("v"))];
        let err = pipeline.submit_edit("Test edit", ops).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    struct StaticIndex {
        edges: Vec<(String, String, String)>,
    }

    #[async_trait]
    impl RelationIndex for StaticIndex {
        async fn relation_exists(&self, spec: &RelationSpec) -> Result<bool> {
            Ok(self.edges.iter().any(|(f, r, t)| {
                *f == spec.from_id && *r == spec.relation_type_id && *t == spec.to_id
            }))
        }
    }

    fn checker_with(edges: &[(&str, &str, &str)]) -> RelationChecker {
        RelationChecker::new(Arc::new(StaticIndex {
            edges: edges
                .iter()
                .map(|(f, r, t)| (f.to_string(), r.to_string(), t.to_string()))
                .collect(),
        }))
    }

    #[tokio::test]
    async fn test_submit_relations_skips_existing() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmRel"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), None);
        let checker = checker_with(&[("a", "r", "b")]);

        let specs = vec![
            RelationSpec::new("a", "r", "b"),
            RelationSpec::new("c", "r", "d"),
        ];
        let receipt = pipeline
            .submit_relations(&checker, "Link", &specs)
            .await
            .unwrap();
        assert!(receipt.is_some());

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].ops.len(), 1);
        match &published[0].ops[0] {
            Op::CreateRelation { relation } => {
                assert_eq!(relation.from_entity, "c");
                assert_eq!(relation.to_entity, "d");
            }
            other => panic!("expected a relation op, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_relations_all_existing() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmRel"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), None);
        let checker = checker_with(&[("a", "r", "b")]);

        let receipt = pipeline
            .submit_relations(&checker, "Link", &[RelationSpec::new("a", "r", "b")])
            .await
            .unwrap();

        assert!(receipt.is_none());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_submit_relations_rejects_empty_ids() {
        let publisher = Arc::new(FakePublisher::new("ipfs://QmRel"));
        let sender = Arc::new(FakeSender::new());
        let pipeline = pipeline_with(publisher.clone(), sender.clone(), None);
        let checker = checker_with(&[]);

        let err = pipeline
            .submit_relations(&checker, "Link", &[RelationSpec::new("", "r", "b")])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(publisher.published().is_empty());
    }
}
