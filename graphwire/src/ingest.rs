//! Feed-to-graph ingestion
//!
//! Builds and publishes one edit per scraped article, collecting the
//! snapshot records the batch submitter consumes later.

use graphwire_kg::EditPipeline;
use tracing::{error, info};

use crate::builder::press_release_ops;
use crate::feed::Article;
use crate::records::PublishedRecord;
use crate::schema::PressReleaseSchema;

/// What a full ingest run produced
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub records: Vec<PublishedRecord>,
    pub failed: usize,
}

/// Publish one edit per article, continuing past per-article failures.
///
/// Each successful publish yields a snapshot record carrying the minted
/// entity ids and the cid. Failures are logged and counted but never
/// abort the run; the remaining articles still get their chance.
pub async fn ingest_articles(
    pipeline: &EditPipeline,
    schema: &PressReleaseSchema,
    articles: &[Article],
) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();

    for article in articles {
        let built = press_release_ops(article, schema);
        let name = format!("Press Release: {}", article.title);

        match pipeline.publish_only(&name, built.ops).await {
            Ok(Some(cid)) => {
                info!(title = %article.title, %cid, "article published");
                outcome.records.push(PublishedRecord {
                    title: article.title.clone(),
                    entity_id: built.entity_id,
                    block_id: built.block_id,
                    ipfs_hash: Some(cid),
                });
            }
            // press_release_ops always emits ops, so None cannot happen
            Ok(None) => {}
            Err(e) => {
                error!(title = %article.title, error = %e, "publish failed, continuing");
                outcome.failed += 1;
            }
        }
    }

    info!(
        published = outcome.records.len(),
        failed = outcome.failed,
        "ingest finished"
    );
    outcome
}
