//! Batch anchoring of previously published edits
//!
//! Walks a published-records snapshot and sends one anchoring
//! transaction per cid. Records are read-only here; a record that fails
//! keeps its cid and can be retried on the next run.

use graphwire_kg::EditPipeline;
use tracing::{error, info, warn};

use crate::records::PublishedRecord;

/// Per-record tallies of one batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Anchor every record that carries a cid, continuing past failures.
///
/// Records without a cid never reach the chain; they are counted as
/// skipped so the caller can tell "nothing to do" from "everything
/// failed".
pub async fn submit_records(pipeline: &EditPipeline, records: &[PublishedRecord]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for record in records {
        let Some(cid) = record.ipfs_hash.as_deref() else {
            warn!(title = %record.title, "record has no cid, skipping");
            summary.skipped += 1;
            continue;
        };

        match pipeline.submit_cid(cid).await {
            Ok(tx_hash) => {
                info!(title = %record.title, %cid, %tx_hash, "record anchored");
                summary.submitted += 1;
            }
            Err(e) => {
                error!(title = %record.title, %cid, error = %e, "anchoring failed, continuing");
                summary.failed += 1;
            }
        }
    }

    info!(
        submitted = summary.submitted,
        skipped = summary.skipped,
        failed = summary.failed,
        "batch finished"
    );
    summary
}
