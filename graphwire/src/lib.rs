pub mod batch;
pub mod builder;
pub mod feed;
pub mod ingest;
pub mod records;
pub mod schema;

pub use batch::{submit_records, BatchSummary};
pub use builder::{press_release_ops, property_links, space_banner_ops, PressReleaseOps};
pub use feed::{fetch_feed, parse_feed, Article};
pub use ingest::{ingest_articles, IngestOutcome};
pub use records::{
    read_articles, read_published, write_articles, write_published, PublishedRecord,
};
pub use schema::{PressReleaseSchema, DEFAULT_SPACE_ID};
