//! # Graphwire Knowledge Graph (graphwire-kg)
//!
//! A GRC-20 client library for publishing knowledge graph edits to a
//! space: build triple and relation operations, publish them as an edit
//! to IPFS, and anchor the resulting content id on chain.
//!
//! ## Features
//!
//! - Triple and relation operation builders with collision-safe random ids
//! - Edit publication through the hosted IPFS gateway
//! - Calldata retrieval and EIP-1559 transaction submission with fixed gas
//! - Query-before-write relation guard that never blocks a submission
//! - Space deployment
//! - Trait seams at every network boundary for in-memory testing
//!
//! ## Submitting an Edit
//!
//! The pipeline publishes the edit, fetches calldata for it, and sends
//! the anchoring transaction:
//!
//! ```no_run
//! use std::sync::Arc;
//! use graphwire_kg::chain::{ChainSpec, TransactionSubmitter};
//! use graphwire_kg::config::Settings;
//! use graphwire_kg::{EditPipeline, IpfsPublisher, Op, SpaceClient, Value};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env();
//!     let rpc_url = settings
//!         .rpc_url
//!         .clone()
//!         .unwrap_or_else(|| ChainSpec::geogenesis_testnet().default_rpc_url.to_string());
//!
//!     let pipeline = EditPipeline::new(
//!         Arc::new(IpfsPublisher::new(&settings.api_url)),
//!         Arc::new(SpaceClient::new(&settings.api_url, settings.require_space_id()?)),
//!         Arc::new(TransactionSubmitter::new(&rpc_url, &settings.require_private_key()?)?),
//!     )
//!     .with_author(settings.require_wallet_address()?);
//!
//!     let ops = vec![Op::set_triple(
//!         graphwire_kg::ids::generate(),
//!         "LuBWqZAu6pz54eiJS5mLv8",
//!         Value::text("Hello graph"),
//!     )];
//!     if let Some(receipt) = pipeline.submit_edit("First edit", ops).await? {
//!         println!("published {} anchored by {}", receipt.cid, receipt.tx_hash);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Guarding Against Duplicate Relations
//!
//! The checker queries the space's relation index before a write; any
//! failure is logged and treated as "missing", so writes never block:
//!
//! ```no_run
//! use std::sync::Arc;
//! use graphwire_kg::{RelationChecker, RelationSpec, SpaceClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let space = SpaceClient::new(
//!         "https://api-testnet.grc-20.thegraph.com",
//!         "NCdYgAuRjEYgsRrzQ5W4NC",
//!     );
//!     let checker = RelationChecker::new(Arc::new(space));
//!
//!     let spec = RelationSpec::new(
//!         "RZauYFG6886WwWHiq6y5JM",
//!         "Jfmby78N4BCseZinBmdVov",
//!         "VdTsW1mGiy1XSooJaBBLc4",
//!     );
//!     if !checker.exists(&spec).await {
//!         println!("relation missing, safe to create");
//!     }
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod ids;
pub mod ipfs;
pub mod ops;
pub mod pipeline;
pub mod space;

// Re-export main types for convenience
pub use chain::{CalldataSender, ChainSpec, GasPolicy, TransactionSubmitter};
pub use config::Settings;
pub use error::{Error, Result};
pub use ipfs::{EditPublisher, IpfsPublisher};
pub use ops::{Edit, Op, Relation, RelationSpec, Triple, Value, ValueKind};
pub use pipeline::{EditPipeline, EditReceipt};
pub use space::{Calldata, CalldataSource, RelationChecker, RelationIndex, SpaceClient};
