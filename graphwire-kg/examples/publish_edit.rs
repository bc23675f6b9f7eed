//! Publish a single-triple edit against a live space
//!
//! This example runs the full pipeline: publish to IPFS, fetch calldata,
//! sign and send the anchoring transaction. Nothing is mocked.
//!
//! ## Usage
//!
//! Set environment variables (a `.env` file works too):
//! ```bash
//! export PRIVATE_KEY="0x..."
//! export WALLET_ADDRESS="0x..."
//! export SPACE_ID="NCdYgAuRjEYgsRrzQ5W4NC"
//! export RPC_URL="https://rpc-geo-test-zc16z3tcvf.t.conduit.xyz/"
//! ```
//!
//! Run the example:
//! ```bash
//! cargo run --example publish_edit
//! ```

use std::sync::Arc;

use graphwire_kg::chain::{ChainSpec, TransactionSubmitter};
use graphwire_kg::config::Settings;
use graphwire_kg::{ids, EditPipeline, IpfsPublisher, Op, SpaceClient, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("graphwire_kg=debug,publish_edit=info")
        .init();

    let settings = Settings::from_env();
    let space_id = settings.require_space_id()?;
    let author = settings.require_wallet_address()?;
    let private_key = settings.require_private_key()?;
    let rpc_url = settings
        .rpc_url
        .clone()
        .unwrap_or_else(|| ChainSpec::geogenesis_testnet().default_rpc_url.to_string());

    println!("Publishing to space {} via {}", space_id, settings.api_url);

    let pipeline = EditPipeline::new(
        Arc::new(IpfsPublisher::new(&settings.api_url)),
        Arc::new(SpaceClient::new(&settings.api_url, space_id)),
        Arc::new(TransactionSubmitter::new(&rpc_url, &private_key)?),
    )
    .with_author(author);

    let entity = ids::generate();
    println!("New entity: {}", entity);

    let ops = vec![Op::set_triple(
        entity,
        "LuBWqZAu6pz54eiJS5mLv8", // name attribute
        Value::text("Publish example"),
    )];

    match pipeline.submit_edit("Publish example edit", ops).await? {
        Some(receipt) => {
            println!("✓ Edit published: {}", receipt.cid);
            println!("✓ Anchored by: {}", receipt.tx_hash);
        }
        None => println!("Nothing to publish"),
    }

    Ok(())
}
