//! Deploy a new space on the testnet
//!
//! Deployment needs no existing space, only the wallet address that will
//! become the first editor.
//!
//! ## Usage
//!
//! ```bash
//! export WALLET_ADDRESS="0x..."
//! cargo run --example deploy_space -- "My space name"
//! ```

use graphwire_kg::chain::checksum_address;
use graphwire_kg::config::Settings;
use graphwire_kg::space;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("graphwire_kg=debug,deploy_space=info")
        .init();

    let settings = Settings::from_env();
    let editor = checksum_address(&settings.require_wallet_address()?)?;
    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Graphwire space".to_string());

    println!("Deploying space {:?} with editor {}", name, editor);
    let space_id = space::deploy_space(&settings.api_url, &editor, &name).await?;
    println!("✓ Space deployed: {}", space_id);
    println!("Set SPACE_ID={} to target it", space_id);

    Ok(())
}
