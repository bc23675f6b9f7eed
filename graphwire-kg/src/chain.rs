//! On-chain anchoring of published edits
//!
//! An edit only becomes visible to the network once its calldata is
//! accepted by the space's governance contract. This module signs and
//! submits that transaction over JSON-RPC. Gas is pinned by a fixed
//! [`GasPolicy`] rather than estimated, so submission cost is predictable
//! and a mispriced estimator cannot stall the pipeline.

use std::str::FromStr;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::space::Calldata;

/// Identity of the target chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSpec {
    pub chain_id: u64,
    pub name: &'static str,
    pub default_rpc_url: &'static str,
}

impl ChainSpec {
    /// The Geogenesis testnet, the only chain the hosted API serves
    pub const fn geogenesis_testnet() -> Self {
        Self {
            chain_id: 19411,
            name: "Geogenesis Testnet",
            default_rpc_url: "https://rpc-geo-test-zc16z3tcvf.t.conduit.xyz/",
        }
    }
}

/// Fixed EIP-1559 gas terms applied to every submission.
///
/// The defaults are sized for the largest edits the gateway produces;
/// the chain refunds unused gas, so overshooting the limit costs nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub gas_limit: u64,
    /// Wei per gas, total
    pub max_fee_per_gas: u128,
    /// Wei per gas, priority tip
    pub max_priority_fee_per_gas: u128,
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self {
            gas_limit: 13_000_000,
            // 0.01 gwei
            max_fee_per_gas: 10_000_000,
            max_priority_fee_per_gas: 10_000_000,
        }
    }
}

/// Prefix a hex string with `0x`, never doubling it
pub fn ensure_0x(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// EIP-55 checksummed form of a hex address
pub fn checksum_address(address: &str) -> Result<String> {
    let parsed = Address::from_str(ensure_0x(address).as_str())
        .map_err(|e| Error::InvalidInput(format!("invalid address {address}: {e}")))?;
    Ok(parsed.to_checksum(None))
}

/// Submission seam. The RPC-backed submitter implements it; tests
/// substitute a recorder.
#[async_trait]
pub trait CalldataSender: Send + Sync {
    /// Sign and send a transaction carrying the calldata, returning its
    /// hash as `0x`-prefixed hex.
    async fn send(&self, calldata: &Calldata) -> Result<String>;
}

/// Signs and submits edit transactions over JSON-RPC.
///
/// # Example
///
/// ```no_run
/// use graphwire_kg::chain::TransactionSubmitter;
///
/// let submitter = TransactionSubmitter::new(
///     "https://rpc-geo-test-zc16z3tcvf.t.conduit.xyz/",
///     "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
/// ).unwrap();
/// println!("sending as {}", submitter.address());
/// ```
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    rpc_url: reqwest::Url,
    chain: ChainSpec,
    gas: GasPolicy,
    signer: PrivateKeySigner,
    confirm: bool,
}

impl TransactionSubmitter {
    /// Build a submitter for the Geogenesis testnet. The key may carry a
    /// `0x` prefix.
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key.trim_start_matches("0x"))
            .map_err(|e| Error::Config(format!("invalid private key: {e}")))?;
        let rpc_url = rpc_url
            .parse::<reqwest::Url>()
            .map_err(|e| Error::Config(format!("invalid RPC URL {rpc_url}: {e}")))?;

        Ok(Self {
            rpc_url,
            chain: ChainSpec::geogenesis_testnet(),
            gas: GasPolicy::default(),
            signer,
            confirm: true,
        })
    }

    pub fn with_gas(mut self, gas: GasPolicy) -> Self {
        self.gas = gas;
        self
    }

    /// Whether to wait for the inclusion receipt after sending.
    /// Defaults to true; batch callers turn it off to keep throughput.
    pub fn with_confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Address derived from the signing key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signer address as an EIP-55 checksummed string, usable as an edit
    /// author without pulling in the chain types
    pub fn author_address(&self) -> String {
        self.signer.address().to_checksum(None)
    }
}

#[async_trait]
impl CalldataSender for TransactionSubmitter {
    async fn send(&self, calldata: &Calldata) -> Result<String> {
        let to = Address::from_str(ensure_0x(&calldata.to).as_str())
            .map_err(|e| Error::InvalidInput(format!("invalid target address {}: {e}", calldata.to)))?;
        let input = Bytes::from_str(ensure_0x(&calldata.data).as_str())
            .map_err(|e| Error::InvalidInput(format!("invalid calldata hex: {e}")))?;

        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let tx = TransactionRequest::default()
            .with_chain_id(self.chain.chain_id)
            .with_to(to)
            .with_input(input)
            .with_value(U256::ZERO)
            .with_gas_limit(self.gas.gas_limit)
            .with_max_fee_per_gas(self.gas.max_fee_per_gas)
            .with_max_priority_fee_per_gas(self.gas.max_priority_fee_per_gas);

        debug!(to = %to, chain_id = self.chain.chain_id, "submitting transaction");
        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| Error::Chain(e.to_string()))?;
        let tx_hash = pending.tx_hash().to_string();

        if self.confirm {
            let receipt = pending
                .get_receipt()
                .await
                .map_err(|e| Error::Chain(e.to_string()))?;
            info!(tx = %tx_hash, block = ?receipt.block_number, "transaction confirmed");
        } else {
            info!(tx = %tx_hash, "transaction sent");
        }

        Ok(tx_hash)
    }
}
