//! Edit publication to content-addressed storage
//!
//! Edits are serialized to JSON and uploaded through the hosted API's
//! IPFS gateway. The returned content id is the edit's permanent handle;
//! everything downstream (calldata, the on-chain anchor) refers to the
//! edit by this cid.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ops::Edit;

const IPFS_SCHEME: &str = "ipfs://";

/// Normalize a content id to its `ipfs://` form, never doubling the
/// scheme.
pub fn normalize_cid(cid: &str) -> String {
    if cid.starts_with(IPFS_SCHEME) {
        cid.to_string()
    } else {
        format!("{IPFS_SCHEME}{cid}")
    }
}

/// Upload seam for edits. The hosted gateway implements it; tests
/// substitute an in-memory recorder.
#[async_trait]
pub trait EditPublisher: Send + Sync {
    /// Publish the edit and return its `ipfs://` content id.
    async fn publish(&self, edit: &Edit) -> Result<String>;
}

#[derive(Deserialize)]
struct UploadResponse {
    cid: String,
}

/// Publisher backed by the hosted API's IPFS gateway
#[derive(Debug, Clone)]
pub struct IpfsPublisher {
    http: reqwest::Client,
    base_url: String,
}

impl IpfsPublisher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EditPublisher for IpfsPublisher {
    async fn publish(&self, edit: &Edit) -> Result<String> {
        let url = format!("{}/ipfs/upload-edit", self.base_url);
        debug!(name = %edit.name, ops = edit.ops.len(), "uploading edit");

        let response = self.http.post(&url).json(edit).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(Error::Publish(format!("status {status}: {body}")));
        }

        let uploaded = response.json::<UploadResponse>().await?;
        if uploaded.cid.is_empty() {
            return Err(Error::Publish("upload returned an empty cid".to_string()));
        }
        Ok(normalize_cid(&uploaded.cid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_cid() {
        assert_eq!(normalize_cid("QmAbc"), "ipfs://QmAbc");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        assert_eq!(normalize_cid("ipfs://QmAbc"), "ipfs://QmAbc");
        assert_eq!(normalize_cid(&normalize_cid("QmAbc")), "ipfs://QmAbc");
    }
}
