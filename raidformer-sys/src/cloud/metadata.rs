// SPDX-License-Identifier: GPL-3.0-only

//! Instance metadata service access
//!
//! The identity document is fetched using an IMDSv2 session token when the
//! service hands one out, falling back to IMDSv1 otherwise.

use std::time::Duration;

use raidformer_types::InstanceIdentity;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Result, SysError};

const IMDS_BASE: &str = "http://169.254.169.254/latest";
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: u32 = 300;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(IMDS_BASE)
    }

    /// Client for a metadata service at `base_url` (e.g. "http://127.0.0.1:8080/latest")
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // The link-local metadata service is never reached through a proxy
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()
            .map_err(|e| SysError::Metadata(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch and parse the instance identity document.
    pub fn identity(&self) -> Result<InstanceIdentity> {
        let token = match self.token() {
            Ok(token) => Some(token),
            Err(error) => {
                debug!("IMDSv2 token unavailable, falling back to IMDSv1: {}", error);
                None
            }
        };

        let url = format!("{}/dynamic/instance-identity/document", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &token {
            request = request.header(TOKEN_HEADER, token);
        }

        request
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| SysError::Metadata(format!("GET {}: {}", url, e)))?
            .json::<InstanceIdentity>()
            .map_err(|e| SysError::Metadata(format!("invalid identity document: {}", e)))
    }

    fn token(&self) -> Result<String> {
        let url = format!("{}/api/token", self.base_url);
        let token = self
            .client
            .put(&url)
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS.to_string())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| SysError::Metadata(format!("PUT {}: {}", url, e)))?;
        Ok(token.trim().to_string())
    }
}
