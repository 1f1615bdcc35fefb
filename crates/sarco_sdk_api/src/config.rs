//! Sarco client configuration.

use crate::*;
use std::sync::Arc;

/// Configuration for a [`SarcoClient`].
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SarcoClientConfigInner {
    /// Deployment constants of the network the client talks to.
    pub network: SarcoNetworkConfig,

    /// Default options attached to every contract call.
    #[serde(default)]
    pub call_options: CallOptions,
}

/// Sarco client configuration, shared.
pub type SarcoClientConfig = Arc<SarcoClientConfigInner>;

impl std::fmt::Display for SarcoClientConfigInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_yaml::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&s)
    }
}

impl SarcoClientConfigInner {
    /// Construct a default config for a supported network.
    pub fn new(network: SarcoSupportedNetwork, provider_url: Arc<str>) -> Self {
        Self {
            network: network.config(provider_url),
            call_options: CallOptions::default(),
        }
    }

    /// Decode a yaml config file, validating the network section.
    pub fn from_bytes(bytes: &[u8]) -> SarcoResult<Self> {
        let config: Self = serde_yaml::from_slice(bytes)
            .map_err(|e| validation_err(format!("invalid sarco config: {e}")))?;
        config.network.validate()?;
        Ok(config)
    }
}
