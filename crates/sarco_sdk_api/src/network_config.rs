//! Per-network sarcophagus deployment constants.

use crate::*;
use std::sync::Arc;

/// Ethereum mainnet chain id.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Goerli testnet chain id.
pub const GOERLI_CHAIN_ID: u64 = 5;

/// Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Base goerli testnet chain id.
pub const BASE_GOERLI_CHAIN_ID: u64 = 84531;

/// Polygon mumbai testnet chain id.
pub const POLYGON_MUMBAI_CHAIN_ID: u64 = 80001;

/// Local hardhat node chain id.
pub const HARDHAT_CHAIN_ID: u64 = 31337;

const API_URL_BASE: &str = "https://api.encryptafile.com";
const SUBGRAPH_BASE: &str = "https://api.studio.thegraph.com/query/49076";

/// Bundlr upload node settings.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct BundlrConfig {
    /// Currency bundlr is paid in.
    pub currency_name: Arc<str>,

    /// Bundlr node url, empty if uploads are not supported.
    pub node_url: Arc<str>,
}

/// Arweave gateway settings.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ArweaveConfig {
    /// Gateway host.
    pub host: Arc<str>,

    /// Gateway port.
    pub port: u16,

    /// Gateway protocol.
    pub protocol: Arc<str>,

    /// Request timeout, milliseconds.
    pub timeout: u64,

    /// Whether the arweave client logs requests.
    pub logging: bool,
}

impl Default for ArweaveConfig {
    fn default() -> Self {
        Self {
            host: "arweave.net".into(),
            port: 443,
            protocol: "https".into(),
            timeout: 20_000,
            logging: false,
        }
    }
}

/// Deployment constants for a single network.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SarcoNetworkConfig {
    /// Chain id.
    pub chain_id: u64,

    /// Display name.
    pub network_name: Arc<str>,

    /// Short display name.
    pub network_short_name: Arc<str>,

    /// Native token symbol.
    pub token_symbol: Arc<str>,

    /// Sarco erc20 token address.
    pub sarco_token_address: Arc<str>,

    /// Sarcophagus diamond address.
    pub diamond_deploy_address: Arc<str>,

    /// Etherscan (or compatible) api url.
    #[serde(default)]
    pub etherscan_api_url: Arc<str>,

    /// Etherscan (or compatible) api key.
    #[serde(default)]
    pub etherscan_api_key: Arc<str>,

    /// Block explorer url.
    #[serde(default)]
    pub explorer_url: Arc<str>,

    /// Bundlr settings.
    pub bundlr: BundlrConfig,

    /// Arweave settings.
    #[serde(default)]
    pub arweave: ArweaveConfig,

    /// Json-rpc provider url.
    #[serde(default)]
    pub provider_url: Arc<str>,

    /// Sarcophagus subgraph url, empty if none is deployed.
    #[serde(default)]
    pub subgraph_url: Arc<str>,

    /// 0x api key, used for token swap quotes.
    #[serde(default)]
    pub zero_ex_api_key: Arc<str>,

    /// Base url of the sarcophagus helper api.
    #[serde(default)]
    pub api_url_base: Arc<str>,
}

#[allow(clippy::too_many_arguments)]
fn testnet(
    chain_id: u64,
    name: &str,
    sarco_token_address: &str,
    diamond_deploy_address: &str,
    etherscan_api_url: &str,
    explorer_url: &str,
    subgraph: &str,
    provider_url: Arc<str>,
) -> SarcoNetworkConfig {
    SarcoNetworkConfig {
        chain_id,
        network_name: format!("{name} Testnet").into(),
        network_short_name: name.into(),
        token_symbol: "ETH".into(),
        sarco_token_address: sarco_token_address.into(),
        diamond_deploy_address: diamond_deploy_address.into(),
        etherscan_api_url: etherscan_api_url.into(),
        etherscan_api_key: "".into(),
        explorer_url: explorer_url.into(),
        bundlr: BundlrConfig {
            currency_name: "ethereum".into(),
            node_url: "https://devnet.bundlr.network".into(),
        },
        arweave: ArweaveConfig::default(),
        provider_url,
        subgraph_url: format!("{SUBGRAPH_BASE}/{subgraph}").into(),
        zero_ex_api_key: "".into(),
        api_url_base: API_URL_BASE.into(),
    }
}

impl SarcoNetworkConfig {
    /// Ethereum mainnet.
    pub fn mainnet(provider_url: Arc<str>) -> Self {
        Self {
            chain_id: MAINNET_CHAIN_ID,
            network_name: "Etherum Mainnet".into(),
            network_short_name: "Mainnet".into(),
            token_symbol: "ETH".into(),
            sarco_token_address: "0x7697b462a7c4ff5f8b55bdbc2f4076c2af9cf51a"
                .into(),
            diamond_deploy_address:
                "0x0Ec977D1863Eb919a2Ecd65d17Cc3f2CFdaCe3Ab".into(),
            etherscan_api_url: "https://api.etherscan.io/api".into(),
            etherscan_api_key: "".into(),
            explorer_url: "https://etherscan.io/".into(),
            bundlr: BundlrConfig {
                currency_name: "ethereum".into(),
                node_url: "https://node1.bundlr.network".into(),
            },
            arweave: ArweaveConfig::default(),
            provider_url,
            subgraph_url: format!("{SUBGRAPH_BASE}/sarcophagus-v2/v0.0.1")
                .into(),
            zero_ex_api_key: "".into(),
            api_url_base: API_URL_BASE.into(),
        }
    }

    /// Goerli testnet.
    pub fn goerli(provider_url: Arc<str>) -> Self {
        testnet(
            GOERLI_CHAIN_ID,
            "Goerli",
            "0x4633b43990b41B57b3678c6F3Ac35bA75C3D8436",
            "0x23205431DAa31e9b54d0EBF40e45CC03aC759a22",
            "https://api-goerli.etherscan.io/api",
            "https://goerli.etherscan.io/",
            "sarco-goerli-test/two",
            provider_url,
        )
    }

    /// Sepolia testnet.
    pub fn sepolia(provider_url: Arc<str>) -> Self {
        testnet(
            SEPOLIA_CHAIN_ID,
            "Sepolia",
            "0x9F8FBFb135bfA9233347FA43516E6Ce233EA7e1D",
            "0x03333b101F653D5ad13BDd9f524b760e0cCe9f8b",
            "https://api-sepolia.etherscan.io/api",
            "https://sepolia.etherscan.io/",
            "sepolia/v0.0.1",
            provider_url,
        )
    }

    /// Base goerli testnet.
    pub fn base_goerli(provider_url: Arc<str>) -> Self {
        testnet(
            BASE_GOERLI_CHAIN_ID,
            "BaseGoerli",
            "0x2BC9019e6d9e6a26D7D8d8CDDa4e5dE9B787D7bb",
            "0xB933926f50b33797d0fa1DaEe65D5830224E53E1",
            "https://api-goerli.basescan.org/api",
            "https://goerli.basescan.org",
            "base-goerli/v0.0.1",
            provider_url,
        )
    }

    /// Polygon mumbai testnet.
    pub fn polygon_mumbai(provider_url: Arc<str>) -> Self {
        let mut out = testnet(
            POLYGON_MUMBAI_CHAIN_ID,
            "PolygonMumbai",
            "0x2BC9019e6d9e6a26D7D8d8CDDa4e5dE9B787D7bb",
            "0x42F2C41e0285B3CBED8084b2c7476F11730935Bc",
            "https://api-testnet.polygonscan.com/api",
            "https://mumbai.polygonscan.com/",
            "polygon-mumbai/v0.0.1",
            provider_url,
        );
        out.token_symbol = "MATIC".into();
        out
    }

    /// Local hardhat node. There is no subgraph, bundlr node or
    /// helper api for local deployments.
    pub fn hardhat(provider_url: Arc<str>) -> Self {
        Self {
            chain_id: HARDHAT_CHAIN_ID,
            network_name: "Hardhat Local Network".into(),
            network_short_name: "HardHat".into(),
            token_symbol: "ETH".into(),
            sarco_token_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
                .into(),
            diamond_deploy_address:
                "0xA51c1fc2f0D1a1b8494Ed1FE312d7C3a78Ed91C0".into(),
            etherscan_api_url: "".into(),
            etherscan_api_key: "".into(),
            explorer_url: "".into(),
            bundlr: BundlrConfig {
                currency_name: "ethereum".into(),
                node_url: "".into(),
            },
            arweave: ArweaveConfig::default(),
            provider_url,
            subgraph_url: "".into(),
            zero_ex_api_key: "".into(),
            api_url_base: "".into(),
        }
    }

    /// Parsed subgraph url, `None` if this network has no subgraph.
    pub fn subgraph_url(&self) -> SarcoResult<Option<url::Url>> {
        parse_optional_url("subgraphUrl", &self.subgraph_url)
    }

    /// Parsed provider url, `None` if unset.
    pub fn provider_url(&self) -> SarcoResult<Option<url::Url>> {
        parse_optional_url("providerUrl", &self.provider_url)
    }

    /// Check that the configured addresses and urls are well-formed.
    pub fn validate(&self) -> SarcoResult<()> {
        validate_address("sarcoTokenAddress", &self.sarco_token_address)?;
        validate_address(
            "diamondDeployAddress",
            &self.diamond_deploy_address,
        )?;
        self.subgraph_url()?;
        self.provider_url()?;
        Ok(())
    }
}

fn parse_optional_url(field: &str, raw: &str) -> SarcoResult<Option<url::Url>> {
    if raw.is_empty() {
        return Ok(None);
    }
    url::Url::parse(raw)
        .map(Some)
        .map_err(|e| validation_err(format!("invalid {field} {raw:?}: {e}")))
}

/// The networks sarcophagus is deployed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SarcoSupportedNetwork {
    /// Ethereum mainnet.
    Mainnet,

    /// Goerli testnet.
    Goerli,

    /// Sepolia testnet.
    Sepolia,

    /// Base goerli testnet.
    BaseGoerli,

    /// Polygon mumbai testnet.
    PolygonMumbai,

    /// Local hardhat node.
    Hardhat,
}

impl SarcoSupportedNetwork {
    /// Every supported network.
    pub const ALL: [Self; 6] = [
        Self::Mainnet,
        Self::Goerli,
        Self::Sepolia,
        Self::BaseGoerli,
        Self::PolygonMumbai,
        Self::Hardhat,
    ];

    /// Chain id of this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => MAINNET_CHAIN_ID,
            Self::Goerli => GOERLI_CHAIN_ID,
            Self::Sepolia => SEPOLIA_CHAIN_ID,
            Self::BaseGoerli => BASE_GOERLI_CHAIN_ID,
            Self::PolygonMumbai => POLYGON_MUMBAI_CHAIN_ID,
            Self::Hardhat => HARDHAT_CHAIN_ID,
        }
    }

    /// Short name of this network, as accepted by [`std::str::FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Goerli => "goerli",
            Self::Sepolia => "sepolia",
            Self::BaseGoerli => "baseGoerli",
            Self::PolygonMumbai => "polygonMumbai",
            Self::Hardhat => "hardhat",
        }
    }

    /// Look up a network by chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }

    /// Deployment constants for this network.
    pub fn config(&self, provider_url: Arc<str>) -> SarcoNetworkConfig {
        match self {
            Self::Mainnet => SarcoNetworkConfig::mainnet(provider_url),
            Self::Goerli => SarcoNetworkConfig::goerli(provider_url),
            Self::Sepolia => SarcoNetworkConfig::sepolia(provider_url),
            Self::BaseGoerli => SarcoNetworkConfig::base_goerli(provider_url),
            Self::PolygonMumbai => {
                SarcoNetworkConfig::polygon_mumbai(provider_url)
            }
            Self::Hardhat => SarcoNetworkConfig::hardhat(provider_url),
        }
    }
}

impl std::fmt::Display for SarcoSupportedNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SarcoSupportedNetwork {
    type Err = one_err::OneErr;

    /// Parses a short name (case-insensitive, `-` / `_` ignored) or a
    /// decimal chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(chain_id) = s.parse::<u64>() {
            return Self::from_chain_id(chain_id).ok_or_else(|| {
                validation_err(format!("unsupported chain id: {chain_id}"))
            });
        }
        let norm: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|n| n.name().to_ascii_lowercase() == norm)
            .ok_or_else(|| validation_err(format!("unsupported network: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_and_chain_id_agree() {
        for net in SarcoSupportedNetwork::ALL {
            let by_name: SarcoSupportedNetwork = net.name().parse().unwrap();
            let by_id: SarcoSupportedNetwork =
                net.chain_id().to_string().parse().unwrap();
            assert_eq!(net, by_name);
            assert_eq!(net, by_id);
            assert_eq!(net.chain_id(), net.config("".into()).chain_id);
        }
    }

    #[test]
    fn parse_variants() {
        assert_eq!(
            SarcoSupportedNetwork::BaseGoerli,
            "base-goerli".parse().unwrap()
        );
        assert_eq!(
            SarcoSupportedNetwork::PolygonMumbai,
            "POLYGON_MUMBAI".parse().unwrap()
        );
        let err = "ropsten".parse::<SarcoSupportedNetwork>().unwrap_err();
        assert_eq!(VALIDATION_ERROR, err.str_kind());
        assert!("3".parse::<SarcoSupportedNetwork>().is_err());
    }

    #[test]
    fn all_configs_validate() {
        for net in SarcoSupportedNetwork::ALL {
            net.config("http://127.0.0.1:8545".into()).validate().unwrap();
        }
    }

    #[test]
    fn network_specifics() {
        let mumbai = SarcoNetworkConfig::polygon_mumbai("".into());
        assert_eq!("MATIC", &*mumbai.token_symbol);
        assert_eq!("PolygonMumbai Testnet", &*mumbai.network_name);

        let hardhat = SarcoNetworkConfig::hardhat("".into());
        assert_eq!(None, hardhat.subgraph_url().unwrap());
        assert!(hardhat.bundlr.node_url.is_empty());

        let mainnet = SarcoNetworkConfig::mainnet("".into());
        assert_eq!(
            "api.studio.thegraph.com",
            mainnet.subgraph_url().unwrap().unwrap().host_str().unwrap()
        );
        assert_eq!("https://node1.bundlr.network", &*mainnet.bundlr.node_url);
        assert_eq!(443, mainnet.arweave.port);
    }

    #[test]
    fn bad_url_rejected() {
        let mut cfg = SarcoNetworkConfig::goerli("".into());
        cfg.provider_url = "not a url".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(VALIDATION_ERROR, err.str_kind());
    }
}
