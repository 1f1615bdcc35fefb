//! Contract call formatting types.

use std::sync::Arc;

/// The contract a call is addressed to. The executor maps these to
/// deployed addresses / abis for its network.
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
pub enum ContractTarget {
    /// The embalmer facet of the sarcophagus diamond.
    EmbalmerFacet,

    /// The sarco erc20 token.
    SarcoToken,
}

/// Options forwarded to the executor with every call.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    /// Explicit gas limit, executor estimates if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,

    /// Explicit nonce, executor picks the next one if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,

    /// How many times the executor may retry a reverted call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_on_revert: Option<u32>,
}

/// A fully formatted contract call.
#[derive(
    Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    /// Target contract.
    pub target: ContractTarget,

    /// Contract method name.
    pub method: Arc<str>,

    /// Positional, abi-ordered arguments.
    pub args: Vec<serde_json::Value>,

    /// Options for the executor.
    pub options: CallOptions,
}

impl ContractCall {
    /// Construct a new contract call.
    pub fn new(
        target: ContractTarget,
        method: &str,
        args: Vec<serde_json::Value>,
        options: CallOptions,
    ) -> Self {
        Self {
            target,
            method: method.into(),
            args,
            options,
        }
    }
}

/// Response from a submitted transaction.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    /// Transaction hash.
    pub hash: Arc<str>,
}
