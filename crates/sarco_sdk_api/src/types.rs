//! Sarcophagus data types as read from chain and index.

use crate::*;
use std::sync::Arc;

/// Resurrection time the contract writes when a sarcophagus is buried.
pub const BURIED_RESURRECTION_TIME: i64 = u32::MAX as i64;

/// Opaque sarcophagus identifier (a bytes32 hex string on chain).
/// The sdk never reformats or normalizes identifiers, they are passed
/// through exactly as given.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct SarcoId(pub Arc<str>);

impl SarcoId {
    /// Access the identifier as a str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SarcoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SarcoId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for SarcoId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<Arc<str>> for SarcoId {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

/// Protocol-wide slack, in seconds, after the resurrection time before
/// a sarcophagus is considered failed. Always non-negative.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct GracePeriod(i64);

impl GracePeriod {
    /// Construct a grace period, rejecting negative values.
    pub fn new(seconds: i64) -> SarcoResult<Self> {
        if seconds < 0 {
            return Err(validation_err(format!(
                "grace period must be non-negative, got {seconds}",
            )));
        }
        Ok(Self(seconds))
    }

    /// The grace period in seconds.
    pub fn as_secs(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for GracePeriod {
    type Error = one_err::OneErr;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}

impl From<GracePeriod> for i64 {
    fn from(g: GracePeriod) -> Self {
        g.0
    }
}

/// Sarco token amount in base units.
///
/// Serialized as a decimal string, amounts routinely exceed what a
/// json number can carry without loss. Deserializes from either a
/// decimal string or a plain integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct TokenAmount(pub u128);

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TokenAmount {
    type Err = one_err::OneErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Self).map_err(|e| {
            validation_err(format!("invalid token amount {s:?}: {e}"))
        })
    }
}

impl From<u128> for TokenAmount {
    fn from(a: u128) -> Self {
        Self(a)
    }
}

impl serde::Serialize for TokenAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for TokenAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Num(n) => Ok(Self(n as u128)),
        }
    }
}

/// Which on-chain index to list sarcophagi from.
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
pub enum SarcophagusFilter {
    /// Sarcophagi created by the address.
    Embalmer,

    /// Sarcophagi naming the address as recipient.
    Recipient,
}

impl SarcophagusFilter {
    /// The view-state facet method backing this filter.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Embalmer => "getEmbalmerSarcophagi",
            Self::Recipient => "getRecipientSarcophagi",
        }
    }
}

/// Raw sarcophagus state as returned by the view-state facet.
/// Owned by the chain, the sdk only ever reads it.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SarcophagusSnapshot {
    /// Human readable sarcophagus name.
    #[serde(default)]
    pub name: Arc<str>,

    /// Deadline (unix seconds) by which a rewrap or resurrection
    /// must occur.
    pub resurrection_time: i64,

    /// Time (unix seconds) of the last rewrap, or creation time
    /// if the sarcophagus was never rewrapped.
    #[serde(default)]
    pub previous_rewrap_time: i64,

    /// An archaeologist leaked their key early (accuse path).
    #[serde(default)]
    pub is_compromised: bool,

    /// The sarcophagus was intentionally invalidated.
    #[serde(default)]
    pub is_buried: bool,

    /// The sarcophagus was cleaned after failing to be unwrapped.
    #[serde(default)]
    pub is_cleaned: bool,

    /// Number of archaeologist keys required to resurrect.
    #[serde(default)]
    pub threshold: u8,

    /// Maximum seconds a single rewrap may extend the deadline by.
    #[serde(default)]
    pub maximum_rewrap_interval: i64,

    /// Resurrection time may never be pushed beyond this.
    #[serde(default)]
    pub maximum_resurrection_time: i64,

    /// Arweave tx holding the encrypted payload.
    #[serde(default)]
    pub arweave_tx_id: Arc<str>,

    /// Address of the embalmer who created the sarcophagus.
    #[serde(default)]
    pub embalmer_address: Arc<str>,

    /// Address of the recipient.
    #[serde(default)]
    pub recipient_address: Arc<str>,

    /// Addresses of the cursed archaeologists.
    #[serde(default)]
    pub archaeologist_addresses: Vec<Arc<str>>,

    /// How many archaeologists have published their private keys.
    #[serde(default)]
    pub published_private_key_count: u8,

    /// Whether archaeologist bonds are still locked.
    #[serde(default)]
    pub has_locked_bond: bool,
}

/// A single past rewrap, as indexed by the subgraph.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RewrapHistoryEntry {
    /// When the rewrap happened (unix seconds).
    pub rewrap_time: i64,

    /// The resurrection time set by this rewrap (unix seconds).
    pub new_resurrection_time: i64,
}

/// Sarcophagi totals as reported by the subgraph.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphSarcoCounts {
    /// Sarcophagi the index considers active.
    pub active_sarcophagi: u64,

    /// Sarcophagi the index considers inactive.
    pub inactive_sarcophagi: u64,
}
