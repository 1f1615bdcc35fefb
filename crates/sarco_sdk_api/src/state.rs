//! Sarcophagus lifecycle state derivation.

use crate::*;

/// Lifecycle state of a sarcophagus at a given instant.
/// Exactly one state applies at any time.
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
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    /// The resurrection time has not yet been reached.
    Active,

    /// Past the resurrection time, but still inside the grace period.
    Resurrected,

    /// Intentionally invalidated by the embalmer or the DAO.
    Buried,

    /// Resurrection time plus grace period elapsed.
    Failed,

    /// An archaeologist compromised the sarcophagus early.
    Accused,
}

impl LifecycleState {
    /// All states, in declaration order.
    pub const ALL: [LifecycleState; 5] = [
        Self::Active,
        Self::Resurrected,
        Self::Buried,
        Self::Failed,
        Self::Accused,
    ];
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "Active",
            Self::Resurrected => "Resurrected",
            Self::Buried => "Buried",
            Self::Failed => "Failed",
            Self::Accused => "Accused",
        };
        f.write_str(s)
    }
}

/// Derive the lifecycle state of a sarcophagus.
///
/// `now_ms` must come from the same clock domain as the snapshot
/// (chain block time), in milliseconds. Never reads any clock itself.
/// Any timestamp is accepted; zero and negative values are simply
/// already elapsed.
pub fn classify(
    snapshot: &SarcophagusSnapshot,
    grace_period: GracePeriod,
    now_ms: i64,
) -> LifecycleState {
    if snapshot.is_compromised {
        return LifecycleState::Accused;
    }

    if snapshot.is_buried {
        return LifecycleState::Buried;
    }

    // i128 so no i64 timestamp can overflow the comparison
    let now_ms = now_ms as i128;
    let resurrection_ms = snapshot.resurrection_time as i128 * 1000;
    let grace_end_ms = (snapshot.resurrection_time as i128
        + grace_period.as_secs() as i128)
        * 1000;

    if now_ms < resurrection_ms {
        LifecycleState::Active
    } else if now_ms < grace_end_ms {
        LifecycleState::Resurrected
    } else {
        LifecycleState::Failed
    }
}
