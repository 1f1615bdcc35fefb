//! Aggregated sarcophagus views.

use crate::*;

/// A point-in-time view of a sarcophagus, merging the on-chain snapshot,
/// the derived lifecycle state, and the indexed rewrap history.
///
/// Views are rebuilt on every query and never cached, so two views of
/// the same sarcophagus taken close in time may legitimately disagree.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SarcophagusView {
    /// The identifier this view was requested for, verbatim.
    pub id: SarcoId,

    /// On-chain snapshot fields.
    #[serde(flatten)]
    pub snapshot: SarcophagusSnapshot,

    /// Lifecycle state derived from the snapshot.
    pub state: LifecycleState,

    /// Rewrap history, informational only.
    pub rewraps: Vec<RewrapHistoryEntry>,
}

/// Build a view from pre-fetched inputs. Performs no io.
pub fn aggregate(
    id: SarcoId,
    snapshot: SarcophagusSnapshot,
    grace_period: GracePeriod,
    now_ms: i64,
    rewraps: Vec<RewrapHistoryEntry>,
) -> SarcophagusView {
    let state = classify(&snapshot, grace_period, now_ms);
    SarcophagusView {
        id,
        snapshot,
        state,
        rewraps,
    }
}

/// Per-state tally of a batch of views.
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
pub struct SarcoCounts {
    /// Views in the Active state.
    pub active: usize,
    /// Views in the Resurrected state.
    pub resurrected: usize,
    /// Views in the Buried state.
    pub buried: usize,
    /// Views in the Failed state.
    pub failed: usize,
    /// Views in the Accused state.
    pub accused: usize,
}

impl SarcoCounts {
    /// Tally the states of a batch of views.
    pub fn tally<'a, I>(views: I) -> Self
    where
        I: IntoIterator<Item = &'a SarcophagusView>,
    {
        views.into_iter().fold(Self::default(), |mut out, view| {
            match view.state {
                LifecycleState::Active => out.active += 1,
                LifecycleState::Resurrected => out.resurrected += 1,
                LifecycleState::Buried => out.buried += 1,
                LifecycleState::Failed => out.failed += 1,
                LifecycleState::Accused => out.accused += 1,
            }
            out
        })
    }

    /// Total number of views tallied.
    pub fn total(&self) -> usize {
        self.active + self.resurrected + self.buried + self.failed + self.accused
    }
}
