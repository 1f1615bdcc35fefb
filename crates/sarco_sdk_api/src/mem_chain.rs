//! In-memory chain, index and executor - usually for testing.
//!
//! A [`MemChain`] holds a [`MemChainState`] dump behind a lock and can
//! hand out [`SarcoChain`], [`SarcoIndex`] and [`ChainExecutor`]
//! handles over it. Every submitted [`ContractCall`] is recorded.

use crate::sarco_core::traits::*;
use crate::*;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Serializable chain + index state backing a [`MemChain`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemChainState {
    /// Latest block timestamp, unix seconds.
    #[serde(default)]
    pub block_time_sec: i64,

    /// Raw protocol grace period, seconds.
    #[serde(default)]
    pub grace_period: i64,

    /// Sarcophagus snapshots by id.
    #[serde(default)]
    pub sarcophagi: HashMap<SarcoId, SarcophagusSnapshot>,

    /// Subgraph rewrap history by id.
    #[serde(default)]
    pub rewraps: HashMap<SarcoId, Vec<RewrapHistoryEntry>>,

    /// On-chain embalmer index, address to ids in creation order.
    #[serde(default)]
    pub embalmer_index: HashMap<Arc<str>, Vec<SarcoId>>,

    /// On-chain recipient index, address to ids in creation order.
    #[serde(default)]
    pub recipient_index: HashMap<Arc<str>, Vec<SarcoId>>,

    /// Token allowances, keyed by "owner:spender".
    #[serde(default)]
    pub allowances: HashMap<Arc<str>, TokenAmount>,

    /// Subgraph totals.
    #[serde(default)]
    pub counts: SubgraphSarcoCounts,
}

impl MemChainState {
    /// Decode a state dump. Json is a subset of yaml, so both work.
    pub fn from_bytes(bytes: &[u8]) -> SarcoResult<Self> {
        serde_yaml::from_slice(bytes).map_err(|e| {
            validation_err(format!("invalid chain state dump: {e}"))
        })
    }

    /// Insert or replace a sarcophagus, indexing it under its embalmer
    /// and recipient addresses. A replaced sarcophagus keeps its place
    /// in an index as long as the address is unchanged.
    pub fn insert(&mut self, id: SarcoId, snapshot: SarcophagusSnapshot) {
        let embalmer = snapshot.embalmer_address.clone();
        let recipient = snapshot.recipient_address.clone();
        if let Some(prev) = self.sarcophagi.insert(id.clone(), snapshot) {
            if prev.embalmer_address != embalmer {
                unindex(&mut self.embalmer_index, &prev.embalmer_address, &id);
            }
            if prev.recipient_address != recipient {
                unindex(
                    &mut self.recipient_index,
                    &prev.recipient_address,
                    &id,
                );
            }
        }
        index(&mut self.embalmer_index, embalmer, &id);
        index(&mut self.recipient_index, recipient, &id);
    }
}

fn index(
    map: &mut HashMap<Arc<str>, Vec<SarcoId>>,
    address: Arc<str>,
    id: &SarcoId,
) {
    if address.is_empty() {
        return;
    }
    let list = map.entry(address).or_default();
    if !list.contains(id) {
        list.push(id.clone());
    }
}

fn unindex(
    map: &mut HashMap<Arc<str>, Vec<SarcoId>>,
    address: &str,
    id: &SarcoId,
) {
    if let Some(list) = map.get_mut(address) {
        list.retain(|i| i != id);
        if list.is_empty() {
            map.remove(address);
        }
    }
}

fn allowance_key(owner: &str, spender: &str) -> Arc<str> {
    format!("{owner}:{spender}").into()
}

#[derive(Default)]
struct MemChainInner {
    state: MemChainState,
    failures: HashMap<SarcoId, Arc<str>>,
    delays: HashMap<SarcoId, Duration>,
    sent: Vec<ContractCall>,
    grace_period_reads: usize,
    block_time_reads: usize,
}

/// In-memory chain / index / executor.
#[derive(Clone, Default)]
pub struct MemChain(Arc<RwLock<MemChainInner>>);

impl MemChain {
    /// Create an empty in-memory chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory chain from a state dump.
    pub fn with_state(state: MemChainState) -> Self {
        let out = Self::default();
        out.0.write().state = state;
        out
    }

    /// Chain read handle over this state.
    pub fn as_chain(&self) -> SarcoChain {
        SarcoChain(Arc::new(self.clone()))
    }

    /// Subgraph read handle over this state.
    pub fn as_index(&self) -> SarcoIndex {
        SarcoIndex(Arc::new(self.clone()))
    }

    /// Executor handle recording every call.
    pub fn as_executor(&self) -> ChainExecutor {
        ChainExecutor(Arc::new(self.clone()))
    }

    /// Set the latest block timestamp.
    pub fn set_block_time_sec(&self, sec: i64) {
        self.0.write().state.block_time_sec = sec;
    }

    /// Set the raw grace period.
    pub fn set_grace_period(&self, seconds: i64) {
        self.0.write().state.grace_period = seconds;
    }

    /// Insert a sarcophagus (see [`MemChainState::insert`]).
    pub fn insert(&self, id: SarcoId, snapshot: SarcophagusSnapshot) {
        self.0.write().state.insert(id, snapshot);
    }

    /// Set the rewrap history of a sarcophagus.
    pub fn set_rewraps(&self, id: SarcoId, rewraps: Vec<RewrapHistoryEntry>) {
        self.0.write().state.rewraps.insert(id, rewraps);
    }

    /// Set a token allowance.
    pub fn set_allowance(&self, owner: &str, spender: &str, amount: TokenAmount) {
        self.0
            .write()
            .state
            .allowances
            .insert(allowance_key(owner, spender), amount);
    }

    /// Set the subgraph totals.
    pub fn set_counts(&self, counts: SubgraphSarcoCounts) {
        self.0.write().state.counts = counts;
    }

    /// Make every read of this sarcophagus fail with a FetchError.
    pub fn fail_reads_of(&self, id: SarcoId, message: &str) {
        self.0.write().failures.insert(id, message.into());
    }

    /// Delay every read of this sarcophagus.
    pub fn delay_reads_of(&self, id: SarcoId, delay: Duration) {
        self.0.write().delays.insert(id, delay);
    }

    /// All contract calls sent so far, in order.
    pub fn sent_calls(&self) -> Vec<ContractCall> {
        self.0.read().sent.clone()
    }

    /// How many times the grace period has been read.
    pub fn grace_period_reads(&self) -> usize {
        self.0.read().grace_period_reads
    }

    /// How many times the block time has been read.
    pub fn block_time_reads(&self) -> usize {
        self.0.read().block_time_reads
    }

    fn check_read(
        &self,
        id: &SarcoId,
    ) -> (Option<Duration>, SarcoResult<()>) {
        let lock = self.0.read();
        let delay = lock.delays.get(id).cloned();
        let res = match lock.failures.get(id) {
            Some(msg) => Err(fetch_err(msg)),
            None => Ok(()),
        };
        (delay, res)
    }
}

async fn maybe_delay(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

impl AsSarcoChain for MemChain {
    fn get_sarcophagus(
        &self,
        id: SarcoId,
    ) -> BoxFuture<'static, SarcoResult<SarcophagusSnapshot>> {
        let (delay, check) = self.check_read(&id);
        let res = check.and_then(|_| {
            self.0
                .read()
                .state
                .sarcophagi
                .get(&id)
                .cloned()
                .ok_or_else(|| fetch_err(format!("sarcophagus not found: {id}")))
        });
        async move {
            maybe_delay(delay).await;
            res
        }
        .boxed()
    }

    fn get_grace_period(&self) -> BoxFuture<'static, SarcoResult<i64>> {
        let mut lock = self.0.write();
        lock.grace_period_reads += 1;
        let g = lock.state.grace_period;
        async move { Ok(g) }.boxed()
    }

    fn list_sarcophagi(
        &self,
        address: Arc<str>,
        filter: SarcophagusFilter,
    ) -> BoxFuture<'static, SarcoResult<Vec<SarcoId>>> {
        let lock = self.0.read();
        let index = match filter {
            SarcophagusFilter::Embalmer => &lock.state.embalmer_index,
            SarcophagusFilter::Recipient => &lock.state.recipient_index,
        };
        let list = index.get(&address).cloned().unwrap_or_default();
        async move { Ok(list) }.boxed()
    }

    fn current_time_sec(&self) -> BoxFuture<'static, SarcoResult<i64>> {
        let mut lock = self.0.write();
        lock.block_time_reads += 1;
        let t = lock.state.block_time_sec;
        async move { Ok(t) }.boxed()
    }

    fn allowance(
        &self,
        owner: Arc<str>,
        spender: Arc<str>,
    ) -> BoxFuture<'static, SarcoResult<TokenAmount>> {
        let amount = self
            .0
            .read()
            .state
            .allowances
            .get(&allowance_key(&owner, &spender))
            .cloned()
            .unwrap_or_default();
        async move { Ok(amount) }.boxed()
    }
}

impl AsSarcoIndex for MemChain {
    fn rewrap_history(
        &self,
        id: SarcoId,
    ) -> BoxFuture<'static, SarcoResult<Vec<RewrapHistoryEntry>>> {
        let (delay, check) = self.check_read(&id);
        let res = check.map(|_| {
            self.0
                .read()
                .state
                .rewraps
                .get(&id)
                .cloned()
                .unwrap_or_default()
        });
        async move {
            maybe_delay(delay).await;
            res
        }
        .boxed()
    }

    fn sarco_counts(
        &self,
    ) -> BoxFuture<'static, SarcoResult<SubgraphSarcoCounts>> {
        let counts = self.0.read().state.counts;
        async move { Ok(counts) }.boxed()
    }
}

impl AsChainExecutor for MemChain {
    fn send(
        &self,
        call: ContractCall,
    ) -> BoxFuture<'static, SarcoResult<TxResponse>> {
        let mut lock = self.0.write();
        lock.sent.push(call);
        let hash = format!("0x{:064x}", lock.sent.len());
        async move { Ok(TxResponse { hash: hash.into() }) }.boxed()
    }
}
