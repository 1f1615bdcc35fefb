//! Sarco core collaborator types.
//!
//! The sdk never talks to a chain, indexer or transport directly. Each
//! boundary is an `As*` trait object, wrapped in a cheaply cloneable
//! handle struct that exposes the friendlier api.

use crate::*;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Helper traits for core types - you probably don't need these unless
/// you are implementing a new chain / index / executor backend.
pub mod traits {
    use super::*;

    /// Read access to the sarcophagus view-state facet and chain.
    pub trait AsSarcoChain: 'static + Send + Sync {
        /// Read the snapshot of a single sarcophagus.
        fn get_sarcophagus(
            &self,
            id: SarcoId,
        ) -> BoxFuture<'static, SarcoResult<SarcophagusSnapshot>>;

        /// Read the protocol grace period, in seconds. Implementations
        /// return the raw contract value, validation happens in
        /// [`SarcoChain::get_grace_period`].
        fn get_grace_period(&self) -> BoxFuture<'static, SarcoResult<i64>>;

        /// List the sarcophagi indexed on chain for an address.
        fn list_sarcophagi(
            &self,
            address: Arc<str>,
            filter: SarcophagusFilter,
        ) -> BoxFuture<'static, SarcoResult<Vec<SarcoId>>>;

        /// Timestamp (unix seconds) of the latest block.
        fn current_time_sec(&self) -> BoxFuture<'static, SarcoResult<i64>>;

        /// Sarco token allowance granted by `owner` to `spender`.
        fn allowance(
            &self,
            owner: Arc<str>,
            spender: Arc<str>,
        ) -> BoxFuture<'static, SarcoResult<TokenAmount>>;
    }

    /// Read access to the sarcophagus subgraph.
    pub trait AsSarcoIndex: 'static + Send + Sync {
        /// Rewrap history of a sarcophagus, ordered by occurrence.
        fn rewrap_history(
            &self,
            id: SarcoId,
        ) -> BoxFuture<'static, SarcoResult<Vec<RewrapHistoryEntry>>>;

        /// Protocol-wide sarcophagi totals.
        fn sarco_counts(
            &self,
        ) -> BoxFuture<'static, SarcoResult<SubgraphSarcoCounts>>;
    }

    /// Signs and submits contract calls. Gas, nonce and
    /// retry-on-revert handling all live behind this trait.
    pub trait AsChainExecutor: 'static + Send + Sync {
        /// Submit a state-changing contract call.
        fn send(
            &self,
            call: ContractCall,
        ) -> BoxFuture<'static, SarcoResult<TxResponse>>;
    }

    /// Source of "now" for lifecycle classification.
    pub trait AsTimeSource: 'static + Send + Sync {
        /// Current time in milliseconds.
        fn now_ms(&self) -> BoxFuture<'static, SarcoResult<i64>>;
    }

    /// A peer-to-peer transport emitting peer lifecycle events.
    pub trait AsPeerTransport: 'static + Send + Sync {
        /// Register a handler invoked for every subsequent peer event.
        fn register_peer_event_handler(&self, handler: PeerEventHandler);
    }
}
use traits::*;

/// Chain read handle.
#[derive(Clone)]
pub struct SarcoChain(pub Arc<dyn AsSarcoChain>);

impl SarcoChain {
    /// Read the snapshot of a single sarcophagus.
    pub fn get_sarcophagus(
        &self,
        id: SarcoId,
    ) -> impl Future<Output = SarcoResult<SarcophagusSnapshot>> + 'static + Send
    {
        AsSarcoChain::get_sarcophagus(&*self.0, id)
    }

    /// Read and validate the protocol grace period.
    pub fn get_grace_period(
        &self,
    ) -> impl Future<Output = SarcoResult<GracePeriod>> + 'static + Send {
        let fut = AsSarcoChain::get_grace_period(&*self.0);
        async move { GracePeriod::new(fut.await?) }
    }

    /// List the sarcophagi indexed on chain for an address.
    pub fn list_sarcophagi(
        &self,
        address: Arc<str>,
        filter: SarcophagusFilter,
    ) -> impl Future<Output = SarcoResult<Vec<SarcoId>>> + 'static + Send {
        AsSarcoChain::list_sarcophagi(&*self.0, address, filter)
    }

    /// Timestamp (unix seconds) of the latest block.
    pub fn current_time_sec(
        &self,
    ) -> impl Future<Output = SarcoResult<i64>> + 'static + Send {
        AsSarcoChain::current_time_sec(&*self.0)
    }

    /// Sarco token allowance granted by `owner` to `spender`.
    pub fn allowance(
        &self,
        owner: Arc<str>,
        spender: Arc<str>,
    ) -> impl Future<Output = SarcoResult<TokenAmount>> + 'static + Send {
        AsSarcoChain::allowance(&*self.0, owner, spender)
    }
}

/// Subgraph read handle.
#[derive(Clone)]
pub struct SarcoIndex(pub Arc<dyn AsSarcoIndex>);

impl SarcoIndex {
    /// Rewrap history of a sarcophagus, ordered by occurrence.
    pub fn rewrap_history(
        &self,
        id: SarcoId,
    ) -> impl Future<Output = SarcoResult<Vec<RewrapHistoryEntry>>> + 'static + Send
    {
        AsSarcoIndex::rewrap_history(&*self.0, id)
    }

    /// Protocol-wide sarcophagi totals.
    pub fn sarco_counts(
        &self,
    ) -> impl Future<Output = SarcoResult<SubgraphSarcoCounts>> + 'static + Send
    {
        AsSarcoIndex::sarco_counts(&*self.0)
    }
}

/// Contract call executor handle.
#[derive(Clone)]
pub struct ChainExecutor(pub Arc<dyn AsChainExecutor>);

impl ChainExecutor {
    /// Submit a state-changing contract call.
    pub fn send(
        &self,
        call: ContractCall,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        tracing::debug!(contract = ?call.target, method = %call.method, "send contract call");
        AsChainExecutor::send(&*self.0, call)
    }
}

/// Time source handle.
#[derive(Clone)]
pub struct TimeSource(pub Arc<dyn AsTimeSource>);

impl TimeSource {
    /// Current time in milliseconds.
    pub fn now_ms(
        &self,
    ) -> impl Future<Output = SarcoResult<i64>> + 'static + Send {
        AsTimeSource::now_ms(&*self.0)
    }

    /// Time source reading the latest block timestamp from chain.
    /// This is the time source to use against a live network, local
    /// wall clock time may be skewed relative to the chain.
    pub fn chain(chain: SarcoChain) -> Self {
        Self(Arc::new(PrivChainTime(chain)))
    }

    /// Time source always returning the given instant.
    pub fn fixed(now_ms: i64) -> Self {
        Self(Arc::new(PrivFixedTime(now_ms)))
    }
}

/// Peer transport handle.
#[derive(Clone)]
pub struct PeerTransport(pub Arc<dyn AsPeerTransport>);

impl PeerTransport {
    /// Register a handler invoked for every subsequent peer event.
    pub fn register_peer_event_handler(&self, handler: PeerEventHandler) {
        AsPeerTransport::register_peer_event_handler(&*self.0, handler)
    }
}

// -- private -- //

struct PrivChainTime(SarcoChain);

impl AsTimeSource for PrivChainTime {
    fn now_ms(&self) -> BoxFuture<'static, SarcoResult<i64>> {
        let fut = self.0.current_time_sec();
        async move {
            let sec = fut.await?;
            sec.checked_mul(1000).ok_or_else(|| {
                fetch_err(format!("block timestamp out of range: {sec}"))
            })
        }
        .boxed()
    }
}

struct PrivFixedTime(i64);

impl AsTimeSource for PrivFixedTime {
    fn now_ms(&self) -> BoxFuture<'static, SarcoResult<i64>> {
        let now = self.0;
        async move { Ok(now) }.boxed()
    }
}
