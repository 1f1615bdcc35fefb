//! Sarco token approval and allowance.

use crate::*;
use std::future::Future;
use std::sync::Arc;

/// Sarco token helpers, scoped to the sarcophagus diamond as spender.
#[derive(Clone)]
pub struct Token {
    diamond_address: Arc<str>,
    chain: SarcoChain,
    executor: ChainExecutor,
}

impl Token {
    /// Construct a new token api.
    pub fn new(
        diamond_address: Arc<str>,
        chain: SarcoChain,
        executor: ChainExecutor,
    ) -> Self {
        Self {
            diamond_address,
            chain,
            executor,
        }
    }

    /// The spender all approvals are granted to.
    pub fn diamond_address(&self) -> &Arc<str> {
        &self.diamond_address
    }

    /// Approve the sarcophagus contracts to spend `amount` sarco tokens
    /// on behalf of the signer.
    pub fn approve(
        &self,
        amount: TokenAmount,
        options: CallOptions,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        let call = ContractCall::new(
            ContractTarget::SarcoToken,
            "approve",
            vec![
                serde_json::Value::from(&*self.diamond_address),
                amount.to_string().into(),
            ],
            options,
        );
        self.executor.send(call)
    }

    /// Amount of sarco tokens the sarcophagus contracts may spend on
    /// behalf of `owner`.
    pub fn allowance(
        &self,
        owner: Arc<str>,
    ) -> impl Future<Output = SarcoResult<TokenAmount>> + 'static + Send {
        let fut = self
            .chain
            .allowance(owner.clone(), self.diamond_address.clone());
        async move {
            fut.await.map_err(|err| {
                tracing::error!(?err, %owner, "sarco token allowance failed");
                err
            })
        }
    }
}
