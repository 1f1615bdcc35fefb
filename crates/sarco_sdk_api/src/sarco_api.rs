//! High-level api for creating, maintaining and reading sarcophagi.

use crate::*;
use std::future::Future;
use std::sync::Arc;

fn json<T: serde::Serialize>(t: &T) -> SarcoResult<serde_json::Value> {
    serde_json::to_value(t).map_err(one_err::OneErr::new)
}

/// High-level interface for interacting with sarcophagi.
///
/// Write calls are formatted here and handed to the [`ChainExecutor`];
/// reads go through the [`SarcoChain`] / [`SarcoIndex`] handles and the
/// batch resolver.
#[derive(Clone)]
pub struct SarcophagusApi {
    chain: SarcoChain,
    index: SarcoIndex,
    executor: ChainExecutor,
    time: TimeSource,
}

impl SarcophagusApi {
    /// Construct a new sarcophagus api over the given collaborators.
    pub fn new(
        chain: SarcoChain,
        index: SarcoIndex,
        executor: ChainExecutor,
        time: TimeSource,
    ) -> Self {
        Self {
            chain,
            index,
            executor,
            time,
        }
    }

    /// Create a new sarcophagus.
    ///
    /// Validates the settings and every selected archaeologist before
    /// anything is sent; fewer archaeologists than `threshold` is a
    /// validation error.
    pub fn create_sarcophagus(
        &self,
        id: SarcoId,
        settings: SarcophagusSettings,
        archaeologists: Vec<ArchaeologistSettings>,
        arweave_tx_id: Arc<str>,
        options: CallOptions,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        let executor = self.executor.clone();
        async move {
            validate_create(&settings, &archaeologists)?;
            let call = ContractCall::new(
                ContractTarget::EmbalmerFacet,
                "createSarcophagus",
                vec![
                    json(&id)?,
                    json(&settings)?,
                    json(&archaeologists)?,
                    json(&arweave_tx_id)?,
                ],
                options,
            );
            executor.send(call).await
        }
    }

    /// Push the resurrection time of a sarcophagus further into
    /// the future.
    pub fn rewrap_sarcophagus(
        &self,
        id: SarcoId,
        resurrection_time: i64,
        options: CallOptions,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        let call = ContractCall::new(
            ContractTarget::EmbalmerFacet,
            "rewrapSarcophagus",
            vec![id.as_str().into(), resurrection_time.into()],
            options,
        );
        self.executor.send(call)
    }

    /// Invalidate a sarcophagus for good. Cursed archaeologists are
    /// released and their bonds returned. Owner only.
    pub fn bury_sarcophagus(
        &self,
        id: SarcoId,
        options: CallOptions,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        let call = ContractCall::new(
            ContractTarget::EmbalmerFacet,
            "burySarcophagus",
            vec![id.as_str().into()],
            options,
        );
        self.executor.send(call)
    }

    /// Clean a sarcophagus that failed to be unwrapped. The owner may
    /// do this for a limited time after the resurrection time, after
    /// that only the DAO can.
    pub fn clean_sarcophagus(
        &self,
        id: SarcoId,
        options: CallOptions,
    ) -> impl Future<Output = SarcoResult<TxResponse>> + 'static + Send {
        let call = ContractCall::new(
            ContractTarget::EmbalmerFacet,
            "cleanSarcophagus",
            vec![id.as_str().into()],
            options,
        );
        self.executor.send(call)
    }

    /// Detailed view of one sarcophagus, including rewrap history.
    pub fn get_sarcophagus_details(
        &self,
        id: SarcoId,
    ) -> impl Future<Output = SarcoResult<SarcophagusView>> + 'static + Send {
        resolve_one(
            id,
            self.chain.clone(),
            self.index.clone(),
            self.time.clone(),
        )
    }

    /// Views of every sarcophagus created by `address`.
    pub fn get_embalmer_sarcophagi(
        &self,
        address: Arc<str>,
    ) -> impl Future<Output = SarcoResult<Vec<SarcophagusView>>> + 'static + Send
    {
        self.get_sarcophagi(address, SarcophagusFilter::Embalmer)
    }

    /// Views of every sarcophagus naming `address` as recipient.
    pub fn get_recipient_sarcophagi(
        &self,
        address: Arc<str>,
    ) -> impl Future<Output = SarcoResult<Vec<SarcophagusView>>> + 'static + Send
    {
        self.get_sarcophagi(address, SarcophagusFilter::Recipient)
    }

    /// Protocol-wide sarcophagi totals from the subgraph.
    pub fn get_sarcophagi_count(
        &self,
    ) -> impl Future<Output = SarcoResult<SubgraphSarcoCounts>> + 'static + Send
    {
        self.index.sarco_counts()
    }

    fn get_sarcophagi(
        &self,
        address: Arc<str>,
        filter: SarcophagusFilter,
    ) -> impl Future<Output = SarcoResult<Vec<SarcophagusView>>> + 'static + Send
    {
        let chain = self.chain.clone();
        let time = self.time.clone();
        async move {
            let ids = chain.list_sarcophagi(address.clone(), filter).await?;
            tracing::trace!(
                %address,
                method = filter.method_name(),
                count = ids.len(),
                "listed sarcophagi"
            );
            resolve_many(ids, chain, None, time).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem_chain::MemChain;
    use crate::validation::fixtures::*;
    use pretty_assertions::assert_eq;

    fn api(mem: &MemChain) -> SarcophagusApi {
        SarcophagusApi::new(
            mem.as_chain(),
            mem.as_index(),
            mem.as_executor(),
            TimeSource::chain(mem.as_chain()),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rewrap_formats_call() {
        let mem = MemChain::new();
        let opts = CallOptions {
            gas_limit: Some(300_000),
            ..Default::default()
        };

        let res = api(&mem)
            .rewrap_sarcophagus("0x01".into(), 1_700_000_000, opts.clone())
            .await
            .unwrap();

        assert!(!res.hash.is_empty());
        assert_eq!(
            vec![ContractCall::new(
                ContractTarget::EmbalmerFacet,
                "rewrapSarcophagus",
                vec![
                    serde_json::json!("0x01"),
                    serde_json::json!(1_700_000_000)
                ],
                opts,
            )],
            mem.sent_calls()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn bury_and_clean_format_calls() {
        let mem = MemChain::new();
        let api = api(&mem);
        api.bury_sarcophagus("0x01".into(), CallOptions::default())
            .await
            .unwrap();
        api.clean_sarcophagus("0x02".into(), CallOptions::default())
            .await
            .unwrap();

        let sent = mem.sent_calls();
        assert_eq!(2, sent.len());
        assert_eq!("burySarcophagus", &*sent[0].method);
        assert_eq!(vec![serde_json::json!("0x01")], sent[0].args);
        assert_eq!("cleanSarcophagus", &*sent[1].method);
        assert_eq!(vec![serde_json::json!("0x02")], sent[1].args);
        assert!(sent
            .iter()
            .all(|c| c.target == ContractTarget::EmbalmerFacet));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_formats_call() {
        let mem = MemChain::new();
        api(&mem)
            .create_sarcophagus(
                "0x01".into(),
                settings(2),
                vec![arch(1), arch(2)],
                "arweave-tx".into(),
                CallOptions::default(),
            )
            .await
            .unwrap();

        let sent = mem.sent_calls();
        assert_eq!(1, sent.len());
        assert_eq!("createSarcophagus", &*sent[0].method);
        assert_eq!(4, sent[0].args.len());
        assert_eq!("0x01", sent[0].args[0]);
        assert_eq!(2, sent[0].args[1]["threshold"]);
        assert_eq!("1000", sent[0].args[2][0]["curseFee"]);
        assert_eq!("arweave-tx", sent[0].args[3]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_rejects_too_few_archaeologists() {
        let mem = MemChain::new();
        let err = api(&mem)
            .create_sarcophagus(
                "0x01".into(),
                settings(3),
                vec![arch(1), arch(2)],
                "arweave-tx".into(),
                CallOptions::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(VALIDATION_ERROR, err.str_kind());
        assert!(mem.sent_calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_by_role() {
        let mem = MemChain::new();
        mem.set_grace_period(100);
        mem.set_block_time_sec(1000);
        for (id, rt) in [("0x01", 2000), ("0x02", 950), ("0x03", 10)] {
            mem.insert(
                id.into(),
                SarcophagusSnapshot {
                    resurrection_time: rt,
                    embalmer_address: "0xemb".into(),
                    recipient_address: if id == "0x02" {
                        "0xrec".into()
                    } else {
                        "0xother".into()
                    },
                    ..Default::default()
                },
            );
        }
        mem.set_rewraps(
            "0x01".into(),
            vec![RewrapHistoryEntry {
                rewrap_time: 900,
                new_resurrection_time: 2000,
            }],
        );
        let api = api(&mem);

        let embalmer = api.get_embalmer_sarcophagi("0xemb".into()).await.unwrap();
        assert_eq!(
            vec![
                LifecycleState::Active,
                LifecycleState::Resurrected,
                LifecycleState::Failed,
            ],
            embalmer.iter().map(|v| v.state).collect::<Vec<_>>()
        );
        // lists never carry history
        assert!(embalmer.iter().all(|v| v.rewraps.is_empty()));

        let recipient =
            api.get_recipient_sarcophagi("0xrec".into()).await.unwrap();
        assert_eq!(1, recipient.len());
        assert_eq!(SarcoId::from("0x02"), recipient[0].id);

        let details = api.get_sarcophagus_details("0x01".into()).await.unwrap();
        assert_eq!(1, details.rewraps.len());

        assert!(api
            .get_embalmer_sarcophagi("0xnobody".into())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn count_from_subgraph() {
        let mem = MemChain::new();
        let counts = SubgraphSarcoCounts {
            active_sarcophagi: 12,
            inactive_sarcophagi: 3,
        };
        mem.set_counts(counts);
        assert_eq!(counts, api(&mem).get_sarcophagi_count().await.unwrap());
    }
}
