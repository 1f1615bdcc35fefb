//! Batch resolution of sarcophagus identifiers into views.

use crate::*;
use std::future::Future;

/// Resolve a batch of sarcophagus identifiers into views.
///
/// - The grace period is read once and shared by the whole batch.
/// - "now" is captured once, before any per-identifier read, so every
///   view in the batch is classified against the same instant.
/// - Per-identifier reads run concurrently. If an `index` is given, the
///   rewrap history of each identifier is read alongside its snapshot,
///   otherwise every view carries an empty history.
/// - All or nothing: the first failing read aborts the batch and its
///   error is returned unchanged. There are no retries.
/// - Output order matches `ids`, regardless of read completion order.
///
/// Dropping the returned future abandons every in-flight read.
pub fn resolve_many(
    ids: Vec<SarcoId>,
    chain: SarcoChain,
    index: Option<SarcoIndex>,
    time: TimeSource,
) -> impl Future<Output = SarcoResult<Vec<SarcophagusView>>> + 'static + Send
{
    async move {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let grace_period = chain.get_grace_period().await?;
        let now_ms = time.now_ms().await?;

        tracing::debug!(
            count = ids.len(),
            grace_period = grace_period.as_secs(),
            now_ms,
            with_rewraps = index.is_some(),
            "resolving sarcophagus batch"
        );

        let reads = ids.into_iter().map(|id| {
            let snap_fut = chain.get_sarcophagus(id.clone());
            let rewrap_fut = index.as_ref().map(|i| i.rewrap_history(id.clone()));
            async move {
                let (snapshot, rewraps) = match rewrap_fut {
                    Some(rewrap_fut) => {
                        futures::future::try_join(snap_fut, rewrap_fut).await?
                    }
                    None => (snap_fut.await?, Vec::new()),
                };
                SarcoResult::Ok(aggregate(
                    id,
                    snapshot,
                    grace_period,
                    now_ms,
                    rewraps,
                ))
            }
        });

        let views = futures::future::try_join_all(reads).await.map_err(|e| {
            tracing::debug!(?e, "sarcophagus batch failed");
            e
        })?;

        Ok(views)
    }
}

/// Resolve a single identifier into a view, including rewrap history.
pub fn resolve_one(
    id: SarcoId,
    chain: SarcoChain,
    index: SarcoIndex,
    time: TimeSource,
) -> impl Future<Output = SarcoResult<SarcophagusView>> + 'static + Send {
    async move {
        let mut views =
            resolve_many(vec![id.clone()], chain, Some(index), time).await?;
        views.pop().ok_or_else(|| {
            fetch_err(format!("no view resolved for sarcophagus {id}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem_chain::MemChain;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn snap(resurrection_time: i64) -> SarcophagusSnapshot {
        SarcophagusSnapshot {
            resurrection_time,
            ..Default::default()
        }
    }

    fn setup() -> MemChain {
        let mem = MemChain::new();
        mem.set_grace_period(100);
        mem.set_block_time_sec(1000);
        mem.insert("0x01".into(), snap(2000));
        mem.insert("0x02".into(), snap(950));
        mem.insert("0x03".into(), snap(10));
        mem.insert(
            "0x04".into(),
            SarcophagusSnapshot {
                is_buried: true,
                resurrection_time: BURIED_RESURRECTION_TIME,
                ..Default::default()
            },
        );
        mem
    }

    fn ids(list: &[&str]) -> Vec<SarcoId> {
        list.iter().map(|s| SarcoId::from(*s)).collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resolves_in_input_order() {
        let mem = setup();
        let chain = mem.as_chain();
        let input = ids(&["0x04", "0x02", "0x01", "0x03"]);

        let views = resolve_many(
            input.clone(),
            chain.clone(),
            None,
            TimeSource::chain(chain),
        )
        .await
        .unwrap();

        assert_eq!(input, views.iter().map(|v| v.id.clone()).collect::<Vec<_>>());
        assert_eq!(
            vec![
                LifecycleState::Buried,
                LifecycleState::Resurrected,
                LifecycleState::Active,
                LifecycleState::Failed,
            ],
            views.iter().map(|v| v.state).collect::<Vec<_>>(),
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn order_independent_of_completion() {
        let mem = setup();
        mem.delay_reads_of("0x01".into(), Duration::from_millis(50));
        let input = ids(&["0x01", "0x02", "0x03"]);

        let views =
            resolve_many(input.clone(), mem.as_chain(), None, TimeSource::fixed(0))
                .await
                .unwrap();

        assert_eq!(input, views.iter().map(|v| v.id.clone()).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn grace_period_and_time_read_once_per_batch() {
        let mem = setup();
        let chain = mem.as_chain();

        resolve_many(
            ids(&["0x01", "0x02", "0x03", "0x04"]),
            chain.clone(),
            Some(mem.as_index()),
            TimeSource::chain(chain),
        )
        .await
        .unwrap();

        assert_eq!(1, mem.grace_period_reads());
        assert_eq!(1, mem.block_time_reads());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_failure_fails_whole_batch() {
        let mem = setup();
        mem.fail_reads_of("0x02".into(), "contract reverted");

        let err = resolve_many(
            ids(&["0x01", "0x02", "0x03"]),
            mem.as_chain(),
            None,
            TimeSource::fixed(0),
        )
        .await
        .unwrap_err();

        assert_eq!(FETCH_ERROR, err.str_kind());
        assert_eq!(Some("contract reverted"), err.get_message());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn history_failure_fails_whole_batch() {
        let mem = setup();
        let index = MemChain::new();
        index.fail_reads_of("0x03".into(), "indexer unavailable");

        let res = resolve_many(
            ids(&["0x01", "0x03"]),
            mem.as_chain(),
            Some(index.as_index()),
            TimeSource::fixed(0),
        )
        .await;

        assert!(res.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn negative_grace_period_fails_batch() {
        let mem = setup();
        mem.set_grace_period(-1);

        let err = resolve_many(
            ids(&["0x01"]),
            mem.as_chain(),
            None,
            TimeSource::fixed(0),
        )
        .await
        .unwrap_err();

        assert_eq!(VALIDATION_ERROR, err.str_kind());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_batch_reads_nothing() {
        let mem = setup();
        let chain = mem.as_chain();
        let views =
            resolve_many(Vec::new(), chain.clone(), None, TimeSource::chain(chain))
                .await
                .unwrap();
        assert!(views.is_empty());
        assert_eq!(0, mem.grace_period_reads());
        assert_eq!(0, mem.block_time_reads());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn resolve_one_includes_history() {
        let mem = setup();
        let history = vec![
            RewrapHistoryEntry {
                rewrap_time: 500,
                new_resurrection_time: 1500,
            },
            RewrapHistoryEntry {
                rewrap_time: 900,
                new_resurrection_time: 2000,
            },
        ];
        mem.set_rewraps("0x01".into(), history.clone());

        let view = resolve_one(
            "0x01".into(),
            mem.as_chain(),
            mem.as_index(),
            TimeSource::fixed(1_000_000),
        )
        .await
        .unwrap();

        assert_eq!(SarcoId::from("0x01"), view.id);
        assert_eq!(LifecycleState::Active, view.state);
        assert_eq!(history, view.rewraps);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_batch_does_not_poison_next_call() {
        let mem = setup();
        mem.delay_reads_of("0x01".into(), Duration::from_secs(10));

        let slow = resolve_many(
            ids(&["0x01", "0x02"]),
            mem.as_chain(),
            None,
            TimeSource::fixed(0),
        );
        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), slow).await;
        assert!(timed_out.is_err());

        let views = resolve_many(
            ids(&["0x02", "0x03"]),
            mem.as_chain(),
            None,
            TimeSource::fixed(0),
        )
        .await
        .unwrap();
        assert_eq!(2, views.len());
    }
}
