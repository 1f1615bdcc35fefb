#![deny(missing_docs)]
#![deny(warnings)]
// it's not possible to specify required
// bounds with the `async fn` syntax.
#![allow(clippy::manual_async_fn)]

//! sarcophagus protocol client sdk command line tool
//!
//! Helpers backing the `sarco` binary: config file persistence, chain
//! state dump inspection and tracing setup.

use sarco_sdk_api::mem_chain::*;
use sarco_sdk_api::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Re-exported dependencies.
pub mod dependencies {
    pub use dunce;
    pub use one_err;
    pub use sarco_sdk_api;
    pub use serde;
    pub use serde_json;
    pub use structopt;
    pub use tokio;
    pub use tracing;
    pub use tracing_subscriber;
}

/// Config file name, under the sarco root directory.
pub const CONFIG_N: &str = "sarco-config.yaml";

/// Initialize tracing. Output goes to stderr, filtered by `RUST_LOG`,
/// so stdout only ever carries command output.
pub fn init_tracing() {
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .compact()
            .finish(),
    );
}

fn config_path(sarco_root: &Path) -> PathBuf {
    let mut config_n = sarco_root.to_owned();
    config_n.push(CONFIG_N);
    config_n
}

/// Read the config file under `sarco_root`.
pub async fn read_config(sarco_root: &Path) -> SarcoResult<SarcoClientConfig> {
    let config_n = config_path(sarco_root);

    let bytes = match tokio::fs::read(&config_n).await {
        Err(e) => {
            return Err(format!(
                "Could not read config file {config_n:?}, did you run 'sarco init'? - {e}",
            )
            .into());
        }
        Ok(b) => b,
    };

    let config = SarcoClientConfigInner::from_bytes(&bytes)?;

    Ok(Arc::new(config))
}

/// Write a new config file under `sarco_root`, creating the directory
/// if needed. An existing config file is never overwritten.
pub async fn write_config(
    sarco_root: &Path,
    config: &SarcoClientConfigInner,
) -> SarcoResult<PathBuf> {
    use tokio::io::AsyncWriteExt;

    tokio::fs::DirBuilder::new()
        .recursive(true)
        .create(sarco_root)
        .await?;

    let config_n = config_path(sarco_root);

    if tokio::fs::metadata(&config_n).await.is_ok() {
        return Err(format!(
            "{config_n:?} already exists - refusing to overwrite existing config",
        )
        .into());
    }

    let mut config_f = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_n)
        .await?;

    config_f.write_all(config.to_string().as_bytes()).await?;
    config_f.shutdown().await?;

    tracing::info!(?config_n, "wrote sarco config");

    Ok(config_n)
}

/// Load a yaml / json chain state dump.
pub async fn load_state_dump(path: &Path) -> SarcoResult<MemChainState> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        one_err::OneErr::from(format!(
            "Could not read chain state dump {path:?} - {e}"
        ))
    })?;
    MemChainState::from_bytes(&bytes)
}

/// Which sarcophagi of a state dump to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectSelector {
    /// Every sarcophagus in the dump, ordered by id, with history.
    All,

    /// The given ids, in the given order, with history.
    Ids(Vec<SarcoId>),

    /// Sarcophagi created by this address.
    Embalmer(Arc<str>),

    /// Sarcophagi naming this address as recipient.
    Recipient(Arc<str>),
}

/// Result of inspecting a chain state dump.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    /// Resolved views.
    pub views: Vec<SarcophagusView>,

    /// Per-state tally of `views`.
    pub counts: SarcoCounts,

    /// Totals as recorded for the subgraph.
    pub subgraph_counts: SubgraphSarcoCounts,
}

/// Resolve views out of a chain state dump. "now" is the dump's block
/// time unless `now_ms` is given.
pub async fn inspect(
    state: MemChainState,
    selector: InspectSelector,
    now_ms: Option<i64>,
) -> SarcoResult<InspectReport> {
    let all_ids = {
        let mut ids: Vec<SarcoId> = state.sarcophagi.keys().cloned().collect();
        ids.sort();
        ids
    };

    let mem = MemChain::with_state(state);
    let time = match now_ms {
        Some(now_ms) => TimeSource::fixed(now_ms),
        None => TimeSource::chain(mem.as_chain()),
    };
    let api = SarcophagusApi::new(
        mem.as_chain(),
        mem.as_index(),
        mem.as_executor(),
        time.clone(),
    );

    let views = match selector {
        InspectSelector::All => {
            resolve_many(all_ids, mem.as_chain(), Some(mem.as_index()), time)
                .await?
        }
        InspectSelector::Ids(ids) => {
            resolve_many(ids, mem.as_chain(), Some(mem.as_index()), time)
                .await?
        }
        InspectSelector::Embalmer(address) => {
            api.get_embalmer_sarcophagi(address).await?
        }
        InspectSelector::Recipient(address) => {
            api.get_recipient_sarcophagi(address).await?
        }
    };

    let counts = SarcoCounts::tally(&views);
    let subgraph_counts = api.get_sarcophagi_count().await?;

    Ok(InspectReport {
        views,
        counts,
        subgraph_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> MemChainState {
        let mut state = MemChainState {
            block_time_sec: 10_000,
            grace_period: 100,
            ..Default::default()
        };
        for (id, rt) in [("0x02", 9_950), ("0x01", 20_000), ("0x03", 1)] {
            state.insert(
                id.into(),
                SarcophagusSnapshot {
                    resurrection_time: rt,
                    embalmer_address: "0xemb".into(),
                    ..Default::default()
                },
            );
        }
        state
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn inspect_all_sorted() {
        let report = inspect(state(), InspectSelector::All, None).await.unwrap();
        assert_eq!(
            vec!["0x01", "0x02", "0x03"],
            report.views.iter().map(|v| v.id.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(1, report.counts.active);
        assert_eq!(1, report.counts.resurrected);
        assert_eq!(1, report.counts.failed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn inspect_embalmer_keeps_creation_order() {
        let report =
            inspect(state(), InspectSelector::Embalmer("0xemb".into()), None)
                .await
                .unwrap();
        assert_eq!(
            vec!["0x02", "0x01", "0x03"],
            report.views.iter().map(|v| v.id.as_str()).collect::<Vec<_>>()
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn inspect_now_override() {
        let report = inspect(
            state(),
            InspectSelector::Ids(vec!["0x01".into()]),
            Some(0),
        )
        .await
        .unwrap();
        assert_eq!(LifecycleState::Active, report.views[0].state);

        let err = inspect(
            state(),
            InspectSelector::Ids(vec!["0xmissing".into()]),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(FETCH_ERROR, err.str_kind());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn config_refuses_overwrite() {
        let tmp = tempdir::TempDir::new("sarco-config-test").unwrap();
        let config = SarcoClientConfigInner::new(
            SarcoSupportedNetwork::Hardhat,
            "http://127.0.0.1:8545".into(),
        );

        let path = write_config(tmp.path(), &config).await.unwrap();
        assert!(path.ends_with(CONFIG_N));
        assert!(write_config(tmp.path(), &config).await.is_err());

        let read = read_config(tmp.path()).await.unwrap();
        assert_eq!(config, *read);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_config() {
        let tmp = tempdir::TempDir::new("sarco-config-test").unwrap();
        assert!(read_config(tmp.path()).await.is_err());
    }
}
