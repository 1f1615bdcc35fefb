// grrr clippy... you cannot specify extra bounds with the async fn syntax...
#![allow(clippy::manual_async_fn)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! sarcophagus protocol client sdk command line tool

use sarco_sdk::dependencies::*;
use sarco_sdk::*;
use sarco_sdk_api::prelude::*;
use structopt::StructOpt;

mod cmd_classify;
mod cmd_init;
mod cmd_inspect;
mod cmd_network;

#[derive(Debug, StructOpt)]
pub(crate) struct OptInit {
    /// The network to configure, by short name
    /// (mainnet, goerli, sepolia, baseGoerli, polygonMumbai,
    /// hardhat) or by chain id.
    #[structopt(verbatim_doc_comment)]
    pub network: SarcoSupportedNetwork,

    /// Json-rpc provider url to record in the config.
    #[structopt(short = "p", long, default_value = "", verbatim_doc_comment)]
    pub provider_url: String,
}

#[derive(Debug, StructOpt)]
pub(crate) struct OptClassify {
    /// Resurrection time of the sarcophagus, unix seconds.
    /// May be negative.
    #[structopt(allow_hyphen_values = true, verbatim_doc_comment)]
    pub resurrection_time: i64,

    /// Protocol grace period, seconds. Must not be negative.
    #[structopt(short = "g", long, default_value = "0", verbatim_doc_comment)]
    pub grace_period: i64,

    /// "now", unix milliseconds. Defaults to the local clock.
    #[structopt(short = "n", long, verbatim_doc_comment)]
    pub now_ms: Option<i64>,

    /// The sarcophagus has been compromised.
    #[structopt(long, verbatim_doc_comment)]
    pub compromised: bool,

    /// The sarcophagus has been buried.
    #[structopt(long, verbatim_doc_comment)]
    pub buried: bool,
}

#[derive(Debug, StructOpt)]
pub(crate) struct OptInspect {
    /// Path to a yaml or json chain state dump.
    #[structopt(verbatim_doc_comment)]
    pub state_file: std::path::PathBuf,

    /// Only sarcophagi created by this address.
    #[structopt(long, conflicts_with_all = &["recipient", "id"], verbatim_doc_comment)]
    pub embalmer: Option<String>,

    /// Only sarcophagi naming this address as recipient.
    #[structopt(long, conflicts_with = "id", verbatim_doc_comment)]
    pub recipient: Option<String>,

    /// Only these sarcophagus ids, in this order.
    /// May be specified multiple times.
    #[structopt(long, verbatim_doc_comment)]
    pub id: Vec<String>,

    /// "now", unix milliseconds. Defaults to the
    /// block time recorded in the dump.
    #[structopt(short = "n", long, verbatim_doc_comment)]
    pub now_ms: Option<i64>,
}

#[derive(Debug, StructOpt)]
enum Cmd {
    /// Write a new sarco-config.yaml for a network.
    /// Refuses to overwrite an existing config.
    #[structopt(verbatim_doc_comment)]
    Init(OptInit),

    /// Print the network section of the config as json
    /// to stdout and exit. Note you must have initialized
    /// a config file first with 'sarco init'.
    #[structopt(verbatim_doc_comment)]
    Network,

    /// Print the lifecycle state of a sarcophagus with
    /// the given parameters.
    #[structopt(
        setting = structopt::clap::AppSettings::AllowNegativeNumbers,
        verbatim_doc_comment
    )]
    Classify(OptClassify),

    /// Resolve sarcophagus views out of a chain state dump
    /// and print them, with per-state counts, as json.
    #[structopt(verbatim_doc_comment)]
    Inspect(OptInspect),
}

#[derive(Debug, StructOpt)]
#[structopt(about = "sarcophagus protocol client sdk")]
struct Opt {
    /// Sarco root config directory.
    #[structopt(short = "r", long, default_value = ".", env = "SARCO_ROOT")]
    sarco_root: std::path::PathBuf,

    /// The subcommand to execute
    #[structopt(subcommand)]
    cmd: Cmd,
}

async fn exec() -> SarcoResult<()> {
    init_tracing();

    let opt = Opt::from_args();
    let Opt { sarco_root, cmd } = opt;
    match cmd {
        Cmd::Init(opt) => cmd_init::exec(sarco_root, opt).await,
        Cmd::Network => {
            let sarco_root = dunce::canonicalize(&sarco_root)?;
            let config = read_config(sarco_root.as_path()).await?;
            cmd_network::exec(config).await
        }
        Cmd::Classify(opt) => cmd_classify::exec(opt).await,
        Cmd::Inspect(opt) => cmd_inspect::exec(opt).await,
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(e) = exec().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
