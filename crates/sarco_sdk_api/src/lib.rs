// it's not possible to specify required
// bounds with the `async fn` syntax.
#![allow(clippy::manual_async_fn)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(warnings)]
//! Sarcophagus protocol client sdk.
//!
//! Formats calls to the sarcophagus contract interface, validates
//! inputs client side, and aggregates on-chain sarcophagus state with
//! subgraph-indexed rewrap history into [`SarcophagusView`]s.
//!
//! Chain, index, executor, time and peer transport access are all
//! injected through the `traits::As*` trait objects in [`sarco_core`],
//! so nothing in this crate talks to the network directly.

/// Re-exported dependencies.
pub mod dependencies {
    pub use futures;
    pub use hex;
    pub use one_err;
    pub use serde;
    pub use serde_json;
    pub use serde_yaml;
    pub use tokio;
    pub use tracing;
    pub use url;
}

/// Sarco sdk result type.
pub type SarcoResult<T> = Result<T, one_err::OneErr>;

pub mod error;

pub mod types;

pub mod state;

pub mod view;

pub mod sarco_core;

pub mod resolver;

pub mod contract_call;

pub mod validation;

pub mod sarco_api;

pub mod token;

pub mod network_config;

pub mod config;

pub mod client;

pub mod peer;

pub mod mem_chain;

/// Re-export module of commonly used sarco sdk items.
pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::contract_call::*;
    pub use crate::error::*;
    pub use crate::network_config::*;
    pub use crate::peer::*;
    pub use crate::resolver::*;
    pub use crate::sarco_api::*;
    pub use crate::sarco_core::*;
    pub use crate::state::*;
    pub use crate::token::*;
    pub use crate::types::*;
    pub use crate::validation::*;
    pub use crate::view::*;
    pub use crate::SarcoResult;
}

pub use prelude::*;
