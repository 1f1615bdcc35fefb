//! Top-level sarco client.

use crate::*;

/// Entrypoint for interacting with the sarcophagus protocol.
///
/// Clients are constructed explicitly from a config and the injected
/// collaborators, there is no process-wide instance. Cloning is cheap,
/// all clones share the same collaborators.
#[derive(Clone)]
pub struct SarcoClient {
    config: SarcoClientConfig,
    api: SarcophagusApi,
    token: Token,
    peer_transport: Option<PeerTransport>,
}

impl SarcoClient {
    /// Construct a new client. "now" is read from the latest block
    /// timestamp of `chain`.
    pub fn new(
        config: SarcoClientConfig,
        chain: SarcoChain,
        index: SarcoIndex,
        executor: ChainExecutor,
    ) -> Self {
        let time = TimeSource::chain(chain.clone());
        Self::with_time_source(config, chain, index, executor, time)
    }

    /// Construct a new client with an explicit time source.
    pub fn with_time_source(
        config: SarcoClientConfig,
        chain: SarcoChain,
        index: SarcoIndex,
        executor: ChainExecutor,
        time: TimeSource,
    ) -> Self {
        tracing::debug!(
            chain_id = config.network.chain_id,
            network = %config.network.network_short_name,
            "sarco client init"
        );
        let token = Token::new(
            config.network.diamond_deploy_address.clone(),
            chain.clone(),
            executor.clone(),
        );
        let api = SarcophagusApi::new(chain, index, executor, time);
        Self {
            config,
            api,
            token,
            peer_transport: None,
        }
    }

    /// Attach a peer transport, logging its peer events.
    pub fn with_peer_transport(mut self, transport: PeerTransport) -> Self {
        log_peer_events(&transport);
        self.peer_transport = Some(transport);
        self
    }

    /// The config this client was constructed with.
    pub fn config(&self) -> &SarcoClientConfig {
        &self.config
    }

    /// Default call options from the config.
    pub fn call_options(&self) -> CallOptions {
        self.config.call_options.clone()
    }

    /// Sarcophagus api.
    pub fn api(&self) -> &SarcophagusApi {
        &self.api
    }

    /// Sarco token api.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The attached peer transport, if any.
    pub fn peer_transport(&self) -> Option<&PeerTransport> {
        self.peer_transport.as_ref()
    }
}
