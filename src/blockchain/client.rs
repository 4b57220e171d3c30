//! Read-only JSON-RPC client for the gate's chain.
//!
//! # Responsibilities
//! - Read ERC-20 balances with `eth_call`
//! - List node-managed accounts for the node wallet provider
//! - Check chain id and reachability
//!
//! # Design Decisions
//! - Providers are tried in order (primary, then failovers); the first
//!   answer wins
//! - Each attempt has its own deadline of `rpc_timeout_secs`
//! - A wrong chain id at startup is logged, not fatal

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::board::ports::ChainReader;
use crate::observability::metrics;

sol! {
    /// Read-only slice of the ERC-20 interface used by the gate.
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Chain reader over one or more RPC endpoints.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Primary first, then failovers in configured order.
    providers: Vec<SharedProvider>,
    config: BlockchainConfig,
    attempt_timeout: Duration,
}

impl BlockchainClient {
    /// Connect to the configured endpoints.
    ///
    /// Fails only if the primary URL is malformed. An unreachable node or a
    /// chain id mismatch is logged and the client is returned anyway.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let primary: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let mut providers: Vec<SharedProvider> = Vec::with_capacity(1 + config.failover_urls.len());
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary)));
        for raw in &config.failover_urls {
            match raw.parse::<url::Url>() {
                Ok(url) => providers.push(Arc::new(ProviderBuilder::new().connect_http(url))),
                Err(e) => tracing::warn!(url = %raw, error = %e, "Skipping malformed failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            attempt_timeout: Duration::from_secs(config.rpc_timeout_secs),
            config,
        };

        match client.verify_chain_id().await {
            Ok(()) => tracing::info!(
                rpc_url = %client.config.rpc_url,
                chain_id = client.config.chain_id,
                providers = client.providers.len(),
                "Chain client ready"
            ),
            Err(e) => tracing::warn!(error = %e, "Chain client ready, but the chain id could not be confirmed"),
        }

        Ok(client)
    }

    /// Run `call` against each provider until one answers.
    async fn first_answer<T, F, Fut>(&self, method: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(SharedProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_timed_out = false;
        for (idx, provider) in self.providers.iter().enumerate() {
            match timeout(self.attempt_timeout, call(provider.clone())).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    last_timed_out = false;
                    tracing::warn!(method, provider_idx = idx, error = %e, "RPC call failed");
                }
                Err(_) => {
                    last_timed_out = true;
                    tracing::warn!(method, provider_idx = idx, "RPC call timed out");
                }
            }
        }

        if last_timed_out {
            Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
        } else {
            Err(BlockchainError::Rpc(format!("All RPC providers failed ({})", method)))
        }
    }

    /// Fail unless the node reports the configured chain.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let ChainId(actual) = self.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }

    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.first_answer("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.first_answer("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    /// `token.balanceOf(owner)` at the latest block.
    pub async fn get_token_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256> {
        let request = TransactionRequest::default()
            .with_to(token)
            .with_input(IERC20::balanceOfCall { owner }.abi_encode());

        let output = self
            .first_answer("eth_call", |p| {
                let request = request.clone();
                async move { p.call(request).await }
            })
            .await?;

        IERC20::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Decode(format!("balanceOf on {}: {}", token, e)))
    }

    /// Accounts unlocked on the node (`eth_accounts`).
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.first_answer("eth_accounts", |p| async move { p.get_accounts().await })
            .await
    }

    /// Whether any provider answers `eth_blockNumber`. Updates the health gauge.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl ChainReader for BlockchainClient {
    async fn token_balance(&self, token: Address, owner: Address) -> BlockchainResult<U256> {
        self.get_token_balance(token, owner).await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("providers", &self.providers.len())
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}
