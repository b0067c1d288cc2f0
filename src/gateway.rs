//! Contract gateway: the engine's only connection to a live node
//!
//! [`ContractGateway`] is the seam between the pure channel logic and the
//! chain. [`RpcGateway`] is the production implementation over an alloy
//! HTTP provider; tests substitute an in-memory mock. Every method reads
//! fresh state — no caching, no retries, no internal timeouts. Those
//! belong to the transport layer or the caller.

use std::collections::HashMap;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    signers::{local::PrivateKeySigner, Signer},
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::binding::{AssetBinding, ContractFlavor};
use crate::contracts::{TokenUnidirectional, Unidirectional};
use crate::error::{ChannelError, Result};
use crate::types::{ChannelId, RawChannel};

/// Transaction shape submitted for gas estimation and calldata transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSketch {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Abstract boundary to the deployed channel contract and the node
///
/// The contract is the source of truth for signature correctness
/// ([`ContractGateway::can_claim`]) and digest computation; the engine
/// never reimplements either.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Asset binding selected and validated at construction
    fn binding(&self) -> AssetBinding;

    /// Address of the deployed channel contract
    fn contract_address(&self) -> Address;

    /// Default account for callers that do not thread one explicitly
    fn default_account(&self) -> Result<Address>;

    /// Raw channel storage for an id, sentinel and all
    async fn channel_fields(&self, channel_id: ChannelId) -> Result<RawChannel>;

    /// Contract-defined digest over the claim parameters
    async fn payment_digest(&self, channel_id: ChannelId, value: U256) -> Result<B256>;

    /// On-chain predicate: does `signature` authorize paying `value` to `origin`
    async fn can_claim(
        &self,
        channel_id: ChannelId,
        value: U256,
        origin: Address,
        signature: &Bytes,
    ) -> Result<bool>;

    /// Gas estimate for exactly this calldata/value/from combination;
    /// failure implies the call would revert on chain
    async fn estimate_gas(&self, sketch: &TxSketch) -> Result<u64>;

    /// Current network gas price
    async fn gas_price(&self) -> Result<u128>;

    /// Current block number
    async fn block_number(&self) -> Result<u64>;

    /// Sign a digest with the key held for `account` (EIP-191 message signing)
    async fn sign(&self, digest: B256, account: Address) -> Result<Bytes>;
}

/// Gateway configuration
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// RPC URL (e.g., "http://localhost:8545")
    pub rpc_url: String,
    /// Which contract flavor the deployments point at
    pub flavor: Option<ContractFlavor>,
    /// Token contract address (TokenUnidirectional only)
    pub token_address: Option<Address>,
    /// Deployed contract address per network id
    pub deployments: HashMap<u64, Address>,
}

impl GatewayConfig {
    /// Start a config for a native-asset (Unidirectional) deployment
    pub fn native(rpc_url: impl Into<String>) -> Self {
        GatewayConfig {
            rpc_url: rpc_url.into(),
            flavor: Some(ContractFlavor::Unidirectional),
            token_address: None,
            deployments: HashMap::new(),
        }
    }

    /// Start a config for a token-backed (TokenUnidirectional) deployment
    pub fn token(rpc_url: impl Into<String>, token_address: Address) -> Self {
        GatewayConfig {
            rpc_url: rpc_url.into(),
            flavor: Some(ContractFlavor::TokenUnidirectional),
            token_address: Some(token_address),
            deployments: HashMap::new(),
        }
    }

    /// Register the deployed contract address for a network id
    pub fn with_deployment(mut self, network_id: u64, address: Address) -> Self {
        self.deployments.insert(network_id, address);
        self
    }
}

/// Production gateway over an alloy HTTP provider
pub struct RpcGateway {
    provider: RootProvider<Http<Client>>,
    binding: AssetBinding,
    contract_address: Address,
    network_id: u64,
    signers: HashMap<Address, PrivateKeySigner>,
}

impl RpcGateway {
    /// Connect to the node and resolve the deployed contract
    ///
    /// Binding and deployment configuration are validated here, once;
    /// an unknown network id fails with `NetworkUnsupported`.
    pub async fn connect(config: GatewayConfig) -> Result<Self> {
        let flavor = config.flavor.ok_or_else(|| {
            ChannelError::Configuration("no contract flavor configured".to_string())
        })?;
        let binding = AssetBinding::for_flavor(flavor, config.token_address)?;

        let url = config
            .rpc_url
            .parse()
            .map_err(|e| ChannelError::Configuration(format!("invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        let network_id = provider.get_chain_id().await?;
        let contract_address = config
            .deployments
            .get(&network_id)
            .copied()
            .ok_or(ChannelError::NetworkUnsupported {
                flavor,
                chain_id: network_id,
            })?;

        info!(
            rpc_url = %config.rpc_url,
            network_id,
            contract = %contract_address,
            flavor = %flavor,
            "Connected channel contract gateway"
        );

        Ok(Self {
            provider,
            binding,
            contract_address,
            network_id,
            signers: HashMap::new(),
        })
    }

    /// Register a local signing key (claims are signed off-chain)
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        debug!(address = %signer.address(), "Registered local signer");
        self.signers.insert(signer.address(), signer);
        self
    }

    /// Network id reported by the node at connect time
    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    /// The underlying provider
    pub fn provider(&self) -> &RootProvider<Http<Client>> {
        &self.provider
    }
}

#[async_trait]
impl ContractGateway for RpcGateway {
    fn binding(&self) -> AssetBinding {
        self.binding
    }

    fn contract_address(&self) -> Address {
        self.contract_address
    }

    fn default_account(&self) -> Result<Address> {
        self.signers.keys().next().copied().ok_or(ChannelError::NoAccount)
    }

    async fn channel_fields(&self, channel_id: ChannelId) -> Result<RawChannel> {
        match self.binding {
            AssetBinding::Native => {
                let contract = Unidirectional::new(self.contract_address, &self.provider);
                let fields = contract.channels(channel_id.as_b256()).call().await?;
                Ok(RawChannel {
                    sender: fields.sender,
                    receiver: fields.receiver,
                    value: fields.value,
                    settling_period: fields.settlingPeriod,
                    settling_until: fields.settlingUntil,
                })
            }
            AssetBinding::Token { .. } => {
                let contract = TokenUnidirectional::new(self.contract_address, &self.provider);
                let fields = contract.channels(channel_id.as_b256()).call().await?;
                Ok(RawChannel {
                    sender: fields.sender,
                    receiver: fields.receiver,
                    value: fields.value,
                    settling_period: fields.settlingPeriod,
                    settling_until: fields.settlingUntil,
                })
            }
        }
    }

    async fn payment_digest(&self, channel_id: ChannelId, value: U256) -> Result<B256> {
        match self.binding {
            AssetBinding::Native => {
                let contract = Unidirectional::new(self.contract_address, &self.provider);
                let result = contract
                    .paymentDigest(channel_id.as_b256(), value)
                    .call()
                    .await?;
                Ok(result.digest)
            }
            AssetBinding::Token { address } => {
                let contract = TokenUnidirectional::new(self.contract_address, &self.provider);
                let result = contract
                    .paymentDigest(channel_id.as_b256(), value, address)
                    .call()
                    .await?;
                Ok(result.digest)
            }
        }
    }

    async fn can_claim(
        &self,
        channel_id: ChannelId,
        value: U256,
        origin: Address,
        signature: &Bytes,
    ) -> Result<bool> {
        match self.binding {
            AssetBinding::Native => {
                let contract = Unidirectional::new(self.contract_address, &self.provider);
                let result = contract
                    .canClaim(channel_id.as_b256(), value, origin, signature.clone())
                    .call()
                    .await?;
                Ok(result.ok)
            }
            AssetBinding::Token { .. } => {
                let contract = TokenUnidirectional::new(self.contract_address, &self.provider);
                let result = contract
                    .canClaim(channel_id.as_b256(), value, origin, signature.clone())
                    .call()
                    .await?;
                Ok(result.ok)
            }
        }
    }

    async fn estimate_gas(&self, sketch: &TxSketch) -> Result<u64> {
        let tx = TransactionRequest::default()
            .with_from(sketch.from)
            .with_to(sketch.to)
            .with_value(sketch.value)
            .with_input(sketch.data.clone());
        let gas = self.provider.estimate_gas(&tx).await?;
        Ok(gas)
    }

    async fn gas_price(&self) -> Result<u128> {
        let price = self.provider.get_gas_price().await?;
        Ok(price)
    }

    async fn block_number(&self) -> Result<u64> {
        let block = self.provider.get_block_number().await?;
        Ok(block)
    }

    async fn sign(&self, digest: B256, account: Address) -> Result<Bytes> {
        let signer = self
            .signers
            .get(&account)
            .ok_or(ChannelError::NoSigner(account))?;
        let signature = signer
            .sign_message(digest.as_slice())
            .await
            .map_err(|e| ChannelError::Rpc(format!("signing failed: {}", e)))?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}
