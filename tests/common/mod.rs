//! Shared test fixtures: an in-memory gateway standing in for a node
//! with a deployed channel contract.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;

use unichannel::{
    AssetBinding, ChannelError, ChannelId, ContractGateway, RawChannel, Result, TxSketch,
};

pub const SETTLING_PERIOD: u32 = 40320;

pub fn sender() -> Address {
    Address::repeat_byte(0xAA)
}

pub fn receiver() -> Address {
    Address::repeat_byte(0xBB)
}

pub fn stranger() -> Address {
    Address::repeat_byte(0xCC)
}

pub fn contract() -> Address {
    Address::repeat_byte(0x10)
}

pub fn token() -> Address {
    Address::repeat_byte(0x70)
}

/// Raw fields of an open channel holding `value`
pub fn open_channel(value: u64) -> RawChannel {
    RawChannel {
        sender: sender(),
        receiver: receiver(),
        value: U256::from(value),
        settling_period: SETTLING_PERIOD,
        settling_until: U256::ZERO,
    }
}

/// Raw fields of a settling channel
pub fn settling_channel(value: u64, settling_until: u64) -> RawChannel {
    RawChannel {
        settling_until: U256::from(settling_until),
        ..open_channel(value)
    }
}

/// In-memory contract gateway
///
/// Mirrors contract storage semantics: an unknown channel id reads back
/// as a zero struct, which the reader must interpret as not-found.
pub struct MockGateway {
    binding: AssetBinding,
    channels: HashMap<ChannelId, RawChannel>,
    signers: HashSet<Address>,
    can_claim: bool,
    gas_price: u128,
    gas_estimate: u64,
    fail_gas_estimate: bool,
    block_number: u64,
}

impl MockGateway {
    pub fn new() -> Self {
        MockGateway {
            binding: AssetBinding::Native,
            channels: HashMap::new(),
            signers: HashSet::from([sender()]),
            can_claim: true,
            gas_price: 2_000_000_000,
            gas_estimate: 100_000,
            fail_gas_estimate: false,
            block_number: 1_000,
        }
    }

    pub fn token_backed() -> Self {
        MockGateway {
            binding: AssetBinding::Token { address: token() },
            ..Self::new()
        }
    }

    pub fn with_channel(mut self, channel_id: ChannelId, raw: RawChannel) -> Self {
        self.channels.insert(channel_id, raw);
        self
    }

    pub fn with_can_claim(mut self, can_claim: bool) -> Self {
        self.can_claim = can_claim;
        self
    }

    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }

    pub fn with_signer(mut self, account: Address) -> Self {
        self.signers.insert(account);
        self
    }

    pub fn failing_gas_estimate(mut self) -> Self {
        self.fail_gas_estimate = true;
        self
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    fn binding(&self) -> AssetBinding {
        self.binding
    }

    fn contract_address(&self) -> Address {
        contract()
    }

    fn default_account(&self) -> Result<Address> {
        self.signers
            .iter()
            .next()
            .copied()
            .ok_or(ChannelError::NoAccount)
    }

    async fn channel_fields(&self, channel_id: ChannelId) -> Result<RawChannel> {
        Ok(self
            .channels
            .get(&channel_id)
            .cloned()
            .unwrap_or(RawChannel {
                sender: Address::ZERO,
                receiver: Address::ZERO,
                value: U256::ZERO,
                settling_period: 0,
                settling_until: U256::ZERO,
            }))
    }

    async fn payment_digest(&self, channel_id: ChannelId, value: U256) -> Result<B256> {
        let mut preimage = channel_id.as_b256().to_vec();
        preimage.extend_from_slice(&value.to_be_bytes::<32>());
        Ok(keccak256(preimage))
    }

    async fn can_claim(
        &self,
        _channel_id: ChannelId,
        _value: U256,
        _origin: Address,
        _signature: &Bytes,
    ) -> Result<bool> {
        Ok(self.can_claim)
    }

    async fn estimate_gas(&self, _sketch: &TxSketch) -> Result<u64> {
        if self.fail_gas_estimate {
            return Err(ChannelError::Rpc("execution reverted".to_string()));
        }
        Ok(self.gas_estimate)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.gas_price)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.block_number)
    }

    async fn sign(&self, digest: B256, account: Address) -> Result<Bytes> {
        if !self.signers.contains(&account) {
            return Err(ChannelError::NoSigner(account));
        }
        // Deterministic stand-in signature: digest || signer || recovery id
        let mut bytes = digest.to_vec();
        bytes.extend_from_slice(account.as_slice());
        bytes.extend_from_slice(&[0x1b; 13]);
        Ok(Bytes::from(bytes))
    }
}
