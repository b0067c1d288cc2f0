//! Channel lifecycle engine
//!
//! Stateless driver of the channel state machine: every operation reads
//! chain state fresh through the gateway, decides which contract method
//! progresses the channel, and returns an unsigned transaction for the
//! caller to sign and submit. Concurrent calls race only at the level of
//! the chain itself; a stale read can yield a transaction that reverts on
//! submission, which is surfaced, not masked.
//!
//! Claim creation/validation lives in [`crate::claims`], implemented on
//! the same engine.

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::error::{ChannelError, Result, ResultExt};
use crate::gateway::{ContractGateway, TxSketch};
use crate::tx::build_unsigned_tx;
use crate::types::{Channel, ChannelId, Claim, UnsignedTx, DEFAULT_SETTLING_PERIOD};

/// Parameters for opening a new channel
#[derive(Debug, Clone)]
pub struct OpenChannelRequest {
    /// Receiving party
    pub receiver: Address,
    /// Initial deposit
    pub value: U256,
    /// Caller-supplied id; generated randomly when absent
    pub channel_id: Option<ChannelId>,
    /// Settling period in blocks; defaults to [`DEFAULT_SETTLING_PERIOD`]
    pub settling_period: Option<u32>,
}

/// Result of building an open-channel transaction
#[derive(Debug, Clone)]
pub struct OpenedChannel {
    pub tx: UnsignedTx,
    pub channel_id: ChannelId,
}

/// Client-side engine over one deployed channel contract
///
/// Holds no channel state of its own. The acting account is an explicit
/// parameter on every operation, so one engine serves concurrent
/// multi-account use.
pub struct ChannelEngine<G> {
    gateway: G,
}

impl<G: ContractGateway> ChannelEngine<G> {
    pub fn new(gateway: G) -> Self {
        ChannelEngine { gateway }
    }

    /// The underlying gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetch and interpret the current on-chain snapshot of a channel
    ///
    /// Fails with a not-found error when the on-chain sender is the zero
    /// address, covering both "never opened" and "settled/claimed and
    /// removed".
    pub async fn get_channel(&self, channel_id: ChannelId) -> Result<Channel> {
        self.fetch_channel(channel_id).await.in_op("get channel")
    }

    pub(crate) async fn fetch_channel(&self, channel_id: ChannelId) -> Result<Channel> {
        let raw = self.gateway.channel_fields(channel_id).await?;
        let channel = Channel::from_raw(channel_id, raw)?;
        debug!(channel_id = %channel_id, state = ?channel.state(), "Interpreted channel snapshot");
        Ok(channel)
    }

    /// Build the transaction that opens a new channel
    pub async fn open_channel(
        &self,
        request: OpenChannelRequest,
        account: Address,
    ) -> Result<OpenedChannel> {
        self.open_inner(request, account)
            .await
            .in_op("open channel")
    }

    async fn open_inner(
        &self,
        request: OpenChannelRequest,
        account: Address,
    ) -> Result<OpenedChannel> {
        let channel_id = request.channel_id.unwrap_or_else(ChannelId::random);
        let settling_period = request.settling_period.unwrap_or(DEFAULT_SETTLING_PERIOD);

        let (data, tx_value) =
            self.gateway
                .binding()
                .open_call(channel_id, request.receiver, settling_period, request.value);
        let tx = build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: self.gateway.contract_address(),
                value: tx_value,
                data,
            },
        )
        .await?;

        info!(
            channel_id = %channel_id,
            receiver = %request.receiver,
            value = %request.value,
            settling_period,
            "Built open-channel transaction"
        );
        Ok(OpenedChannel { tx, channel_id })
    }

    /// Build the transaction that deposits further funds into a channel
    ///
    /// Only the sender may deposit, and only while the channel is open.
    pub async fn deposit(
        &self,
        channel_id: ChannelId,
        value: U256,
        account: Address,
    ) -> Result<UnsignedTx> {
        self.deposit_inner(channel_id, value, account)
            .await
            .in_op("deposit")
    }

    async fn deposit_inner(
        &self,
        channel_id: ChannelId,
        value: U256,
        account: Address,
    ) -> Result<UnsignedTx> {
        if value.is_zero() {
            return Err(ChannelError::NonPositiveValue);
        }
        let channel = self.get_channel(channel_id).await?;
        if channel.sender != account {
            return Err(ChannelError::NotSender(account));
        }
        if !channel.is_open() {
            return Err(ChannelError::ChannelNotOpen);
        }

        let (data, tx_value) = self.gateway.binding().deposit_call(channel_id, value);
        build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: self.gateway.contract_address(),
                value: tx_value,
                data,
            },
        )
        .await
    }

    /// Build the ERC20 approve transaction granting the channel contract
    /// an allowance (token-backed channels only)
    pub async fn approve_token_transfer(
        &self,
        value: U256,
        account: Address,
    ) -> Result<UnsignedTx> {
        self.approve_inner(value, account)
            .await
            .in_op("approve token transfer")
    }

    async fn approve_inner(&self, value: U256, account: Address) -> Result<UnsignedTx> {
        let (token, data) = self
            .gateway
            .binding()
            .approve_call(self.gateway.contract_address(), value)?;
        build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: token,
                value: U256::ZERO,
                data,
            },
        )
        .await
    }

    /// Build the transaction that progresses a channel toward closure
    ///
    /// The caller's role decides the action: a receiver claims (with a
    /// valid claim), a sender starts settling an open channel or settles
    /// one whose settling period has elapsed. Anyone else is rejected.
    pub async fn close_channel(
        &self,
        channel_id: ChannelId,
        claim: Option<&Claim>,
        account: Address,
    ) -> Result<UnsignedTx> {
        self.close_inner(channel_id, claim, account)
            .await
            .in_op("close channel")
    }

    async fn close_inner(
        &self,
        channel_id: ChannelId,
        claim: Option<&Claim>,
        account: Address,
    ) -> Result<UnsignedTx> {
        let channel = self.get_channel(channel_id).await?;

        if channel.receiver == account {
            self.claim_close(claim, account).await.in_op("claim")
        } else if channel.sender == account {
            match channel.settling_until {
                Some(until) => self
                    .settle_close(channel_id, until, account)
                    .await
                    .in_op("settle"),
                None => self
                    .start_settling(channel_id, account)
                    .await
                    .in_op("start settling"),
            }
        } else {
            Err(ChannelError::NotParticipant(account))
        }
    }

    /// Receiver path: validate the claim and build the claim transaction
    async fn claim_close(&self, claim: Option<&Claim>, account: Address) -> Result<UnsignedTx> {
        let claim = claim.ok_or(ChannelError::ClaimRequired)?;
        self.validate_claim(claim, account).await?;

        let payment = claim.value_u256()?;
        let data =
            self.gateway
                .binding()
                .claim_call(claim.channel_id, payment, claim.signature.clone());
        build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: self.gateway.contract_address(),
                value: U256::ZERO,
                data,
            },
        )
        .await
    }

    /// Sender path, settling channel: settle once the period has elapsed
    async fn settle_close(
        &self,
        channel_id: ChannelId,
        settling_until: u64,
        account: Address,
    ) -> Result<UnsignedTx> {
        let current_block = self.gateway.block_number().await?;
        let remaining = settling_until.saturating_sub(current_block);
        if remaining > 0 {
            return Err(ChannelError::SettlingPeriodActive { remaining });
        }

        let data = self.gateway.binding().settle_call(channel_id);
        build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: self.gateway.contract_address(),
                value: U256::ZERO,
                data,
            },
        )
        .await
    }

    /// Sender path, open channel: begin the settling countdown
    async fn start_settling(&self, channel_id: ChannelId, account: Address) -> Result<UnsignedTx> {
        let data = self.gateway.binding().start_settling_call(channel_id);
        build_unsigned_tx(
            &self.gateway,
            TxSketch {
                from: account,
                to: self.gateway.contract_address(),
                value: U256::ZERO,
                data,
            },
        )
        .await
    }
}
