//! Claim creation and validation
//!
//! A claim authorizes the receiver to withdraw a cumulative amount. The
//! engine checks its preconditions against a fresh chain snapshot in a
//! fixed order, each failure distinct, and defers signature correctness
//! to the contract's own `canClaim` predicate — the contract, not this
//! crate, is the authority on what a valid signature is.

use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::engine::ChannelEngine;
use crate::error::{ChannelError, Result, ResultExt};
use crate::gateway::ContractGateway;
use crate::types::{ChannelId, Claim};

impl<G: ContractGateway> ChannelEngine<G> {
    /// Create a signed claim for a cumulative `value`
    ///
    /// Preconditions, each checked in order and failing distinctly:
    /// the value is positive, the channel exists, the caller is its
    /// sender, the channel is open, and the value does not exceed the
    /// channel's funds (inclusive bound).
    pub async fn create_claim(
        &self,
        channel_id: ChannelId,
        value: U256,
        account: Address,
    ) -> Result<Claim> {
        self.create_claim_inner(channel_id, value, account)
            .await
            .in_op("create claim")
    }

    async fn create_claim_inner(
        &self,
        channel_id: ChannelId,
        value: U256,
        account: Address,
    ) -> Result<Claim> {
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
        if value > channel.value {
            return Err(ChannelError::InsufficientChannelValue);
        }

        let digest = self.gateway().payment_digest(channel_id, value).await?;
        let signature = self.gateway().sign(digest, account).await?;
        debug!(channel_id = %channel_id, value = %value, "Signed payment claim");

        Ok(Claim {
            channel_id,
            value: value.to_string(),
            signature,
        })
    }

    /// Validate a received claim against current channel state
    ///
    /// Preconditions, in order: the channel exists, the caller is its
    /// receiver, the contract's `canClaim` predicate confirms the
    /// sender's signature, the value fits the channel's funds
    /// (inclusive), and the value is positive. Any single failure
    /// rejects the claim with its own error.
    pub async fn validate_claim(&self, claim: &Claim, account: Address) -> Result<()> {
        self.validate_claim_inner(claim, account)
            .await
            .in_op("validate claim")
    }

    async fn validate_claim_inner(&self, claim: &Claim, account: Address) -> Result<()> {
        let value = claim.value_u256()?;
        let channel = self.get_channel(claim.channel_id).await?;
        if channel.receiver != account {
            return Err(ChannelError::NotReceiver(account));
        }

        let authorized = self
            .gateway()
            .can_claim(claim.channel_id, value, account, &claim.signature)
            .await?;
        if !authorized {
            return Err(ChannelError::BadSignature);
        }

        if value > channel.value {
            return Err(ChannelError::ClaimExceedsChannelValue);
        }
        if value.is_zero() {
            return Err(ChannelError::NonPositiveClaim);
        }

        debug!(channel_id = %claim.channel_id, value = %value, "Claim validated");
        Ok(())
    }
}
