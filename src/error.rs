//! Error types for the payment channel engine
//!
//! Every public operation either resolves with a well-typed value or rejects
//! with a single [`ChannelError`] carrying the full causal chain. Operation
//! boundaries wrap inner failures via [`ResultExt::in_op`], so a caller sees
//! both the operation chain and the original cause, e.g.
//! `close channel: settle: 12 blocks remaining in settling period`.

use alloy::primitives::Address;
use thiserror::Error;

use crate::binding::ContractFlavor;
use crate::types::ChannelId;

/// Convenience alias used throughout the crate
pub type Result<T, E = ChannelError> = std::result::Result<T, E>;

/// Coarse error taxonomy for matching without parsing message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Channel absent, never opened, or already closed
    NotFound,
    /// Caller holds the wrong role for the operation
    Unauthorized,
    /// Channel is in the wrong lifecycle state for the requested action
    InvalidState,
    /// Non-positive or out-of-bound value
    InvalidAmount,
    /// The on-chain signature predicate rejected the claim
    SignatureInvalid,
    /// RPC/node failure, including a failed gas estimate (the call would revert)
    Network,
    /// Misconfigured contract/token binding or missing account
    Configuration,
}

/// Errors surfaced by the channel engine and gateway
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel {0} not found or already closed")]
    ChannelNotFound(ChannelId),

    #[error("account {0} is not the sender of the channel")]
    NotSender(Address),

    #[error("account {0} is not the receiver of the channel")]
    NotReceiver(Address),

    #[error("account {0} is neither the sender nor the receiver of the channel")]
    NotParticipant(Address),

    #[error("channel is not open")]
    ChannelNotOpen,

    #[error("amount must be greater than zero")]
    NonPositiveValue,

    #[error("amount is larger than the channel value")]
    InsufficientChannelValue,

    #[error("claim value is greater than the amount in the channel")]
    ClaimExceedsChannelValue,

    #[error("claim is zero-valued")]
    NonPositiveClaim,

    #[error("claim was not signed by the sender of the channel")]
    BadSignature,

    #[error("no claim given")]
    ClaimRequired,

    #[error("{remaining} blocks remaining in settling period")]
    SettlingPeriodActive { remaining: u64 },

    #[error("contract {flavor} is not deployed on network {chain_id}")]
    NetworkUnsupported {
        flavor: ContractFlavor,
        chain_id: u64,
    },

    #[error("no signer registered for account {0}")]
    NoSigner(Address),

    #[error("no account available")]
    NoAccount,

    #[error("invalid channel id: {0}")]
    InvalidChannelId(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    Configuration(String),

    #[error("rpc failure: {0}")]
    Rpc(String),

    /// Wraps an inner failure with the name of the operation that hit it
    #[error("{operation}: {source}")]
    Op {
        operation: &'static str,
        #[source]
        source: Box<ChannelError>,
    },
}

impl ChannelError {
    /// The taxonomy kind of the root cause
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChannelError::ChannelNotFound(_) => ErrorKind::NotFound,
            ChannelError::NotSender(_)
            | ChannelError::NotReceiver(_)
            | ChannelError::NotParticipant(_) => ErrorKind::Unauthorized,
            ChannelError::ChannelNotOpen
            | ChannelError::ClaimRequired
            | ChannelError::SettlingPeriodActive { .. } => ErrorKind::InvalidState,
            ChannelError::NonPositiveValue
            | ChannelError::InsufficientChannelValue
            | ChannelError::ClaimExceedsChannelValue
            | ChannelError::NonPositiveClaim
            | ChannelError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            ChannelError::BadSignature => ErrorKind::SignatureInvalid,
            ChannelError::Rpc(_) => ErrorKind::Network,
            ChannelError::NetworkUnsupported { .. }
            | ChannelError::NoSigner(_)
            | ChannelError::NoAccount
            | ChannelError::InvalidChannelId(_)
            | ChannelError::Configuration(_) => ErrorKind::Configuration,
            ChannelError::Op { source, .. } => source.kind(),
        }
    }

    /// Innermost error after unwinding operation wrappers
    pub fn root_cause(&self) -> &ChannelError {
        match self {
            ChannelError::Op { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Wrap this error with the name of the operation that detected it
    pub fn in_op(self, operation: &'static str) -> ChannelError {
        ChannelError::Op {
            operation,
            source: Box::new(self),
        }
    }
}

impl From<alloy::transports::TransportError> for ChannelError {
    fn from(err: alloy::transports::TransportError) -> Self {
        ChannelError::Rpc(err.to_string())
    }
}

impl From<alloy::contract::Error> for ChannelError {
    fn from(err: alloy::contract::Error) -> Self {
        ChannelError::Rpc(err.to_string())
    }
}

/// Wraps failures at operation boundaries without losing the cause
pub trait ResultExt<T> {
    fn in_op(self, operation: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn in_op(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| e.in_op(operation))
    }
}
