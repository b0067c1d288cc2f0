//! Core data model for unidirectional payment channels
//!
//! A [`Channel`] is a fresh snapshot of on-chain state, recomputed on every
//! read and never cached: other actors may move the chain between calls.
//! [`Claim`]s are the off-chain-transmitted payment authorizations, and
//! [`UnsignedTx`] is the descriptor handed back to the caller for signing
//! and submission — the engine never broadcasts anything itself.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, B256, U256};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, Result};

/// Default settling period in blocks (~1 week, given 15 second blocks)
pub const DEFAULT_SETTLING_PERIOD: u32 = 40320;

// ============================================================================
// Channel ID (32 bytes)
// ============================================================================

/// Opaque 32-byte channel identifier
///
/// Either supplied by the caller at open time or generated from a
/// cryptographically secure RNG, so an open transaction cannot be
/// front-run by guessing the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub B256);

impl ChannelId {
    /// Generate a random channel id
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        ChannelId(B256::from(bytes))
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        ChannelId(B256::from(bytes))
    }

    /// Parse from a hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| ChannelError::InvalidChannelId(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(ChannelError::InvalidChannelId(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(ChannelId(B256::from_slice(&bytes)))
    }

    /// The underlying 32-byte value
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self> {
        ChannelId::from_hex(s)
    }
}

impl From<B256> for ChannelId {
    fn from(value: B256) -> Self {
        ChannelId(value)
    }
}

// ============================================================================
// Channel snapshot
// ============================================================================

/// Raw channel fields as stored by the contract, before interpretation
///
/// `settling_until` still carries the on-chain sentinel: zero means the
/// channel is not settling. The sentinel never escapes
/// [`Channel::from_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChannel {
    pub sender: Address,
    pub receiver: Address,
    pub value: U256,
    pub settling_period: u32,
    pub settling_until: U256,
}

/// Lifecycle state derived from a channel snapshot
///
/// Closed is not represented here: a consumed channel has a zero sender
/// on chain and fails interpretation as not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Settling { until: u64 },
}

/// Interpreted snapshot of one on-chain payment channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: ChannelId,
    pub sender: Address,
    pub receiver: Address,
    /// Total funds deposited into the channel
    pub value: U256,
    /// Blocks the sender must wait after requesting settlement
    pub settling_period: u32,
    /// Present iff the channel is settling
    pub settling_until: Option<u64>,
}

impl Channel {
    /// Interpret raw on-chain fields into a well-formed channel
    ///
    /// A zero sender address means the channel was never opened or has
    /// already been consumed; it has no valid interpretation and is
    /// reported as not-found rather than as a zero-valued channel.
    pub fn from_raw(channel_id: ChannelId, raw: RawChannel) -> Result<Self> {
        if raw.sender.is_zero() {
            return Err(ChannelError::ChannelNotFound(channel_id));
        }
        let settling_until = if raw.settling_until.is_zero() {
            None
        } else {
            Some(u64::try_from(raw.settling_until).unwrap_or(u64::MAX))
        };
        Ok(Channel {
            channel_id,
            sender: raw.sender,
            receiver: raw.receiver,
            value: raw.value,
            settling_period: raw.settling_period,
            settling_until,
        })
    }

    /// Derived lifecycle state
    pub fn state(&self) -> ChannelState {
        match self.settling_until {
            None => ChannelState::Open,
            Some(until) => ChannelState::Settling { until },
        }
    }

    /// Whether the channel is open (not settling)
    pub fn is_open(&self) -> bool {
        self.settling_until.is_none()
    }
}

// ============================================================================
// Claim
// ============================================================================

/// A sender-signed authorization letting the receiver withdraw up to a
/// stated cumulative amount
///
/// `value` is cumulative, not incremental, and is string-encoded in
/// decimal for off-chain transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub channel_id: ChannelId,
    pub value: String,
    pub signature: Bytes,
}

impl Claim {
    /// Parse the decimal-encoded claim value
    pub fn value_u256(&self) -> Result<U256> {
        U256::from_str_radix(&self.value, 10)
            .map_err(|e| ChannelError::InvalidAmount(format!("{}: {}", self.value, e)))
    }
}

// ============================================================================
// Unsigned transaction
// ============================================================================

/// Unsigned transaction descriptor produced fresh per operation
///
/// Ownership transfers to the caller immediately: the engine never
/// persists, signs, or broadcasts these. Gas and gas price are sourced
/// live at build time, never guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: u64,
    pub gas_price: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}
