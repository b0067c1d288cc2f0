//! Asset binding: the one point where the two contract flavors differ
//!
//! Native and token channels share the same lifecycle and claim rules;
//! they differ only in a few call-argument shapes and in how value
//! transfer is expressed (transaction value vs approve + call argument).
//! [`AssetBinding`] captures that difference once, validated at
//! construction, so the engine stays flavor-agnostic.

use std::fmt;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::{TokenUnidirectional, Unidirectional, ERC20};
use crate::error::{ChannelError, Result};
use crate::types::ChannelId;

/// The deployed contract flavor a gateway is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFlavor {
    Unidirectional,
    TokenUnidirectional,
}

impl fmt::Display for ContractFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractFlavor::Unidirectional => write!(f, "Unidirectional"),
            ContractFlavor::TokenUnidirectional => write!(f, "TokenUnidirectional"),
        }
    }
}

/// How channel value is carried: natively or through an ERC20 token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetBinding {
    Native,
    Token { address: Address },
}

impl AssetBinding {
    /// Pair a contract flavor with an optional token address
    ///
    /// Mismatched configuration is rejected here, at construction, so no
    /// per-call code has to consider an inconsistent binding.
    pub fn for_flavor(flavor: ContractFlavor, token: Option<Address>) -> Result<Self> {
        match (flavor, token) {
            (ContractFlavor::Unidirectional, None) => Ok(AssetBinding::Native),
            (ContractFlavor::Unidirectional, Some(_)) => Err(ChannelError::Configuration(
                "token address given for the Unidirectional contract; \
                 use TokenUnidirectional for ERC20 payment channels"
                    .to_string(),
            )),
            (ContractFlavor::TokenUnidirectional, None) => Err(ChannelError::Configuration(
                "no token address given for the TokenUnidirectional contract; \
                 use Unidirectional for native-asset payment channels"
                    .to_string(),
            )),
            (ContractFlavor::TokenUnidirectional, Some(address)) if address.is_zero() => Err(
                ChannelError::Configuration("token address is the zero address".to_string()),
            ),
            (ContractFlavor::TokenUnidirectional, Some(address)) => {
                Ok(AssetBinding::Token { address })
            }
        }
    }

    /// The flavor this binding encodes calls for
    pub fn flavor(&self) -> ContractFlavor {
        match self {
            AssetBinding::Native => ContractFlavor::Unidirectional,
            AssetBinding::Token { .. } => ContractFlavor::TokenUnidirectional,
        }
    }

    /// Token contract address, if token-backed
    pub fn token(&self) -> Option<Address> {
        match self {
            AssetBinding::Native => None,
            AssetBinding::Token { address } => Some(*address),
        }
    }

    /// Calldata and transaction value for `open`
    pub fn open_call(
        &self,
        channel_id: ChannelId,
        receiver: Address,
        settling_period: u32,
        value: U256,
    ) -> (Bytes, U256) {
        match self {
            AssetBinding::Native => {
                let call = Unidirectional::openCall {
                    channelId: channel_id.as_b256(),
                    receiver,
                    settlingPeriod: settling_period,
                };
                (call.abi_encode().into(), value)
            }
            AssetBinding::Token { address } => {
                let call = TokenUnidirectional::openCall {
                    channelId: channel_id.as_b256(),
                    receiver,
                    settlingPeriod: settling_period,
                    tokenContract: *address,
                    value,
                };
                (call.abi_encode().into(), U256::ZERO)
            }
        }
    }

    /// Calldata and transaction value for `deposit`
    pub fn deposit_call(&self, channel_id: ChannelId, value: U256) -> (Bytes, U256) {
        match self {
            AssetBinding::Native => {
                let call = Unidirectional::depositCall {
                    channelId: channel_id.as_b256(),
                };
                (call.abi_encode().into(), value)
            }
            AssetBinding::Token { .. } => {
                let call = TokenUnidirectional::depositCall {
                    channelId: channel_id.as_b256(),
                    value,
                };
                (call.abi_encode().into(), U256::ZERO)
            }
        }
    }

    /// Calldata for `claim` (same shape in both flavors, never carries value)
    pub fn claim_call(&self, channel_id: ChannelId, payment: U256, signature: Bytes) -> Bytes {
        let call = Unidirectional::claimCall {
            channelId: channel_id.as_b256(),
            payment,
            signature,
        };
        call.abi_encode().into()
    }

    /// Calldata for `startSettling`
    pub fn start_settling_call(&self, channel_id: ChannelId) -> Bytes {
        let call = Unidirectional::startSettlingCall {
            channelId: channel_id.as_b256(),
        };
        call.abi_encode().into()
    }

    /// Calldata for `settle`
    pub fn settle_call(&self, channel_id: ChannelId) -> Bytes {
        let call = Unidirectional::settleCall {
            channelId: channel_id.as_b256(),
        };
        call.abi_encode().into()
    }

    /// Target and calldata for the token approve step granting `spender`
    /// (the channel contract) an allowance of `value`
    ///
    /// Native channels carry value in the transaction itself and have no
    /// transfer to approve.
    pub fn approve_call(&self, spender: Address, value: U256) -> Result<(Address, Bytes)> {
        match self {
            AssetBinding::Native => Err(ChannelError::Configuration(
                "native-asset channels have no token transfer to approve".to_string(),
            )),
            AssetBinding::Token { address } => {
                let call = ERC20::approveCall {
                    spender,
                    amount: value,
                };
                Ok((*address, call.abi_encode().into()))
            }
        }
    }
}
