//! Unichannel: Client-Side Engine for Unidirectional Payment Channels
//!
//! Two parties (sender, receiver) exchange off-chain signed value claims
//! backed by funds locked in an on-chain channel, settled on-chain only
//! when the channel closes. This crate provides:
//!
//! - **Channel Reader** - interprets raw on-chain channel fields into a
//!   well-formed [`Channel`] (zero-sender = not found, settling sentinel
//!   = absent)
//! - **Transaction Builder** - unsigned transaction descriptors with live
//!   gas price/estimate; the engine never signs or broadcasts
//! - **Claim Engine** - creation and validation of signed payment claims
//! - **Lifecycle Controller** - the open → settling → closed state
//!   machine, building the right contract call for each transition
//! - **Contract Gateway** - the [`ContractGateway`] seam to a live node,
//!   with an alloy-backed [`RpcGateway`] implementation
//!
//! ## Usage
//!
//! ```no_run
//! use alloy::primitives::{Address, U256};
//! use unichannel::{ChannelEngine, GatewayConfig, OpenChannelRequest, RpcGateway};
//!
//! # async fn demo() -> Result<(), unichannel::ChannelError> {
//! let gateway = RpcGateway::connect(
//!     GatewayConfig::native("http://localhost:8545")
//!         .with_deployment(1337, "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap()),
//! )
//! .await?;
//! let engine = ChannelEngine::new(gateway);
//!
//! let sender: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
//! let receiver: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
//! let opened = engine
//!     .open_channel(
//!         OpenChannelRequest {
//!             receiver,
//!             value: U256::from(100u64),
//!             channel_id: None,
//!             settling_period: None,
//!         },
//!         sender,
//!     )
//!     .await?;
//! // Sign and broadcast `opened.tx` with your own transaction pipeline.
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod claims;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod tx;
pub mod types;

// Re-export commonly used items at the crate root
pub use binding::{AssetBinding, ContractFlavor};
pub use engine::{ChannelEngine, OpenChannelRequest, OpenedChannel};
pub use error::{ChannelError, ErrorKind, Result};
pub use gateway::{ContractGateway, GatewayConfig, RpcGateway, TxSketch};
pub use tx::build_unsigned_tx;
pub use types::{
    Channel, ChannelId, ChannelState, Claim, RawChannel, UnsignedTx, DEFAULT_SETTLING_PERIOD,
};
