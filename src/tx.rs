//! Unsigned transaction construction
//!
//! Turns calldata plus an intended value transfer into a descriptor the
//! caller can sign and submit. Gas price and the gas estimate are
//! sourced from the live gateway at build time — they are time-varying
//! outputs of network conditions, so a failed estimate (the call would
//! revert) propagates instead of being defaulted.

use tracing::debug;

use crate::error::{Result, ResultExt};
use crate::gateway::{ContractGateway, TxSketch};
use crate::types::UnsignedTx;

/// Build an unsigned transaction for the given sketch
pub async fn build_unsigned_tx<G: ContractGateway + ?Sized>(
    gateway: &G,
    sketch: TxSketch,
) -> Result<UnsignedTx> {
    let gas_price = gateway.gas_price().await.in_op("build tx")?;
    let gas = gateway.estimate_gas(&sketch).await.in_op("build tx")?;

    debug!(
        to = %sketch.to,
        from = %sketch.from,
        value = %sketch.value,
        gas,
        gas_price,
        "Built unsigned transaction"
    );

    Ok(UnsignedTx {
        from: sketch.from,
        to: sketch.to,
        data: sketch.data,
        value: sketch.value,
        gas,
        gas_price,
        nonce: None,
        chain_id: None,
    })
}
