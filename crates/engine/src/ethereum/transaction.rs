use std::str::FromStr;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::utils::{parse_ether, parse_units};
use alloy::primitives::{Address, Bytes, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol;
use alloy::sol_types::SolCall;

use common::{Error, Result, WalletCredentials};

sol! {
    function transferFrom(address from, address to, uint256 tokenId);
}

/// Signer for `credentials`, checked against the configured address.
pub fn signer_for(credentials: &WalletCredentials) -> Result<PrivateKeySigner> {
    let signer = PrivateKeySigner::from_str(credentials.private_key.trim())
        .map_err(|_| Error::Config("WALLET_PRIVATE_KEY is not a valid secp256k1 key".into()))?;
    let expected = Address::from_str(credentials.address.trim()).map_err(|e| {
        Error::Config(format!("WALLET_ADDRESS '{}' is invalid: {e}", credentials.address))
    })?;

    if signer.address() != expected {
        return Err(Error::Config(format!(
            "WALLET_PRIVATE_KEY controls {}, not WALLET_ADDRESS {}",
            signer.address(),
            credentials.address
        )));
    }
    Ok(signer)
}

pub fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address.trim())
        .map_err(|e| Error::Execution(format!("invalid address '{address}': {e}")))
}

pub fn parse_token_id(token_id: &str) -> Result<U256> {
    U256::from_str_radix(token_id.trim(), 10)
        .map_err(|e| Error::Execution(format!("invalid token id '{token_id}': {e}")))
}

/// ETH amount in wei, from the shortest decimal form of the float.
pub fn eth_to_wei(eth: f64) -> Result<U256> {
    if !eth.is_finite() || eth < 0.0 {
        return Err(Error::Execution(format!("invalid amount: {eth} ETH")));
    }
    parse_ether(&eth.to_string())
        .map_err(|e| Error::Execution(format!("cannot convert {eth} ETH to wei: {e}")))
}

pub fn gwei_to_wei(gwei: f64) -> Result<u128> {
    if !gwei.is_finite() || gwei < 0.0 {
        return Err(Error::Config(format!("invalid gas price: {gwei} gwei")));
    }
    let wei = parse_units(&gwei.to_string(), "gwei")
        .map_err(|e| Error::Config(format!("cannot convert {gwei} gwei to wei: {e}")))?
        .get_absolute();
    u128::try_from(wei).map_err(|_| Error::Config(format!("gas price too large: {gwei} gwei")))
}

/// ABI call data for `transferFrom(from, to, token_id)`.
pub fn transfer_from_calldata(from: Address, to: Address, token_id: U256) -> Bytes {
    transferFromCall {
        from,
        to,
        tokenId: token_id,
    }
    .abi_encode()
    .into()
}

/// Sign a legacy transaction (EIP-155 when `chain_id` is set) and return its raw encoding.
pub fn sign_legacy(signer: &PrivateKeySigner, tx: TxLegacy) -> Result<Vec<u8>> {
    let signature = signer
        .sign_hash_sync(&tx.signature_hash())
        .map_err(|e| Error::Execution(format!("signing failed: {e}")))?;
    let envelope = TxEnvelope::from(tx.into_signed(signature));
    Ok(envelope.encoded_2718())
}
