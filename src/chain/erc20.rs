use ethers::abi::Token;
use ethers::types::{Address, TxHash, U256};

use crate::chain::abi::ERC20_ABI;
use crate::chain::wallet::{uint_at, WalletPort};
use crate::error::EngineError;
use crate::models::Token as Erc20Token;

/// Fetches on-chain decimals and wraps the result with the wallet's chain id.
pub async fn resolve_token(
    wallet: &dyn WalletPort,
    address: Address,
) -> Result<Erc20Token, EngineError> {
    let outputs = wallet.read(address, &ERC20_ABI, "decimals", vec![]).await?;
    let decimals = uint_at(&outputs, 0, "decimals")?.low_u64() as u8;
    Ok(Erc20Token {
        chain_id: wallet.chain_id(),
        address,
        decimals,
    })
}

/// Grants `spender` an allowance of exactly `amount`. Callers submit this
/// before the transfer-dependent transaction; both ride the same wallet, so
/// nonce order keeps the approval first.
pub async fn approve(
    wallet: &dyn WalletPort,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TxHash, EngineError> {
    wallet
        .send_transaction(
            token,
            &ERC20_ABI,
            "approve",
            vec![Token::Address(spender), Token::Uint(amount)],
        )
        .await
}
