use ethers::abi::Token;
use ethers::types::{Address, TxHash, U256};

use crate::chain::abi::POSITION_MANAGER_ABI;
use crate::chain::wallet::{address_at, int24_at, int24_token, uint_at, WalletPort};
use crate::error::EngineError;

/// The slice of a positions() row this engine consumes. Pool-level state is
/// read from the pool contract instead of being carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRow {
    pub token0: Address,
    pub token1: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: U256,
}

#[derive(Debug, Clone, Copy)]
pub struct MintCall {
    pub token0: Address,
    pub token1: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub recipient: Address,
    pub deadline: u64,
}

pub async fn balance_of(
    wallet: &dyn WalletPort,
    manager: Address,
    owner: Address,
) -> Result<U256, EngineError> {
    let outputs = wallet
        .read(
            manager,
            &POSITION_MANAGER_ABI,
            "balanceOf",
            vec![Token::Address(owner)],
        )
        .await?;
    uint_at(&outputs, 0, "balanceOf")
}

pub async fn token_of_owner_by_index(
    wallet: &dyn WalletPort,
    manager: Address,
    owner: Address,
    index: u64,
) -> Result<U256, EngineError> {
    let outputs = wallet
        .read(
            manager,
            &POSITION_MANAGER_ABI,
            "tokenOfOwnerByIndex",
            vec![Token::Address(owner), Token::Uint(U256::from(index))],
        )
        .await?;
    uint_at(&outputs, 0, "tokenOfOwnerByIndex")
}

/// The manager tracks which pool each tokenId was minted into; no factory
/// round-trip is needed to find it.
pub async fn pool_of(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
) -> Result<Address, EngineError> {
    let outputs = wallet
        .read(
            manager,
            &POSITION_MANAGER_ABI,
            "pool",
            vec![Token::Uint(token_id)],
        )
        .await?;
    address_at(&outputs, 0, "pool")
}

/// Reads one position row. The row is a flat 11-field tuple; the token pair
/// sits at indices 2..=3, the tick range at 4..=5 and live liquidity at 6.
pub async fn position_row(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
) -> Result<PositionRow, EngineError> {
    let outputs = wallet
        .read(
            manager,
            &POSITION_MANAGER_ABI,
            "positions",
            vec![Token::Uint(token_id)],
        )
        .await?;
    Ok(PositionRow {
        token0: address_at(&outputs, 2, "positions")?,
        token1: address_at(&outputs, 3, "positions")?,
        tick_lower: int24_at(&outputs, 4, "positions")?,
        tick_upper: int24_at(&outputs, 5, "positions")?,
        liquidity: uint_at(&outputs, 6, "positions")?,
    })
}

/// Opens a position. Minimum amounts are pinned to zero; slippage control
/// lives in the desired amounts chosen upstream.
pub async fn mint(
    wallet: &dyn WalletPort,
    manager: Address,
    call: MintCall,
) -> Result<TxHash, EngineError> {
    let params = Token::Tuple(vec![
        Token::Address(call.token0),
        Token::Address(call.token1),
        int24_token(call.tick_lower),
        int24_token(call.tick_upper),
        Token::Uint(call.amount0_desired),
        Token::Uint(call.amount1_desired),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Address(call.recipient),
        Token::Uint(U256::from(call.deadline)),
    ]);
    wallet
        .send_transaction(manager, &POSITION_MANAGER_ABI, "mint", vec![params])
        .await
}

pub async fn increase_liquidity(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
    amount0_desired: U256,
    amount1_desired: U256,
    deadline: u64,
) -> Result<TxHash, EngineError> {
    let params = Token::Tuple(vec![
        Token::Uint(token_id),
        Token::Uint(amount0_desired),
        Token::Uint(amount1_desired),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Uint(U256::from(deadline)),
    ]);
    wallet
        .send_transaction(
            manager,
            &POSITION_MANAGER_ABI,
            "increaseLiquidity",
            vec![params],
        )
        .await
}

pub async fn decrease_liquidity(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
    liquidity: U256,
    deadline: u64,
) -> Result<TxHash, EngineError> {
    let params = Token::Tuple(vec![
        Token::Uint(token_id),
        Token::Uint(liquidity),
        Token::Uint(U256::zero()),
        Token::Uint(U256::zero()),
        Token::Uint(U256::from(deadline)),
    ]);
    wallet
        .send_transaction(
            manager,
            &POSITION_MANAGER_ABI,
            "decreaseLiquidity",
            vec![params],
        )
        .await
}

/// Collects everything owed to the position by passing the uint128 ceiling
/// for both maximums.
pub async fn collect_all(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
    recipient: Address,
) -> Result<TxHash, EngineError> {
    let max = U256::from(u128::MAX);
    let params = Token::Tuple(vec![
        Token::Uint(token_id),
        Token::Address(recipient),
        Token::Uint(max),
        Token::Uint(max),
    ]);
    wallet
        .send_transaction(manager, &POSITION_MANAGER_ABI, "collect", vec![params])
        .await
}

pub async fn burn(
    wallet: &dyn WalletPort,
    manager: Address,
    token_id: U256,
) -> Result<TxHash, EngineError> {
    wallet
        .send_transaction(
            manager,
            &POSITION_MANAGER_ABI,
            "burn",
            vec![Token::Uint(token_id)],
        )
        .await
}
