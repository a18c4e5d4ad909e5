use ethers::types::{TxHash, U256};

use crate::chain::erc20::approve;
use crate::chain::pool::{calculate_optimal_amounts, pool_by_pair, token_pair};
use crate::chain::position_manager::{self, MintCall};
use crate::chain::wallet::WalletPort;
use crate::engine::ordering::sort_canonical;
use crate::engine::swaps::deadline_from_now;
use crate::error::EngineError;
use crate::models::ContractBook;
use crate::params::{
    parse_address, parse_u256, BurnParams, CollectParams, DecreaseLiquidityParams,
    IncreaseLiquidityParams, MintParams,
};

/// Increase and decrease ride a short fixed deadline window.
const ADJUST_DEADLINE_SECS: u64 = 60;

/// Opens a new position. The pool's own token order is authoritative: the
/// caller's amounts are permuted to match it before the risk calculator
/// sizes the deposit, and the calculator's tick bounds pass through to the
/// mint unmodified.
pub async fn mint(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: MintParams,
) -> Result<TxHash, EngineError> {
    let token_a = parse_address(&params.token0_address)?;
    let token_b = parse_address(&params.token1_address)?;
    let amount_a = parse_u256(&params.amount0_desired)?;
    let amount_b = parse_u256(&params.amount1_desired)?;

    let pool = pool_by_pair(wallet, book.factory, token_a, token_b).await?;
    let (pool_token0, _) = token_pair(wallet, pool).await?;

    let (token0, token1, amount0, amount1) = if token_a == pool_token0 {
        (token_a, token_b, amount_a, amount_b)
    } else {
        (token_b, token_a, amount_b, amount_a)
    };

    let optimal = calculate_optimal_amounts(
        wallet,
        book.calculator,
        pool,
        amount0,
        amount1,
        params.risk_level,
    )
    .await?;

    approve(wallet, token0, book.position_manager, optimal.amount0).await?;
    approve(wallet, token1, book.position_manager, optimal.amount1).await?;

    position_manager::mint(
        wallet,
        book.position_manager,
        MintCall {
            token0,
            token1,
            tick_lower: optimal.tick_lower,
            tick_upper: optimal.tick_upper,
            amount0_desired: optimal.amount0,
            amount1_desired: optimal.amount1,
            recipient: wallet.own_address(),
            deadline: deadline_from_now(params.deadline),
        },
    )
    .await
}

/// Adds liquidity to an existing position. The position already fixes the
/// pair's order, so a plain address comparison replaces the pool read.
pub async fn increase(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: IncreaseLiquidityParams,
) -> Result<TxHash, EngineError> {
    let token_id = parse_u256(&params.token_id)?;
    let token_a = parse_address(&params.token0_address)?;
    let token_b = parse_address(&params.token1_address)?;
    let amount_a = parse_u256(&params.amount0_desired)?;
    let amount_b = parse_u256(&params.amount1_desired)?;

    let (token0, token1, amount0, amount1) = sort_canonical(token_a, token_b, amount_a, amount_b);

    approve(wallet, token0, book.position_manager, amount0).await?;
    approve(wallet, token1, book.position_manager, amount1).await?;

    position_manager::increase_liquidity(
        wallet,
        book.position_manager,
        token_id,
        amount0,
        amount1,
        deadline_from_now(ADJUST_DEADLINE_SECS),
    )
    .await
}

/// Removes a percentage of the position's current liquidity, integer floor.
/// The percentage is validated before anything touches the chain.
pub async fn decrease(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: DecreaseLiquidityParams,
) -> Result<TxHash, EngineError> {
    if params.percentage > 100 {
        return Err(EngineError::validation(format!(
            "percentage {} outside [0, 100]",
            params.percentage
        )));
    }
    let token_id = parse_u256(&params.token_id)?;

    let row = position_manager::position_row(wallet, book.position_manager, token_id).await?;
    let liquidity_to_remove = row.liquidity * U256::from(params.percentage) / U256::from(100u8);

    position_manager::decrease_liquidity(
        wallet,
        book.position_manager,
        token_id,
        liquidity_to_remove,
        deadline_from_now(ADJUST_DEADLINE_SECS),
    )
    .await
}

/// Collects all owed tokens and fees to the caller. Safe to repeat.
pub async fn collect(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: CollectParams,
) -> Result<TxHash, EngineError> {
    let token_id = parse_u256(&params.token_id)?;
    position_manager::collect_all(wallet, book.position_manager, token_id, wallet.own_address())
        .await
}

/// Burns an emptied position NFT. Remaining liquidity or owed tokens revert
/// on-chain; nothing is pre-checked locally.
pub async fn burn(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: BurnParams,
) -> Result<TxHash, EngineError> {
    let token_id = parse_u256(&params.token_id)?;
    position_manager::burn(wallet, book.position_manager, token_id).await
}
