use ethers::abi::Token;
use ethers::types::{Address, U256};

use crate::chain::abi::{CALCULATOR_ABI, FACTORY_ABI, POOL_ABI};
use crate::chain::wallet::{address_at, int24_at, uint_at, WalletPort};
use crate::error::EngineError;

/// Pool-level state snapshot from globalState().
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolGlobalState {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub fee: u32,
}

/// Suggested deposit shape from the on-chain calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimalAmounts {
    pub amount0: U256,
    pub amount1: U256,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Looks up the pool for a token pair. The factory answers the zero address
/// for pairs without a deployed pool; that is a caller error, not a chain
/// fault.
pub async fn pool_by_pair(
    wallet: &dyn WalletPort,
    factory: Address,
    token_a: Address,
    token_b: Address,
) -> Result<Address, EngineError> {
    let outputs = wallet
        .read(
            factory,
            &FACTORY_ABI,
            "poolByPair",
            vec![Token::Address(token_a), Token::Address(token_b)],
        )
        .await?;
    let pool = address_at(&outputs, 0, "poolByPair")?;
    if pool == Address::zero() {
        return Err(EngineError::validation(format!(
            "no pool deployed for token pair {:?} / {:?}",
            token_a, token_b
        )));
    }
    Ok(pool)
}

/// Reads the pool's canonical token ordering.
pub async fn token_pair(
    wallet: &dyn WalletPort,
    pool: Address,
) -> Result<(Address, Address), EngineError> {
    let (t0, t1) = tokio::try_join!(
        wallet.read(pool, &POOL_ABI, "token0", vec![]),
        wallet.read(pool, &POOL_ABI, "token1", vec![]),
    )?;
    Ok((
        address_at(&t0, 0, "token0")?,
        address_at(&t1, 0, "token1")?,
    ))
}

pub async fn global_state(
    wallet: &dyn WalletPort,
    pool: Address,
) -> Result<PoolGlobalState, EngineError> {
    let outputs = wallet.read(pool, &POOL_ABI, "globalState", vec![]).await?;
    Ok(PoolGlobalState {
        sqrt_price_x96: uint_at(&outputs, 0, "globalState")?,
        tick: int24_at(&outputs, 1, "globalState")?,
        fee: uint_at(&outputs, 2, "globalState")?.low_u64() as u32,
    })
}

pub async fn liquidity(wallet: &dyn WalletPort, pool: Address) -> Result<U256, EngineError> {
    let outputs = wallet.read(pool, &POOL_ABI, "liquidity", vec![]).await?;
    uint_at(&outputs, 0, "liquidity")
}

pub async fn tick_spacing(wallet: &dyn WalletPort, pool: Address) -> Result<i32, EngineError> {
    let outputs = wallet.read(pool, &POOL_ABI, "tickSpacing", vec![]).await?;
    int24_at(&outputs, 0, "tickSpacing")
}

/// Asks the deposit calculator for amounts and a tick range matching the
/// requested risk level.
pub async fn calculate_optimal_amounts(
    wallet: &dyn WalletPort,
    calculator: Address,
    pool: Address,
    amount0_desired: U256,
    amount1_desired: U256,
    risk_level: u8,
) -> Result<OptimalAmounts, EngineError> {
    let outputs = wallet
        .read(
            calculator,
            &CALCULATOR_ABI,
            "calculateOptimalAmounts",
            vec![
                Token::Address(pool),
                Token::Uint(amount0_desired),
                Token::Uint(amount1_desired),
                Token::Uint(U256::from(risk_level)),
            ],
        )
        .await?;
    Ok(OptimalAmounts {
        amount0: uint_at(&outputs, 0, "calculateOptimalAmounts")?,
        amount1: uint_at(&outputs, 1, "calculateOptimalAmounts")?,
        tick_lower: int24_at(&outputs, 2, "calculateOptimalAmounts")?,
        tick_upper: int24_at(&outputs, 3, "calculateOptimalAmounts")?,
    })
}
