use ethers::types::Address;
use num_traits::ToPrimitive;

use crate::chain::subgraph::SubgraphClient;
use crate::error::EngineError;
use crate::math::clamm::{
    mint_amounts, token0_price, token1_price, u256_to_bigint, MAX_TICK, MIN_TICK,
};
use crate::models::Position;

const DAYS_PER_YEAR: f64 = 365.0;

/// Best-effort APY for one position. Telemetry failure degrades this
/// position to zero and logs; it never aborts enumeration of the rest.
pub async fn position_apy(
    subgraph: &SubgraphClient,
    position: &Position,
    pool_address: Address,
) -> f64 {
    match try_position_apy(subgraph, position, pool_address).await {
        Ok(apy) => apy,
        Err(e) => {
            log::warn!(
                "APY degraded to 0 for position {}: {}",
                position.token_id,
                e
            );
            0.0
        }
    }
}

async fn try_position_apy(
    subgraph: &SubgraphClient,
    position: &Position,
    pool_address: Address,
) -> Result<f64, EngineError> {
    let (daily_fees_usd, native_price_usd) = tokio::try_join!(
        subgraph.pool_daily_fees_usd(pool_address),
        subgraph.native_price_usd(),
    )
    .map_err(EngineError::Telemetry)?;

    Ok(estimate_apy(position, daily_fees_usd, native_price_usd))
}

/// APY% = annualized fees × the position's share of pool liquidity, divided
/// by the position's TVL in USD. Zero fees, zero TVL, or degenerate inputs
/// all report zero instead of dividing by zero.
pub fn estimate_apy(position: &Position, daily_fees_usd: f64, native_price_usd: f64) -> f64 {
    let pool = &position.pool;

    if daily_fees_usd <= 0.0 {
        return 0.0;
    }
    let pool_liquidity = u256_to_bigint(pool.liquidity).to_f64().unwrap_or(0.0);
    if pool_liquidity == 0.0 {
        return 0.0;
    }
    // mint_amounts asserts on out-of-range ticks; degenerate rows report zero.
    if !(MIN_TICK..=MAX_TICK).contains(&position.tick_lower)
        || !(MIN_TICK..=MAX_TICK).contains(&position.tick_upper)
        || position.tick_lower >= position.tick_upper
    {
        return 0.0;
    }

    let liquidity = u256_to_bigint(position.liquidity);
    let liquidity_share = liquidity.to_f64().unwrap_or(0.0) / pool_liquidity;
    let year_fee = daily_fees_usd * DAYS_PER_YEAR;

    let sqrt_price = u256_to_bigint(pool.sqrt_price_x96);
    let (amount0_raw, amount1_raw) = mint_amounts(
        pool.tick_current,
        &sqrt_price,
        position.tick_lower,
        position.tick_upper,
        &liquidity,
    );
    let amount0 = amount0_raw.to_f64().unwrap_or(0.0) / 10f64.powi(pool.token0.decimals as i32);
    let amount1 = amount1_raw.to_f64().unwrap_or(0.0) / 10f64.powi(pool.token1.decimals as i32);

    let price0 = token0_price(&sqrt_price, pool.token0.decimals, pool.token1.decimals);
    let price1 = token1_price(&sqrt_price, pool.token0.decimals, pool.token1.decimals);

    let tvl = amount0 * price0 * native_price_usd + amount1 * price1 * native_price_usd;
    if tvl == 0.0 || !tvl.is_finite() {
        return 0.0;
    }

    let apy = year_fee * liquidity_share / tvl * 100.0;
    if apy.is_finite() {
        apy
    } else {
        0.0
    }
}
