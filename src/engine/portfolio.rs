use std::sync::Arc;
use std::time::Instant;

use ethers::types::U256;

use crate::chain::erc20::resolve_token;
use crate::chain::pool;
use crate::chain::position_manager;
use crate::chain::subgraph::SubgraphClient;
use crate::chain::tick_source::ChainTickSource;
use crate::chain::wallet::WalletPort;
use crate::engine::apy::position_apy;
use crate::error::EngineError;
use crate::models::{ContractBook, LpPosition, Pool, Position};
use crate::params::GetLpTokensParams;

/// Enumerates every position the owner holds, in on-chain index order, with
/// a yield estimate per position. Index reads are sequential; per-position
/// detail loads run concurrently and join in order.
pub async fn get_lp_tokens(
    wallet: &Arc<dyn WalletPort>,
    book: &ContractBook,
    subgraph: &SubgraphClient,
    params: GetLpTokensParams,
) -> Result<Vec<LpPosition>, EngineError> {
    let started = Instant::now();
    let owner = wallet.resolve_address(&params.user_address).await?;

    let balance = position_manager::balance_of(wallet.as_ref(), book.position_manager, owner)
        .await?
        .low_u64();

    let mut token_ids = Vec::with_capacity(balance as usize);
    for index in 0..balance {
        let token_id = position_manager::token_of_owner_by_index(
            wallet.as_ref(),
            book.position_manager,
            owner,
            index,
        )
        .await?;
        token_ids.push(token_id);
    }

    let loads = token_ids
        .iter()
        .map(|token_id| load_position(wallet, book, subgraph, *token_id));
    let positions = futures::future::try_join_all(loads).await?;

    log::info!(
        "Enumerated {} positions for {:?} in {:?}",
        positions.len(),
        owner,
        started.elapsed()
    );
    Ok(positions)
}

/// Loads one position's row, asks the manager which pool it was minted
/// into, snapshots pool state, and estimates APY.
async fn load_position(
    wallet: &Arc<dyn WalletPort>,
    book: &ContractBook,
    subgraph: &SubgraphClient,
    token_id: U256,
) -> Result<LpPosition, EngineError> {
    let row = position_manager::position_row(wallet.as_ref(), book.position_manager, token_id).await?;
    let pool_address =
        position_manager::pool_of(wallet.as_ref(), book.position_manager, token_id).await?;

    let (token0, token1) = tokio::try_join!(
        resolve_token(wallet.as_ref(), row.token0),
        resolve_token(wallet.as_ref(), row.token1),
    )?;
    let (state, pool_liquidity, tick_spacing) = tokio::try_join!(
        pool::global_state(wallet.as_ref(), pool_address),
        pool::liquidity(wallet.as_ref(), pool_address),
        pool::tick_spacing(wallet.as_ref(), pool_address),
    )?;

    let pool = Pool {
        token0,
        token1,
        fee: state.fee,
        sqrt_price_x96: state.sqrt_price_x96,
        liquidity: pool_liquidity,
        tick_current: state.tick,
        tick_spacing,
        tick_data: Arc::new(ChainTickSource::new(wallet.clone(), pool_address)),
    };
    let position = Position {
        pool,
        tick_lower: row.tick_lower,
        tick_upper: row.tick_upper,
        liquidity: row.liquidity,
        token_id,
    };

    let apy_percent = position_apy(subgraph, &position, pool_address).await;

    Ok(LpPosition {
        token_id,
        apy_percent,
        position,
        pool_address,
    })
}
