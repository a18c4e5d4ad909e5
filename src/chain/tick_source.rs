use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::Address;

use crate::chain::abi::POOL_ABI;
use crate::chain::wallet::{int128_at, int24_at, int24_token, WalletPort};
use crate::error::EngineError;

/// Tick-level pool state, looked up lazily as the math walks the curve.
/// Implementations read fresh on every call; nothing is cached between
/// lookups, so long-lived pool snapshots never serve stale tick data.
#[async_trait]
pub trait TickDataProvider: Send + Sync {
    /// Net liquidity added when the pool crosses `tick` moving left to right.
    async fn liquidity_net(&self, tick: i32) -> Result<i128, EngineError>;

    /// Nearest initialized tick from the pool's current neighborhood.
    /// `lte` searches downward, otherwise upward. The flag reports the
    /// returned tick as initialized so callers consume it without a second
    /// probe.
    async fn next_initialized_tick(
        &self,
        tick: i32,
        lte: bool,
    ) -> Result<(i32, bool), EngineError>;
}

/// Live provider backed by the pool contract. Directional lookups lean on
/// the pool's own doubly-linked tick list instead of scanning bitmap words.
pub struct ChainTickSource {
    wallet: Arc<dyn WalletPort>,
    pool: Address,
}

impl ChainTickSource {
    pub fn new(wallet: Arc<dyn WalletPort>, pool: Address) -> Self {
        ChainTickSource { wallet, pool }
    }
}

#[async_trait]
impl TickDataProvider for ChainTickSource {
    async fn liquidity_net(&self, tick: i32) -> Result<i128, EngineError> {
        let outputs = self
            .wallet
            .read(self.pool, &POOL_ABI, "ticks", vec![int24_token(tick)])
            .await?;
        int128_at(&outputs, 1, "ticks")
    }

    async fn next_initialized_tick(
        &self,
        _tick: i32,
        lte: bool,
    ) -> Result<(i32, bool), EngineError> {
        let function = if lte { "prevTickGlobal" } else { "nextTickGlobal" };
        let outputs = self.wallet.read(self.pool, &POOL_ABI, function, vec![]).await?;
        Ok((int24_at(&outputs, 0, function)?, true))
    }
}
