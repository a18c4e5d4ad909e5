use std::fmt;
use std::sync::Arc;

use ethers::types::{Address, U256};

use crate::chain::tick_source::TickDataProvider;
use crate::error::EngineError;

/// Resolved ERC-20 identity. Decimals are fetched per call, never cached
/// across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
}

/// Snapshot of one pool, canonically ordered (token0.address < token1.address
/// by byte comparison). Read fresh per operation and never mutated locally.
#[derive(Clone)]
pub struct Pool {
    pub token0: Token,
    pub token1: Token,
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub liquidity: U256,
    pub tick_current: i32,
    pub tick_spacing: i32,
    pub tick_data: Arc<dyn TickDataProvider>,
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("token0", &self.token0)
            .field("token1", &self.token1)
            .field("fee", &self.fee)
            .field("sqrt_price_x96", &self.sqrt_price_x96)
            .field("liquidity", &self.liquidity)
            .field("tick_current", &self.tick_current)
            .field("tick_spacing", &self.tick_spacing)
            .finish_non_exhaustive()
    }
}

/// One NFT-managed liquidity position. `token_id` is the durable identity.
#[derive(Debug, Clone)]
pub struct Position {
    pub pool: Pool,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: U256,
    pub token_id: U256,
}

/// Enumerated position plus its yield estimate.
#[derive(Debug, Clone)]
pub struct LpPosition {
    pub token_id: U256,
    pub apy_percent: f64,
    pub position: Position,
    pub pool_address: Address,
}

/// Ordered hop sequence for a multi-hop swap: n tokens joined by n-1 fee
/// tiers, input first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPath {
    tokens: Vec<Address>,
    fees: Vec<u32>,
}

impl SwapPath {
    const MAX_UINT24: u32 = (1 << 24) - 1;

    pub fn new(tokens: Vec<Address>, fees: Vec<u32>) -> Result<Self, EngineError> {
        if tokens.len() < 2 {
            return Err(EngineError::validation(
                "swap path needs at least two tokens",
            ));
        }
        if fees.len() + 1 != tokens.len() {
            return Err(EngineError::validation(format!(
                "swap path needs exactly one fee per hop: {} tokens, {} fees",
                tokens.len(),
                fees.len()
            )));
        }
        if let Some(fee) = fees.iter().find(|f| **f > Self::MAX_UINT24) {
            return Err(EngineError::validation(format!(
                "fee tier {} does not fit uint24",
                fee
            )));
        }
        Ok(SwapPath { tokens, fees })
    }

    pub fn token_in(&self) -> Address {
        self.tokens[0]
    }

    pub fn token_out(&self) -> Address {
        self.tokens[self.tokens.len() - 1]
    }

    pub fn tokens(&self) -> &[Address] {
        &self.tokens
    }

    pub fn fees(&self) -> &[u32] {
        &self.fees
    }

    /// Same path walked output-to-input, as exact-output routers expect.
    pub fn reversed(&self) -> SwapPath {
        SwapPath {
            tokens: self.tokens.iter().rev().copied().collect(),
            fees: self.fees.iter().rev().copied().collect(),
        }
    }
}

/// Deployed contract addresses of one target DEX.
#[derive(Debug, Clone, Copy)]
pub struct ContractBook {
    pub swap_router: Address,
    pub position_manager: Address,
    pub factory: Address,
    pub calculator: Address,
}
