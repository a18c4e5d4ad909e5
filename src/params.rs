// Deserialized argument structs for the exposed operations. Field names are
// camelCase on the wire; amounts ride as decimal strings because several of
// them exceed u64.

use std::str::FromStr;

use ethers::types::{Address, U256};
use serde::Deserialize;

use crate::error::EngineError;

fn default_deadline() -> u64 {
    60
}

pub fn parse_address(raw: &str) -> Result<Address, EngineError> {
    Address::from_str(raw.trim())
        .map_err(|e| EngineError::validation(format!("invalid address '{}': {}", raw, e)))
}

pub fn parse_u256(raw: &str) -> Result<U256, EngineError> {
    U256::from_dec_str(raw.trim())
        .map_err(|e| EngineError::validation(format!("invalid base-unit amount '{}': {}", raw, e)))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactInputSingleParams {
    pub token_in_address: String,
    pub token_out_address: String,
    pub amount_in: String,
    pub amount_out_minimum: String,
    #[serde(default)]
    pub limit_sqrt_price: Option<String>,
    /// Seconds from now, not an absolute timestamp.
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactOutputSingleParams {
    pub token_in_address: String,
    pub token_out_address: String,
    pub amount_out: String,
    pub amount_in_maximum: String,
    #[serde(default)]
    pub limit_sqrt_price: Option<String>,
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

/// Hop sequence for multi-hop swaps: input token, any intermediates in order,
/// output token, one fee tier per pool boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePath {
    pub token_in: String,
    #[serde(default)]
    pub intermediate_tokens: Vec<String>,
    pub token_out: String,
    pub fees: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactInputParams {
    pub path: TradePath,
    pub recipient: String,
    /// Human-readable amount of the path's input token.
    pub amount_in: String,
    /// Human-readable amount of the path's output token.
    pub amount_out_minimum: String,
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactOutputParams {
    pub path: TradePath,
    pub recipient: String,
    pub amount_out: String,
    pub amount_in_maximum: String,
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintParams {
    pub token0_address: String,
    pub token1_address: String,
    pub amount0_desired: String,
    pub amount1_desired: String,
    pub risk_level: u8,
    #[serde(default = "default_deadline")]
    pub deadline: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncreaseLiquidityParams {
    pub token_id: String,
    pub token0_address: String,
    pub token1_address: String,
    pub amount0_desired: String,
    pub amount1_desired: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecreaseLiquidityParams {
    pub token_id: String,
    pub percentage: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectParams {
    pub token_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnParams {
    pub token_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLpTokensParams {
    pub user_address: String,
}
