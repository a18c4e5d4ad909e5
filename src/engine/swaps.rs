use ethers::abi::Token;
use ethers::types::{Bytes, TxHash, U256};
use ethers::utils::{parse_units, to_checksum, ParseUnits};

use crate::chain::abi::SWAP_ROUTER_ABI;
use crate::chain::erc20::{approve, resolve_token};
use crate::chain::wallet::WalletPort;
use crate::error::EngineError;
use crate::models::{ContractBook, SwapPath};
use crate::params::{
    parse_address, parse_u256, ExactInputParams, ExactInputSingleParams, ExactOutputParams,
    ExactOutputSingleParams, TradePath,
};

pub fn swap_router_address(book: &ContractBook) -> String {
    to_checksum(&book.swap_router, None)
}

/// On-chain deadlines are absolute; callers supply an offset in seconds.
pub(crate) fn deadline_from_now(offset_secs: u64) -> u64 {
    chrono::Utc::now().timestamp() as u64 + offset_secs
}

fn limit_or_zero(raw: Option<&str>) -> Result<U256, EngineError> {
    match raw {
        Some(value) => parse_u256(value),
        None => Ok(U256::zero()),
    }
}

/// Scales a human-readable decimal amount into base units.
fn to_base_units(human: &str, decimals: u8) -> Result<U256, EngineError> {
    let parsed = parse_units(human.trim(), decimals as u32)
        .map_err(|e| EngineError::validation(format!("invalid amount '{}': {}", human, e)))?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(EngineError::validation(format!(
            "amount '{}' must be positive",
            human
        ))),
    }
}

fn build_path(raw: &TradePath) -> Result<SwapPath, EngineError> {
    let mut tokens = Vec::with_capacity(raw.intermediate_tokens.len() + 2);
    tokens.push(parse_address(&raw.token_in)?);
    for token in &raw.intermediate_tokens {
        tokens.push(parse_address(token)?);
    }
    tokens.push(parse_address(&raw.token_out)?);
    SwapPath::new(tokens, raw.fees.clone())
}

/// Router path layout: 20-byte token, 3-byte big-endian fee tier, repeated,
/// ending on the final token with no trailing fee.
pub fn encode_path(path: &SwapPath) -> Bytes {
    let mut packed = Vec::with_capacity(20 * path.tokens().len() + 3 * path.fees().len());
    for (i, token) in path.tokens().iter().enumerate() {
        packed.extend_from_slice(token.as_bytes());
        if let Some(fee) = path.fees().get(i) {
            packed.extend_from_slice(&fee.to_be_bytes()[1..]);
        }
    }
    Bytes::from(packed)
}

/// Exact-in single hop: approve the input amount to the router, then swap.
/// Amounts arrive in base units.
pub async fn exact_input_single(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: ExactInputSingleParams,
) -> Result<TxHash, EngineError> {
    let token_in = parse_address(&params.token_in_address)?;
    let token_out = parse_address(&params.token_out_address)?;
    if token_in == token_out {
        return Err(EngineError::validation(
            "swap input and output token must differ",
        ));
    }
    let amount_in = parse_u256(&params.amount_in)?;
    let amount_out_minimum = parse_u256(&params.amount_out_minimum)?;
    let limit_sqrt_price = limit_or_zero(params.limit_sqrt_price.as_deref())?;
    let deadline = deadline_from_now(params.deadline);

    approve(wallet, token_in, book.swap_router, amount_in).await?;

    let call = Token::Tuple(vec![
        Token::Address(token_in),
        Token::Address(token_out),
        Token::Address(wallet.own_address()),
        Token::Uint(U256::from(deadline)),
        Token::Uint(amount_in),
        Token::Uint(amount_out_minimum),
        Token::Uint(limit_sqrt_price),
    ]);
    wallet
        .send_transaction(book.swap_router, &SWAP_ROUTER_ABI, "exactInputSingle", vec![call])
        .await
}

/// Exact-out single hop: the spend ceiling (`amountInMaximum`) is what gets
/// approved, since the router may pull up to that much.
pub async fn exact_output_single(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: ExactOutputSingleParams,
) -> Result<TxHash, EngineError> {
    let token_in = parse_address(&params.token_in_address)?;
    let token_out = parse_address(&params.token_out_address)?;
    if token_in == token_out {
        return Err(EngineError::validation(
            "swap input and output token must differ",
        ));
    }
    let amount_out = parse_u256(&params.amount_out)?;
    let amount_in_maximum = parse_u256(&params.amount_in_maximum)?;
    let limit_sqrt_price = limit_or_zero(params.limit_sqrt_price.as_deref())?;
    let deadline = deadline_from_now(params.deadline);

    approve(wallet, token_in, book.swap_router, amount_in_maximum).await?;

    let call = Token::Tuple(vec![
        Token::Address(token_in),
        Token::Address(token_out),
        Token::Address(wallet.own_address()),
        Token::Uint(U256::from(deadline)),
        Token::Uint(amount_out),
        Token::Uint(amount_in_maximum),
        Token::Uint(limit_sqrt_price),
    ]);
    wallet
        .send_transaction(book.swap_router, &SWAP_ROUTER_ABI, "exactOutputSingle", vec![call])
        .await
}

/// Exact-in multi hop. Amounts are human-readable and scaled by the first
/// and last path token's decimals; allowances are the caller's concern here.
pub async fn exact_input_multi_hop(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: ExactInputParams,
) -> Result<TxHash, EngineError> {
    let path = build_path(&params.path)?;
    let recipient = wallet.resolve_address(&params.recipient).await?;

    let (token_in, token_out) = tokio::try_join!(
        resolve_token(wallet, path.token_in()),
        resolve_token(wallet, path.token_out()),
    )?;
    let amount_in = to_base_units(&params.amount_in, token_in.decimals)?;
    let amount_out_minimum = to_base_units(&params.amount_out_minimum, token_out.decimals)?;
    let deadline = deadline_from_now(params.deadline);

    let call = Token::Tuple(vec![
        Token::Bytes(encode_path(&path).to_vec()),
        Token::Address(recipient),
        Token::Uint(U256::from(deadline)),
        Token::Uint(amount_in),
        Token::Uint(amount_out_minimum),
    ]);
    wallet
        .send_transaction(book.swap_router, &SWAP_ROUTER_ABI, "exactInput", vec![call])
        .await
}

/// Exact-out multi hop. The router walks exact-output paths backwards, so
/// the encoded byte path runs output token first.
pub async fn exact_output_multi_hop(
    wallet: &dyn WalletPort,
    book: &ContractBook,
    params: ExactOutputParams,
) -> Result<TxHash, EngineError> {
    let path = build_path(&params.path)?;
    let recipient = wallet.resolve_address(&params.recipient).await?;

    let (token_in, token_out) = tokio::try_join!(
        resolve_token(wallet, path.token_in()),
        resolve_token(wallet, path.token_out()),
    )?;
    let amount_out = to_base_units(&params.amount_out, token_out.decimals)?;
    let amount_in_maximum = to_base_units(&params.amount_in_maximum, token_in.decimals)?;
    let deadline = deadline_from_now(params.deadline);

    let call = Token::Tuple(vec![
        Token::Bytes(encode_path(&path.reversed()).to_vec()),
        Token::Address(recipient),
        Token::Uint(U256::from(deadline)),
        Token::Uint(amount_out),
        Token::Uint(amount_in_maximum),
    ]);
    wallet
        .send_transaction(book.swap_router, &SWAP_ROUTER_ABI, "exactOutput", vec![call])
        .await
}
