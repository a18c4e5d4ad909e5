// Explicit operation registry: one row per exposed tool with its name,
// caller-facing description, and parameter schema, plus the dispatcher that
// routes a named call to the engine.

use ethers::types::TxHash;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::bootstrap::AppState;
use crate::engine::{portfolio, positions, swaps};
use crate::error::EngineError;
use crate::models::{LpPosition, Token};

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": properties, "required": required })
}

fn path_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tokenIn": { "type": "string", "description": "Address of the input token" },
            "intermediateTokens": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Addresses of the intermediate tokens, in hop order"
            },
            "tokenOut": { "type": "string", "description": "Address of the output token" },
            "fees": {
                "type": "array",
                "items": { "type": "integer" },
                "description": "Fee tier of each pool along the path"
            }
        },
        "required": ["tokenIn", "tokenOut", "fees"]
    })
}

pub static TOOLS: Lazy<Vec<ToolSpec>> = Lazy::new(|| {
    vec![
        ToolSpec {
            name: "kim_get_swap_router_address",
            description: "Get the address of the swap router",
            parameters: object_schema(json!({}), &[]),
        },
        ToolSpec {
            name: "kim_swap_exact_input_single_hop",
            description: "Swap an exact amount of input tokens for an output token in a single hop. \
                Have the token amounts in their base units. Don't need to approve the swap router \
                for the output token. User will have sufficient balance of the input token. The \
                swap router address is already provided in the function. Returns a transaction \
                hash on success. Once you get a transaction hash, the swap is complete - do not \
                call this function again.",
            parameters: object_schema(
                json!({
                    "tokenInAddress": { "type": "string", "description": "Address of the token to swap from" },
                    "tokenOutAddress": { "type": "string", "description": "Address of the token to swap to" },
                    "amountIn": { "type": "string", "description": "Amount of input tokens, in base units" },
                    "amountOutMinimum": { "type": "string", "description": "Minimum acceptable output amount, in base units" },
                    "limitSqrtPrice": { "type": "string", "description": "Optional sqrt price limit for the swap" },
                    "deadline": { "type": "integer", "description": "Deadline offset in seconds from now (default 60)" }
                }),
                &["tokenInAddress", "tokenOutAddress", "amountIn", "amountOutMinimum"],
            ),
        },
        ToolSpec {
            name: "kim_swap_exact_output_single_hop",
            description: "Swap an exact amount of output tokens for a single hop. Have the token \
                amounts in their base units. Don't need to approve the swap router for the output \
                token. User will have sufficient balance of the input token. The swap router \
                address is already provided in the function. Returns a transaction hash on \
                success. Once you get a transaction hash, the swap is complete - do not call this \
                function again.",
            parameters: object_schema(
                json!({
                    "tokenInAddress": { "type": "string", "description": "Address of the token to swap from" },
                    "tokenOutAddress": { "type": "string", "description": "Address of the token to swap to" },
                    "amountOut": { "type": "string", "description": "Exact output amount to receive, in base units" },
                    "amountInMaximum": { "type": "string", "description": "Maximum input amount to spend, in base units" },
                    "limitSqrtPrice": { "type": "string", "description": "Optional sqrt price limit for the swap" },
                    "deadline": { "type": "integer", "description": "Deadline offset in seconds from now (default 60)" }
                }),
                &["tokenInAddress", "tokenOutAddress", "amountOut", "amountInMaximum"],
            ),
        },
        ToolSpec {
            name: "kim_swap_exact_input_multi_hop",
            description: "Swap an exact amount of input tokens in multiple hops",
            parameters: object_schema(
                json!({
                    "path": path_schema(),
                    "recipient": { "type": "string", "description": "Address receiving the output tokens" },
                    "amountIn": { "type": "string", "description": "Amount of the input token, human-readable" },
                    "amountOutMinimum": { "type": "string", "description": "Minimum output amount, human-readable" },
                    "deadline": { "type": "integer", "description": "Deadline offset in seconds from now (default 60)" }
                }),
                &["path", "recipient", "amountIn", "amountOutMinimum"],
            ),
        },
        ToolSpec {
            name: "kim_swap_exact_output_multi_hop",
            description: "Swap tokens to receive an exact amount of output tokens in multiple hops",
            parameters: object_schema(
                json!({
                    "path": path_schema(),
                    "recipient": { "type": "string", "description": "Address receiving the output tokens" },
                    "amountOut": { "type": "string", "description": "Exact output amount to receive, human-readable" },
                    "amountInMaximum": { "type": "string", "description": "Maximum input amount to spend, human-readable" },
                    "deadline": { "type": "integer", "description": "Deadline offset in seconds from now (default 60)" }
                }),
                &["path", "recipient", "amountOut", "amountInMaximum"],
            ),
        },
        ToolSpec {
            name: "kim_mint_position",
            description: "Mint a new liquidity position in a pool. Returns a transaction hash on \
                success. Once you get a transaction hash, the mint is complete - do not call this \
                function again.",
            parameters: object_schema(
                json!({
                    "token0Address": { "type": "string", "description": "Address of the first token" },
                    "token1Address": { "type": "string", "description": "Address of the second token" },
                    "amount0Desired": { "type": "string", "description": "Desired amount of the first token, in base units" },
                    "amount1Desired": { "type": "string", "description": "Desired amount of the second token, in base units" },
                    "riskLevel": { "type": "integer", "description": "Risk level for the tick range selection" },
                    "deadline": { "type": "integer", "description": "Deadline offset in seconds from now (default 60)" }
                }),
                &["token0Address", "token1Address", "amount0Desired", "amount1Desired", "riskLevel"],
            ),
        },
        ToolSpec {
            name: "kim_increase_liquidity",
            description: "Increase liquidity in an existing position. Returns a transaction hash \
                on success. Once you get a transaction hash, the increase is complete - do not \
                call this function again.",
            parameters: object_schema(
                json!({
                    "tokenId": { "type": "string", "description": "Id of the position NFT" },
                    "token0Address": { "type": "string", "description": "Address of the first token" },
                    "token1Address": { "type": "string", "description": "Address of the second token" },
                    "amount0Desired": { "type": "string", "description": "Desired amount of the first token, in base units" },
                    "amount1Desired": { "type": "string", "description": "Desired amount of the second token, in base units" }
                }),
                &["tokenId", "token0Address", "token1Address", "amount0Desired", "amount1Desired"],
            ),
        },
        ToolSpec {
            name: "kim_decrease_liquidity",
            description: "Decrease liquidity in an existing position by specifying a percentage \
                (0-100). Returns a transaction hash on success. Once you get a transaction hash, \
                the decrease is complete - do not call this function again.",
            parameters: object_schema(
                json!({
                    "tokenId": { "type": "string", "description": "Id of the position NFT" },
                    "percentage": { "type": "integer", "description": "Share of current liquidity to remove, 0-100" }
                }),
                &["tokenId", "percentage"],
            ),
        },
        ToolSpec {
            name: "kim_collect",
            description: "Collect all available tokens from a liquidity position. Can be rewards \
                or tokens removed from a liquidity position. So, should be called after \
                decreasing liquidity as well as on its own.",
            parameters: object_schema(
                json!({
                    "tokenId": { "type": "string", "description": "Id of the position NFT" }
                }),
                &["tokenId"],
            ),
        },
        ToolSpec {
            name: "kim_burn",
            description: "Burn a liquidity position NFT after all tokens have been collected.",
            parameters: object_schema(
                json!({
                    "tokenId": { "type": "string", "description": "Id of the position NFT" }
                }),
                &["tokenId"],
            ),
        },
        ToolSpec {
            name: "kim_get_lp_tokens",
            description: "Get all LP token positions for a user along with their APYs",
            parameters: object_schema(
                json!({
                    "userAddress": { "type": "string", "description": "Address owning the positions" }
                }),
                &["userAddress"],
            ),
        },
    ]
});

pub fn tools() -> &'static [ToolSpec] {
    &TOOLS
}

/// Routes one named tool call to the engine. Unknown names and malformed
/// arguments are validation failures, not server faults.
pub async fn dispatch(state: &AppState, tool: &str, args: Value) -> Result<Value, EngineError> {
    let wallet = state.wallet.as_ref();
    let book = &state.book;

    match tool {
        "kim_get_swap_router_address" => Ok(json!({
            "swap_router_address": swaps::swap_router_address(book)
        })),
        "kim_swap_exact_input_single_hop" => {
            let hash = swaps::exact_input_single(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_swap_exact_output_single_hop" => {
            let hash = swaps::exact_output_single(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_swap_exact_input_multi_hop" => {
            let hash = swaps::exact_input_multi_hop(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_swap_exact_output_multi_hop" => {
            let hash = swaps::exact_output_multi_hop(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_mint_position" => {
            let hash = positions::mint(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_increase_liquidity" => {
            let hash = positions::increase(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_decrease_liquidity" => {
            let hash = positions::decrease(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_collect" => {
            let hash = positions::collect(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_burn" => {
            let hash = positions::burn(wallet, book, parse_params(args)?).await?;
            Ok(tx_result(hash))
        }
        "kim_get_lp_tokens" => {
            let lp_tokens =
                portfolio::get_lp_tokens(&state.wallet, book, &state.subgraph, parse_params(args)?)
                    .await?;
            Ok(Value::Array(lp_tokens.iter().map(lp_position_json).collect()))
        }
        other => Err(EngineError::validation(format!("unknown tool '{}'", other))),
    }
}

fn parse_params<T: DeserializeOwned>(args: Value) -> Result<T, EngineError> {
    serde_json::from_value(args)
        .map_err(|e| EngineError::validation(format!("invalid parameters: {}", e)))
}

fn tx_result(hash: TxHash) -> Value {
    json!({ "transaction_hash": format!("{:?}", hash) })
}

fn token_json(token: &Token) -> Value {
    json!({
        "chain_id": token.chain_id,
        "address": format!("{:?}", token.address),
        "decimals": token.decimals,
    })
}

fn lp_position_json(lp: &LpPosition) -> Value {
    let pool = &lp.position.pool;
    json!({
        "token_id": lp.token_id.to_string(),
        "apy": lp.apy_percent,
        "pool_address": format!("{:?}", lp.pool_address),
        "position": {
            "tick_lower": lp.position.tick_lower,
            "tick_upper": lp.position.tick_upper,
            "liquidity": lp.position.liquidity.to_string(),
            "pool": {
                "token0": token_json(&pool.token0),
                "token1": token_json(&pool.token1),
                "fee": pool.fee,
                "sqrt_price_x96": pool.sqrt_price_x96.to_string(),
                "liquidity": pool.liquidity.to_string(),
                "tick_current": pool.tick_current,
                "tick_spacing": pool.tick_spacing,
            }
        }
    })
}
