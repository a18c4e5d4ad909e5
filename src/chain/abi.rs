// Contract ABI tables, parsed once on first use. Each table carries only the
// functions this engine actually calls.

use ethers::abi::Abi;
use once_cell::sync::Lazy;

pub static ERC20_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "decimals",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "uint8"}]
      },
      {
        "type": "function",
        "name": "approve",
        "stateMutability": "nonpayable",
        "inputs": [
          {"name": "spender", "type": "address"},
          {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}]
      }
    ]"#,
    )
    .expect("Failed to parse ERC20 ABI")
});

pub static FACTORY_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "poolByPair",
        "stateMutability": "view",
        "inputs": [
          {"name": "tokenA", "type": "address"},
          {"name": "tokenB", "type": "address"}
        ],
        "outputs": [{"name": "pool", "type": "address"}]
      }
    ]"#,
    )
    .expect("Failed to parse factory ABI")
});

pub static POOL_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "token0",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "address"}]
      },
      {
        "type": "function",
        "name": "token1",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "address"}]
      },
      {
        "type": "function",
        "name": "globalState",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [
          {"name": "price", "type": "uint160"},
          {"name": "tick", "type": "int24"},
          {"name": "lastFee", "type": "uint16"},
          {"name": "pluginConfig", "type": "uint8"},
          {"name": "communityFee", "type": "uint16"},
          {"name": "unlocked", "type": "bool"}
        ]
      },
      {
        "type": "function",
        "name": "liquidity",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "uint128"}]
      },
      {
        "type": "function",
        "name": "tickSpacing",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "int24"}]
      },
      {
        "type": "function",
        "name": "ticks",
        "stateMutability": "view",
        "inputs": [{"name": "tick", "type": "int24"}],
        "outputs": [
          {"name": "liquidityTotal", "type": "uint256"},
          {"name": "liquidityDelta", "type": "int128"},
          {"name": "prevTick", "type": "int24"},
          {"name": "nextTick", "type": "int24"},
          {"name": "outerFeeGrowth0Token", "type": "uint256"},
          {"name": "outerFeeGrowth1Token", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "prevTickGlobal",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "int24"}]
      },
      {
        "type": "function",
        "name": "nextTickGlobal",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "int24"}]
      }
    ]"#,
    )
    .expect("Failed to parse pool ABI")
});

pub static CALCULATOR_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "calculateOptimalAmounts",
        "stateMutability": "view",
        "inputs": [
          {"name": "pool", "type": "address"},
          {"name": "amount0Desired", "type": "uint256"},
          {"name": "amount1Desired", "type": "uint256"},
          {"name": "riskLevel", "type": "uint8"}
        ],
        "outputs": [
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"},
          {"name": "tickLower", "type": "int24"},
          {"name": "tickUpper", "type": "int24"}
        ]
      }
    ]"#,
    )
    .expect("Failed to parse calculator ABI")
});

pub static POSITION_MANAGER_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "balanceOf",
        "stateMutability": "view",
        "inputs": [{"name": "owner", "type": "address"}],
        "outputs": [{"name": "", "type": "uint256"}]
      },
      {
        "type": "function",
        "name": "tokenOfOwnerByIndex",
        "stateMutability": "view",
        "inputs": [
          {"name": "owner", "type": "address"},
          {"name": "index", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "uint256"}]
      },
      {
        "type": "function",
        "name": "pool",
        "stateMutability": "view",
        "inputs": [{"name": "tokenId", "type": "uint256"}],
        "outputs": [{"name": "", "type": "address"}]
      },
      {
        "type": "function",
        "name": "positions",
        "stateMutability": "view",
        "inputs": [{"name": "tokenId", "type": "uint256"}],
        "outputs": [
          {"name": "nonce", "type": "uint88"},
          {"name": "operator", "type": "address"},
          {"name": "token0", "type": "address"},
          {"name": "token1", "type": "address"},
          {"name": "tickLower", "type": "int24"},
          {"name": "tickUpper", "type": "int24"},
          {"name": "liquidity", "type": "uint128"},
          {"name": "feeGrowthInside0LastX128", "type": "uint256"},
          {"name": "feeGrowthInside1LastX128", "type": "uint256"},
          {"name": "tokensOwed0", "type": "uint128"},
          {"name": "tokensOwed1", "type": "uint128"}
        ]
      },
      {
        "type": "function",
        "name": "mint",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "token0", "type": "address"},
              {"name": "token1", "type": "address"},
              {"name": "tickLower", "type": "int24"},
              {"name": "tickUpper", "type": "int24"},
              {"name": "amount0Desired", "type": "uint256"},
              {"name": "amount1Desired", "type": "uint256"},
              {"name": "amount0Min", "type": "uint256"},
              {"name": "amount1Min", "type": "uint256"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"}
            ]
          }
        ],
        "outputs": [
          {"name": "tokenId", "type": "uint256"},
          {"name": "liquidity", "type": "uint128"},
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "increaseLiquidity",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenId", "type": "uint256"},
              {"name": "amount0Desired", "type": "uint256"},
              {"name": "amount1Desired", "type": "uint256"},
              {"name": "amount0Min", "type": "uint256"},
              {"name": "amount1Min", "type": "uint256"},
              {"name": "deadline", "type": "uint256"}
            ]
          }
        ],
        "outputs": [
          {"name": "liquidity", "type": "uint128"},
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "decreaseLiquidity",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenId", "type": "uint256"},
              {"name": "liquidity", "type": "uint128"},
              {"name": "amount0Min", "type": "uint256"},
              {"name": "amount1Min", "type": "uint256"},
              {"name": "deadline", "type": "uint256"}
            ]
          }
        ],
        "outputs": [
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "collect",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenId", "type": "uint256"},
              {"name": "recipient", "type": "address"},
              {"name": "amount0Max", "type": "uint128"},
              {"name": "amount1Max", "type": "uint128"}
            ]
          }
        ],
        "outputs": [
          {"name": "amount0", "type": "uint256"},
          {"name": "amount1", "type": "uint256"}
        ]
      },
      {
        "type": "function",
        "name": "burn",
        "stateMutability": "payable",
        "inputs": [{"name": "tokenId", "type": "uint256"}],
        "outputs": []
      }
    ]"#,
    )
    .expect("Failed to parse position manager ABI")
});

pub static SWAP_ROUTER_ABI: Lazy<Abi> = Lazy::new(|| {
    serde_json::from_str(
        r#"[
      {
        "type": "function",
        "name": "exactInputSingle",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenIn", "type": "address"},
              {"name": "tokenOut", "type": "address"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"},
              {"name": "amountIn", "type": "uint256"},
              {"name": "amountOutMinimum", "type": "uint256"},
              {"name": "limitSqrtPrice", "type": "uint160"}
            ]
          }
        ],
        "outputs": [{"name": "amountOut", "type": "uint256"}]
      },
      {
        "type": "function",
        "name": "exactOutputSingle",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "tokenIn", "type": "address"},
              {"name": "tokenOut", "type": "address"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"},
              {"name": "amountOut", "type": "uint256"},
              {"name": "amountInMaximum", "type": "uint256"},
              {"name": "limitSqrtPrice", "type": "uint160"}
            ]
          }
        ],
        "outputs": [{"name": "amountIn", "type": "uint256"}]
      },
      {
        "type": "function",
        "name": "exactInput",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "path", "type": "bytes"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"},
              {"name": "amountIn", "type": "uint256"},
              {"name": "amountOutMinimum", "type": "uint256"}
            ]
          }
        ],
        "outputs": [{"name": "amountOut", "type": "uint256"}]
      },
      {
        "type": "function",
        "name": "exactOutput",
        "stateMutability": "payable",
        "inputs": [
          {
            "name": "params",
            "type": "tuple",
            "components": [
              {"name": "path", "type": "bytes"},
              {"name": "recipient", "type": "address"},
              {"name": "deadline", "type": "uint256"},
              {"name": "amountOut", "type": "uint256"},
              {"name": "amountInMaximum", "type": "uint256"}
            ]
          }
        ],
        "outputs": [{"name": "amountIn", "type": "uint256"}]
      }
    ]"#,
    )
    .expect("Failed to parse swap router ABI")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_parse() {
        assert!(ERC20_ABI.function("approve").is_ok());
        assert!(ERC20_ABI.function("decimals").is_ok());
        assert!(FACTORY_ABI.function("poolByPair").is_ok());
        assert!(POOL_ABI.function("globalState").is_ok());
        assert!(POOL_ABI.function("ticks").is_ok());
        assert!(POOL_ABI.function("prevTickGlobal").is_ok());
        assert!(POOL_ABI.function("nextTickGlobal").is_ok());
        assert!(CALCULATOR_ABI.function("calculateOptimalAmounts").is_ok());
        assert!(POSITION_MANAGER_ABI.function("pool").is_ok());
        assert!(POSITION_MANAGER_ABI.function("positions").is_ok());
        assert!(POSITION_MANAGER_ABI.function("mint").is_ok());
        assert!(SWAP_ROUTER_ABI.function("exactInputSingle").is_ok());
        assert!(SWAP_ROUTER_ABI.function("exactOutput").is_ok());
    }

    #[test]
    fn test_positions_row_layout() {
        // Downstream decoding indexes this tuple by position
        let outputs = &POSITION_MANAGER_ABI.function("positions").unwrap().outputs;
        assert_eq!(outputs.len(), 11);
        assert_eq!(outputs[2].name, "token0");
        assert_eq!(outputs[3].name, "token1");
        assert_eq!(outputs[4].name, "tickLower");
        assert_eq!(outputs[5].name, "tickUpper");
        assert_eq!(outputs[6].name, "liquidity");
    }
}
