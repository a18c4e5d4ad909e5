// tests/position_lifecycle.rs
// ===================================
// Drives the position lifecycle end to end through the dispatcher: mint,
// increase, decrease, collect, burn, with every chain interaction recorded.

use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::{Address, I256, U256};
use serde_json::json;

use kim_liquidity_engine::bootstrap::AppState;
use kim_liquidity_engine::chain::subgraph::SubgraphClient;
use kim_liquidity_engine::chain::wallet::MockWallet;
use kim_liquidity_engine::engine::registry::dispatch;
use kim_liquidity_engine::models::ContractBook;

const FACTORY: u8 = 0xA3;
const CALCULATOR: u8 = 0xA4;
const POSITION_MANAGER: u8 = 0xA2;
const POOL: u8 = 0x99;

fn addr(x: u8) -> Address {
    Address::from([x; 20])
}

fn hex(x: u8) -> String {
    format!("{:?}", addr(x))
}

fn int(v: i64) -> Token {
    Token::Int(I256::from(v).into_raw())
}

fn mock_state() -> (Arc<MockWallet>, AppState) {
    let wallet = Arc::new(MockWallet::new(addr(0xAA), 34443));
    let state = AppState {
        wallet: wallet.clone(),
        book: ContractBook {
            swap_router: addr(0xA1),
            position_manager: addr(POSITION_MANAGER),
            factory: addr(FACTORY),
            calculator: addr(CALCULATOR),
        },
        subgraph: SubgraphClient::new("http://127.0.0.1:1/unreachable".to_string()),
    };
    (wallet, state)
}

fn stub_mint_reads(wallet: &MockWallet) {
    wallet.stub_read(addr(FACTORY), "poolByPair", vec![Token::Address(addr(POOL))]);
    wallet.stub_read(addr(POOL), "token0", vec![Token::Address(addr(1))]);
    wallet.stub_read(addr(POOL), "token1", vec![Token::Address(addr(2))]);
    wallet.stub_read(
        addr(CALCULATOR),
        "calculateOptimalAmounts",
        vec![
            Token::Uint(U256::from(450u64)),
            Token::Uint(U256::from(850u64)),
            int(-300),
            int(420),
        ],
    );
}

fn tuple(call_args: &[Token]) -> &[Token] {
    match &call_args[0] {
        Token::Tuple(fields) => fields,
        other => panic!("expected tuple params, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mint_follows_pool_order_not_caller_order() {
    let (wallet, state) = mock_state();
    stub_mint_reads(&wallet);

    // Caller hands the pair reversed: their token0 is the pool's token1.
    let before = chrono::Utc::now().timestamp() as u64;
    let result = dispatch(
        &state,
        "kim_mint_position",
        json!({
            "token0Address": hex(2),
            "token1Address": hex(1),
            "amount0Desired": "500",
            "amount1Desired": "900",
            "riskLevel": 2
        }),
    )
    .await
    .unwrap();
    let after = chrono::Utc::now().timestamp() as u64;

    assert!(result["transaction_hash"].as_str().unwrap().starts_with("0x"));

    // The calculator sees pool-ordered amounts.
    let reads = wallet.reads();
    let calculator_call = reads
        .iter()
        .find(|c| c.function == "calculateOptimalAmounts")
        .unwrap();
    assert_eq!(calculator_call.args[0], Token::Address(addr(POOL)));
    assert_eq!(calculator_call.args[1], Token::Uint(U256::from(900u64)));
    assert_eq!(calculator_call.args[2], Token::Uint(U256::from(500u64)));
    assert_eq!(calculator_call.args[3], Token::Uint(U256::from(2u64)));

    // Approvals cover the calculator's sized amounts, then the mint lands.
    let sent = wallet.sent();
    let functions: Vec<&str> = sent.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["approve", "approve", "mint"]);
    assert_eq!(sent[0].to, addr(1));
    assert_eq!(sent[0].args[1], Token::Uint(U256::from(450u64)));
    assert_eq!(sent[1].to, addr(2));
    assert_eq!(sent[1].args[1], Token::Uint(U256::from(850u64)));

    let fields = tuple(&sent[2].args);
    assert_eq!(fields[0], Token::Address(addr(1)));
    assert_eq!(fields[1], Token::Address(addr(2)));
    assert_eq!(fields[2], int(-300));
    assert_eq!(fields[3], int(420));
    assert_eq!(fields[4], Token::Uint(U256::from(450u64)));
    assert_eq!(fields[5], Token::Uint(U256::from(850u64)));
    assert_eq!(fields[8], Token::Address(addr(0xAA)));

    let deadline = match fields[9] {
        Token::Uint(v) => v.low_u64(),
        ref other => panic!("expected uint deadline, got {:?}", other),
    };
    assert!(deadline >= before + 60 && deadline <= after + 60);
    println!("✅ Mint permuted caller amounts into pool order");
}

#[tokio::test]
async fn test_increase_sorts_pair_without_touching_the_pool() {
    let (wallet, state) = mock_state();

    dispatch(
        &state,
        "kim_increase_liquidity",
        json!({
            "tokenId": "7",
            "token0Address": hex(9),
            "token1Address": hex(3),
            "amount0Desired": "111",
            "amount1Desired": "222"
        }),
    )
    .await
    .unwrap();

    assert!(wallet.reads().is_empty(), "increase needs no pool reads");

    let sent = wallet.sent();
    let functions: Vec<&str> = sent.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["approve", "approve", "increaseLiquidity"]);

    // Lexicographically smaller address leads, its amount follows it.
    assert_eq!(sent[0].to, addr(3));
    assert_eq!(sent[0].args[1], Token::Uint(U256::from(222u64)));
    assert_eq!(sent[1].to, addr(9));
    assert_eq!(sent[1].args[1], Token::Uint(U256::from(111u64)));

    let fields = tuple(&sent[2].args);
    assert_eq!(fields[0], Token::Uint(U256::from(7u64)));
    assert_eq!(fields[1], Token::Uint(U256::from(222u64)));
    assert_eq!(fields[2], Token::Uint(U256::from(111u64)));
    assert_eq!(fields[3], Token::Uint(U256::zero()));
    assert_eq!(fields[4], Token::Uint(U256::zero()));
}

#[tokio::test]
async fn test_decrease_floors_the_liquidity_share() {
    let (wallet, state) = mock_state();
    wallet.stub_read(
        addr(POSITION_MANAGER),
        "positions",
        vec![
            Token::Uint(U256::zero()),
            Token::Address(Address::zero()),
            Token::Address(addr(1)),
            Token::Address(addr(2)),
            int(-1200),
            int(600),
            Token::Uint(U256::from(1001u64)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
        ],
    );

    dispatch(
        &state,
        "kim_decrease_liquidity",
        json!({ "tokenId": "7", "percentage": 50 }),
    )
    .await
    .unwrap();

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].function, "decreaseLiquidity");

    // 1001 * 50 / 100 floors to 500.
    let fields = tuple(&sent[0].args);
    assert_eq!(fields[0], Token::Uint(U256::from(7u64)));
    assert_eq!(fields[1], Token::Uint(U256::from(500u64)));
}

#[tokio::test]
async fn test_decrease_rejects_over_100_before_any_chain_call() {
    let (wallet, state) = mock_state();

    let err = dispatch(
        &state,
        "kim_decrease_liquidity",
        json!({ "tokenId": "7", "percentage": 101 }),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("101"));
    assert!(wallet.reads().is_empty());
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_collect_sweeps_everything_to_the_wallet() {
    let (wallet, state) = mock_state();

    dispatch(&state, "kim_collect", json!({ "tokenId": "9" }))
        .await
        .unwrap();

    let sent = wallet.sent();
    assert_eq!(sent[0].function, "collect");
    let fields = tuple(&sent[0].args);
    assert_eq!(fields[0], Token::Uint(U256::from(9u64)));
    assert_eq!(fields[1], Token::Address(addr(0xAA)));
    assert_eq!(fields[2], Token::Uint(U256::from(u128::MAX)));
    assert_eq!(fields[3], Token::Uint(U256::from(u128::MAX)));
}

#[tokio::test]
async fn test_burn_sends_only_the_token_id() {
    let (wallet, state) = mock_state();

    dispatch(&state, "kim_burn", json!({ "tokenId": "5" })).await.unwrap();

    let sent = wallet.sent();
    assert_eq!(sent[0].function, "burn");
    assert_eq!(sent[0].args, vec![Token::Uint(U256::from(5u64))]);
}

#[tokio::test]
async fn test_full_lifecycle_yields_distinct_hashes() {
    let (wallet, state) = mock_state();
    stub_mint_reads(&wallet);
    wallet.stub_read(
        addr(POSITION_MANAGER),
        "positions",
        vec![
            Token::Uint(U256::zero()),
            Token::Address(Address::zero()),
            Token::Address(addr(1)),
            Token::Address(addr(2)),
            int(-300),
            int(420),
            Token::Uint(U256::from(10_000u64)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
            Token::Uint(U256::zero()),
        ],
    );

    let calls = [
        (
            "kim_mint_position",
            json!({
                "token0Address": hex(1),
                "token1Address": hex(2),
                "amount0Desired": "500",
                "amount1Desired": "900",
                "riskLevel": 1
            }),
        ),
        (
            "kim_increase_liquidity",
            json!({
                "tokenId": "7",
                "token0Address": hex(1),
                "token1Address": hex(2),
                "amount0Desired": "10",
                "amount1Desired": "20"
            }),
        ),
        ("kim_decrease_liquidity", json!({ "tokenId": "7", "percentage": 100 })),
        ("kim_collect", json!({ "tokenId": "7" })),
        ("kim_burn", json!({ "tokenId": "7" })),
    ];

    let mut hashes = Vec::new();
    for (tool, args) in calls {
        let result = dispatch(&state, tool, args).await.unwrap();
        hashes.push(result["transaction_hash"].as_str().unwrap().to_string());
    }

    let functions: Vec<String> = wallet.sent().iter().map(|c| c.function.clone()).collect();
    assert_eq!(
        functions,
        [
            "approve",
            "approve",
            "mint",
            "approve",
            "approve",
            "increaseLiquidity",
            "decreaseLiquidity",
            "collect",
            "burn"
        ]
    );

    hashes.sort();
    hashes.dedup();
    assert_eq!(hashes.len(), 5, "every submission reports its own hash");
    println!("✅ Full lifecycle: {} transactions submitted", functions.len());
}
