// tests/swap_paths.rs
// ===================================
// Swap flows through the dispatcher: approval ordering for single hops and
// packed path encoding for multi-hop routes.

use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::{Address, U256};
use serde_json::json;

use kim_liquidity_engine::bootstrap::AppState;
use kim_liquidity_engine::chain::subgraph::SubgraphClient;
use kim_liquidity_engine::chain::wallet::MockWallet;
use kim_liquidity_engine::engine::registry::dispatch;
use kim_liquidity_engine::models::ContractBook;

const ROUTER: u8 = 0xA1;

fn addr(x: u8) -> Address {
    Address::from([x; 20])
}

fn hex(x: u8) -> String {
    format!("{:?}", addr(x))
}

fn mock_state() -> (Arc<MockWallet>, AppState) {
    let wallet = Arc::new(MockWallet::new(addr(0xAA), 34443));
    let state = AppState {
        wallet: wallet.clone(),
        book: ContractBook {
            swap_router: addr(ROUTER),
            position_manager: addr(0xA2),
            factory: addr(0xA3),
            calculator: addr(0xA4),
        },
        subgraph: SubgraphClient::new("http://127.0.0.1:1/unreachable".to_string()),
    };
    (wallet, state)
}

fn tuple(call_args: &[Token]) -> &[Token] {
    match &call_args[0] {
        Token::Tuple(fields) => fields,
        other => panic!("expected tuple params, got {:?}", other),
    }
}

fn path_bytes(fields: &[Token]) -> Vec<u8> {
    match &fields[0] {
        Token::Bytes(bytes) => bytes.clone(),
        other => panic!("expected packed path bytes, got {:?}", other),
    }
}

#[tokio::test]
async fn test_exact_input_single_approves_then_swaps() {
    let (wallet, state) = mock_state();

    let before = chrono::Utc::now().timestamp() as u64;
    let result = dispatch(
        &state,
        "kim_swap_exact_input_single_hop",
        json!({
            "tokenInAddress": hex(1),
            "tokenOutAddress": hex(2),
            "amountIn": "1000000",
            "amountOutMinimum": "990000"
        }),
    )
    .await
    .unwrap();
    let after = chrono::Utc::now().timestamp() as u64;

    assert_eq!(result["transaction_hash"].as_str().unwrap().len(), 66);

    let sent = wallet.sent();
    let functions: Vec<&str> = sent.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["approve", "exactInputSingle"]);

    // The router is approved for exactly the input amount before the swap.
    assert_eq!(sent[0].to, addr(1));
    assert_eq!(sent[0].args[0], Token::Address(addr(ROUTER)));
    assert_eq!(sent[0].args[1], Token::Uint(U256::from(1_000_000u64)));

    assert_eq!(sent[1].to, addr(ROUTER));
    let fields = tuple(&sent[1].args);
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[0], Token::Address(addr(1)));
    assert_eq!(fields[1], Token::Address(addr(2)));
    assert_eq!(fields[2], Token::Address(addr(0xAA)));
    assert_eq!(fields[4], Token::Uint(U256::from(1_000_000u64)));
    assert_eq!(fields[5], Token::Uint(U256::from(990_000u64)));
    assert_eq!(fields[6], Token::Uint(U256::zero()));

    let deadline = match fields[3] {
        Token::Uint(v) => v.low_u64(),
        ref other => panic!("expected uint deadline, got {:?}", other),
    };
    assert!(deadline >= before + 60 && deadline <= after + 60);
}

#[tokio::test]
async fn test_exact_output_single_approves_the_maximum() {
    let (wallet, state) = mock_state();

    dispatch(
        &state,
        "kim_swap_exact_output_single_hop",
        json!({
            "tokenInAddress": hex(1),
            "tokenOutAddress": hex(2),
            "amountOut": "500000",
            "amountInMaximum": "520000",
            "limitSqrtPrice": "79228162514264337593543950336",
            "deadline": 120
        }),
    )
    .await
    .unwrap();

    let sent = wallet.sent();
    assert_eq!(sent[0].function, "approve");
    assert_eq!(sent[0].args[1], Token::Uint(U256::from(520_000u64)));

    assert_eq!(sent[1].function, "exactOutputSingle");
    let fields = tuple(&sent[1].args);
    assert_eq!(fields[4], Token::Uint(U256::from(500_000u64)));
    assert_eq!(fields[5], Token::Uint(U256::from(520_000u64)));
    assert_eq!(
        fields[6],
        Token::Uint(U256::from_dec_str("79228162514264337593543950336").unwrap())
    );
}

#[tokio::test]
async fn test_same_token_swap_is_rejected_without_chain_traffic() {
    let (wallet, state) = mock_state();

    let err = dispatch(
        &state,
        "kim_swap_exact_input_single_hop",
        json!({
            "tokenInAddress": hex(1),
            "tokenOutAddress": hex(1),
            "amountIn": "1000",
            "amountOutMinimum": "990"
        }),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("must differ"));
    assert!(wallet.reads().is_empty());
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_multi_hop_path_interleaves_tokens_and_fees() {
    let (wallet, state) = mock_state();
    wallet.stub_read(addr(1), "decimals", vec![Token::Uint(U256::from(6u64))]);
    wallet.stub_read(addr(3), "decimals", vec![Token::Uint(U256::from(18u64))]);

    dispatch(
        &state,
        "kim_swap_exact_input_multi_hop",
        json!({
            "path": {
                "tokenIn": hex(1),
                "intermediateTokens": [hex(2)],
                "tokenOut": hex(3),
                "fees": [500, 3000]
            },
            "recipient": hex(0xBB),
            "amountIn": "1.5",
            "amountOutMinimum": "0.25"
        }),
    )
    .await
    .unwrap();

    let sent = wallet.sent();
    let functions: Vec<&str> = sent.iter().map(|c| c.function.as_str()).collect();
    assert_eq!(functions, ["exactInput"], "multi-hop swaps carry no approval");

    let fields = tuple(&sent[0].args);
    assert_eq!(fields.len(), 5);

    let bytes = path_bytes(fields);
    assert_eq!(bytes.len(), 66);
    assert_eq!(&bytes[0..20], addr(1).as_bytes());
    assert_eq!(&bytes[20..23], &[0x00, 0x01, 0xF4]);
    assert_eq!(&bytes[23..43], addr(2).as_bytes());
    assert_eq!(&bytes[43..46], &[0x00, 0x0B, 0xB8]);
    assert_eq!(&bytes[46..66], addr(3).as_bytes());

    assert_eq!(fields[1], Token::Address(addr(0xBB)));

    // Human amounts scaled by each end's decimals.
    assert_eq!(fields[3], Token::Uint(U256::from(1_500_000u64)));
    assert_eq!(
        fields[4],
        Token::Uint(U256::from(250_000_000_000_000_000u64))
    );
    println!("✅ Packed path: {} bytes for 2 hops", bytes.len());
}

#[tokio::test]
async fn test_exact_output_path_runs_backwards() {
    let (wallet, state) = mock_state();
    wallet.stub_read(addr(1), "decimals", vec![Token::Uint(U256::from(6u64))]);
    wallet.stub_read(addr(3), "decimals", vec![Token::Uint(U256::from(6u64))]);

    dispatch(
        &state,
        "kim_swap_exact_output_multi_hop",
        json!({
            "path": {
                "tokenIn": hex(1),
                "intermediateTokens": [hex(2)],
                "tokenOut": hex(3),
                "fees": [500, 3000]
            },
            "recipient": hex(0xBB),
            "amountOut": "2",
            "amountInMaximum": "3"
        }),
    )
    .await
    .unwrap();

    let sent = wallet.sent();
    assert_eq!(sent[0].function, "exactOutput");

    // Output token leads, fee order flips with it.
    let bytes = path_bytes(tuple(&sent[0].args));
    assert_eq!(&bytes[0..20], addr(3).as_bytes());
    assert_eq!(&bytes[20..23], &[0x00, 0x0B, 0xB8]);
    assert_eq!(&bytes[23..43], addr(2).as_bytes());
    assert_eq!(&bytes[43..46], &[0x00, 0x01, 0xF4]);
    assert_eq!(&bytes[46..66], addr(1).as_bytes());
}

#[tokio::test]
async fn test_single_fee_path_rejects_two_hops() {
    let (wallet, state) = mock_state();

    let err = dispatch(
        &state,
        "kim_swap_exact_input_multi_hop",
        json!({
            "path": {
                "tokenIn": hex(1),
                "intermediateTokens": [hex(2)],
                "tokenOut": hex(3),
                "fees": [500]
            },
            "recipient": hex(0xBB),
            "amountIn": "1",
            "amountOutMinimum": "1"
        }),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("one fee per hop"));
    assert!(wallet.reads().is_empty());
    assert!(wallet.sent().is_empty());
}
