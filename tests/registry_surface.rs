// tests/registry_surface.rs
// ===================================
// Integration tests for the tool registry: the listing every caller sees
// and the dispatch envelope around the engine.

use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;
use serde_json::json;

use kim_liquidity_engine::bootstrap::AppState;
use kim_liquidity_engine::chain::subgraph::SubgraphClient;
use kim_liquidity_engine::chain::wallet::MockWallet;
use kim_liquidity_engine::engine::registry;
use kim_liquidity_engine::error::EngineError;
use kim_liquidity_engine::models::ContractBook;

fn addr(x: u8) -> Address {
    Address::from([x; 20])
}

fn mock_state() -> (Arc<MockWallet>, AppState) {
    let wallet = Arc::new(MockWallet::new(addr(0xAA), 34443));
    let state = AppState {
        wallet: wallet.clone(),
        book: ContractBook {
            swap_router: addr(0xA1),
            position_manager: addr(0xA2),
            factory: addr(0xA3),
            calculator: addr(0xA4),
        },
        subgraph: SubgraphClient::new("http://127.0.0.1:1/unreachable".to_string()),
    };
    (wallet, state)
}

#[test]
fn test_registry_exposes_the_full_tool_surface() {
    let expected = [
        "kim_get_swap_router_address",
        "kim_swap_exact_input_single_hop",
        "kim_swap_exact_output_single_hop",
        "kim_swap_exact_input_multi_hop",
        "kim_swap_exact_output_multi_hop",
        "kim_mint_position",
        "kim_increase_liquidity",
        "kim_decrease_liquidity",
        "kim_collect",
        "kim_burn",
        "kim_get_lp_tokens",
    ];

    let names: Vec<&str> = registry::tools().iter().map(|t| t.name).collect();
    assert_eq!(names, expected);
    println!("✅ All {} tools listed", names.len());
}

#[test]
fn test_every_schema_requires_only_declared_properties() {
    for tool in registry::tools() {
        let schema = &tool.parameters;
        assert_eq!(schema["type"], "object", "{}: schema is not an object", tool.name);

        let properties = schema["properties"]
            .as_object()
            .unwrap_or_else(|| panic!("{}: schema has no properties map", tool.name));
        let required = schema["required"]
            .as_array()
            .unwrap_or_else(|| panic!("{}: schema has no required list", tool.name));

        for field in required {
            let field = field.as_str().unwrap();
            assert!(
                properties.contains_key(field),
                "{}: required field {} is not a declared property",
                tool.name,
                field
            );
        }
    }
}

#[test]
fn test_tool_listing_serializes_with_stable_shape() {
    let rendered = serde_json::to_value(registry::tools()).unwrap();
    let tools = rendered.as_array().unwrap();
    assert_eq!(tools.len(), 11);
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert!(tool["parameters"].is_object());
    }
}

#[tokio::test]
async fn test_router_address_round_trips_through_checksum() {
    let (wallet, state) = mock_state();

    let result = registry::dispatch(&state, "kim_get_swap_router_address", json!({}))
        .await
        .unwrap();

    let rendered = result["swap_router_address"].as_str().unwrap();
    assert_eq!(Address::from_str(rendered).unwrap(), addr(0xA1));
    assert!(wallet.reads().is_empty(), "router address needs no chain reads");
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_tool_is_rejected_without_chain_traffic() {
    let (wallet, state) = mock_state();

    let err = registry::dispatch(&state, "kim_quote_swap", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert!(err.to_string().contains("unknown tool 'kim_quote_swap'"));
    assert!(wallet.reads().is_empty());
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_arguments_name_the_parse_failure() {
    let (wallet, state) = mock_state();

    let err = registry::dispatch(
        &state,
        "kim_decrease_liquidity",
        json!({ "tokenId": "7", "percentage": "not-a-number" }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, EngineError::Validation(_)));
    assert!(err.to_string().contains("invalid parameters"));
    assert!(wallet.reads().is_empty());
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn test_null_arguments_work_for_parameterless_tools() {
    let (_, state) = mock_state();

    // A POST body without an arguments key deserializes to null.
    let result = registry::dispatch(&state, "kim_get_swap_router_address", serde_json::Value::Null)
        .await
        .unwrap();
    assert!(result["swap_router_address"].is_string());
}
