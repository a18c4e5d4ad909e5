pub mod abi;
pub mod erc20;
pub mod pool;
pub mod position_manager;
pub mod subgraph;
pub mod tick_source;
pub mod wallet;
