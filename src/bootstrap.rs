use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;

use crate::chain::subgraph::SubgraphClient;
use crate::chain::wallet::{EthersWallet, WalletPort};
use crate::config::Config;
use crate::models::ContractBook;

pub struct AppState {
    pub wallet: Arc<dyn WalletPort>,
    pub book: ContractBook,
    pub subgraph: SubgraphClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let wallet = EthersWallet::connect(
            &config.rpc_url,
            &config.wallet_private_key,
            config.chain_id,
        )?;
        let subgraph = SubgraphClient::new(config.subgraph_url.clone());

        Ok(AppState {
            wallet: Arc::new(wallet),
            book: ContractBook {
                swap_router: Address::from_str(&config.swap_router_address)?,
                position_manager: Address::from_str(&config.position_manager_address)?,
                factory: Address::from_str(&config.factory_address)?,
                calculator: Address::from_str(&config.calculator_address)?,
            },
            subgraph,
        })
    }
}
