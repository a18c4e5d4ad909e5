use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub wallet_private_key: String,
    pub chain_id: u64,
    pub subgraph_url: String,
    pub port: u16,

    // Kim protocol addresses
    pub swap_router_address: String,
    pub position_manager_address: String,
    pub factory_address: String,
    pub calculator_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load configuration files (secrets first, then public config)
        dotenv::from_filename("secrets.env").ok();
        dotenv::from_filename("addresses.env").ok();
        dotenv::from_filename("config/addresses.env").ok();
        dotenv::dotenv().ok();

        Ok(Config {
            rpc_url: env::var("RPC_URL")
                .map_err(|_| "RPC_URL must be set")?,
            wallet_private_key: env::var("WALLET_PRIVATE_KEY")
                .map_err(|_| "WALLET_PRIVATE_KEY must be set")?,
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "34443".to_string())
                .parse()
                .unwrap_or(34443),
            subgraph_url: env::var("SUBGRAPH_URL")
                .unwrap_or_else(|_| "https://api.goldsky.com/api/public/project_clmqdcfcs3f6d2ptj3yp05ndz/subgraphs/Algebra-Kim/0.0.4/gn".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),

            // Protocol addresses from environment, Mode mainnet defaults
            swap_router_address: env::var("SWAP_ROUTER_ADDRESS")
                .unwrap_or_else(|_| "0xAc48FcF1049668B285f3dC72483DF5Ae2162f7e8".to_string()),
            position_manager_address: env::var("POSITION_MANAGER_ADDRESS")
                .unwrap_or_else(|_| "0x2e8614625226D26180aDf6530C3b1677d3D7cf10".to_string()),
            factory_address: env::var("FACTORY_ADDRESS")
                .unwrap_or_else(|_| "0xB5F00c2C5f8821155D8ed27E31932CFD9DB3C5D5".to_string()),
            calculator_address: env::var("CALCULATOR_ADDRESS")
                .unwrap_or_else(|_| "0x6f8E2B58373aB12Be5f7c28658633dD27D689f0D".to_string()),
        })
    }
}
