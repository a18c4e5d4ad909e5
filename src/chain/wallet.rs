use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{Abi, Token};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;

use crate::error::EngineError;

/// Chain access seam. Adapters encode calls against an ABI table and hand
/// them to the port; reads come back as decoded output tokens, writes as the
/// submitted transaction hash. Approvals and their dependent action go
/// through the same port sequentially, so wallet nonce ordering serializes
/// them on chain.
#[async_trait]
pub trait WalletPort: Send + Sync {
    async fn read(
        &self,
        to: Address,
        abi: &Abi,
        function: &str,
        args: Vec<Token>,
    ) -> Result<Vec<Token>, EngineError>;

    async fn send_transaction(
        &self,
        to: Address,
        abi: &Abi,
        function: &str,
        args: Vec<Token>,
    ) -> Result<TxHash, EngineError>;

    async fn resolve_address(&self, raw: &str) -> Result<Address, EngineError>;

    fn own_address(&self) -> Address;

    fn chain_id(&self) -> u64;
}

/// Production port over an HTTP JSON-RPC provider with a local signing key.
pub struct EthersWallet {
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
    address: Address,
    chain_id: u64,
}

impl EthersWallet {
    pub fn connect(
        rpc_url: &str,
        private_key: &str,
        chain_id: u64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let signer = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id);
        let address = signer.address();
        let client = Arc::new(SignerMiddleware::new(provider, signer));
        Ok(EthersWallet {
            client,
            address,
            chain_id,
        })
    }

    fn encode_call(
        abi: &Abi,
        function: &str,
        args: &[Token],
        context: &str,
    ) -> Result<Vec<u8>, EngineError> {
        let func = abi
            .function(function)
            .map_err(|e| EngineError::read(context, e))?;
        func.encode_input(args)
            .map_err(|e| EngineError::read(context, e))
    }
}

#[async_trait]
impl WalletPort for EthersWallet {
    async fn read(
        &self,
        to: Address,
        abi: &Abi,
        function: &str,
        args: Vec<Token>,
    ) -> Result<Vec<Token>, EngineError> {
        let context = format!("{} on {:?}", function, to);
        let data = Self::encode_call(abi, function, &args, &context)?;
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();

        log::debug!("eth_call {}", context);
        let raw = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| EngineError::read(&context, e))?;

        let func = abi
            .function(function)
            .map_err(|e| EngineError::read(&context, e))?;
        func.decode_output(&raw)
            .map_err(|e| EngineError::read(&context, e))
    }

    async fn send_transaction(
        &self,
        to: Address,
        abi: &Abi,
        function: &str,
        args: Vec<Token>,
    ) -> Result<TxHash, EngineError> {
        let context = format!("{} on {:?}", function, to);
        let data = Self::encode_call(abi, function, &args, &context)
            .map_err(|e| EngineError::write(&context, e))?;
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| EngineError::write(&context, e))?;
        let hash = pending.tx_hash();
        log::info!("Submitted {} -> {:?}", context, hash);
        Ok(hash)
    }

    async fn resolve_address(&self, raw: &str) -> Result<Address, EngineError> {
        Address::from_str(raw.trim())
            .map_err(|e| EngineError::validation(format!("invalid address '{}': {}", raw, e)))
    }

    fn own_address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

// ------------------------- Token encode / decode ---------------------------

/// Encodes a tick as a sign-extended 256-bit word, the form the ABI coder
/// expects for int24 arguments.
pub fn int24_token(value: i32) -> Token {
    Token::Int(ethers::types::I256::from(value).into_raw())
}

pub fn uint_at(tokens: &[Token], index: usize, context: &str) -> Result<U256, EngineError> {
    match tokens.get(index) {
        Some(Token::Uint(value)) => Ok(*value),
        other => Err(unexpected_output(context, index, other)),
    }
}

pub fn address_at(tokens: &[Token], index: usize, context: &str) -> Result<Address, EngineError> {
    match tokens.get(index) {
        Some(Token::Address(value)) => Ok(*value),
        other => Err(unexpected_output(context, index, other)),
    }
}

/// Signed 24-bit outputs arrive sign-extended into a 256-bit word; the low
/// 32 bits carry the two's complement value.
pub fn int24_at(tokens: &[Token], index: usize, context: &str) -> Result<i32, EngineError> {
    match tokens.get(index) {
        Some(Token::Int(raw)) => Ok(raw.low_u32() as i32),
        other => Err(unexpected_output(context, index, other)),
    }
}

pub fn int128_at(tokens: &[Token], index: usize, context: &str) -> Result<i128, EngineError> {
    match tokens.get(index) {
        Some(Token::Int(raw)) => Ok(raw.low_u128() as i128),
        other => Err(unexpected_output(context, index, other)),
    }
}

fn unexpected_output(context: &str, index: usize, token: Option<&Token>) -> EngineError {
    EngineError::read(
        context,
        format!("unexpected output token at index {}: {:?}", index, token),
    )
}

// --------------------------------- Mock ------------------------------------

#[cfg(any(test, feature = "test-utils"))]
pub use self::mock::{MockWallet, RecordedCall};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub to: Address,
        pub function: String,
        pub args: Vec<Token>,
    }

    /// Recording in-memory port. Reads replay stubbed outputs in FIFO order
    /// per (address, function); writes are logged and acknowledged with a
    /// deterministic hash.
    pub struct MockWallet {
        address: Address,
        chain_id: u64,
        read_stubs: Mutex<HashMap<(Address, String), VecDeque<Vec<Token>>>>,
        reads: Mutex<Vec<RecordedCall>>,
        sent: Mutex<Vec<RecordedCall>>,
    }

    impl MockWallet {
        pub fn new(address: Address, chain_id: u64) -> Self {
            MockWallet {
                address,
                chain_id,
                read_stubs: Mutex::new(HashMap::new()),
                reads: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn stub_read(&self, to: Address, function: &str, outputs: Vec<Token>) {
            self.read_stubs
                .lock()
                .unwrap()
                .entry((to, function.to_string()))
                .or_default()
                .push_back(outputs);
        }

        pub fn reads(&self) -> Vec<RecordedCall> {
            self.reads.lock().unwrap().clone()
        }

        pub fn sent(&self) -> Vec<RecordedCall> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WalletPort for MockWallet {
        async fn read(
            &self,
            to: Address,
            _abi: &Abi,
            function: &str,
            args: Vec<Token>,
        ) -> Result<Vec<Token>, EngineError> {
            self.reads.lock().unwrap().push(RecordedCall {
                to,
                function: function.to_string(),
                args,
            });
            self.read_stubs
                .lock()
                .unwrap()
                .get_mut(&(to, function.to_string()))
                .and_then(|queue| queue.pop_front())
                .ok_or_else(|| {
                    EngineError::read(
                        format!("{} on {:?}", function, to),
                        "no stubbed response",
                    )
                })
        }

        async fn send_transaction(
            &self,
            to: Address,
            _abi: &Abi,
            function: &str,
            args: Vec<Token>,
        ) -> Result<TxHash, EngineError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(RecordedCall {
                to,
                function: function.to_string(),
                args,
            });
            Ok(TxHash::from_low_u64_be(sent.len() as u64))
        }

        async fn resolve_address(&self, raw: &str) -> Result<Address, EngineError> {
            Address::from_str(raw.trim())
                .map_err(|e| EngineError::validation(format!("invalid address '{}': {}", raw, e)))
        }

        fn own_address(&self) -> Address {
            self.address
        }

        fn chain_id(&self) -> u64 {
            self.chain_id
        }
    }
}
