//! Devnet round trip against a deployed wallet.
//!
//! Requires a deployment with at least two owners and a threshold of two:
//! - `RPC_URL`: JSON-RPC endpoint;
//! - `STYLUS_CONTRACT_ADDRESS`: the wallet;
//! - `OWNER_PRIV_KEYS`: comma-separated private keys of two owners;
//! - `MASTER_PRIV_KEY` (optional): master key, enables the withdrawal check.
//! - `ADMIN_PRIV_KEY` and `TOKEN_ADDRESS` (optional): deploying account and an ERC-20 token,
//!   enable the `addToken` check.
//!
//! Run with `cargo test -p multisig-wallet --test e2e -- --ignored`.

use std::{str::FromStr, sync::Arc};

use ethers::{
    middleware::SignerMiddleware,
    prelude::abigen,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, U256},
};
use eyre::{eyre, Result, WrapErr};

abigen!(
    MultiSigWallet,
    r#"[
        function submitTransaction(address destination, uint256 value, bytes data) external returns (uint256)
        function confirmTransaction(uint256 transactionId) external
        function withdraw(uint256 amount) external
        function transactions(uint256 transactionId) external view returns (address, uint256, bytes, bool, uint256)
        function confirmedBy(uint256 transactionId, address owner) external view returns (bool)
        function transactionCount() external view returns (uint256)
        function required() external view returns (uint256)
        function getOwners() external view returns (address[])
        function masterKey() external view returns (address)
        function administrator() external view returns (address)
        function addToken(address tokenAddress, uint256 amount) external
        event Execution(uint256 indexed transactionId, address indexed executor)
        event TokenAdded(address indexed tokenAddress, address indexed masterKey)
    ]"#
);

abigen!(
    Erc20,
    r#"[
        function allowance(address owner, address spender) external view returns (uint256)
    ]"#
);

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

struct Env {
    provider: Provider<Http>,
    chain_id: u64,
    wallet_address: Address,
}

impl Env {
    async fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let rpc_url = std::env::var("RPC_URL").wrap_err("RPC_URL not set")?;
        let address =
            std::env::var("STYLUS_CONTRACT_ADDRESS").wrap_err("STYLUS_CONTRACT_ADDRESS not set")?;

        let provider = Provider::<Http>::try_from(rpc_url.as_str())?;
        let chain_id = provider.get_chainid().await?.as_u64();
        Ok(Self {
            provider,
            chain_id,
            wallet_address: Address::from_str(&address)?,
        })
    }

    fn client(&self, private_key: &str) -> Result<Arc<Client>> {
        let signer = LocalWallet::from_str(private_key.trim())?.with_chain_id(self.chain_id);
        Ok(Arc::new(SignerMiddleware::new(self.provider.clone(), signer)))
    }

    fn contract(&self, client: Arc<Client>) -> MultiSigWallet<Client> {
        MultiSigWallet::new(self.wallet_address, client)
    }
}

#[tokio::test]
#[ignore = "requires a devnet deployment"]
async fn two_owners_execute_a_transfer() -> Result<()> {
    let env = Env::load().await?;
    let keys = std::env::var("OWNER_PRIV_KEYS").wrap_err("OWNER_PRIV_KEYS not set")?;
    let keys: Vec<&str> = keys.split(',').collect();
    if keys.len() < 2 {
        return Err(eyre!("OWNER_PRIV_KEYS needs two owner keys"));
    }

    let first = env.client(keys[0])?;
    let second = env.client(keys[1])?;
    let as_first = env.contract(first.clone());
    let as_second = env.contract(second.clone());

    let owners = as_first.get_owners().call().await?;
    assert!(owners.contains(&first.address()));
    assert!(owners.contains(&second.address()));
    assert_eq!(as_first.required().call().await?, U256::from(2));

    let destination = Address::random();
    let amount = U256::from(5_000_000_000_000_000u64);
    let before = as_first.transaction_count().call().await?;

    as_first
        .submit_transaction(destination, amount, Bytes::new())
        .send()
        .await?
        .await?;
    let id = as_first.transaction_count().call().await?;
    assert_eq!(id, before + 1);

    let (stored_destination, value, _data, executed, counter) =
        as_first.transactions(id).call().await?;
    assert_eq!(stored_destination, destination);
    assert_eq!(value, amount);
    assert!(!executed);
    assert_eq!(counter, U256::from(1));
    assert!(as_first.confirmed_by(id, first.address()).call().await?);

    let receipt = as_second
        .confirm_transaction(id)
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("confirmation dropped"))?;
    assert_eq!(receipt.status, Some(1u64.into()));

    let (_, _, _, executed, counter) = as_first.transactions(id).call().await?;
    assert!(executed);
    assert_eq!(counter, U256::from(2));
    assert_eq!(env.provider.get_balance(destination, None).await?, amount);

    let executions = as_first
        .execution_filter()
        .topic1(id)
        .from_block(receipt.block_number.unwrap_or_default())
        .query()
        .await?;
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].executor, second.address());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a devnet deployment"]
async fn master_key_withdraws() -> Result<()> {
    let env = Env::load().await?;
    let key = match std::env::var("MASTER_PRIV_KEY") {
        Ok(key) => key,
        Err(_) => return Ok(()),
    };
    let master = env.client(&key)?;
    let as_master = env.contract(master.clone());
    assert_eq!(as_master.master_key().call().await?, master.address());

    let amount = U256::from(1_000u64);
    let wallet_before = env.provider.get_balance(env.wallet_address, None).await?;
    as_master.withdraw(amount).send().await?.await?;
    let wallet_after = env.provider.get_balance(env.wallet_address, None).await?;
    assert_eq!(wallet_before - wallet_after, amount);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a devnet deployment"]
async fn administrator_grants_token_allowance() -> Result<()> {
    let env = Env::load().await?;
    let (key, token) = match (
        std::env::var("ADMIN_PRIV_KEY"),
        std::env::var("TOKEN_ADDRESS"),
    ) {
        (Ok(key), Ok(token)) => (key, Address::from_str(&token)?),
        _ => return Ok(()),
    };
    let admin = env.client(&key)?;
    let as_admin = env.contract(admin.clone());
    assert_eq!(as_admin.administrator().call().await?, admin.address());

    let master_key = as_admin.master_key().call().await?;
    let amount = U256::from(5u64);
    let receipt = as_admin
        .add_token(token, amount)
        .send()
        .await?
        .await?
        .ok_or_else(|| eyre!("addToken dropped"))?;
    assert_eq!(receipt.status, Some(1u64.into()));

    let erc20 = Erc20::new(token, admin.clone());
    assert_eq!(
        erc20.allowance(env.wallet_address, master_key).call().await?,
        amount
    );

    let added = as_admin
        .token_added_filter()
        .topic1(token)
        .from_block(receipt.block_number.unwrap_or_default())
        .query()
        .await?;
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].master_key, master_key);
    Ok(())
}
