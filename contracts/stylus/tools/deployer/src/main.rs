use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use multisig_wallet_core::WalletConfig;
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Deploy the multisig wallet using `cargo stylus deploy`, then write/update a deployments JSON.
///
/// Constructor arguments are validated locally with the same rules the contract applies, so a
/// bad owner list or threshold fails here instead of burning an activation.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the Stylus contract crate (where `cargo stylus deploy` should be run).
    #[arg(long, default_value = "src/multisig-wallet")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Wallet owners, comma separated. Order is kept on-chain.
    #[arg(long, env = "OWNERS", value_delimiter = ',', required = true)]
    owners: Vec<Address>,

    /// Account allowed to withdraw native balance and receive token allowances.
    #[arg(long, env = "MASTER_KEY")]
    master_key: Address,

    /// Confirmations needed before a transaction executes.
    #[arg(long, env = "REQUIRED")]
    required: u64,

    /// Declared owner count; defaults to the length of `--owners`.
    #[arg(long)]
    total_owners: Option<u64>,

    /// Initial funding sent with the constructor, as accepted by `cargo stylus deploy`.
    #[arg(long)]
    value: Option<String>,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "multisig-wallet")]
    contract_key: String,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`).
    ///
    /// Example:
    /// `-- --estimate-gas`
    #[arg(last = true)]
    passthrough: Vec<String>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = wallet_config(&cli)?;
    let (address, tx_hashes, raw_output) = run_cargo_stylus_deploy(&cli, &config)?;
    write_deployments_json(&cli, &config, &address, &tx_hashes, &raw_output)?;

    println!(
        "Deployed `{}` to {} ({} of {} owners)",
        cli.contract_key,
        address,
        config.required,
        config.owners.len()
    );
    Ok(())
}

/// The administrator is the deploying account, which the contract reads from `tx.origin`;
/// it plays no part in validation, so a placeholder is used here.
fn wallet_config(cli: &Cli) -> Result<WalletConfig> {
    let total_owners = cli.total_owners.unwrap_or(cli.owners.len() as u64);
    WalletConfig::new(
        cli.owners.clone(),
        cli.master_key,
        Address::ZERO,
        total_owners,
        cli.required,
    )
    .map_err(|e| anyhow!("invalid wallet configuration: {e}"))
}

/// `constructor(address[] owners, address masterKey, uint256 totalOwners, uint256 required)`
fn constructor_args(config: &WalletConfig) -> Vec<String> {
    let owners = config
        .owners
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(",");
    vec![
        format!("[{owners}]"),
        config.master_key.to_string(),
        config.owners.len().to_string(),
        config.required.to_string(),
    ]
}

fn run_cargo_stylus_deploy(
    cli: &Cli,
    config: &WalletConfig,
) -> Result<(String, Vec<String>, String)> {
    // Example output lines we parse:
    //   Deploying program to address 0x...
    //   Confirmed tx 0x...
    let re_address = Regex::new(r"Deploying program to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir);
    cmd.arg("stylus").arg("deploy");
    cmd.arg("-e").arg(&cli.rpc_url);

    if let Some(ref pk_path) = cli.private_key_path {
        cmd.arg("--private-key-path").arg(pk_path);
    } else if let Some(ref pk) = cli.private_key {
        cmd.arg("--private-key").arg(pk);
    } else {
        return Err(anyhow!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    }

    cmd.arg("--constructor-args").args(constructor_args(config));
    if let Some(ref value) = cli.value {
        cmd.arg("--constructor-value").arg(value);
    }

    // Keep stdout/stderr for parsing and for debugging when runs fail.
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    // Allow passing flags like --estimate-gas, --no-verify, etc.
    if !cli.passthrough.is_empty() {
        cmd.args(&cli.passthrough);
    }

    let output = cmd
        .output()
        .context("failed to run `cargo stylus deploy`")?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let combined = format!("{stdout}\n{stderr}");

    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        ));
    }

    let address = re_address
        .captures_iter(&combined)
        .next()
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
        .ok_or_else(|| {
            anyhow!("could not parse deployed address from `cargo stylus deploy` output")
        })?;

    let tx_hashes: Vec<String> = re_tx
        .captures_iter(&combined)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok((address, tx_hashes, combined))
}

fn deployment_entry(
    cli: &Cli,
    config: &WalletConfig,
    address: &str,
    tx_hashes: &[String],
    raw_output: &str,
    now: &str,
) -> Value {
    let mut entry = json!({
        "address": address,
        "rpc_url": cli.rpc_url,
        "deployed_at": now,
        "owners": config.owners.iter().map(|o| o.to_string()).collect::<Vec<_>>(),
        "master_key": config.master_key.to_string(),
        "required": config.required,
    });

    if !tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(tx_hashes);
    }
    if let Some(ref value) = cli.value {
        entry["initial_value"] = json!(value);
    }

    // Truncated so deployments files stay reviewable.
    let trimmed = raw_output.trim();
    if !trimmed.is_empty() {
        let max = 16_000usize;
        let s = match trimmed.char_indices().nth(max) {
            Some((cut, _)) => &trimmed[..cut],
            None => trimmed,
        };
        entry["cargo_stylus_output"] = json!(s);
    }
    entry
}

fn write_deployments_json(
    cli: &Cli,
    config: &WalletConfig,
    address: &str,
    tx_hashes: &[String],
    raw_output: &str,
) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if cli.deployments_path.exists() {
        fs::read_to_string(&cli.deployments_path)
            .with_context(|| format!("failed reading {}", cli.deployments_path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", cli.deployments_path.display()))?
    };

    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(cli.network);
    root["updated_at"] = json!(now);

    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    root["deployments"][&cli.contract_key] =
        deployment_entry(cli, config, address, tx_hashes, raw_output, &now);

    write_json_atomic(&cli.deployments_path, &root)?;
    Ok(())
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
