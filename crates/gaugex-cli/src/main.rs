//! gaugex — operator CLI for the boost-weighted staking gauge.
//!
//! Drives every public gauge operation against a local sled store, with a
//! demo asset ledger alongside so deposits, withdrawals, and reward payouts
//! run end to end. Accounts are 64-char hex ids; anything that does not
//! parse as hex is treated as a short label and zero-padded.

mod vault;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use tracing::info;

use gaugex_core::types::{AccountId, Timestamp};
use gaugex_pool::{AssetTransfer, GaugeController, GaugeInit, GaugeQuery};
use gaugex_state::StateDb;
use vault::SledVault;

#[derive(Parser, Debug)]
#[command(name = "gaugex", version, about = "Boost-weighted staking gauge")]
struct Args {
    /// Directory for the persistent gauge and ledger databases.
    #[arg(long, default_value = "~/.gaugex/data")]
    data_dir: PathBuf,

    /// Staked asset symbol; must match the initialised gauge.
    #[arg(long, default_value = "GGX")]
    asset: String,

    /// Operation timestamp override (Unix seconds). Defaults to wall clock.
    #[arg(long)]
    at: Option<Timestamp>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap a fresh gauge.
    Init {
        #[arg(long)]
        rate: u128,
        /// Reward window start; defaults to the operation timestamp.
        #[arg(long)]
        start: Option<Timestamp>,
        /// Reward window length in seconds.
        #[arg(long)]
        duration: i64,
        #[arg(long)]
        admin: String,
        #[arg(long)]
        funding: String,
    },
    /// Credit an account on the demo ledger.
    Fund { account: String, amount: u128 },
    /// Create a position crediting `receiver`.
    Deposit {
        #[arg(long)]
        depositor: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        amount: u128,
    },
    /// Close a position and release its principal.
    Withdraw {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        id: u64,
        #[arg(long)]
        receiver: String,
    },
    /// Pay out one position's pending reward.
    Claim { id: u64 },
    /// Pay out every position of an owner.
    ClaimAll { owner: String },
    /// Replace the reward rate (admin only).
    SetRate {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        rate: u128,
    },
    /// Replace the funding account (admin only).
    SetFunding {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        account: String,
    },
    /// Show the global reward state.
    State {
        #[arg(long)]
        json: bool,
    },
    /// Show one position.
    Position { id: u64 },
    /// List an owner's positions.
    Positions { owner: String },
    /// Show a demo-ledger balance.
    Balance { account: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let db = Arc::new(StateDb::open(data_dir.join("state")).context("opening gauge database")?);
    let vault = Arc::new(
        SledVault::open(data_dir.join("vault"), AccountId::from_label("gauge-custody"))
            .context("opening demo ledger")?,
    );

    let now = match args.at {
        Some(at) => at,
        None => chrono::Utc::now().timestamp(),
    };

    match args.command {
        Command::Init { rate, start, duration, admin, funding } => {
            let start = start.unwrap_or(now);
            GaugeController::init(
                Arc::clone(&db),
                Arc::clone(&vault) as Arc<dyn AssetTransfer>,
                GaugeInit {
                    asset: args.asset.clone(),
                    admin: parse_account(&admin),
                    funding_account: parse_account(&funding),
                    reward_rate: rate,
                    reward_start: start,
                    reward_end: start + duration,
                },
            )?;
            println!(
                "gauge initialised: asset {} | rate {}/s | window {} → {}",
                args.asset,
                rate,
                fmt_time(start),
                fmt_time(start + duration)
            );
        }

        Command::Fund { account, amount } => {
            let account = parse_account(&account);
            let new = vault.credit(&account, amount)?;
            println!("funded {account}: balance {new}");
        }

        Command::Deposit { depositor, receiver, amount } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            let id = gauge.deposit(
                &parse_account(&depositor),
                &parse_account(&receiver),
                amount,
                now,
            )?;
            println!("position {id} created: {amount} locked");
        }

        Command::Withdraw { caller, id, receiver } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            gauge.withdraw(&parse_account(&caller), id, &parse_account(&receiver), now)?;
            println!("position {id} withdrawn");
        }

        Command::Claim { id } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            let paid = gauge.claim_rewards(id, now)?;
            println!("position {id}: {paid} reward paid");
        }

        Command::ClaimAll { owner } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            let paid = gauge.claim_all_rewards(&parse_account(&owner), now)?;
            println!("{paid} reward paid in total");
        }

        Command::SetRate { caller, rate } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            gauge.set_reward_rate(&parse_account(&caller), rate, now)?;
            println!("reward rate set to {rate}/s");
        }

        Command::SetFunding { caller, account } => {
            let mut gauge = open_gauge(&db, &vault, &args.asset)?;
            gauge.set_funding_account(&parse_account(&caller), &parse_account(&account), now)?;
            println!("funding account set to {account}");
        }

        Command::State { json } => {
            let query = GaugeQuery::new(&db);
            let state = query.reward_state()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("reward rate        {}/s", state.reward_rate);
                println!("window             {} → {}", fmt_time(state.reward_start), fmt_time(state.reward_end));
                println!("reward/share       {}", state.reward_per_share_stored);
                println!("last update        {}", fmt_time(state.last_update_time));
                println!("total shares       {}", state.total_shares);
                println!("total locked       {}", state.total_locked);
                println!("live positions     {}", query.total_positions());
                println!("remaining budget   {}", query.remaining_budget(now)?);
            }
        }

        Command::Position { id } => {
            let query = GaugeQuery::new(&db);
            println!("{}", query.describe(id, now)?);
        }

        Command::Positions { owner } => {
            let query = GaugeQuery::new(&db);
            let owner = parse_account(&owner);
            let ids = query.positions_of(&owner)?;
            if ids.is_empty() {
                println!("no positions for {owner}");
            }
            for id in ids {
                println!("{}", query.describe(id, now)?);
            }
        }

        Command::Balance { account } => {
            let account = parse_account(&account);
            println!("{}: {}", account, vault.balance_of(&account));
        }
    }

    db.flush()?;
    info!("done");
    Ok(())
}

fn open_gauge(
    db: &Arc<StateDb>,
    vault: &Arc<SledVault>,
    asset: &str,
) -> anyhow::Result<GaugeController> {
    Ok(GaugeController::open(
        Arc::clone(db),
        Arc::clone(vault) as Arc<dyn AssetTransfer>,
        asset,
    )?)
}

/// Hex account id, or a short label zero-padded to 32 bytes.
fn parse_account(s: &str) -> AccountId {
    AccountId::from_hex(s).unwrap_or_else(|_| AccountId::from_label(s))
}

fn fmt_time(ts: Timestamp) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ts.to_string(),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
