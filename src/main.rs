// market - read-only inspector for a persisted marketplace snapshot

use clap::{Parser, Subcommand};
use datamarket::market::MarketState;
use datamarket::storage::MarketStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "market", version, about = "Inspect a dataset marketplace snapshot")]
struct Cli {
    /// Path to the sled database holding the snapshot
    #[arg(long, default_value = "./market-db")]
    db: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print lifetime statistics
    Stats,
    /// Print one dataset record
    Dataset { id: u64 },
    /// Print one bundle record
    Bundle { id: u64 },
    /// List every dataset
    List {
        /// Only show active datasets
        #[arg(long)]
        active: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("datamarket={},market={}", level, level)));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load(db: &Path) -> Result<(MarketStore, MarketState), String> {
    let store = MarketStore::open(db).map_err(|e| e.to_string())?;
    if store.is_empty().map_err(|e| e.to_string())? {
        return Err(format!("{} holds no marketplace data", db.display()));
    }
    let state = store
        .load_state()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no marketplace snapshot in {}", db.display()))?;
    Ok((store, state))
}

fn run(cli: Cli) -> Result<(), String> {
    let (store, state) = load(&cli.db)?;
    info!(db = %cli.db.display(), datasets = state.dataset_count(), "snapshot loaded");

    match cli.command {
        Command::Stats => {
            let stats = state.stats();
            let storage = store.stats().map_err(|e| e.to_string())?;
            println!("store keys:            {}", storage.key_count);
            println!("store size (bytes):    {}", storage.disk_size_bytes);
            if let Some(accounts) = store.load_accounts().map_err(|e| e.to_string())? {
                println!("custody:               {}", accounts.custody);
                println!("owner:                 {}", accounts.owner);
            }
            println!("datasets registered:   {}", stats.datasets_registered);
            println!("datasets deactivated:  {}", stats.datasets_deactivated);
            println!("bundles created:       {}", stats.bundles_created);
            println!("windows granted:       {}", stats.subscriptions_granted);
            println!("renewals:              {}", stats.renewals);
            println!("stake in custody:      {}", stats.stake_in_custody);
            println!("provider volume:       {}", stats.provider_volume);
            println!("custody volume:        {}", stats.custody_volume);
            println!("referral payouts:      {}", stats.referral_payouts);
        }
        Command::Dataset { id } => {
            let dataset = state.dataset(id).ok_or_else(|| format!("dataset {} not found", id))?;
            println!("{:#?}", dataset);
        }
        Command::Bundle { id } => {
            let bundle = state.bundle(id).ok_or_else(|| format!("bundle {} not found", id))?;
            println!("{:#?}", bundle);
        }
        Command::List { active } => {
            for dataset in state.datasets_sorted() {
                if active && !dataset.is_active() {
                    continue;
                }
                println!(
                    "{:>6}  {:<32}  price={:<10} quality={:<3} active={}",
                    dataset.id(),
                    dataset.name(),
                    dataset.price(),
                    dataset.quality_score(),
                    dataset.is_active()
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
