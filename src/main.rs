use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;
use signal_scorer::{
    config::Settings,
    models::{RawSocialProfile, RawVaultItems, RawWalletSummary, ScoreRequest},
    scoring::{Evaluator, ScoreCalculator},
    sources::{SocialApiClient, VaultApiClient, WalletApiClient},
    storage::{InMemoryTokenStore, SqliteScoreStore, TokenStore},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "signal-scorer")]
#[clap(about = "Score users from their social, wallet and chat activity", long_about = None)]
struct Cli {
    /// Settings file layered over the built-in defaults
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate raw payloads read from JSON files
    Evaluate {
        #[clap(long)]
        social: Option<PathBuf>,

        #[clap(long)]
        wallet: Option<PathBuf>,

        /// Vault chat groups (array or {"items": [...]})
        #[clap(long)]
        groups: Option<PathBuf>,

        /// Vault chat messages (array or {"items": [...]})
        #[clap(long)]
        messages: Option<PathBuf>,

        /// Evaluation time as RFC 3339, defaults to now
        #[clap(long)]
        now: Option<String>,
    },

    /// Fetch a user's data from the configured sources, score and store it
    Collect {
        #[clap(short, long)]
        user_key: String,

        /// Social handle
        #[clap(long)]
        username: Option<String>,

        #[clap(long)]
        email: Option<String>,

        /// Wallet address to evaluate, defaults to the first --wallet
        #[clap(long)]
        primary: Option<String>,

        /// Wallet address (repeatable)
        #[clap(long = "wallet")]
        wallets: Vec<String>,

        /// Vault user id
        #[clap(long)]
        vault_user: Option<String>,

        /// Vault access token for --vault-user
        #[clap(long)]
        vault_token: Option<String>,
    },

    /// Print the stored score record for a user
    Total {
        #[clap(short, long)]
        user_key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::new().unwrap_or_else(|e| {
            eprintln!("Using default settings: {}", e);
            Settings::default()
        }),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.app.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    match cli.command {
        Commands::Evaluate {
            social,
            wallet,
            groups,
            messages,
            now,
        } => {
            let evaluator = Evaluator::from_settings(&settings.scoring);
            let social = RawSocialProfile(read_payload(social.as_deref())?);
            let wallet = RawWalletSummary(read_payload(wallet.as_deref())?);
            let groups = RawVaultItems(read_payload(groups.as_deref())?);
            let messages = RawVaultItems(read_payload(messages.as_deref())?);

            let evaluation = match now {
                Some(raw) => {
                    let now = DateTime::parse_from_rfc3339(&raw)
                        .with_context(|| format!("Invalid --now timestamp: {}", raw))?
                        .with_timezone(&Utc);
                    evaluator.evaluate_at(&social, &wallet, &groups, &messages, now)
                }
                None => evaluator.evaluate(&social, &wallet, &groups, &messages),
            };

            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }

        Commands::Collect {
            user_key,
            username,
            email,
            primary,
            wallets,
            vault_user,
            vault_token,
        } => {
            let tokens: Arc<dyn TokenStore> =
                Arc::new(InMemoryTokenStore::from_settings(&settings.token_store));
            if let (Some(user), Some(token)) = (&vault_user, &vault_token) {
                tokens.store_token(user, token);
            }

            let calculator = build_calculator(&settings, tokens).await?;

            let request = ScoreRequest {
                user_key,
                username,
                email,
                primary_address: primary,
                wallet_addresses: wallets,
                vault_user_id: vault_user,
            };

            let report = calculator.calculate_user_score(request).await?;
            info!("Collected score for {}", report.user_key);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Total { user_key } => {
            let tokens = Arc::new(InMemoryTokenStore::from_settings(&settings.token_store));
            let calculator = build_calculator(&settings, tokens).await?;

            match calculator.stored_record(&user_key).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => {
                    error!("No score record for {}", user_key);
                    anyhow::bail!("No score record for {}", user_key);
                }
            }
        }
    }

    Ok(())
}

async fn build_calculator(
    settings: &Settings,
    tokens: Arc<dyn TokenStore>,
) -> anyhow::Result<ScoreCalculator> {
    let store = SqliteScoreStore::connect(&settings.database)
        .await
        .context("Failed to open score database")?;

    Ok(ScoreCalculator::new(
        Arc::new(SocialApiClient::new(&settings.sources)?),
        Arc::new(WalletApiClient::new(&settings.sources)?),
        Arc::new(VaultApiClient::new(&settings.sources, tokens)?),
        Arc::new(store),
        &settings.scoring,
    ))
}

/// Reads a JSON payload, treating a missing argument as an absent source.
fn read_payload(path: Option<&Path>) -> anyhow::Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}
