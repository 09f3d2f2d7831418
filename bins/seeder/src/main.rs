//! Database seeder for Rentledger.
//!
//! Runs pending migrations, then creates the default chart of accounts and
//! the operating and deposit bank accounts. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rentledger_db::migration::{Migrator, MigratorTrait};
use rentledger_db::{AccountRepository, connect_with};
use rentledger_shared::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    Migrator::up(&db, None).await.context("migrations failed")?;
    info!("migrations applied");

    let summary = AccountRepository::new(db)
        .seed_default_chart()
        .await
        .context("seeding the chart of accounts failed")?;
    info!(
        accounts_created = summary.accounts_created,
        bank_accounts_created = summary.bank_accounts_created,
        deposit_liability = %config.ledger.deposit_liability_code,
        "seeding complete"
    );

    Ok(())
}
