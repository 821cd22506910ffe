//! Migration CLI tool.
//!
//! Reads `DATABASE_URL`. Run it a second time against the analytics
//! database when analytics rows live on a secondary connection.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    cli::run_cli(migration::Migrator).await;
}
