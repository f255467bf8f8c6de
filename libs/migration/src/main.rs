//! Schema CLI for the product catalog
//!
//! `DATABASE_URL=... cargo run -p migration -- up` applies the schema and seed
//! rows; `down`, `fresh` and `status` work as usual.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
