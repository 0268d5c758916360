use sea_orm_migration::prelude::*;

use simpleotp_otp_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
