use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./finance_tracker.db?mode=rwc";
const USAGE: &str = "Usage: cargo run -p migration -- [up|down|fresh|refresh|status] [steps]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());
    let steps = match args.next() {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| USAGE)?),
        None => None,
    };

    let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, steps).await?,
        "down" => migration::Migrator::down(&db, steps.or(Some(1))).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "refresh" => migration::Migrator::refresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    db.close().await?;
    Ok(())
}
