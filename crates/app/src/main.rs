use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::ServerOptions;
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finance_tracker={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let db = match parse_database(&settings.server.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let engine = Arc::new(engine::Engine::builder().database(db).build().await?);
    let options = ServerOptions {
        bind: settings.server.bind,
        port: settings.server.port,
        expose_internal_errors: settings.server.expose_internal_errors,
    };

    if let Err(err) = server::run(Arc::clone(&engine), options).await {
        tracing::error!("server failed: {err}");
    }

    tracing::info!("closing database");
    engine.close().await?;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
