use clap::Parser;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

/// Cash-flow bookkeeping server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path of the settings file, without requiring it to exist.
    #[arg(long, short, env = "CASHFLOW_CONFIG", default_value = "settings.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::Settings::new(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashflow={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .config((&settings.pagination).into())
        .build()
        .await?;

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
