use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

/// Apply or inspect the cash-flow schema.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Connection string of the database to migrate.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./cashflow.db?mode=rwc"
    )]
    database_url: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply every pending migration (default).
    Up,
    /// Roll back every applied migration.
    Down,
    /// Drop all tables, then apply every migration.
    Fresh,
    /// Print applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or(Command::Up) {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down => Migrator::down(&db, None).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }

    Ok(())
}
