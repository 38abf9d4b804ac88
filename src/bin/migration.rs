use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use storefront_coupons::migrator::Migrator;
use tracing::info;

/// Applies or rolls back the coupon schema.
#[derive(Parser, Debug)]
#[command(name = "migration", version, about = "Coupon schema migrations")]
struct Cli {
    /// Database URL; falls back to DATABASE_URL, then APP__DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        /// Apply at most this many migrations
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Roll back this many migrations
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and reapply all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .or_else(|| std::env::var("APP__DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://storefront_coupons.db?mode=rwc".to_string());

    info!("Connecting to database: {}", database_url);

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(options).await?;

    match cli.command.unwrap_or(Command::Up { num: None }) {
        Command::Up { num } => {
            Migrator::up(&db, num).await?;
            info!("Migration completed successfully");
        }
        Command::Down { num } => {
            Migrator::down(&db, Some(num)).await?;
            info!("Rolled back {} migration(s)", num);
        }
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => {
            Migrator::fresh(&db).await?;
            info!("Schema recreated");
        }
    }

    Ok(())
}
