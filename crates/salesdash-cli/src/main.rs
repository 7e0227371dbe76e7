mod sales;
mod session_cmd;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use salesdash_core::SalesPeriod;
use salesdash_session::{DashboardClient, FileStorage, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "salesdash-cli")]
#[command(about = "Sales dashboard session command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and load the user profile
    Login {
        /// Account email address
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long, env = "SALESDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in user and store
    Whoami,
    /// Print the daily sales overview for the selected store
    Sales {
        /// Window in days: 60, 30, 14 or 7
        #[arg(long, default_value = "30")]
        period: SalesPeriod,
    },
    /// Resolve where a route path lands for the current session
    Navigate {
        /// Route path, e.g. /dashboard
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = salesdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let storage = Arc::new(FileStorage::open(config.state_path.clone())?);
    let client = DashboardClient::new(&config)
        .map_err(|e| anyhow::anyhow!("failed to build dashboard client: {e}"))?;
    let store = SessionStore::new(client, storage, config.sales_source);
    tracing::debug!(
        env = %config.env,
        state_path = %config.state_path.display(),
        sales_source = %config.sales_source,
        "session store ready"
    );

    match cli.command {
        Commands::Login { email, password } => {
            session_cmd::run_login(&store, &email, &password).await?;
        }
        Commands::Logout => session_cmd::run_logout(&store).await,
        Commands::Whoami => session_cmd::run_whoami(&store).await,
        Commands::Sales { period } => sales::run_sales(&store, period).await?,
        Commands::Navigate { path } => session_cmd::run_navigate(&store, &path)?,
    }

    Ok(())
}
