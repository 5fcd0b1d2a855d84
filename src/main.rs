use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};

use rubik::api::ApiClient;
use rubik::cli::{
    handle_document_command, handle_expense_command, handle_login, handle_logout,
    handle_property_command, handle_register, handle_whoami,
};
use rubik::config::{paths::RubikPaths, settings::Settings};
use rubik::display::format_dashboard;
use rubik::gateway::{Backend, DataGateway, InMemoryBackend, RestBackend};
use rubik::services::{AuthService, DashboardService};
use rubik::storage::SessionStore;

#[derive(Parser)]
#[command(
    name = "rubik",
    version,
    about = "Manage your properties and their expenses",
    long_about = "Rubik keeps track of your real-estate properties, the bills \
                  attached to them (power, water, property tax, insurance) and \
                  their paperwork. It talks to the Rubik backend configured in \
                  config.json or RUBIK_API_URL."
)]
struct Cli {
    /// Use the built-in sample data instead of the backend
    #[arg(long, global = true)]
    offline: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        /// Password (prompted for when omitted)
        #[arg(short, long, env = "RUBIK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        /// Password (prompted for twice when omitted)
        #[arg(short, long, env = "RUBIK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the logged-in user
    Whoami,

    /// Home screen: totals, overdue alert and next due date
    #[command(alias = "home")]
    Dashboard,

    /// Property management commands
    #[command(subcommand, alias = "imovel")]
    Property(rubik::cli::PropertyCommands),

    /// Expense management commands
    #[command(subcommand, alias = "despesa")]
    Expense(rubik::cli::ExpenseCommands),

    /// Document commands
    #[command(subcommand, alias = "doc")]
    Document(rubik::cli::DocumentCommands),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    rubik::logging::init(cli.verbose);

    let paths = RubikPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let sessions = SessionStore::open(paths.session_file())?;

    let backend: Arc<dyn Backend> = if cli.offline {
        Arc::new(InMemoryBackend::seeded())
    } else {
        let client = ApiClient::new(settings.api_url.clone(), settings.request_timeout())?;
        Arc::new(RestBackend::new(client))
    };

    let gateway = DataGateway::new(backend.clone(), sessions.clone());
    let auth = AuthService::new(backend, sessions);
    auth.restore()?;

    // One clock read per command
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Login { email, password }) => {
            handle_login(&auth, &email, password).await?;
        }
        Some(Commands::Logout) => handle_logout(&auth).await?,
        Some(Commands::Register {
            name,
            email,
            password,
        }) => {
            handle_register(&auth, name, email, password).await?;
        }
        Some(Commands::Whoami) => handle_whoami(&auth)?,
        Some(Commands::Dashboard) => {
            let dashboard = DashboardService::new(&gateway).load(today).await?;
            print!("{}", format_dashboard(&dashboard, &settings));
        }
        Some(Commands::Property(cmd)) => {
            handle_property_command(&gateway, &settings, today, cmd).await?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&gateway, &settings, today, cmd).await?;
        }
        Some(Commands::Document(cmd)) => {
            handle_document_command(&gateway, &settings, cmd).await?;
        }
        Some(Commands::Config) => {
            println!("Rubik Configuration");
            println!("===================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Session file:     {}", paths.session_file().display());
            println!();
            println!("Settings:");
            println!("  API URL:          {}", settings.api_url);
            println!("  Request timeout:  {}s", settings.request_timeout_secs);
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!(
                "  Backend:          {}",
                if cli.offline { "offline sample data" } else { "REST" }
            );
        }
        None => {
            println!("Rubik - property and expense management");
            println!();
            println!("Run 'rubik --help' for usage information.");
            println!("Run 'rubik login --email <EMAIL>' to get started.");
        }
    }

    Ok(())
}
