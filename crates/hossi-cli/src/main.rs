use anyhow::Result;
use clap::{Parser, Subcommand};
use hossi_core::resource::ResourceKind;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hossi")]
#[command(about = "Hossi-911 hospital management client", long_about = None)]
struct Cli {
    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the current identity and what it may do
    Whoami,
    /// List the navigation items available to the current identity
    Nav,
    /// Patients per branch
    Dashboard,
    /// Hospital branches
    Branches {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Staff accounts
    Users {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Patient records
    Patients {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Appointments
    Appointments {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Audit log
    Audits {
        #[command(subcommand)]
        action: AuditAction,
    },
}

#[derive(Subcommand)]
enum ResourceAction {
    /// List every record
    List,
    /// Create a record from a JSON object
    Create {
        #[arg(long)]
        json: String,
    },
}

#[derive(Subcommand)]
enum AuditAction {
    /// List every audit entry
    List,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::context::build(cli.api_url)?;

    let outcome = match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&ctx, username, password).await
        }
        Commands::Logout => commands::session::logout(&ctx),
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Nav => commands::session::nav(&ctx),
        Commands::Dashboard => commands::resources::dashboard(&ctx).await,
        Commands::Branches { action } => run_action(&ctx, ResourceKind::Branches, action).await,
        Commands::Users { action } => run_action(&ctx, ResourceKind::Users, action).await,
        Commands::Patients { action } => run_action(&ctx, ResourceKind::Patients, action).await,
        Commands::Appointments { action } => {
            run_action(&ctx, ResourceKind::Appointments, action).await
        }
        Commands::Audits { action } => match action {
            AuditAction::List => commands::resources::list(&ctx, ResourceKind::Audits).await,
        },
    };

    commands::output::print_notifications(ctx.notifications());
    outcome
}

async fn run_action(
    ctx: &hossi_application::ClientContext,
    kind: ResourceKind,
    action: ResourceAction,
) -> Result<()> {
    match action {
        ResourceAction::List => commands::resources::list(ctx, kind).await,
        ResourceAction::Create { json } => commands::resources::create(ctx, kind, &json).await,
    }
}
