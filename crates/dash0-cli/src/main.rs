//! Dash0 CLI - manage Dash0 dashboards, check rules, views and synthetic checks as code

use clap::{Args, Parser, Subcommand};
use dash0_api::ConnectionFlags;
use dash0_core::AssetKind;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::assets::OutputFormat;
use error::Result;

#[derive(Parser)]
#[command(name = "dash0")]
#[command(author, version, about = "Manage Dash0 assets as code", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection settings; DASH0_API_URL, DASH0_AUTH_TOKEN and DASH0_DATASET take precedence
#[derive(Args)]
struct ConnectionArgs {
    /// API endpoint, e.g. https://api.eu-west-1.aws.dash0.com
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Auth token
    #[arg(long, global = true)]
    auth_token: Option<String>,

    /// Target dataset
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Profile to use instead of the active one
    #[arg(long, global = true)]
    profile: Option<String>,
}

impl From<ConnectionArgs> for ConnectionFlags {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            api_url: args.api_url,
            auth_token: args.auth_token,
            dataset: args.dataset,
            profile: args.profile,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update assets from YAML documents
    Apply {
        /// File, directory, or - for stdin
        #[arg(short = 'f', long = "file")]
        file: String,

        /// Validate the documents without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage dashboards
    #[command(subcommand)]
    Dashboards(AssetCommand),

    /// Manage check rules
    #[command(subcommand)]
    CheckRules(AssetCommand),

    /// Manage views
    #[command(subcommand)]
    Views(AssetCommand),

    /// Manage synthetic checks
    #[command(subcommand)]
    SyntheticChecks(AssetCommand),

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum AssetCommand {
    /// List assets
    List,

    /// Print an asset as a document `dash0 apply` accepts
    Get {
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Delete an asset
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Manage connection profiles
    #[command(subcommand)]
    Profiles(ProfileCommand),
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Create a profile from --api-url, --auth-token and --dataset
    Create { name: String },

    /// List profiles
    List,

    /// Make a profile the active one
    Select { name: String },

    /// Show the resolved connection
    Show { name: Option<String> },

    /// Delete a profile
    Delete { name: String },
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.debug);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => exit_with(error::CliError::internal(e.to_string())),
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        exit_with(e);
    }
}

fn exit_with(err: error::CliError) -> ! {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let flags = ConnectionFlags::from(cli.connection);

    match cli.command {
        Commands::Apply { file, dry_run } => commands::apply::run(&file, dry_run, &flags).await,

        Commands::Dashboards(command) => run_assets(AssetKind::Dashboard, command, &flags).await,
        Commands::CheckRules(command) => run_assets(AssetKind::CheckRule, command, &flags).await,
        Commands::Views(command) => run_assets(AssetKind::View, command, &flags).await,
        Commands::SyntheticChecks(command) => {
            run_assets(AssetKind::SyntheticCheck, command, &flags).await
        }

        Commands::Config(ConfigCommand::Profiles(command)) => match command {
            ProfileCommand::Create { name } => commands::config::create(&name, &flags),
            ProfileCommand::List => commands::config::list(),
            ProfileCommand::Select { name } => commands::config::select(&name),
            ProfileCommand::Show { name } => commands::config::show(name.as_deref(), &flags),
            ProfileCommand::Delete { name } => commands::config::delete(&name),
        },
    }
}

async fn run_assets(kind: AssetKind, command: AssetCommand, flags: &ConnectionFlags) -> Result<()> {
    match command {
        AssetCommand::List => commands::assets::list(kind, flags).await,
        AssetCommand::Get { id, output } => commands::assets::get(kind, &id, output, flags).await,
        AssetCommand::Delete { id } => commands::assets::delete(kind, &id, flags).await,
    }
}
