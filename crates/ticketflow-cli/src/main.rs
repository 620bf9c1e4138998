#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use ticketflow_core::{ErrorCode, config};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ticketflow: a small ticket tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json, FORMAT and the user config).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, then env and user config.
    fn output_mode(&self, project_dir: &std::path::Path) -> anyhow::Result<OutputMode> {
        if let Some(mode) = self.format {
            return Ok(mode);
        }
        let effective = config::resolve_config(project_dir, self.json)?;
        Ok(OutputMode::from_name(&effective.resolved_output))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Project",
        about = "Initialize a ticketflow project",
        long_about = "Create the .ticketflow/ directory with a default config.toml.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    tf init\n\n    # Overwrite an existing config\n    tf init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Session",
        about = "Log in",
        long_about = "Validate the login form and start a session on the dashboard.",
        after_help = "EXAMPLES:\n    # Log in\n    tf login --email ada@example.com --password hunter22"
    )]
    Login(cmd::session::LoginArgs),

    #[command(
        next_help_heading = "Session",
        about = "Create an account",
        long_about = "Validate the signup form and start a session on the dashboard.",
        after_help = "EXAMPLES:\n    # Sign up\n    tf signup --email ada@example.com --password hunter22 --confirm hunter22"
    )]
    Signup(cmd::session::SignupArgs),

    #[command(
        next_help_heading = "Session",
        about = "Log out",
        long_about = "End the session and return to the login page."
    )]
    Logout,

    #[command(
        next_help_heading = "Session",
        about = "Open a page",
        long_about = "Navigate to a page. Protected pages show the login page while logged out.",
        after_help = "EXAMPLES:\n    # Go to the ticket list\n    tf open tickets\n\n    # Back to the landing page\n    tf open landing"
    )]
    Open(cmd::open::OpenArgs),

    #[command(
        next_help_heading = "Session",
        about = "Show session state",
        long_about = "Show whether a session is active and which page is displayed.",
        after_help = "EXAMPLES:\n    # Current state\n    tf status\n\n    # Emit machine-readable output\n    tf status --json"
    )]
    Status,

    #[command(
        next_help_heading = "Tickets",
        about = "Show ticket stats and recent activity",
        long_about = "Show counts per status and the most recently created tickets.",
        after_help = "EXAMPLES:\n    # Dashboard\n    tf dashboard\n\n    # Emit machine-readable output\n    tf dashboard --json"
    )]
    Dashboard,

    #[command(
        next_help_heading = "Tickets",
        about = "Create a ticket",
        long_about = "Create a ticket and put it at the top of the list.",
        after_help = "EXAMPLES:\n    # Create with defaults (open, medium)\n    tf create --title \"Fix login bug\"\n\n    # Set every field\n    tf create -t \"Fix login bug\" -d \"Users cannot log in\" -s in_progress -p high"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets",
        long_about = "List all tickets, newest first.",
        after_help = "EXAMPLES:\n    # List tickets\n    tf list\n\n    # Emit machine-readable output\n    tf list --json"
    )]
    List,

    #[command(
        next_help_heading = "Tickets",
        about = "Show one ticket",
        long_about = "Show full details for a single ticket by ID.",
        after_help = "EXAMPLES:\n    # Show a ticket\n    tf show 1"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Edit a ticket",
        long_about = "Change one or more fields of a ticket.",
        after_help = "EXAMPLES:\n    # Close a ticket\n    tf update 1 --status closed\n\n    # Rename and reprioritize\n    tf update 1 --title \"Fix SSO login\" --priority medium"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Delete a ticket",
        long_about = "Delete a ticket after confirmation.",
        after_help = "EXAMPLES:\n    # Delete with a prompt\n    tf delete 3\n\n    # Delete without a prompt\n    tf delete 3 --force"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Project",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    tf completions bash\n\n    # Generate zsh completions\n    tf completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `TICKETFLOW_LOG` is unset. Covers the core crate
/// (`ticketflow_core`) and this binary (`tf`).
const fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "ticketflow=debug,tf=debug,info"
    } else if quiet {
        "error"
    } else {
        "ticketflow=info,tf=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("TICKETFLOW_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(verbose || env::var("DEBUG").is_ok(), quiet))
    });

    let format = env::var("TICKETFLOW_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let cwd = env::current_dir()?;
    let project_dir = config::resolve_project_dir(&cwd);
    let output = match cli.output_mode(&project_dir) {
        Ok(mode) => mode,
        Err(err) => {
            let fallback = if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            };
            let code = ErrorCode::ConfigParseError;
            return output::fail(
                fallback,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or(code.message()),
                    code.code(),
                ),
            );
        }
    };

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &project_dir, output),
        Commands::Login(ref args) => cmd::session::run_login(args, output, &project_dir),
        Commands::Signup(ref args) => cmd::session::run_signup(args, output, &project_dir),
        Commands::Logout => cmd::session::run_logout(output, &project_dir),
        Commands::Open(ref args) => cmd::open::run_open(args, output, &project_dir),
        Commands::Status => cmd::status::run_status(output, &project_dir),
        Commands::Dashboard => cmd::dashboard::run_dashboard(output, &project_dir),
        Commands::Create(ref args) => cmd::create::run_create(args, output, &project_dir),
        Commands::List => cmd::list::run_list(output, &project_dir),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_dir),
        Commands::Update(ref args) => cmd::update::run_update(args, output, &project_dir),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, output, &project_dir),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
