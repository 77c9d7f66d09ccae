mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, spec::SpecSubcommand, task::TaskSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specflow",
    about = "Spec-driven development workflow: track requirements, design and tasks documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .spec-workflow/ or .git/)
    #[arg(long, global = true, env = "SPECFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the spec workflow in the current project
    Init {
        /// Project name (default: root directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List specs and show their status
    Spec {
        #[command(subcommand)]
        subcommand: SpecSubcommand,
    },

    /// Inspect and update tasks in a spec's tasks.md
    Task {
        /// Spec name (default: default_spec from config.yaml)
        #[arg(long, short = 's', global = true)]
        spec: Option<String>,

        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Spec { subcommand } => cmd::spec::run(&root, subcommand, cli.json),
        Commands::Task { spec, subcommand } => {
            cmd::task::run(&root, spec.as_deref(), subcommand, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
