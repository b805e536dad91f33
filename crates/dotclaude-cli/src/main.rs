mod cmd;
mod output;
mod root;
mod settings;

use clap::{Parser, Subcommand};
use cmd::{alert::AlertSubcommand, config::ConfigSubcommand, hook::HookSubcommand};
use settings::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dotclaude",
    about = "Link a Claude config bundle into ~/.claude and run its hooks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Bundle root (default: auto-detect from dotclaude.yaml or .git/)
    #[arg(long, global = true, env = "DOTCLAUDE_ROOT")]
    root: Option<PathBuf>,

    /// Directory the bundle is linked into (overrides target_dir)
    #[arg(long, global = true, env = "DOTCLAUDE_TARGET")]
    target: Option<PathBuf>,

    /// AFK flag file (overrides afk_flag)
    #[arg(long, global = true, env = "DOTCLAUDE_AFK_FLAG")]
    afk_flag: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Symlink the bundle into the target directory, backing up conflicts
    Install {
        /// Back up and replace conflicting targets without asking
        #[arg(long, conflicts_with = "no")]
        yes: bool,

        /// Leave every conflicting target in place without asking
        #[arg(long)]
        no: bool,
    },

    /// Remove the managed symlinks (real files and backups are kept)
    Uninstall,

    /// Show the state of each managed link
    Status,

    /// Toggle AFK mode, or force it on/off
    Afk {
        /// on | off (omit to flip)
        state: Option<String>,
    },

    /// Hook entry points invoked by the assistant (JSON on stdin)
    Hook {
        #[command(subcommand)]
        subcommand: HookSubcommand,
    },

    /// Manage timed alerts
    Alert {
        #[command(subcommand)]
        subcommand: AlertSubcommand,
    },

    /// Inspect or create dotclaude.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr: hook stdout must stay pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = match root::resolve_root(cli.root.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };
    let target = cli.target.as_deref();
    let afk_flag = cli.afk_flag.as_deref();

    let load = || Settings::load(&root, target, afk_flag);

    let result = match cli.command {
        Commands::Install { yes, no } => {
            load().and_then(|s| cmd::install::run(&s, yes, no, cli.json))
        }
        Commands::Uninstall => cmd::uninstall::run(&root, target, afk_flag, cli.json),
        Commands::Status => load().and_then(|s| cmd::status::run(&s, cli.json)),
        Commands::Afk { state } => {
            load().and_then(|s| cmd::afk::run(&s, state.as_deref(), cli.json))
        }
        Commands::Alert { subcommand } => {
            load().and_then(|s| cmd::alert::run(&s, subcommand, cli.json))
        }
        Commands::Hook { subcommand } => {
            let settings = Settings::load_lenient(&root, target, afk_flag);
            cmd::hook::run(&settings, subcommand)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
