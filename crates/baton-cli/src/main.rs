#![forbid(unsafe_code)]

mod agent;
mod cmd;
mod output;
mod project;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "baton: assignment tracking for staged task pipelines",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Override agent identity (skips env resolution).
    #[arg(long, global = true)]
    agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    /// Get the agent flag as an Option<&str> for resolution.
    fn agent_flag(&self) -> Option<&str> {
        self.agent.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a baton project",
        long_about = "Initialize a baton project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    bt init\n\n    # Reinitialize, keeping the existing store\n    bt init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Register a task",
        long_about = "Register a task with its title, creator, and starting stage.",
        after_help = "EXAMPLES:\n    # Register a task in the default intake stage\n    bt create t-42 --title \"Fix login timeout\"\n\n    # Register directly into review\n    bt create t-42 --title \"Fix login timeout\" --stage review"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Move a task to a different stage",
        long_about = "Move a task to a different stage. Stage-scoped signals for other stages stop matching.",
        after_help = "EXAMPLES:\n    # Move a task into review\n    bt stage t-42 review"
    )]
    Stage(cmd::stage::StageArgs),

    #[command(
        next_help_heading = "Signals",
        about = "Take a task",
        long_about = "Record that the acting agent took a task, optionally scoped to a stage.",
        after_help = "EXAMPLES:\n    # Take a task\n    bt take t-42\n\n    # Take it for the review stage only\n    bt take t-42 --stage review"
    )]
    Take(cmd::take::TakeArgs),

    #[command(
        next_help_heading = "Signals",
        about = "Assign a task to an actor",
        long_about = "Record that the acting agent assigned a task to another actor.",
        after_help = "EXAMPLES:\n    # Assign a task\n    bt assign t-42 u-7\n\n    # Assign the same actor across several tasks\n    bt assign t-42 u-7 --ids t-43 t-44"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Signals",
        about = "Hand a task over",
        long_about = "Record a handover. Signals recorded at or before the handover stop resolving.",
        after_help = "EXAMPLES:\n    # Hand a task over\n    bt handover t-42"
    )]
    Handover(cmd::transition::HandoverArgs),

    #[command(
        next_help_heading = "Signals",
        about = "Send a task to its next stage",
        long_about = "Record a send-to-next transition. Signals recorded at or before it stop resolving.",
        after_help = "EXAMPLES:\n    # Send a task onward\n    bt advance t-42"
    )]
    Advance(cmd::transition::AdvanceArgs),

    #[command(
        next_help_heading = "Signals",
        about = "Record an attachment",
        long_about = "Record an attachment with its ownership metadata: a taken-by actor and assignment entries.",
        after_help = "EXAMPLES:\n    # Record who took the task via an attachment\n    bt attach t-42 --taken-by u-7\n\n    # Record assignment entries with roles\n    bt attach t-42 --assign u-7:review --assign u-8"
    )]
    Attach(cmd::attach::AttachArgs),

    #[command(
        next_help_heading = "Directory",
        about = "Save an actor profile",
        long_about = "Save an actor's display name, email, and default role for identity resolution.",
        after_help = "EXAMPLES:\n    # Save a profile\n    bt profile u-7 --name \"Ada Lovelace\" --email ada@example.com"
    )]
    Profile(cmd::profile::ProfileArgs),

    #[command(
        next_help_heading = "Read",
        about = "Resolve active assignees",
        long_about = "Resolve the currently active assignee set for a task's present stage.",
        after_help = "EXAMPLES:\n    # Who holds the task right now?\n    bt resolve t-42\n\n    # Everyone still live, not just the most recent\n    bt resolve t-42 --all\n\n    # Everyone except me\n    bt resolve t-42 --exclude-me\n\n    # Emit machine-readable output\n    bt resolve t-42 --json"
    )]
    Resolve(cmd::resolve::ResolveArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    bt completions bash\n\n    # Generate zsh completions\n    bt completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let default_filter = if env::var("DEBUG").is_ok() {
        "baton=debug,info"
    } else {
        "baton=info,warn"
    };
    let filter = EnvFilter::try_from_env("BATON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    let json_logs = env::var("BATON_LOG_FORMAT").is_ok_and(|format| format == "json");
    if json_logs {
        registry.with(fmt::layer().json().with_ansi(false)).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &project_root),
        Commands::Create(ref args) => {
            cmd::create::run_create(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Stage(ref args) => cmd::stage::run_stage(args, output, &project_root),
        Commands::Take(ref args) => {
            cmd::take::run_take(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Assign(ref args) => {
            cmd::assign::run_assign(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Handover(ref args) => {
            cmd::transition::run_handover(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Advance(ref args) => {
            cmd::transition::run_advance(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Attach(ref args) => cmd::attach::run_attach(args, output, &project_root),
        Commands::Profile(ref args) => cmd::profile::run_profile(args, output, &project_root),
        Commands::Resolve(ref args) => {
            cmd::resolve::run_resolve(args, cli.agent_flag(), output, &project_root)
        }
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["bt", "--json", "resolve", "t-1"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["bt", "resolve", "t-1", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["bt", "resolve", "t-1"]);
        assert!(!cli.json);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn agent_flag_parsed() {
        let cli = Cli::parse_from(["bt", "--agent", "test-agent", "take", "t-1"]);
        assert_eq!(cli.agent.as_deref(), Some("test-agent"));
        assert_eq!(cli.agent_flag(), Some("test-agent"));
    }

    #[test]
    fn agent_flag_none_by_default() {
        let cli = Cli::parse_from(["bt", "resolve", "t-1"]);
        assert!(cli.agent.is_none());
        assert!(cli.agent_flag().is_none());
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["bt", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["bt", "init"],
            vec!["bt", "create", "t-1", "--title", "x"],
            vec!["bt", "stage", "t-1", "review"],
            vec!["bt", "take", "t-1"],
            vec!["bt", "assign", "t-1", "u-2"],
            vec!["bt", "handover", "t-1"],
            vec!["bt", "advance", "t-1"],
            vec!["bt", "attach", "t-1", "--taken-by", "u-2"],
            vec!["bt", "profile", "u-2", "--name", "n", "--email", "e"],
            vec!["bt", "resolve", "t-1"],
            vec!["bt", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }

    #[test]
    fn read_command_works_without_agent() {
        let cli = Cli::parse_from(["bt", "resolve", "t-1"]);
        assert!(cli.agent_flag().is_none());
    }

    #[test]
    fn mutating_commands_accept_agent_flag() {
        let cli = Cli::parse_from(["bt", "--agent", "me", "create", "t-1", "--title", "t"]);
        assert_eq!(cli.agent_flag(), Some("me"));

        let cli = Cli::parse_from(["bt", "--agent", "me", "take", "t-1"]);
        assert_eq!(cli.agent_flag(), Some("me"));

        let cli = Cli::parse_from(["bt", "--agent", "me", "assign", "t-1", "u-2"]);
        assert_eq!(cli.agent_flag(), Some("me"));

        let cli = Cli::parse_from(["bt", "--agent", "me", "handover", "t-1"]);
        assert_eq!(cli.agent_flag(), Some("me"));
    }
}
