use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::env::CompleteEnv;
use clap_complete::{Shell, generate};

mod args;
mod cmd;
mod config;
mod input;
mod output;

#[derive(Parser)]
#[command(name = "fzrank")]
#[command(version = env!("FZRANK_VERSION"))]
#[command(about = "fzf-style fuzzy matching and ranking")]
#[command(
    long_about = "fzrank - Rank and highlight search suggestions with fzf v1 scoring.\n\nMatches favour word boundaries, camelCase humps and consecutive runs.\nUse `match` to inspect a single text and `filter` to rank candidate lines."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match one pattern against one text
    #[command(alias = "m")]
    Match(cmd::match_cmd::MatchArgs),

    /// Rank candidate lines from a file or stdin
    #[command(alias = "f")]
    Filter(cmd::filter::FilterArgs),

    /// Configuration introspection
    Config(cmd::config_cmd::ConfigArgs),

    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Clone, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn main() {
    // Handle dynamic shell completions
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Exit with 0 for help/version, 1 for actual errors
            let exit_code = if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                0
            } else {
                1
            };
            process::exit(exit_code);
        }
    };

    if let Commands::Completion(args) = &cli.command {
        let shell = match args.shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
        };
        generate(shell, &mut Cli::command(), "fzrank", &mut io::stdout());
        return;
    }

    output::init_color();

    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let loaded_config = config::load_config(&cwd);

    let result = match cli.command {
        Commands::Match(args) => cmd::match_cmd::run(args, &loaded_config.config),
        Commands::Filter(args) => cmd::filter::run(args, &loaded_config.config),
        Commands::Config(args) => cmd::config_cmd::run(args, &loaded_config),
        Commands::Completion(_) => unreachable!(), // Handled above
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
