//! LazyFox CLI - fetch LazyFox sources
//!
//! Usage:
//!   lazyfox init                          Download the latest sources into .
//!   lazyfox init -v v0.1.0                Download a specific release or tag
//!   lazyfox init -d ./LazyFox-New         Download into another directory
//!   lazyfox init -d ./LazyFox-New --force Overwrite files that already exist

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use lazyfox::{GitHubClient, InitOptions, Upstream, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lazyfox")]
#[command(about = "Download LazyFox sources from the AmethystDev-Labs/LazyFox repository")]
#[command(after_help = "Examples:\n  lazyfox init\n  lazyfox init -v v0.1.0\n  lazyfox init -d ./LazyFox-New\n  lazyfox init -d ./LazyFox-New --force")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download sources (latest or a specific version)
    Init {
        /// Release tag to download
        #[arg(short = 'v', long = "version", value_name = "TAG", default_value = "latest")]
        tag: String,

        /// Directory to unpack into
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,

        /// Overwrite files that already exist in the destination
        #[arg(long)]
        force: bool,

        /// GitHub token, raises the API rate limit
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            output::error(&format!("cannot print help: {}", e));
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("[init] {}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Init {
            tag,
            dest,
            force,
            token,
        } => {
            let client = GitHubClient::new(Upstream::default()).with_token(token);
            let options = InitOptions {
                version: tag,
                dest,
                force,
            };
            lazyfox::init::run(&client, &options)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        assert!(parse(&["lazyfox"]).command.is_none());
    }

    #[test]
    fn test_init_defaults() {
        let Some(Commands::Init {
            tag, dest, force, ..
        }) = parse(&["lazyfox", "init"]).command
        else {
            panic!("expected init");
        };
        assert_eq!(tag, "latest");
        assert_eq!(dest, PathBuf::from("."));
        assert!(!force);
    }

    #[test]
    fn test_init_short_flags() {
        let Some(Commands::Init {
            tag, dest, force, ..
        }) = parse(&["lazyfox", "init", "-v", "v0.1.0", "-d", "./LazyFox-New", "--force"]).command
        else {
            panic!("expected init");
        };
        assert_eq!(tag, "v0.1.0");
        assert_eq!(dest, PathBuf::from("./LazyFox-New"));
        assert!(force);
    }

    #[test]
    fn test_init_long_flags() {
        let Some(Commands::Init { tag, dest, .. }) =
            parse(&["lazyfox", "init", "--version", "v2", "--dest", "out"]).command
        else {
            panic!("expected init");
        };
        assert_eq!(tag, "v2");
        assert_eq!(dest, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["lazyfox", "sync"]).is_err());
    }
}
