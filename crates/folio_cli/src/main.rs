//! Folio CLI: incremental API documentation for PHP projects.
//!
//! `folio parse` refreshes the class cache of every version, `folio render`
//! writes the pages that changed since the last render and `folio update`
//! does both, one version at a time.

#![warn(missing_docs)]

mod commands;
mod pipeline;
mod progress;
mod unit_parser;

use std::process;

use clap::{Args, Parser, Subcommand};

/// Folio: incremental API documentation builder.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Incremental API documentation builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `folio.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Exit with status 0 even when some units had parse errors.
    #[arg(long, global = true)]
    pub ignore_errors: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse the sources of every version into the cache.
    Parse(BuildArgs),
    /// Render the cached classes of every version.
    Render(BuildArgs),
    /// Parse then render every version.
    Update(BuildArgs),
}

/// Arguments shared by every build command.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Discard cached state and start from scratch.
    #[arg(short, long)]
    pub force: bool,

    /// Build only the named version.
    #[arg(long)]
    pub only_version: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Whether parse errors still exit with status 0.
    pub ignore_errors: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        ignore_errors: cli.ignore_errors,
    };

    let result = match cli.command {
        Command::Parse(ref args) => commands::parse(args, &global),
        Command::Render(ref args) => commands::render(args, &global),
        Command::Update(ref args) => commands::update(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Library events go to stderr; `RUST_LOG` overrides the flags.
fn init_tracing(quiet: bool, verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "debug",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("folio={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_update_default() {
        let cli = Cli::parse_from(["folio", "update"]);
        match cli.command {
            Command::Update(ref args) => {
                assert!(!args.force);
                assert!(args.only_version.is_none());
            }
            _ => panic!("expected Update command"),
        }
        assert!(!cli.quiet);
        assert!(!cli.ignore_errors);
    }

    #[test]
    fn parse_force_and_version() {
        let cli = Cli::parse_from(["folio", "parse", "--force", "--only-version", "2.x"]);
        match cli.command {
            Command::Parse(ref args) => {
                assert!(args.force);
                assert_eq!(args.only_version.as_deref(), Some("2.x"));
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn parse_render_short_force() {
        let cli = Cli::parse_from(["folio", "render", "-f"]);
        assert!(matches!(cli.command, Command::Render(ref args) if args.force));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "folio",
            "update",
            "--quiet",
            "--ignore-errors",
            "--config",
            "/srv/docs/folio.toml",
        ]);
        assert!(cli.quiet);
        assert!(cli.ignore_errors);
        assert_eq!(cli.config.as_deref(), Some("/srv/docs/folio.toml"));
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["folio", "--verbose", "parse"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["folio"]).is_err());
    }
}
