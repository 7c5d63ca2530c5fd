//! xcall command-line driver
//!
//! Loads the native master and the managed worker into one boundary and
//! runs the cross-call conformance harness, lists entry points, or issues
//! a single reverse call.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "xcall")]
#[command(about = "Cross-boundary call conformance harness", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./xcall.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directives, overriding the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// When to use colored output
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance harness
    Run {
        /// Which direction to check
        #[arg(short, long, value_enum, default_value_t = DirectionArg::All)]
        direction: DirectionArg,
        /// Only cases whose name contains this pattern
        #[arg(short, long)]
        filter: Option<String>,
        /// Stop after first failure
        #[arg(long)]
        bail: bool,
    },

    /// List entry points with their signatures
    List {
        /// Only list one side
        #[arg(short, long, value_enum)]
        side: Option<SideArg>,
    },

    /// Issue one reverse call and print the delivered result
    Call {
        /// Reverse test name (e.g. NoParamReturnBool)
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Reverse,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Native,
    Managed,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let global = commands::GlobalArgs {
        config: cli.config,
        log_level: cli.log_level,
        color: cli.color,
    };

    match cli.command {
        Commands::Run {
            direction,
            filter,
            bail,
        } => {
            let direction = match direction {
                DirectionArg::Forward => Some(xcall_host::Direction::Forward),
                DirectionArg::Reverse => Some(xcall_host::Direction::Reverse),
                DirectionArg::All => None,
            };
            commands::run::execute(
                &global,
                xcall_host::RunOptions {
                    direction,
                    filter,
                    bail,
                },
            )
        }

        Commands::List { side } => {
            let side = side.map(|s| match s {
                SideArg::Native => xcall_sdk::Side::Native,
                SideArg::Managed => xcall_sdk::Side::Managed,
            });
            commands::list::execute(&global, side)
        }

        Commands::Call { name } => commands::call::execute(&global, &name),
    }
}
