use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use openvox_bootstrap_exec::{Executor, LogStyle, Logger, ProcessRunner};

mod config;
mod dispatch;
mod output;

use config::load_config;
use dispatch::run_command;
use output::{error_document, print_document};

#[derive(Parser, Debug)]
#[command(name = "openvox-bootstrap")]
#[command(about = "Bootstrap OpenVox packages and services on a host", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Root under which the facts task is installed.
    #[arg(long, global = true)]
    install_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and print the platform identity.
    Facts,
    ArtifactUrl {
        name: String,
        version: String,
        #[arg(long)]
        source: Option<String>,
    },
    InstallPackage {
        name: String,
        #[arg(long)]
        version: Option<String>,
    },
    /// Download a package build from the artifacts server and install it.
    InstallArtifact {
        name: String,
        version: String,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        sha256: Option<String>,
        #[arg(long)]
        stop_service: bool,
    },
    Download {
        url: String,
        destination: PathBuf,
        #[arg(long)]
        sha256: Option<String>,
    },
    StopService {
        package: String,
        #[arg(long)]
        puppet_bin: Option<PathBuf>,
    },
    Service {
        package: String,
        #[arg(long, value_enum)]
        ensure: EnsureArg,
        #[arg(long, action = clap::ArgAction::Set)]
        enable: bool,
        #[arg(long)]
        puppet_bin: Option<PathBuf>,
    },
    /// Compare the installed agent version against a requested one.
    Check {
        #[arg(long)]
        version: Option<String>,
        #[arg(long, default_value = "eq")]
        test: String,
    },
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum EnsureArg {
    Running,
    Stopped,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut stdout = std::io::stdout().lock();
        return match write_completions_script(shell, &mut stdout) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(
        cli.config.as_deref(),
        cli.install_root.as_deref(),
        |key| std::env::var(key).ok(),
    ) {
        Ok(config) => config,
        Err(err) => {
            print_document(&error_document(&err));
            return ExitCode::FAILURE;
        }
    };

    let logger = Logger::stderr(LogStyle::detect());
    let mut executor = Executor::new(ProcessRunner, logger);
    match run_command(cli.command, &config, &mut executor) {
        Ok(outcome) => {
            print_document(&outcome.document);
            if outcome.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            print_document(&error_document(&err));
            ExitCode::FAILURE
        }
    }
}

fn write_completions_script<W: Write>(shell: Shell, writer: &mut W) -> anyhow::Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "openvox-bootstrap", writer);
    writer.flush()?;
    Ok(())
}
