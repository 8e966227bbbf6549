use clap::{Parser, Subcommand};
use shellclient_core::{Command, Interpreter, ShellError};
use shellclient_runner::{AsyncShellClient, ProcessExecutor, WHITESPACE_AND_NEWLINES};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{parse_key_val, ClientConfig, Overrides};

#[derive(Parser)]
#[command(name = "shell-client")]
#[command(about = "Run shell commands in the foreground or capture their output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML) with interpreter, environment and working_directory defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interpreter: bash, csh, sh, tcsh, zsh (":raw" disables -c), env, env:<shell>,
    /// a path, or a program name found on PATH
    #[arg(long, global = true)]
    shell: Option<String>,

    /// Extra environment variable for the child, repeatable
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val, global = true)]
    env: Vec<(String, String)>,

    /// Working directory for the child
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command with its output on this terminal
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run a command and print its captured stdout
    Capture {
        /// Trim surrounding whitespace and newlines
        #[arg(long)]
        trim: bool,

        /// Decode the output as JSON and pretty-print it
        #[arg(long)]
        json: bool,

        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the tag of HEAD, or its commit when HEAD is not tagged
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let overrides = Overrides {
        shell: cli.shell,
        env: cli.env,
        cwd: cli.cwd,
    };
    let shell = ProcessExecutor::new();

    match cli.command {
        Commands::Run { args } => {
            let interpreter = config.resolve_interpreter(&overrides)?;
            let command = config.build_command(&overrides, interpreter, args);
            shell.run_foreground(&command).await?;
        }
        Commands::Capture { trim, json, args } => {
            let interpreter = config.resolve_interpreter(&overrides)?;
            let command = config.build_command(&overrides, interpreter, args);
            let rendered = capture(&shell, &command, trim, json).await?;
            std::io::stdout().write_all(&rendered)?;
        }
        Commands::Version => {
            let working_directory = overrides.cwd.as_ref().or(config.working_directory.as_ref());
            let version = current_version(&shell, working_directory.map(PathBuf::as_path)).await?;
            println!("{}", version);
        }
    }

    Ok(())
}

/// Bytes to write for `capture`, after the requested post-processing
async fn capture<S: AsyncShellClient>(
    shell: &S,
    command: &Command,
    trim: bool,
    json: bool,
) -> anyhow::Result<Vec<u8>> {
    if json {
        let value: serde_json::Value = shell.background_json(command).await?;
        let mut rendered = serde_json::to_vec_pretty(&value)?;
        rendered.push(b'\n');
        return Ok(rendered);
    }
    if trim {
        let text = shell
            .background_string(command, Some(WHITESPACE_AND_NEWLINES))
            .await?;
        return Ok(format!("{}\n", text).into_bytes());
    }
    Ok(shell.run_background(command).await?)
}

fn git(args: &[&str], working_directory: Option<&Path>) -> Command {
    let args = std::iter::once("git").chain(args.iter().copied());
    let command = Command::new(Interpreter::env(), args);
    match working_directory {
        Some(dir) => command.with_working_directory(dir),
        None => command,
    }
}

/// Exact tag of HEAD, falling back to the commit sha
async fn current_version<S: AsyncShellClient>(
    shell: &S,
    working_directory: Option<&Path>,
) -> Result<String, ShellError> {
    let describe = git(&["describe", "--exact-match", "--tags"], working_directory);
    match shell
        .background_string(&describe, Some(WHITESPACE_AND_NEWLINES))
        .await
    {
        Ok(tag) => {
            info!(tag = %tag, "Found tag for HEAD");
            Ok(tag)
        }
        Err(ShellError::Process { exit_code }) => {
            warn!(exit_code, "No tag found: using commit");
            let rev_parse = git(&["rev-parse", "HEAD"], working_directory);
            shell
                .background_string(&rev_parse, Some(WHITESPACE_AND_NEWLINES))
                .await
        }
        Err(err) => Err(err),
    }
}

/// The child's own status for process failures, 1 for everything else
fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ShellError>().and_then(ShellError::exit_code) {
        Some(code) => match (code & 0xff) as u8 {
            0 => 1,
            code => code,
        },
        None => 1,
    }
}
