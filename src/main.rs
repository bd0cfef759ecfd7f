mod command;
mod ctrl;
mod os;

use anyhow::{Context, Result};
use clap::Parser;
use command::{legacy_text, Command, CommandError, CommandExecutor, CommandRequest, COMMAND_NAMES};
use ctrl::{ControlLib, EmulatedControlLib};
use os::{DryRunRunner, NetConfig, OsCommandRunner, SystemRunner};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "hosted-ctrl")]
#[command(about = "Configure an ESP-Hosted co-processor from the host", long_about = None)]
struct Cli {
    /// Run host OS commands (dhclient, ifconfig, hciconfig) for real.
    /// Without this they are only logged.
    #[arg(long)]
    run_os_commands: bool,

    /// Run the commands in this file, one per line
    #[arg(long, value_name = "FILE")]
    batch: Option<PathBuf>,

    /// Switch the co-processor heartbeat off before exiting
    #[arg(long)]
    stop_heartbeat: bool,

    /// Single command to run, e.g. `set_wifi_mode mode=station`
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let lib = EmulatedControlLib::new();

    // The emulated co-processor reports made-up MACs and associations, so
    // host side effects stay logged unless explicitly requested.
    if cli.run_os_commands {
        warn!("Running host OS commands against an emulated co-processor");
        run(cli, CommandExecutor::new(lib, SystemRunner, NetConfig::default())).await
    } else {
        info!("Dry run: OS commands will be logged only");
        run(cli, CommandExecutor::new(lib, DryRunRunner::new(), NetConfig::default())).await
    }
}

async fn run<L: ControlLib, R: OsCommandRunner>(cli: Cli, mut executor: CommandExecutor<L, R>) -> Result<()> {
    executor
        .init()
        .await
        .context("init hosted control lib failed")?;

    let outcome = if !cli.command.is_empty() {
        let request = CommandRequest::from_args(cli.command.iter().map(String::as_str));
        run_request(&mut executor, request).await;
        Ok(())
    } else if let Some(path) = &cli.batch {
        run_batch(&mut executor, path).await
    } else {
        run_interactive(&mut executor).await
    };

    if let Err(e) = executor.deinit(cli.stop_heartbeat).await {
        error!("Failed to close control library: {}", e);
    }
    outcome
}

async fn run_batch<L: ControlLib, R: OsCommandRunner>(executor: &mut CommandExecutor<L, R>, path: &PathBuf) -> Result<()> {
    let script = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    for line in script.lines() {
        if handle_line(executor, line).await == LineAction::Quit {
            break;
        }
    }
    Ok(())
}

async fn run_interactive<L: ControlLib, R: OsCommandRunner>(executor: &mut CommandExecutor<L, R>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("hosted> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if handle_line(executor, &line).await == LineAction::Quit {
            break;
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum LineAction {
    Continue,
    Quit,
}

async fn handle_line<L: ControlLib, R: OsCommandRunner>(executor: &mut CommandExecutor<L, R>, line: &str) -> LineAction {
    let line = line.trim();
    match line {
        "" => return LineAction::Continue,
        l if l.starts_with('#') => return LineAction::Continue,
        "exit" | "quit" => return LineAction::Quit,
        "help" => {
            println!("Commands:");
            for name in COMMAND_NAMES {
                println!("  {}", name);
            }
            return LineAction::Continue;
        }
        _ => {}
    }

    run_request(executor, CommandRequest::parse_line(line)).await;
    LineAction::Continue
}

async fn run_request<L: ControlLib, R: OsCommandRunner>(
    executor: &mut CommandExecutor<L, R>,
    request: Result<CommandRequest, CommandError>,
) {
    let command = request.and_then(|req| Command::try_from(&req));
    let text = match command {
        Ok(command) => executor.execute_to_text(&command).await,
        Err(e) => legacy_text(&Err(e)),
    };
    if !text.is_empty() {
        println!("{}", text);
    }
}
