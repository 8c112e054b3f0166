//! gh-codeowners
//!
//! A GitHub CLI extension to check and view your CODEOWNERS file.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::commands::{self, CommandError, OutputOptions};
use cli::config::{AppConfig, ConfigError, ExitCode, create_octocrab};
use cli::github::OctocrabClient;
use cli::output::AnsiDecorator;
use cli::{Args, Command, git};
use codeowners_annotate_core::render::RenderOptions;

#[tokio::main]
async fn main() -> StdExitCode {
    let args = Args::parse();

    init_tracing(args.verbose, args.json_output());

    // Set up signal handling for graceful shutdown
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_clone = terminated.clone();

    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }

        terminated_clone.store(true, Ordering::SeqCst);
    });

    let exit_code = match run(args, &terminated).await {
        Ok(code) => code,
        Err(e) => {
            write_error(&mut io::stderr(), &e.to_string(), io::stderr().is_terminal());
            ExitCode::Failure
        }
    };

    if terminated.load(Ordering::SeqCst) {
        return StdExitCode::from(ExitCode::Terminated as u8);
    }

    StdExitCode::from(i32::from(exit_code) as u8)
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Keep JSON output quiet unless logs were asked for
    if json_output && verbosity == 0 {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("octocrab=warn".parse().expect("valid directive"))
        .add_directive("hyper=warn".parse().expect("valid directive"))
        .add_directive("reqwest=warn".parse().expect("valid directive"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Run the selected command.
async fn run(args: Args, terminated: &AtomicBool) -> Result<ExitCode, CommandError> {
    let config = AppConfig::from_args(&args)?;
    debug!("Configuration: {:?}", config);

    let cwd = std::env::current_dir().map_err(ConfigError::from)?;
    let repo = match config.repo.clone() {
        Some(repo) => repo,
        None => git::origin_repository(&cwd)?,
    };
    info!("Repository: {}", repo);

    let token = config.token_for_host(repo.host())?;
    let client = OctocrabClient::new(create_octocrab(repo.host(), &token)?);

    if terminated.load(Ordering::SeqCst) {
        return Ok(ExitCode::Terminated);
    }

    let is_terminal = io::stdout().is_terminal();
    let output = OutputOptions {
        color: is_terminal && !config.no_color,
        pretty_json: is_terminal,
    };
    let stdout = io::stdout().lock();

    match &args.command {
        Command::Lint(lint) => {
            commands::lint(&client, &repo, lint, output, stdout).await?;
        }
        Command::View => {
            let root = git::root_dir(&cwd)?;
            let ref_name = git::branch_ref(&root)?;
            info!("Viewing CODEOWNERS for {}", ref_name);
            if terminated.load(Ordering::SeqCst) {
                return Ok(ExitCode::Terminated);
            }

            let decorator = AnsiDecorator::new(config.colors);
            let options = RenderOptions::new().with_decoration(output.color);
            let lines =
                commands::view(&client, &repo, &root, &ref_name, &decorator, options, stdout)
                    .await?;
            debug!("Wrote {} line(s)", lines);
        }
        Command::Pr(pr) => {
            let root = git::root_dir(&cwd)?;
            if terminated.load(Ordering::SeqCst) {
                return Ok(ExitCode::Terminated);
            }

            commands::pr(&client, &repo, &root, pr.number, output, stdout).await?;
        }
    }

    Ok(ExitCode::Success)
}

/// Write an error message to the writer.
fn write_error<W: Write>(writer: &mut W, message: &str, use_colors: bool) {
    if use_colors {
        let _ = writeln!(writer, "\x1b[1;31mError:\x1b[0m {}", message);
    } else {
        let _ = writeln!(writer, "Error: {}", message);
    }
}
