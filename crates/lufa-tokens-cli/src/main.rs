// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use lufa_tokens_policies::{
    load_policy_config, load_policy_from_workspace, render_json, render_rules_json,
    render_rules_text, render_text, resolve_tokens_dir, rule_catalog, scan_token_dir, ExitCode,
    ScanOptions, TokenPolicyConfig, ViolationMode,
};
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lufa-tokens", version)]
#[command(about = "Lufa design-token consistency validator")]
struct Cli {
    #[arg(long, global = true)]
    repo_root: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every token file under a directory.
    Check {
        /// Token directory; defaults to the configured `tokens_dir`.
        dir: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        /// Report every failing rule per token instead of the first one.
        #[arg(long, default_value_t = false)]
        all_violations: bool,
    },
    /// Print the rule catalog in evaluation order.
    Rules {
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(repo_root: &Path, explicit: Option<&Path>) -> Result<TokenPolicyConfig, String> {
    match explicit {
        Some(path) => load_policy_config(path),
        None => load_policy_from_workspace(repo_root),
    }
    .map_err(|err| err.to_string())
}

fn resolve_repo_root(arg: Option<PathBuf>) -> Result<PathBuf, String> {
    match arg {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|err| format!("cannot resolve cwd: {err}")),
    }
}

fn run_check(
    repo_root: &Path,
    cfg: &TokenPolicyConfig,
    dir: Option<PathBuf>,
    format: FormatArg,
    all_violations: bool,
) -> Result<ExitCode, String> {
    let tokens_dir = match dir {
        Some(dir) => dir,
        None => resolve_tokens_dir(repo_root, cfg),
    };
    let mut opts = ScanOptions::from(cfg);
    if all_violations {
        opts.mode = ViolationMode::AllViolations;
    }
    debug!(dir = %tokens_dir.display(), mode = opts.mode.as_str(), "starting token scan");

    let report = match scan_token_dir(&tokens_dir, &opts) {
        Ok(report) => report,
        Err(err) => {
            error!("{err}");
            eprintln!("lufa-tokens: {err}");
            return Ok(ExitCode::Fatal);
        }
    };
    let rendered = match format {
        FormatArg::Text => render_text(&report),
        FormatArg::Json => render_json(&report).map_err(|err| err.to_string())?,
    };
    println!("{rendered}");
    Ok(report.exit_code())
}

fn run_rules(format: FormatArg) -> Result<ExitCode, String> {
    let rendered = match format {
        FormatArg::Text => render_rules_text(rule_catalog()),
        FormatArg::Json => render_rules_json(rule_catalog()).map_err(|err| err.to_string())?,
    };
    println!("{rendered}");
    Ok(ExitCode::Success)
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let command = cli.command.unwrap_or(Command::Check {
        dir: None,
        format: FormatArg::Text,
        all_violations: false,
    });
    match command {
        Command::Rules { format } => run_rules(format),
        Command::Check {
            dir,
            format,
            all_violations,
        } => {
            let repo_root = resolve_repo_root(cli.repo_root)?;
            let cfg = load_config(&repo_root, cli.config.as_deref())?;
            run_check(&repo_root, &cfg, dir, format, all_violations)
        }
    }
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet, cli.log_json);
    match run(cli) {
        Ok(code) => ProcessExitCode::from(code.status() as u8),
        Err(err) => {
            eprintln!("lufa-tokens: {err}");
            ProcessExitCode::from(ExitCode::Fatal.status() as u8)
        }
    }
}
