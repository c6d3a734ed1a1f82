use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::debug;

use SnapPick::consts::{EXIT_FAILURE, EXIT_MISSING_ARGUMENT};
use SnapPick::error::SelectError;
use SnapPick::metrics;

mod cli;
mod cmd_parse;
mod cmd_pick;
mod cmd_update_json;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — warn (stdout остаётся чистым списком файлов).
    // Пример: RUST_LOG=debug snappick @4.2..4.7:5
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    let code = match run() {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<SelectError>() {
            Some(se @ SelectError::UnrecognizedArgument(_)) => {
                eprintln!("{}", se);
                eprintln!("{}", cli::usage());
                se.exit_code()
            }
            Some(se) => {
                eprintln!("error: {}", se);
                se.exit_code()
            }
            None => {
                eprintln!("error: {:#}", e);
                EXIT_FAILURE
            }
        },
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    let cfg = cli.config();
    debug!("{}", cfg);

    let res = match &cli.cmd {
        Some(cli::Cmd::Parse { expr }) => cmd_parse::exec(expr),

        Some(cli::Cmd::UpdateJson { .. }) => cmd_update_json::exec(&cfg),

        None => {
            if cli.exprs.is_empty() {
                eprintln!("Missing required argument <EXPR>\n");
                eprintln!("{}", cli::help());
                return Ok(EXIT_MISSING_ARGUMENT);
            }
            cmd_pick::exec(&cfg, &cli.exprs, cli.json)
        }
    };

    if cli.metrics {
        eprintln!("{}", serde_json::to_string(&metrics::snapshot())?);
    }
    res.map(|_| 0)
}
