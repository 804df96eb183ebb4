use clap::Parser;
use rider_ledger::args::{AddSubcommand, Args, Command, UpdateSubcommand};
use rider_ledger::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().ledger_home().path();
    let owner = args.common().owner();

    // This allows for testing the program without touching the filesystem
    // tables. When RIDER_LEDGER_IN_TEST_MODE is set and non-zero in length,
    // then the mode will be Mode::Memory, otherwise it will be Mode::Csv.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            match add_args.entity() {
                AddSubcommand::Revenue(args) => {
                    commands::add_revenue(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
                AddSubcommand::Deposit(args) => {
                    commands::add_deposit(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
                AddSubcommand::Maintenance(args) => {
                    commands::add_maintenance(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list(config, owner, mode, list_args.clone())
                .await?
                .print()
        }

        Command::Update(update_args) => {
            let config = Config::load(home).await?;
            match update_args.entity() {
                UpdateSubcommand::Revenue(args) => {
                    commands::update_revenue(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
                UpdateSubcommand::Deposit(args) => {
                    commands::update_deposit(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
                UpdateSubcommand::Maintenance(args) => {
                    commands::update_maintenance(config, owner, mode, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            commands::delete(config, owner, mode, delete_args.clone())
                .await?
                .print()
        }

        Command::Goal(goal_args) => {
            let config = Config::load(home).await?;
            commands::goal(config, owner, mode, goal_args.clone())
                .await?
                .print()
        }

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            commands::report(config, owner, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Migrate => {
            let config = Config::load(home).await?;
            commands::migrate(config, owner, mode).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
