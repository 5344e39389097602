use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, Level};

pub mod archive;
pub mod cli;
pub mod commands;
pub mod error;
pub mod generate;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod subparts;
mod summary;
pub mod templates;
pub mod util;
pub mod validate;

use cli::{Cli, Command, ConfigCommand, LogFormatArg, LogLevelArg, QuestionCommand};
use commands::generate::GenerateOptions;
use error::TmaError;
use generate::StyleSource;
use logging::{init_logging, LogConfig, LogFormat};
use session::Session;
use store::FileStore;

/// Entry point of the `tmagen` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match start(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn start(cli: Cli) -> anyhow::Result<ExitCode> {
    let dir = match cli.state_dir.as_deref() {
        Some(dir) => util::expand_tilde(dir),
        None => FileStore::default_dir().context("could not determine a state directory")?,
    };
    let store = FileStore::new(dir);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    match runtime.block_on(dispatch(cli.command, &store)) {
        Ok(code) => Ok(code),
        Err(e @ TmaError::Validation(_)) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn dispatch(command: Command, store: &FileStore) -> error::Result<ExitCode> {
    match command {
        Command::Config(ConfigCommand::Show) => {
            summary::print_config(&Session::load(store).config);
        }
        Command::Config(ConfigCommand::Set { field, value }) => {
            let config = commands::config::set_field(store, field.into(), &value)?;
            summary::print_config(&config);
        }
        Command::Config(ConfigCommand::Reset) => {
            let config = commands::config::reset(store)?;
            summary::print_config(&config);
        }
        Command::Question(QuestionCommand::List) => {
            summary::print_questions(&Session::load(store).outline);
        }
        Command::Question(QuestionCommand::Add(fields)) => {
            let (number, _) = commands::question::add(store, fields.into())?;
            println!("Added question {number}");
            summary::print_questions(&Session::load(store).outline);
        }
        Command::Question(QuestionCommand::Edit { number, fields }) => {
            commands::question::edit(store, number, fields.into())?;
            summary::print_questions(&Session::load(store).outline);
        }
        Command::Question(QuestionCommand::Remove { number }) => {
            commands::question::remove(store, number)?;
            println!("Removed question {number}");
            summary::print_questions(&Session::load(store).outline);
        }
        Command::Question(QuestionCommand::Clear) => {
            commands::question::clear(store)?;
            summary::print_questions(&Session::load(store).outline);
        }
        Command::Validate => {
            let session = Session::load(store);
            let (config_report, outline_report) = commands::generate::check(&session);
            if !summary::print_reports(&config_report, &outline_report) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Generate(args) => {
            let session = Session::load(store);
            let styles = StyleSource::from_location(args.styles.as_deref())?;
            let options = GenerateOptions {
                output: args.output,
                extract_to: args.extract_to,
            };
            if let Some(outcome) =
                commands::generate::generate_package(&session, store, &styles, &options).await?
            {
                summary::print_generated(&outcome);
            }
        }
        Command::Export { path } => {
            let path = commands::transfer::export_settings(store, path).await?;
            println!("Exported settings to {}", path.display());
        }
        Command::Import { path } => {
            let session = commands::transfer::import_settings(store, &path).await?;
            println!(
                "Imported {} question(s) for {}",
                session.outline.len(),
                session.config.course
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::from_verbosity(cli.verbose);
    if let Some(level) = cli.log_level {
        config.level = match level {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}
