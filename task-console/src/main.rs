use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Logger, Root};
use std::io;
use std::path::PathBuf;
use task_console::config::{Config, DEFAULT_CONFIG_FILE};
use task_console::console::Console;
use task_console::{TextFileGateway, Validator};

/// Manage a personal task list from the console
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Task file to load at start and save on exit
    #[arg(long)]
    file: Option<PathBuf>,
    /// Configuration file, ignored when missing
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(file) = args.file {
        config.file = file;
    }
    init_logging(config.log_level()?)?;

    let gateway = TextFileGateway::new(&config.file);
    let validator = Validator::new(config.max_description_length);
    let mut console = Console::new(&gateway, validator, io::stdin().lock(), io::stdout());
    console.run()?;

    Ok(())
}

fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().build("task_console", level))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    let _log4rs_handle = log4rs::init_config(config)?;
    Ok(())
}
