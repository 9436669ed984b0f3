use clap::{Parser, ValueEnum};
use keystone_interop::{config, execute, Command, InteropError};
use std::io;
use std::process::ExitCode;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Keystone interop harness - generate and check artifacts across implementations"
)]
struct Args {
    /// JSON request: {"command": "create"|"generate"|"test", ...}
    json: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn run(args: Args) -> anyhow::Result<()> {
    let json = config::resolve_envelope(args.json)?;
    let command = Command::parse(&json)?;
    let outcome = execute(command)?;
    if let Some(line) = outcome.report() {
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.log_level {
        LogLevel::Trace => tracing::Level::TRACE,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<InteropError>()
                .map_or(1, InteropError::exit_code);
            ExitCode::from(code)
        }
    }
}
