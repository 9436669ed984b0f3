use anyhow::Context;
use clap::Parser;
use keystone_keytool::Cli;
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(io::stderr)
        .init();

    keystone_keytool::execute(cli.command).context("keytool command failed")
}
