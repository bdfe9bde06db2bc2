use anyhow::Result;
use clap::Parser;

mod cli;
mod runtime;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    env_logger::init();

    runtime::execute(args)
}
