use std::error::Error;

use clap::Parser;
use fabrikit::cli::{
    args::CliArgs,
    command_handlers::{build_fabrikit, run_and_finish},
};

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let fabrikit = build_fabrikit(&cli_args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_and_finish(
        fabrikit,
        &cli_args.cmd,
        cli_args.keep_clones,
    ))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
