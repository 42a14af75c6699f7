use anyhow::Result;
use clap::Parser;
use cli::{BatchCallerCli, Commands, generate_wallet};

#[macro_use]
extern crate log;

mod batch;
mod cli;
mod constant;
mod contracts;
mod error;
#[cfg(test)]
mod testing;
mod transaction;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = BatchCallerCli::parse();

    match cli.command {
        Commands::GenerateWallet => {
            generate_wallet()?;
            Ok(())
        }
        Commands::Submit(submit_args) => submit_args.exec().await,
        Commands::Sign(sign_args) => sign_args.exec().await,
    }
}
