mod client;
mod config;
mod lock;
mod opts;
mod oracle;
mod unlock;

use crate::opts::{Opts, Subcommand};
use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();

    let opts = Opts::parse();

    match opts.subcmd {
        Subcommand::Lock(o) => crate::lock::exec(o).await,
        Subcommand::Unlock(o) => crate::unlock::exec(o).await,
    }
}
