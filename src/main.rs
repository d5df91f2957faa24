use std::process;

use clap::Parser;
use tracing::error;

use cerebrus::cli::{self, Cli, Status};
use cerebrus::telemetry;

fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli::run(cli) {
        Ok(Status::Passed) => {}
        Ok(Status::Failed) => process::exit(1),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
