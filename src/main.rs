use clap::Parser;
use log::error;

use cbencode::engine::{use_command, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = use_command(cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
