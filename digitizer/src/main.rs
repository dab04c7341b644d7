mod commands;
mod handlers;
mod output;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = commands::Cli::parse();
    handlers::handle_command(cli)
}
