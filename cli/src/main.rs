mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, scan};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    match commands.command {
        Commands::Info => info::info(),
        Commands::Scan(args) => scan::scan(args).await,
    }
}
