mod commands;
mod terminal;

use commands::{CommandLine, Commands, query, serve};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    match commands.command {
        Commands::Serve(args) => {
            print::header("starting discovery server");
            serve::serve(args.into_config()).await
        }
        Commands::Query(args) => query::query(args).await,
    }
}
