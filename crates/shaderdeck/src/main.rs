mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing(cli.log.as_deref());

    match cli.command {
        Command::List(args) => run::list(args),
        Command::Info(args) => run::info(args),
        Command::Check(args) => run::check(args),
        Command::Soak(args) => run::soak(args),
    }
}
