use clap::Parser;
use rule_conditions::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.log_level);

    std::process::exit(cli::run(cli));
}
