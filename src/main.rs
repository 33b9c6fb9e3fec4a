use clap::Parser;
use redpen::cli::{Config, Prompter, Runner};
use redpen::conf;
use std::io;
use std::process;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();
    conf::load_dotenv();

    let runner = Runner::from_env();
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    if let Err(err) = runner.run(&mut prompter).await {
        eprintln!("{err}");
        process::exit(1);
    }
}
