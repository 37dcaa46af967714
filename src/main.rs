use cache_sim::config::Config;
use cache_sim::run_simulation;
use clap::Parser;
use std::process;

fn main() {
    env_logger::init();
    let config = Config::parse();
    config.display();
    if let Err(err) = run_simulation(&config) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
